//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Any error-severity violation makes a catalog unusable.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::catalog::{TraitCatalog, TraitCategory, VariantKind};
use crate::escape::{check_escaped, is_known_reference};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub category: TraitCategory,
    pub index: Option<usize>,
    pub message: String,
}

impl ValidationViolation {
    fn error(rule: &str, category: TraitCategory, index: Option<usize>, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            severity: ViolationSeverity::Error,
            category,
            index,
            message,
        }
    }
}

impl std::fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}: {}[{}]: {}", self.rule, self.category, i, self.message),
            None => write!(f, "{}: {}: {}", self.rule, self.category, self.message),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, catalog: &TraitCatalog) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// A table with no variants cannot be indexed (`byte % 0`).
pub struct EmptyTableRule;

impl ValidationRule for EmptyTableRule {
    fn name(&self) -> &'static str { "empty_table" }

    fn validate(&self, catalog: &TraitCatalog) -> Vec<ValidationViolation> {
        TraitCategory::ALL
            .iter()
            .filter(|c| catalog.table(**c).is_empty())
            .map(|c| ValidationViolation::error(
                self.name(),
                *c,
                None,
                "Table has no variants".to_string(),
            ))
            .collect()
    }
}

pub struct ColorValueRule;

impl ValidationRule for ColorValueRule {
    fn name(&self) -> &'static str { "color_value" }

    fn validate(&self, catalog: &TraitCatalog) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for category in TraitCategory::ALL {
            if category.kind() != VariantKind::Color {
                continue;
            }
            for (i, value) in catalog.table(category).iter().enumerate() {
                if !is_hex_color(value) {
                    violations.push(ValidationViolation::error(
                        self.name(),
                        category,
                        Some(i),
                        format!("Expected #RGB or #RRGGBB, got {:?}", value),
                    ));
                }
            }
        }
        violations
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Fragments are inserted verbatim, so each must be balanced on its own.
pub struct MarkupRule;

impl ValidationRule for MarkupRule {
    fn name(&self) -> &'static str { "markup" }

    fn validate(&self, catalog: &TraitCatalog) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for category in TraitCategory::ALL {
            if category.kind() != VariantKind::Markup {
                continue;
            }
            for (i, fragment) in catalog.table(category).iter().enumerate() {
                if let Err(message) = check_fragment(fragment) {
                    violations.push(ValidationViolation::error(
                        self.name(),
                        category,
                        Some(i),
                        message,
                    ));
                }
            }
        }
        violations
    }
}

fn check_fragment(fragment: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(fragment);
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                check_attributes(&e)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => check_attributes(&e)?,
            Ok(Event::End(e)) => {
                if depth == 0 {
                    return Err(format!(
                        "Unmatched closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                depth -= 1;
            }
            Ok(Event::Text(t)) => check_escaped(&String::from_utf8_lossy(&t))?,
            Ok(Event::GeneralRef(r)) => {
                let name = String::from_utf8_lossy(&r);
                if !is_known_reference(&name) {
                    return Err(format!("Unknown entity reference &{};", name));
                }
            }
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) | Ok(Event::PI(_)) => {
                return Err("Declarations are not allowed in fragments".to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "Malformed markup at position {}: {}",
                    reader.error_position(),
                    e
                ));
            }
        }
    }

    if depth != 0 {
        return Err(format!("{} unclosed element(s)", depth));
    }
    Ok(())
}

/// Duplicate names and bad quoting fail in the attribute iterator itself.
fn check_attributes(start: &BytesStart<'_>) -> Result<(), String> {
    let element = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("<{}>: {}", element, e))?;
        let value = String::from_utf8_lossy(&attr.value);
        check_escaped(&value).map_err(|e| {
            format!(
                "<{}> attribute {}: {}",
                element,
                String::from_utf8_lossy(attr.key.as_ref()),
                e
            )
        })?;
    }
    Ok(())
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(EmptyTableRule),
                Box::new(ColorValueRule),
                Box::new(MarkupRule),
            ],
        }
    }

    pub fn validate(&self, catalog: &TraitCatalog) -> ValidationResult {
        let violations: Vec<_> = self.rules
            .iter()
            .flat_map(|rule| rule.validate(catalog))
            .collect();

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every rule against `catalog`
pub fn validate_catalog(catalog: &TraitCatalog) -> ValidationResult {
    Validator::new().validate(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TraitTable;

    #[test]
    fn test_standard_catalog_is_valid() {
        let result = validate_catalog(&TraitCatalog::standard());
        assert!(result.valid, "{}", result.summary());
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut catalog = TraitCatalog::standard();
        catalog.mouths = TraitTable::default();

        let result = validate_catalog(&catalog);
        assert!(!result.valid);
        assert!(result.has_errors());
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule, "empty_table");
        assert_eq!(result.violations[0].category, TraitCategory::Mouth);
    }

    #[test]
    fn test_bad_color_rejected() {
        let mut catalog = TraitCatalog::standard();
        catalog.face_colors = TraitTable::new(["#FFD700", "red", "#12345", "\"/><script/>"]);

        let result = validate_catalog(&catalog);
        assert!(!result.valid);
        let indices: Vec<_> = result.violations.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_hex_color_forms() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#A01B1B"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn test_unbalanced_markup_rejected() {
        let mut catalog = TraitCatalog::standard();
        catalog.eyes = TraitTable::new([
            r#"<g><circle r="1"/>"#,
            r#"</g>"#,
            r#"<g></h>"#,
        ]);

        let result = validate_catalog(&catalog);
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 3);
        assert!(result.violations.iter().all(|v| v.rule == "markup"));
        assert!(result.summary().contains("eyes[0]"));
    }

    #[test]
    fn test_attribute_and_entity_errors_rejected() {
        let raw_lt = check_fragment(r#"<g fill="a<b"/>"#).unwrap_err();
        assert!(raw_lt.contains("attribute fill"), "{raw_lt}");

        let entity = check_fragment("<g>&nbsp;</g>").unwrap_err();
        assert!(entity.contains("nbsp"), "{entity}");

        assert!(check_fragment(r#"<g a="1" a="2"/>"#).is_err());
        assert!(check_fragment(r#"<g a="&bogus;"/>"#).is_err());
        assert!(check_fragment("<g>a & b</g>").is_err());
        assert!(check_fragment("<g>&#x0;</g>").is_err());
    }

    #[test]
    fn test_known_references_allowed() {
        assert!(check_fragment(r#"<text x="1" title="&quot;a&quot; &amp; b">&lt;3 &#x2665;</text>"#).is_ok());
    }

    #[test]
    fn test_ill_formed_fragments_make_catalog_invalid() {
        let mut catalog = TraitCatalog::standard();
        catalog.eyes = TraitTable::new([
            r#"<g fill="a<b"/>"#,
            "<g>&nbsp;</g>",
            r#"<g a="1" a="2"/>"#,
        ]);

        let result = validate_catalog(&catalog);
        assert!(!result.valid);
        let indices: Vec<_> = result.violations.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_empty_fragment_allowed() {
        assert!(check_fragment("").is_ok());
        assert!(check_fragment(r#"<g fill="red"><rect/></g><path d="M 0 0"/>"#).is_ok());
    }
}
