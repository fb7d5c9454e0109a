//! Trait Catalog - The Fixed Vocabulary
//!
//! Index positions are part of the seed-to-face mapping. Reordering or
//! editing any table changes the face of every existing seed.
//!
//! Fragments are stored on one line each, with runs of whitespace collapsed
//! and `" />"` written as `"/>"`. The trailing annotation is `seed:{seed}`.
//! Trait selection for a seed is unchanged from earlier generators, but
//! byte output is not: `tests/golden/default.svg` and `STANDARD_FINGERPRINT`
//! are the baseline from this version on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::hashing::{sha256_hex, canonical_json};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One axis of visual variation, in digest byte assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Background,
    FaceColor,
    Head,
    Eyes,
    Mouth,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// A color value such as `#FFD700`
    Color,
    /// A trusted SVG fragment
    Markup,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 6] = [
        TraitCategory::Background,
        TraitCategory::FaceColor,
        TraitCategory::Head,
        TraitCategory::Eyes,
        TraitCategory::Mouth,
        TraitCategory::Accessory,
    ];

    /// Digest byte consumed by this category. No byte is shared.
    pub fn digest_byte(self) -> usize {
        match self {
            TraitCategory::Background => 0,
            TraitCategory::FaceColor => 1,
            TraitCategory::Head => 2,
            TraitCategory::Eyes => 3,
            TraitCategory::Mouth => 4,
            TraitCategory::Accessory => 5,
        }
    }

    pub fn kind(self) -> VariantKind {
        match self {
            TraitCategory::Background | TraitCategory::FaceColor => VariantKind::Color,
            _ => VariantKind::Markup,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TraitCategory::Background => "background",
            TraitCategory::FaceColor => "face_color",
            TraitCategory::Head => "head",
            TraitCategory::Eyes => "eyes",
            TraitCategory::Mouth => "mouth",
            TraitCategory::Accessory => "accessory",
        }
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered variants of one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitTable(Vec<String>);

impl TraitTable {
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(variants.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitCatalog {
    pub backgrounds: TraitTable,
    pub face_colors: TraitTable,
    pub heads: TraitTable,
    pub eyes: TraitTable,
    pub mouths: TraitTable,
    pub accessories: TraitTable,
}

impl TraitCatalog {
    /// The built-in catalog every published seed was rendered with.
    pub fn standard() -> Self {
        Self {
            backgrounds: TraitTable::new(BACKGROUNDS),
            face_colors: TraitTable::new(FACE_COLORS),
            heads: TraitTable::new(HEADS),
            eyes: TraitTable::new(EYES),
            mouths: TraitTable::new(MOUTHS),
            accessories: TraitTable::new(ACCESSORIES),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn table(&self, category: TraitCategory) -> &TraitTable {
        match category {
            TraitCategory::Background => &self.backgrounds,
            TraitCategory::FaceColor => &self.face_colors,
            TraitCategory::Head => &self.heads,
            TraitCategory::Eyes => &self.eyes,
            TraitCategory::Mouth => &self.mouths,
            TraitCategory::Accessory => &self.accessories,
        }
    }

    /// SHA-256 of the canonical JSON form.
    ///
    /// Two catalogs with the same fingerprint map every seed to the same face.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let canonical = canonical_json(self)?;
        Ok(sha256_hex(canonical.as_bytes()))
    }
}

impl Default for TraitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fingerprint of [`TraitCatalog::standard`]. If this changes, every seed
/// renders a different face.
pub const STANDARD_FINGERPRINT: &str =
    "0ae7dd04ec5801dea4df8685993d10db52e139bae418931ca7ce4c63bbc3cbe2";

const BACKGROUNDS: [&str; 6] = ["#F0F8FF", "#FAEBD7", "#E6E6FA", "#F5F5DC", "#FFF0F5", "#F0FFF0"];

const FACE_COLORS: [&str; 6] = ["#FFD700", "#90EE90", "#ADD8E6", "#FFB6C1", "#FFA07A", "#87CEEB"];

const HEADS: [&str; 4] = [
    r##"<circle cx="50" cy="60" r="30" stroke="#444" stroke-width="1"/>"##,
    r##"<ellipse cx="50" cy="60" rx="25" ry="32" stroke="#444" stroke-width="1"/>"##,
    r##"<ellipse cx="50" cy="60" rx="32" ry="25" stroke="#444" stroke-width="1"/>"##,
    r##"<rect x="20" y="30" width="60" height="60" rx="15" stroke="#444" stroke-width="1"/>"##,
];

const EYES: [&str; 5] = [
    // dots
    r##"<g fill="#333333"><circle cx="40" cy="55" r="3"/><circle cx="60" cy="55" r="3"/></g>"##,
    // round
    r##"<g><circle cx="40" cy="55" r="5" fill="white" stroke="#333333" stroke-width="1"/><circle cx="40" cy="55" r="2.5" fill="#333333"/><circle cx="60" cy="55" r="5" fill="white" stroke="#333333" stroke-width="1"/><circle cx="60" cy="55" r="2.5" fill="#333333"/></g>"##,
    // happy arcs
    r##"<g stroke="#333333" stroke-width="2" stroke-linecap="round" fill="none"><path d="M 35 58 Q 40 52 45 58"/><path d="M 55 58 Q 60 52 65 58"/></g>"##,
    // wink
    r##"<g><circle cx="40" cy="55" r="3" fill="#333333"/><path d="M 55 58 Q 60 52 65 58" stroke="#333333" stroke-width="2" stroke-linecap="round" fill="none"/></g>"##,
    // side glance
    r##"<g><circle cx="40" cy="55" r="5" fill="white" stroke="#333333" stroke-width="1"/><circle cx="37" cy="55" r="2.5" fill="#333333"/><circle cx="60" cy="55" r="5" fill="white" stroke="#333333" stroke-width="1"/><circle cx="63" cy="55" r="2.5" fill="#333333"/></g>"##,
];

const MOUTHS: [&str; 5] = [
    r##"<path d="M 40 75 Q 50 85 60 75" stroke="#333333" fill="none" stroke-width="2" stroke-linecap="round"/>"##,
    r##"<path d="M 40 72 C 40 82, 60 82, 60 72 Z" fill="#333333"/>"##,
    r##"<ellipse cx="50" cy="78" rx="5" ry="4" fill="#333333"/>"##,
    r##"<path d="M 40 75 Q 45 80 50 75 T 60 75" stroke="#333333" fill="none" stroke-width="2" stroke-linecap="round"/>"##,
    r##"<line x1="40" y1="78" x2="60" y2="78" stroke="#333333" stroke-width="2" stroke-linecap="round"/>"##,
];

const ACCESSORIES: [&str; 4] = [
    // none
    "",
    // top hat
    r##"<g fill="#222222"><rect x="35" y="15" width="30" height="20"/><rect x="30" y="35" width="40" height="5"/></g>"##,
    // bow tie
    r##"<g fill="#D22B2B"><path d="M 50 92 L 40 87 L 40 97 Z"/><path d="M 50 92 L 60 87 L 60 97 Z"/><circle cx="50" cy="92" r="3" fill="#A01B1B"/></g>"##,
    // glasses
    r##"<g stroke="#333333" stroke-width="1.5" fill="none"><circle cx="40" cy="55" r="8"/><circle cx="60" cy="55" r="8"/><path d="M 48 55 Q 50 50 52 55"/></g>"##,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_sizes() {
        let catalog = TraitCatalog::standard();
        let sizes: Vec<_> = TraitCategory::ALL
            .iter()
            .map(|c| catalog.table(*c).len())
            .collect();
        assert_eq!(sizes, vec![6, 6, 4, 5, 5, 4]);
    }

    #[test]
    fn test_accessory_none_is_first() {
        let catalog = TraitCatalog::standard();
        assert_eq!(catalog.accessories.get(0), Some(""));
    }

    #[test]
    fn test_digest_bytes_unique() {
        let mut bytes: Vec<_> = TraitCategory::ALL.iter().map(|c| c.digest_byte()).collect();
        bytes.dedup();
        assert_eq!(bytes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let catalog = TraitCatalog::standard();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"faceColors\""));
        let parsed = TraitCatalog::from_json_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let err = TraitCatalog::from_json_str(r##"{"backgrounds": ["#fff"]}"##).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_standard_fingerprint_pinned() {
        assert_eq!(TraitCatalog::standard().fingerprint().unwrap(), STANDARD_FINGERPRINT);
    }

    #[test]
    fn test_fingerprint_tracks_order() {
        let catalog = TraitCatalog::standard();
        let mut reordered = catalog.clone();
        reordered.backgrounds = TraitTable::new(BACKGROUNDS.iter().rev().copied());
        assert_eq!(catalog.fingerprint().unwrap(), catalog.fingerprint().unwrap());
        assert_ne!(catalog.fingerprint().unwrap(), reordered.fingerprint().unwrap());
    }
}
