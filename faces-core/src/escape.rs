//! Markup neutralization.
//!
//! - `escape()` - text content and attribute values
//! - `escape_comment()` - comment bodies (annotations)
//! - `unescape()` - inverse of `escape_comment()`
//! - `check_escaped()` - verify raw text or attribute content

use std::borrow::Cow;

/// Characters that require escaping in text and attributes.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    }
}

/// Whether `c` matches the XML 1.0 `Char` production.
#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape special characters in text content and attribute values.
///
/// Characters that XML forbids outright cannot be written even as character
/// references here, so they become U+FFFD.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) && s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None if !is_xml_char(c) => result.push(char::REPLACEMENT_CHARACTER),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape a comment body.
///
/// Comments are never reference-expanded by a parser, so this encoding is
/// only reversed by `unescape()`. Every `-` becomes `&#45;` so the body can
/// never contain `--` or end in `-`. `\r` and forbidden characters become
/// hex references.
pub fn escape_comment(s: &str) -> Cow<'_, str> {
    if !s.contains(['-', '\r', '&', '<', '>', '"', '\'']) && s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '-' => result.push_str("&#45;"),
            '\r' => push_char_ref(&mut result, c),
            _ => match escape_char(c) {
                Some(entity) => result.push_str(entity),
                None if !is_xml_char(c) => push_char_ref(&mut result, c),
                None => result.push(c),
            },
        }
    }
    Cow::Owned(result)
}

fn push_char_ref(out: &mut String, c: char) {
    out.push_str(&format!("&#x{:X};", c as u32));
}

/// Unescape named entities and numeric character references.
///
/// Malformed references are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let tail = &rest[start..];

        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = &tail[1..];
            }
        }
    }

    result.push_str(rest);
    Cow::Owned(result)
}

/// Whether `&{name};` is one of the five predefined entities or a
/// character reference to an allowed character.
pub fn is_known_reference(name: &str) -> bool {
    decode_entity(name).is_some_and(is_xml_char)
}

/// Check raw (still escaped) text or attribute content.
///
/// Rejects a literal `<`, forbidden characters and any `&` that does not
/// start a known reference.
pub fn check_escaped(raw: &str) -> Result<(), String> {
    if let Some(c) = raw.chars().find(|c| !is_xml_char(*c)) {
        return Err(format!("Forbidden character U+{:04X}", c as u32));
    }
    if raw.contains('<') {
        return Err("Unescaped '<'".to_string());
    }

    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        let tail = &rest[start + 1..];
        let name = tail.find(';').map(|end| &tail[..end]);
        match name {
            Some(name) if is_known_reference(name) => rest = &tail[name.len() + 1..],
            Some(name) => return Err(format!("Unknown entity reference &{};", name)),
            None => return Err("Unterminated '&'".to_string()),
        }
    }
    Ok(())
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("<test>"), "&lt;test&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&apos;s");
    }

    #[test]
    fn test_escape_borrows_when_clean() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
        assert!(matches!(escape_comment("seed:abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_forbidden_chars() {
        assert_eq!(escape("a\u{0}b"), "a\u{FFFD}b");
        assert_eq!(escape("\u{1B}[31m"), "\u{FFFD}[31m");
        assert_eq!(escape_comment("\u{0}\u{FFFF}"), "&#x0;&#xFFFF;");
        assert_eq!(escape("tab\there"), "tab\there");
    }

    #[test]
    fn test_escape_comment_dashes() {
        assert_eq!(escape_comment("a--b"), "a&#45;&#45;b");
        assert_eq!(escape_comment("-->"), "&#45;&#45;&gt;");
        assert_eq!(escape_comment("end-"), "end&#45;");
        assert!(!escape_comment("<!-- x -->").contains("--"));
    }

    #[test]
    fn test_escape_comment_carriage_return() {
        assert_eq!(escape_comment("a\r\nb"), "a&#xD;\nb");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("&lt;a href=&quot;x&quot;&gt;"), "<a href=\"x\">");
        assert_eq!(unescape("&#45;&#x2D;&#X2d;"), "---");
        assert_eq!(unescape("&#x0;"), "\u{0}");
        assert_eq!(unescape("no entities"), "no entities");
    }

    #[test]
    fn test_unescape_keeps_malformed() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }

    #[test]
    fn test_check_escaped() {
        assert!(check_escaped("plain").is_ok());
        assert!(check_escaped("&lt;&amp;&#45;&#x2D;").is_ok());
        assert!(check_escaped("a<b").is_err());
        assert!(check_escaped("&nbsp;").is_err());
        assert!(check_escaped("&#x0;").is_err());
        assert!(check_escaped("a & b").is_err());
        assert!(check_escaped("\u{1}").is_err());
    }

    #[test]
    fn test_escape_output_passes_check() {
        for s in ["<a href=\"x\">", "a & b", "\u{0}\u{FFFF}", "it's"] {
            assert!(check_escaped(&escape(s)).is_ok(), "{s:?}");
        }
    }

    #[test]
    fn test_comment_roundtrip() {
        let samples = [
            "",
            "default",
            "<script>alert('x')</script>",
            "a--b-->",
            "&amp; already escaped",
            "line\r\nbreak\ttab",
            "nul\u{0}bell\u{7}",
            "ünïcödé 😀 日本",
            "&#45;",
        ];
        for s in samples {
            assert_eq!(unescape(&escape_comment(s)), s, "roundtrip failed for {s:?}");
        }
    }
}
