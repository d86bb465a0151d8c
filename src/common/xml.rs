//! Small XML helpers shared by the part readers and writers.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesRef, BytesStart};

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// LeftmostLongest so that `&amp;lt;` decodes to `&lt;` and not `<`
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// ```
/// use slidedeck::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape the five predefined XML entities. Anything else is left as is.
///
/// ```
/// use slidedeck::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

/// Append the text an entity or character reference stands for.
///
/// quick-xml reports `&amp;`, `&#169;` and friends as separate events
/// between text chunks.
pub(crate) fn push_reference(out: &mut String, reference: &BytesRef<'_>) {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        out.push(ch);
        return;
    }
    if let Ok(name) = std::str::from_utf8(&**reference) {
        out.push_str(&unescape_xml(&format!("&{};", name)));
    }
}

/// Unescaped value of attribute `key` (matched on the full, prefixed name).
pub(crate) fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute `key` parsed as an unsigned id, `None` when absent or not a number.
pub(crate) fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| atoi_simd::parse::<u32>(attr.value.as_ref()).ok())
}

/// Attribute `key` parsed as a signed coordinate.
pub(crate) fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr_string(e, key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_round_trip() {
        let raw = r#"Q&A <draft> "v2" 'final'"#;
        assert_eq!(unescape_xml(&escape_xml(raw)), raw);
    }

    #[test]
    fn test_attr_helpers() {
        let e = BytesStart::from_content(r#"cm authorId="3" dt="2024-01-01" bad="x1""#, 2);
        assert_eq!(attr_u32(&e, b"authorId"), Some(3));
        assert_eq!(attr_u32(&e, b"bad"), None);
        assert_eq!(attr_u32(&e, b"missing"), None);
        assert_eq!(attr_i64(&e, b"authorId"), Some(3));
        assert_eq!(attr_string(&e, b"dt").as_deref(), Some("2024-01-01"));
    }
}
