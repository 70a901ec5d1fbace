use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'", "\n", "\r", "\t"])
        .expect("Failed to build attribute escaper")
});

static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use slidegraft::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Escape an attribute value for writing between double quotes.
///
/// Besides the special characters, line breaks and tabs become character
/// references; written literally, a parser would normalize them to spaces.
///
/// # Examples
///
/// ```
/// use slidegraft::common::xml::escape_attr;
/// assert_eq!(escape_attr("line1\nline2"), "line1&#xA;line2");
/// assert_eq!(escape_attr("a\tb & c"), "a&#x9;b &amp; c");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    ATTR_ESCAPER.replace_all(
        s,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;", "&#xA;", "&#xD;", "&#x9;"],
    )
}

/// Unescape XML special characters.
///
/// Replaces the five predefined entities. Unknown or malformed entities and
/// character references are left unchanged.
///
/// # Examples
///
/// ```
/// use slidegraft::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;"); // &amp; is matched first
/// assert_eq!(unescape_xml("a & b"), "a & b"); // unchanged
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// assert_eq!(unescape_xml("&amp"), "&amp"); // incomplete, no semicolon
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_survives_escape_cycle() {
        let descr = r#"Logo "A&B" <draft>"#;
        let escaped = escape_xml(descr);
        assert!(!escaped.contains('"'));
        assert_eq!(unescape_xml(&escaped), descr);
    }

    #[test]
    fn test_escape_attr_keeps_whitespace_characters() {
        assert_eq!(escape_attr("a\r\nb\tc"), "a&#xD;&#xA;b&#x9;c");
        assert_eq!(escape_attr("plain"), "plain");
        assert_eq!(escape_attr("\"x\""), "&quot;x&quot;");
    }
}
