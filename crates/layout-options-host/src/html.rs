//! HTML escaping and CSS identifier cleaning.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Escape text for safe inclusion in HTML, quotes included.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Characters replaced by convention before invalid characters are stripped.
const IDENTIFIER_FILTER: &[(char, &str)] = &[(' ', "-"), ('_', "-"), ('/', "-"), ('[', "-"), (']', "")];

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\-0-9A-Za-z_\x{00A1}-\x{FFFF}]").expect("identifier character class is valid")
    })
}

fn leading_digit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]").expect("leading digit pattern is valid"))
}

fn leading_hyphens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-[0-9])|^(--)").expect("leading hyphen pattern is valid"))
}

fn apply_filter(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match IDENTIFIER_FILTER.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Produce a valid CSS identifier from arbitrary text.
///
/// Spaces, underscores, slashes and `[` become hyphens, `]` is dropped, and a
/// double underscore survives as-is. Remaining characters outside
/// `-`, `0-9`, `A-Z`, `_`, `a-z` and U+00A1..U+FFFF are stripped. An
/// identifier may not start with a digit, two hyphens, or a hyphen followed
/// by a digit.
pub fn clean_css_identifier(identifier: &str) -> String {
    let filtered: Vec<String> = identifier.split("__").map(apply_filter).collect();
    let filtered = filtered.join("__");

    let stripped = invalid_chars().replace_all(&filtered, "");
    let no_digit = leading_digit().replace(&stripped, "_");
    leading_hyphens().replace(&no_digit, "__").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;");
        assert_eq!(escape("plain-text"), "plain-text");
    }

    #[test]
    fn test_clean_keeps_valid_identifiers() {
        assert_eq!(clean_css_identifier("bg-info"), "bg-info");
        assert_eq!(clean_css_identifier("Layout1"), "Layout1");
        assert_eq!(clean_css_identifier("block__element"), "block__element");
        assert_eq!(clean_css_identifier("café"), "café");
    }

    #[test]
    fn test_clean_applies_filter() {
        assert_eq!(clean_css_identifier("foo bar"), "foo-bar");
        assert_eq!(clean_css_identifier("foo_bar"), "foo-bar");
        assert_eq!(clean_css_identifier("a/b[c]"), "a-b-c");
    }

    #[test]
    fn test_clean_strips_invalid_chars() {
        assert_eq!(clean_css_identifier("foo!"), "foo");
        assert_eq!(clean_css_identifier("a.b#c"), "abc");
    }

    #[test]
    fn test_clean_fixes_leading_chars() {
        assert_eq!(clean_css_identifier("1col"), "_col");
        assert_eq!(clean_css_identifier("--x"), "__x");
        assert_eq!(clean_css_identifier("-1x"), "__x");
        assert_eq!(clean_css_identifier("-x"), "-x");
    }
}
