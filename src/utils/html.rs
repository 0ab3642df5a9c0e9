//! HTML text helpers used when reading and writing `<head>` markup.
//!
//! - `escape()`, `escape_attr()` - entity escaping for text and attribute values
//! - `unescape()` - decode entities found in parsed attribute values
//! - `escape_script()` - keep raw script text from closing its own element
//! - `is_void_element()`, `is_raw_text_element()`, `is_rcdata_element()` -
//!   element classification

use std::borrow::Cow;

/// Characters escaped in text content.
const TEXT_CHARS: [char; 3] = ['<', '>', '&'];

/// Characters escaped inside double-quoted attribute values.
const ATTR_CHARS: [char; 4] = ['<', '>', '&', '"'];

#[inline]
fn entity_for(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match entity_for(c).filter(|_| chars.contains(&c)) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape text content (e.g. the body of `<title>`).
///
/// Borrows when nothing needs escaping.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_CHARS)
}

/// Escape a value written inside `attr="..."`.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_CHARS)
}

/// Escape raw text for a `<script>` body.
///
/// Script content is not entity-decoded by browsers, so only the `</`
/// sequence is rewritten to `<\/`. For JSON payloads this is still
/// the same value once parsed.
pub fn escape_script(s: &str) -> Cow<'_, str> {
    if s.contains("</") {
        Cow::Owned(s.replace("</", "<\\/"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Decode named and numeric entities.
///
/// Unknown or malformed entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // Entities longer than this are not worth looking at
        let decoded = tail[1..]
            .find(';')
            .filter(|&end| end > 0 && end <= 10)
            .and_then(|end| decode_entity(&tail[1..=end]).map(|c| (c, end + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Elements that never have content or a closing tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is raw text (not entity-escaped).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Elements whose content is text with entities but no child markup.
#[inline]
pub fn is_rcdata_element(tag: &str) -> bool {
    matches!(tag, "title" | "textarea")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("Coreflow"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape("Sales & Support <AI>"), "Sales &amp; Support &lt;AI&gt;");
        // Quotes are fine in text content
        assert_eq!(escape("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_attr("it's"), "it's");
    }

    #[test]
    fn test_escape_script() {
        assert_eq!(escape_script(r#"{"a":"b"}"#), r#"{"a":"b"}"#);
        assert_eq!(
            escape_script(r#"{"a":"</script>"}"#),
            r#"{"a":"<\/script>"}"#
        );
    }

    #[test]
    fn test_escaped_script_is_same_json() {
        let raw = r#"{"name":"</script><b>"}"#;
        let escaped = escape_script(raw);
        let a: serde_json::Value = serde_json::from_str(raw).unwrap();
        let b: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("&lt;b&gt;"), "<b>");
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(unescape("&#39;&#x27;&#65;"), "''A");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("R&D"), "R&D");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&;"), "&;");
    }

    #[test]
    fn test_element_classes() {
        assert!(is_void_element("meta"));
        assert!(is_void_element("link"));
        assert!(!is_void_element("title"));
        assert!(is_raw_text_element("script"));
        assert!(!is_raw_text_element("title"));
        assert!(is_rcdata_element("title"));
        assert!(!is_rcdata_element("script"));
    }
}
