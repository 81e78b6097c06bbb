//! Text and attribute value escaping.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
//!
//! "Escaping a string (for the purposes of the algorithm above) consists of
//! running the following steps:
//!  1. Replace any occurrence of the "&" character by the string "&amp;".
//!  2. Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
//!     string "&nbsp;".
//!  3. Replace any occurrences of the "<" character by the string "&lt;".
//!  4. Replace any occurrences of the ">" character by the string "&gt;".
//!  5. If the algorithm was invoked in the attribute mode, then replace any
//!     occurrences of the """ character by the string "&quot;"."
//!
//! Both text and attribute values get all five replacements here. With full
//! encoding, every other non-ASCII character that has a named reference is
//! written as that reference too.

use std::borrow::Cow;

use crate::tokenizer::named_character_references::entity_name_for;

fn minimal_replacement(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '\u{A0}' => Some("&nbsp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

fn needs_escape(c: char, encode_entities: bool) -> bool {
    minimal_replacement(c).is_some()
        || (encode_entities && !c.is_ascii() && entity_name_for(c).is_some())
}

/// Escape `text` for output in HTML.
///
/// Returns the input unchanged (and unallocated) when nothing needs escaping.
///
/// ```
/// use heron_html::serializer::escape::escape;
///
/// assert_eq!(escape("a < b & c", false), "a &lt; b &amp; c");
/// assert_eq!(escape("caf\u{e9}", false), "caf\u{e9}");
/// assert_eq!(escape("caf\u{e9}", true), "caf&eacute;");
/// ```
#[must_use]
pub fn escape(text: &str, encode_entities: bool) -> Cow<'_, str> {
    let Some(first) = text.find(|c| needs_escape(c, encode_entities)) else {
        return Cow::Borrowed(text);
    };

    let mut escaped = String::with_capacity(text.len() + 8);
    escaped.push_str(&text[..first]);
    for c in text[first..].chars() {
        if let Some(replacement) = minimal_replacement(c) {
            escaped.push_str(replacement);
        } else if encode_entities
            && !c.is_ascii()
            && let Some(name) = entity_name_for(c)
        {
            escaped.push('&');
            escaped.push_str(name);
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_text_is_borrowed() {
        assert!(matches!(escape("plain text", true), Cow::Borrowed(_)));
    }

    #[test]
    fn test_minimal_escaping() {
        assert_eq!(
            escape("\"x\" & <y>\u{A0}", false),
            "&quot;x&quot; &amp; &lt;y&gt;&nbsp;"
        );
    }

    #[test]
    fn test_full_encoding_keeps_ascii() {
        assert_eq!(escape("a.b:c", true), "a.b:c");
        assert_eq!(escape("\u{a9} 2024", true), "&copy; 2024");
    }

    #[test]
    fn test_characters_without_a_name_stay_literal() {
        assert_eq!(escape("\u{4e2d}", true), "\u{4e2d}");
    }
}
