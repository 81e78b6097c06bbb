//! Integration tests for character reference resolution.

use heron_html::tokenizer::character_reference::{
    longest_named_match, resolve_decimal, resolve_hex, resolve_named, resolve_numeric,
};
use heron_html::tokenizer::named_character_references::{
    NAMED_ENTITIES, entity_name_for, lookup_entity,
};
use heron_html::ParseErrorKind;

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("gt"), Some(">"));
    // Only the legacy names exist without the semicolon.
    assert_eq!(lookup_entity("alpha"), None);
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_table_is_complete() {
    assert_eq!(NAMED_ENTITIES.len(), 2231);
}

#[test]
fn test_resolve_named() {
    assert_eq!(resolve_named("amp"), Some("&"));
    assert_eq!(resolve_named("amp;"), Some("&"));
    assert_eq!(resolve_named("alpha"), Some("\u{3B1}"));
    assert_eq!(resolve_named("not_a_real_entity"), None);
}

#[test]
fn test_resolve_named_is_case_sensitive() {
    assert_eq!(resolve_named("Alpha"), Some("\u{391}"));
    assert_eq!(resolve_named("ALPHA"), None);
}

#[test]
fn test_resolve_decimal() {
    assert_eq!(resolve_decimal(65), "A");
    assert_eq!(resolve_decimal(0x1F600), "\u{1F600}");
}

#[test]
fn test_resolve_decimal_windows_1252() {
    assert_eq!(resolve_decimal(0x80), "\u{20AC}");
    assert_eq!(resolve_decimal(0x99), "\u{2122}");
    // 0x81 has no remapping and stays a control character.
    assert_eq!(resolve_decimal(0x81), "\u{81}");
}

#[test]
fn test_resolve_decimal_replacement() {
    assert_eq!(resolve_decimal(0), "\u{FFFD}");
    assert_eq!(resolve_decimal(0xDFFF), "\u{FFFD}");
    assert_eq!(resolve_decimal(0xFFFF), "\u{FFFD}");
    assert_eq!(resolve_decimal(0x11_0000), "\u{FFFD}");
}

#[test]
fn test_resolve_hex() {
    assert_eq!(resolve_hex("41"), Some("A".to_string()));
    assert_eq!(resolve_hex("20ac"), Some("\u{20AC}".to_string()));
    assert_eq!(resolve_hex("FFFFFFFFFF"), Some("\u{FFFD}".to_string()));
    assert_eq!(resolve_hex(""), None);
    assert_eq!(resolve_hex("zz"), None);
}

#[test]
fn test_resolve_numeric_errors() {
    assert_eq!(resolve_numeric(65), ('A', None));
    assert_eq!(
        resolve_numeric(0),
        ('\u{FFFD}', Some(ParseErrorKind::NullCharacterReference))
    );
    assert_eq!(
        resolve_numeric(0xD800),
        ('\u{FFFD}', Some(ParseErrorKind::SurrogateCharacterReference))
    );
    assert_eq!(
        resolve_numeric(0x1_FFFE),
        ('\u{FFFD}', Some(ParseErrorKind::NoncharacterCharacterReference))
    );
    assert_eq!(
        resolve_numeric(0x0D),
        ('\r', Some(ParseErrorKind::ControlCharacterReference))
    );
    assert_eq!(resolve_numeric(0x0A), ('\n', None));
}

#[test]
fn test_longest_named_match() {
    assert_eq!(longest_named_match("amp;rest"), Some((4, "&")));
    assert_eq!(longest_named_match("ampersand"), Some((3, "&")));
    assert_eq!(longest_named_match("xyz"), None);
}

#[test]
fn test_entity_name_for() {
    assert_eq!(entity_name_for('<'), Some("lt;"));
    assert_eq!(entity_name_for('\u{A9}'), Some("copy;"));
    assert_eq!(entity_name_for('\u{3B1}'), Some("alpha;"));
}
