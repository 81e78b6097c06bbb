//! Character reference resolution.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The free functions are the resolver proper and can be used on their own.
//! The `HTMLTokenizer` methods at the bottom glue them into the state machine.

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{LONGEST_NAME_LEN, lookup_entity};
use crate::error::ParseErrorKind;

/// U+FFFD REPLACEMENT CHARACTER
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column."
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'), // EURO SIGN
    (0x82, '\u{201A}'), // SINGLE LOW-9 QUOTATION MARK
    (0x83, '\u{0192}'), // LATIN SMALL LETTER F WITH HOOK
    (0x84, '\u{201E}'), // DOUBLE LOW-9 QUOTATION MARK
    (0x85, '\u{2026}'), // HORIZONTAL ELLIPSIS
    (0x86, '\u{2020}'), // DAGGER
    (0x87, '\u{2021}'), // DOUBLE DAGGER
    (0x88, '\u{02C6}'), // MODIFIER LETTER CIRCUMFLEX ACCENT
    (0x89, '\u{2030}'), // PER MILLE SIGN
    (0x8A, '\u{0160}'), // LATIN CAPITAL LETTER S WITH CARON
    (0x8B, '\u{2039}'), // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
    (0x8C, '\u{0152}'), // LATIN CAPITAL LIGATURE OE
    (0x8E, '\u{017D}'), // LATIN CAPITAL LETTER Z WITH CARON
    (0x91, '\u{2018}'), // LEFT SINGLE QUOTATION MARK
    (0x92, '\u{2019}'), // RIGHT SINGLE QUOTATION MARK
    (0x93, '\u{201C}'), // LEFT DOUBLE QUOTATION MARK
    (0x94, '\u{201D}'), // RIGHT DOUBLE QUOTATION MARK
    (0x95, '\u{2022}'), // BULLET
    (0x96, '\u{2013}'), // EN DASH
    (0x97, '\u{2014}'), // EM DASH
    (0x98, '\u{02DC}'), // SMALL TILDE
    (0x99, '\u{2122}'), // TRADE MARK SIGN
    (0x9A, '\u{0161}'), // LATIN SMALL LETTER S WITH CARON
    (0x9B, '\u{203A}'), // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
    (0x9C, '\u{0153}'), // LATIN SMALL LIGATURE OE
    (0x9E, '\u{017E}'), // LATIN SMALL LETTER Z WITH CARON
    (0x9F, '\u{0178}'), // LATIN CAPITAL LETTER Y WITH DIAERESIS
];

/// Resolve a named character reference.
///
/// `name` excludes the leading `&`; the trailing `;` is optional. Legacy
/// names such as `amp` resolve without it, every other name is looked up as
/// if it had been written with one.
///
/// ```
/// use heron_html::tokenizer::character_reference::resolve_named;
///
/// assert_eq!(resolve_named("amp"), Some("&"));
/// assert_eq!(resolve_named("NotEqualTilde;"), Some("\u{2242}\u{338}"));
/// assert_eq!(resolve_named("not_a_real_entity"), None);
/// ```
#[must_use]
pub fn resolve_named(name: &str) -> Option<&'static str> {
    lookup_entity(name).or_else(|| {
        if name.ends_with(';') {
            None
        } else {
            lookup_entity(&format!("{name};"))
        }
    })
}

/// Longest prefix of `candidate` that is a name in the table.
///
/// Returns the prefix length in bytes and its replacement text. Only
/// prefixes made of ASCII alphanumerics, optionally closed by `;`, can match.
#[must_use]
pub fn longest_named_match(candidate: &str) -> Option<(usize, &'static str)> {
    let name_len = candidate
        .char_indices()
        .find(|&(_, c)| !c.is_ascii_alphanumeric())
        .map_or(candidate.len(), |(i, _)| i);
    let with_semicolon = if candidate[name_len..].starts_with(';') {
        name_len + 1
    } else {
        name_len
    };
    let longest = with_semicolon.min(LONGEST_NAME_LEN);
    (1..=longest)
        .rev()
        .find_map(|len| lookup_entity(&candidate[..len]).map(|text| (len, text)))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Map a character reference code to the character it produces plus the
/// parse error it raises, if any. Never fails.
#[must_use]
pub fn resolve_numeric(code: u32) -> (char, Option<ParseErrorKind>) {
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    if code == 0 {
        return (
            REPLACEMENT_CHARACTER,
            Some(ParseErrorKind::NullCharacterReference),
        );
    }
    // "If the number is greater than 0x10FFFF, then this is a
    // character-reference-outside-unicode-range parse error."
    if code > 0x0010_FFFF {
        return (
            REPLACEMENT_CHARACTER,
            Some(ParseErrorKind::CharacterReferenceOutsideUnicodeRange),
        );
    }
    // "If the number is a surrogate, then this is a
    // surrogate-character-reference parse error."
    if is_surrogate(code) {
        return (
            REPLACEMENT_CHARACTER,
            Some(ParseErrorKind::SurrogateCharacterReference),
        );
    }
    // Noncharacters are replaced as well, not only reported.
    if is_noncharacter(code) {
        return (
            REPLACEMENT_CHARACTER,
            Some(ParseErrorKind::NoncharacterCharacterReference),
        );
    }
    // "If the number is 0x0D, or a control that's not ASCII whitespace, then
    // this is a control-character-reference parse error."
    if code == 0x0D || (is_control(code) && !is_ascii_whitespace(code)) {
        let remapped = C1_REPLACEMENTS
            .iter()
            .find(|&&(from, _)| from == code)
            .map(|&(_, to)| to);
        let c = remapped
            .or_else(|| char::from_u32(code))
            .unwrap_or(REPLACEMENT_CHARACTER);
        return (c, Some(ParseErrorKind::ControlCharacterReference));
    }
    (
        char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER),
        None,
    )
}

/// Resolve a decimal character reference to its text.
///
/// ```
/// use heron_html::tokenizer::character_reference::resolve_decimal;
///
/// assert_eq!(resolve_decimal(65), "A");
/// assert_eq!(resolve_decimal(0x80), "\u{20AC}");
/// assert_eq!(resolve_decimal(0xD800), "\u{FFFD}");
/// ```
#[must_use]
pub fn resolve_decimal(code: u32) -> String {
    resolve_numeric(code).0.to_string()
}

/// Resolve a hexadecimal character reference (digits only, no `x`).
///
/// Returns `None` when `hex` is empty or not hexadecimal. Values too large
/// for a `u32` resolve to U+FFFD like any other out-of-range code.
#[must_use]
pub fn resolve_hex(hex: &str) -> Option<String> {
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let code = u32::from_str_radix(hex, 16).unwrap_or(u32::MAX);
    Some(resolve_decimal(code))
}

const fn is_surrogate(code: u32) -> bool {
    matches!(code, 0xD800..=0xDFFF)
}

/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
pub(crate) const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// "A control is a C0 control or a code point in the range U+007F DELETE to
/// U+009F APPLICATION PROGRAM COMMAND, inclusive."
pub(crate) const fn is_control(code: u32) -> bool {
    matches!(code, 0x00..=0x1F | 0x7F..=0x9F)
}

const fn is_ascii_whitespace(code: u32) -> bool {
    matches!(code, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "consumed as part of an attribute": the return state is an attribute
    /// value state.
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute,
    /// then append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            if let Some(token) = self.current_token.as_mut() {
                for c in buffer.chars() {
                    token.append_to_current_attribute_value(c);
                }
            }
        } else {
            for c in buffer.chars() {
                self.emit_character_token(c);
            }
        }
    }

    /// Candidate text for a named reference: up to the longest table name of
    /// upcoming input.
    pub(super) fn named_reference_candidate(&self) -> String {
        (0..LONGEST_NAME_LEN)
            .map_while(|offset| self.input.peek(offset))
            .collect()
    }

    fn current_return_state(&self) -> TokenizerState {
        self.return_state.unwrap_or(TokenizerState::Data)
    }

    /// "Switch to the return state."
    fn switch_to_return_state(&mut self) {
        let state = self.current_return_state();
        self.switch_to(state);
    }

    /// "Reconsume in the return state."
    fn reconsume_in_return_state(&mut self) {
        let state = self.current_return_state();
        self.reconsume_in(state);
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        match self.current_input_character {
            // "ASCII alphanumeric: Reconsume in the named character reference
            // state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#): Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else: Flush code points consumed as a character
            // reference. Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the named character references
    /// table. Append each character to the temporary buffer when it's
    /// consumed."
    pub(super) fn handle_named_character_reference_state(&mut self) {
        // Entered by reconsuming: step back so the lookahead starts at the
        // current input character.
        self.input.unconsume();
        let candidate = self.named_reference_candidate();
        let Some((len, text)) = longest_named_match(&candidate) else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            return;
        };

        // Names are ASCII, so the byte length is also the character count.
        let name = &candidate[..len];
        self.input.skip(len);
        self.temporary_buffer.push_str(name);
        let ends_with_semicolon = name.ends_with(';');

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return
        // state."
        let next_is_historical = self
            .input
            .peek(0)
            .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric());
        if self.is_consumed_as_part_of_attribute() && !ends_with_semicolon && next_is_historical {
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to_return_state();
            return;
        }

        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference parse
        // error."
        if !ends_with_semicolon {
            self.parse_error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
        }
        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name (as given
        // by the second column of the named character references table) to the
        // temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(text);
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to_return_state();
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "If the character reference was consumed as part of an attribute,
            // then append the current input character to the current
            // attribute's value. Otherwise, emit the current input character as
            // a character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.append_to_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "This is an unknown-named-character-reference parse error.
            // Reconsume in the return state."
            Some(';') => {
                self.parse_error(ParseErrorKind::UnknownNamedCharacterReference);
                self.reconsume_in_return_state();
            }
            _ => self.reconsume_in_return_state(),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in_return_state();
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.accumulate_character_reference_digit(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.accumulate_character_reference_digit(10);
    }

    /// Shared body of the hexadecimal and decimal states. The code saturates
    /// instead of overflowing; anything past U+10FFFF resolves the same way.
    fn accumulate_character_reference_digit(&mut self, radix: u32) {
        match self.current_input_character {
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            Some(c) => {
                if let Some(digit) = c.to_digit(radix) {
                    self.character_reference_code = self
                        .character_reference_code
                        .saturating_mul(radix)
                        .saturating_add(digit);
                } else {
                    self.missing_semicolon_after_numeric_reference();
                }
            }
            None => self.missing_semicolon_after_numeric_reference(),
        }
    }

    /// "This is a missing-semicolon-after-character-reference parse error.
    /// Reconsume in the numeric character reference end state."
    fn missing_semicolon_after_numeric_reference(&mut self) {
        self.parse_error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
        self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// This state consumes nothing. It is reached either by switching after a
    /// `;`, which is then done with, or by reconsuming any other character,
    /// which the return state must see again.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let (c, error) = resolve_numeric(self.character_reference_code);
        if let Some(kind) = error {
            self.parse_error(kind);
        }
        self.temporary_buffer.clear();
        self.temporary_buffer.push(c);
        self.flush_code_points_consumed_as_character_reference();
        if self.current_input_character == Some(';') {
            self.switch_to_return_state();
        } else {
            self.reconsume_in_return_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_prefers_longer_names() {
        assert_eq!(longest_named_match("notin;x"), Some((6, "\u{2209}")));
        // "notit;" is not a name; the legacy "not" is.
        assert_eq!(longest_named_match("notit;"), Some((3, "\u{AC}")));
        assert_eq!(longest_named_match("xyz;"), None);
    }

    #[test]
    fn longest_match_stops_at_non_alphanumeric() {
        assert_eq!(longest_named_match("amp=1"), Some((3, "&")));
        assert_eq!(longest_named_match("lt;-"), Some((3, "<")));
    }

    #[test]
    fn noncharacter_table() {
        assert!(is_noncharacter(0xFDD0));
        assert!(is_noncharacter(0x10_FFFF));
        assert!(is_noncharacter(0x2_FFFE));
        assert!(!is_noncharacter(0xFFFD));
    }
}
