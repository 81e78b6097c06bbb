//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("If the next few characters are")
//! - Token emission ("Emit the current token")
//! - Attribute helpers for duplicate detection
//! - Parse error recording

use super::character_reference::{is_control, is_noncharacter};
use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::{ParseError, ParseErrorKind};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    ///
    /// The next character is consumed by the next step of the machine.
    pub(super) fn switch_to(&mut self, new_state: TokenizerState) {
        if self.state != new_state {
            log::trace!(target: "heron::tokenizer", "{} -> {}", self.state, new_state);
        }
        self.state = new_state;
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Reconsume in the X state"
    ///
    /// The current input character is handed to the new state again.
    pub(super) fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.switch_to(new_state);
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "If the next few characters are..." (case-sensitive)
    pub(super) fn next_few_characters_are(&self, expected: &str) -> bool {
        self.input.starts_with(expected, false)
    }

    /// "If the next few characters are an ASCII case-insensitive match for..."
    pub(super) fn next_few_characters_are_case_insensitive(&self, expected: &str) -> bool {
        self.input.starts_with(expected, true)
    }

    /// Consume a string previously matched by `next_few_characters_are`.
    pub(super) fn consume_string(&mut self, matched: &str) {
        self.input.skip(matched.chars().count());
    }

    /// "ASCII whitespace" as the tokenizer states list it: tab, LF, FF and
    /// space. CR never reaches the tokenizer.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of noncharacters in the input stream are
    /// noncharacter-in-input-stream parse errors and any occurrences of
    /// controls other than ASCII whitespace and U+0000 NULL characters are
    /// control-character-in-input-stream parse errors."
    pub(super) fn check_input_stream_character(&mut self) {
        let Some(c) = self.current_input_character else {
            return;
        };
        let code = u32::from(c);
        if is_noncharacter(code) {
            self.parse_error(ParseErrorKind::NoncharacterInInputStream);
        } else if is_control(code) && c != '\0' && !c.is_ascii_whitespace() {
            self.parse_error(ParseErrorKind::ControlCharacterInInputStream);
        }
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Emit the current tag token" / "Emit the current comment token" / ...
    ///
    /// A start tag records its name for "appropriate end tag token" checks.
    /// An end tag loses its attributes: "When an end tag token is emitted with
    /// attributes, that is an end-tag-with-attributes parse error."
    pub(super) fn emit_current_token(&mut self) {
        self.discard_duplicate_attribute();
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        match &mut token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
            }
            Token::EndTag { attributes, .. } if !attributes.is_empty() => {
                attributes.clear();
                self.parse_error(ParseErrorKind::EndTagWithAttributes);
            }
            _ => {}
        }
        self.pending.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending.push_back(Token::Character { data: c });
    }

    /// Emit every character of `s` as a character token.
    pub(super) fn emit_characters(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_character_token(c);
        }
    }

    /// "Emit an end-of-file token."
    ///
    /// A half-built comment, DOCTYPE, CDATA section or processing
    /// instruction is emitted first by the caller where the state says so;
    /// an unfinished tag is dropped.
    pub(super) fn emit_eof_token(&mut self) {
        self.current_token = None;
        self.pending.push_back(Token::EndOfFile);
        self.eof_emitted = true;
    }

    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any. If no start tag has been emitted from this
    /// tokenizer, then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.current_token, &self.last_start_tag_name) {
            (Some(Token::EndTag { name, .. }), Some(last)) => name == last,
            _ => false,
        }
    }

    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
    /// character token, and a character token for each of the characters in
    /// the temporary buffer (in the order they were added to the buffer)."
    pub(super) fn emit_less_than_solidus_and_temporary_buffer(&mut self) {
        self.current_token = None;
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_characters(&buffer);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token."
    pub(super) fn start_new_attribute(&mut self) {
        self.discard_duplicate_attribute();
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_name(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_value(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    ///
    /// The attribute stays in place until its value has been read so the
    /// value does not land on the previous attribute.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);
        if duplicate {
            self.parse_error(ParseErrorKind::DuplicateAttribute);
            self.drop_current_attribute = true;
        }
    }

    fn discard_duplicate_attribute(&mut self) {
        if std::mem::take(&mut self.drop_current_attribute)
            && let Some(token) = self.current_token.as_mut()
        {
            token.remove_current_attribute();
        }
    }
}

// =============================================================================
// Parse Errors
// =============================================================================

impl HTMLTokenizer {
    /// Record a parse error at the current input position.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        let error = ParseError::new(kind, self.input.position());
        log::debug!(target: "heron::tokenizer", "parse error in {}: {error}", self.state);
        self.errors.push(error);
    }
}
