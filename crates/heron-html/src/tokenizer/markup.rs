//! Markup declaration states: comments, DOCTYPE, CDATA sections and
//! processing instructions.
//!
//! [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
//! through [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state).

use super::character_reference::REPLACEMENT_CHARACTER;
use super::core::{HTMLTokenizer, IdentifierKind, TokenizerState};
use super::token::Token;
use crate::error::ParseErrorKind;

// =============================================================================
// Comments
// =============================================================================

impl HTMLTokenizer {
    fn append_to_comment(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(c);
        }
    }

    fn append_str_to_comment(&mut self, s: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_str_to_comment(s);
        }
    }

    /// "Emit the comment. Emit an end-of-file token."
    fn emit_current_token_and_eof(&mut self) {
        self.emit_current_token();
        self.emit_eof_token();
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_current_token_and_eof(),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.append_to_comment(REPLACEMENT_CHARACTER);
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// This state looks ahead without consuming a character first.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters
        // (-), consume those two characters, create a comment token whose data
        // is the empty string, and switch to the comment start state."
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::CommentStart);
        }
        // "Otherwise, if the next seven characters are an ASCII
        // case-insensitive match for the word "DOCTYPE", consume those
        // characters and switch to the DOCTYPE state."
        else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "Otherwise, if there is an adjusted current node and it is not an
        // element in the HTML namespace and the next seven characters are a
        // case-sensitive match for the string "[CDATA[", then consume those
        // characters and switch to the CDATA section state."
        //
        // In HTML content the section is still read as CDATA, but flagged.
        else if self.next_few_characters_are("[CDATA[") {
            self.consume_string("[CDATA[");
            if !self.cdata_allowed {
                self.parse_error(ParseErrorKind::CdataInHtmlContent);
            }
            self.current_token = Some(Token::Cdata {
                data: String::new(),
            });
            self.switch_to(TokenizerState::CDATASection);
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error. Create
        // a comment token whose data is the empty string. Switch to the bogus
        // comment state (don't consume anything in the current state)."
        else {
            self.parse_error(ParseErrorKind::IncorrectlyOpenedComment);
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to
            // the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('<') => {
                self.append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.append_to_comment(REPLACEMENT_CHARACTER);
            }
            None => self.eof_in_comment(),
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.append_to_comment('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "This is a nested-comment parse error. Reconsume in the comment
            // end state."
            Some(_) => {
                self.parse_error(ParseErrorKind::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment('-'),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "This is an incorrectly-closed-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorKind::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(ParseErrorKind::EofInComment);
        self.emit_current_token_and_eof();
    }
}

// =============================================================================
// DOCTYPE
// =============================================================================

impl HTMLTokenizer {
    fn doctype(&mut self) -> Option<&mut Token> {
        self.current_token
            .as_mut()
            .filter(|token| matches!(**token, Token::Doctype { .. }))
    }

    fn set_force_quirks(&mut self) {
        if let Some(token) = self.doctype() {
            token.set_force_quirks();
        }
    }

    /// Start a DOCTYPE token, optionally with the first character of its
    /// name.
    fn create_doctype(&mut self, first_name_char: Option<char>) {
        let mut token = Token::new_doctype();
        if let Some(c) = first_name_char {
            token.append_to_doctype_name(c);
        }
        self.current_token = Some(token);
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(ParseErrorKind::EofInDoctype);
        if self.doctype().is_none() {
            self.create_doctype(None);
        }
        self.set_force_quirks();
        self.emit_current_token_and_eof();
    }

    /// Set force-quirks and reconsume in the bogus DOCTYPE state.
    fn bogus_doctype(&mut self, kind: ParseErrorKind) {
        self.parse_error(kind);
        self.set_force_quirks();
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// Set force-quirks, switch to the data state and emit the DOCTYPE.
    fn abrupt_doctype(&mut self, kind: ParseErrorKind) {
        self.parse_error(kind);
        self.set_force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    fn emit_doctype(&mut self) {
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(ParseErrorKind::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.create_doctype(Some(REPLACEMENT_CHARACTER));
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Switch to the data state.
            // Emit the current token."
            Some('>') => {
                self.create_doctype(None);
                self.abrupt_doctype(ParseErrorKind::MissingDoctypeName);
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                self.create_doctype(Some(c.to_ascii_lowercase()));
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => self.emit_doctype(),
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                    REPLACEMENT_CHARACTER
                } else {
                    c.to_ascii_lowercase()
                };
                if let Some(token) = self.doctype() {
                    token.append_to_doctype_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype(),
            None => self.eof_in_doctype(),
            // "If the six characters starting from the current input character
            // are an ASCII case-insensitive match for the word "PUBLIC", then
            // consume those characters and switch to the after DOCTYPE public
            // keyword state."
            Some(c) if c.eq_ignore_ascii_case(&'p')
                && self.next_few_characters_are_case_insensitive("UBLIC") =>
            {
                self.consume_string("UBLIC");
                self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
            }
            Some(c) if c.eq_ignore_ascii_case(&'s')
                && self.next_few_characters_are_case_insensitive("YSTEM") =>
            {
                self.consume_string("YSTEM");
                self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
            }
            Some(_) => self.bogus_doctype(ParseErrorKind::InvalidCharacterSequenceAfterDoctypeName),
        }
    }

    fn start_identifier(&mut self, kind: IdentifierKind) {
        if let Some(token) = self.doctype() {
            match kind {
                IdentifierKind::Public => token.start_public_identifier(),
                IdentifierKind::System => token.start_system_identifier(),
            }
        }
    }

    fn append_to_identifier(&mut self, kind: IdentifierKind, c: char) {
        if let Some(token) = self.doctype() {
            match kind {
                IdentifierKind::Public => token.append_to_public_identifier(c),
                IdentifierKind::System => token.append_to_system_identifier(c),
            }
        }
    }

    const fn quoted_identifier_state(kind: IdentifierKind, quote: char) -> TokenizerState {
        match (kind, quote) {
            (IdentifierKind::Public, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (IdentifierKind::Public, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (IdentifierKind::System, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (IdentifierKind::System, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(&mut self, kind: IdentifierKind) {
        let (missing_whitespace, missing_identifier, missing_quote, before_identifier) = match kind
        {
            IdentifierKind::Public => (
                ParseErrorKind::MissingWhitespaceAfterDoctypePublicKeyword,
                ParseErrorKind::MissingDoctypePublicIdentifier,
                ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier,
                TokenizerState::BeforeDOCTYPEPublicIdentifier,
            ),
            IdentifierKind::System => (
                ParseErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword,
                ParseErrorKind::MissingDoctypeSystemIdentifier,
                ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
                TokenizerState::BeforeDOCTYPESystemIdentifier,
            ),
        };
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(before_identifier),
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(missing_whitespace);
                self.start_identifier(kind);
                self.switch_to(Self::quoted_identifier_state(kind, quote));
            }
            Some('>') => self.abrupt_doctype(missing_identifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(missing_quote),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, kind: IdentifierKind) {
        let (missing_identifier, missing_quote) = match kind {
            IdentifierKind::Public => (
                ParseErrorKind::MissingDoctypePublicIdentifier,
                ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier,
            ),
            IdentifierKind::System => (
                ParseErrorKind::MissingDoctypeSystemIdentifier,
                ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
            ),
        };
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.start_identifier(kind);
                self.switch_to(Self::quoted_identifier_state(kind, quote));
            }
            Some('>') => self.abrupt_doctype(missing_identifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(missing_quote),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and its single-quoted and system identifier siblings.
    pub(super) fn handle_doctype_identifier_quoted_state(&mut self, kind: IdentifierKind, quote: char) {
        let (after_identifier, abrupt) = match kind {
            IdentifierKind::Public => (
                TokenizerState::AfterDOCTYPEPublicIdentifier,
                ParseErrorKind::AbruptDoctypePublicIdentifier,
            ),
            IdentifierKind::System => (
                TokenizerState::AfterDOCTYPESystemIdentifier,
                ParseErrorKind::AbruptDoctypeSystemIdentifier,
            ),
        };
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(after_identifier),
            Some('\0') => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.append_to_identifier(kind, REPLACEMENT_CHARACTER);
            }
            Some('>') => self.abrupt_doctype(abrupt),
            None => self.eof_in_doctype(),
            Some(c) => self.append_to_identifier(kind, c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => self.emit_doctype(),
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    ParseErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.start_identifier(IdentifierKind::System);
                self.switch_to(Self::quoted_identifier_state(IdentifierKind::System, quote));
            }
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype(),
            Some(quote @ ('"' | '\'')) => {
                self.start_identifier(IdentifierKind::System);
                self.switch_to(Self::quoted_identifier_state(IdentifierKind::System, quote));
            }
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.emit_doctype(),
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does not
            // set the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.emit_doctype(),
            Some('\0') => self.parse_error(ParseErrorKind::UnexpectedNullCharacter),
            None => self.emit_current_token_and_eof(),
            Some(_) => {}
        }
    }
}

// =============================================================================
// CDATA sections
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// The section is gathered into a single CDATA token rather than emitted
    /// character by character.
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CDATASectionBracket),
            // "This is an eof-in-cdata parse error. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorKind::EofInCdata);
                self.emit_current_token_and_eof();
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CDATASectionEnd);
        } else {
            self.append_to_comment(']');
            self.reconsume_in(TokenizerState::CDATASection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.append_to_comment(']'),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => {
                self.append_str_to_comment("]]");
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}

// =============================================================================
// Processing instructions
// =============================================================================

impl HTMLTokenizer {
    /// Emit the PI if the current character starts `?>`.
    fn try_close_processing_instruction(&mut self) -> bool {
        if self.current_input_character == Some('?') && self.next_few_characters_are(">") {
            self.consume_string(">");
            self.switch_to(TokenizerState::Data);
            self.emit_current_token();
            return true;
        }
        false
    }

    fn eof_in_processing_instruction(&mut self) {
        self.parse_error(ParseErrorKind::EofInProcessingInstruction);
        self.emit_current_token_and_eof();
    }

    /// `<?` has been consumed; read the target up to whitespace.
    ///
    /// A bare `>` ends the instruction early, the way a bogus comment would
    /// have ended.
    pub(super) fn handle_processing_instruction_target_state(&mut self) {
        if self.try_close_processing_instruction() {
            return;
        }
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::ProcessingInstructionData);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_processing_instruction(),
            Some(c) => {
                let c = if c == '\0' {
                    self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                    REPLACEMENT_CHARACTER
                } else {
                    c
                };
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_target(c);
                }
            }
        }
    }

    /// Read the data up to `?>`, skipping whitespace before it starts.
    pub(super) fn handle_processing_instruction_data_state(&mut self) {
        if self.try_close_processing_instruction() {
            return;
        }
        let data_is_empty = matches!(
            &self.current_token,
            Some(Token::ProcessingInstruction { data, .. }) if data.is_empty()
        );
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) && data_is_empty => {}
            None => self.eof_in_processing_instruction(),
            Some(c) => {
                let c = if c == '\0' {
                    self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                    REPLACEMENT_CHARACTER
                } else {
                    c
                };
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_data(c);
                }
            }
        }
    }
}
