//! Error types.
//!
//! Parse errors are never fatal: they are collected in order and handed back
//! next to the tree. Configuration errors are fatal and surface as `Err` from
//! serializer construction.

use std::fmt;
use std::io;

use heron_common::Position;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// What went wrong at a parse error.
///
/// Tokenizer conditions display as the error codes of
/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors).
/// Tree construction conditions, which the standard leaves unnamed, display
/// as short messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    // ===== Tokenizer =====
    /// `<!-->` or `<!--->`
    #[error("abrupt-closing-of-empty-comment")]
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier
    #[error("abrupt-doctype-public-identifier")]
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier
    #[error("abrupt-doctype-system-identifier")]
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` without digits
    #[error("absence-of-digits-in-numeric-character-reference")]
    AbsenceOfDigitsInNumericCharacterReference,
    /// CDATA section outside foreign content
    #[error("cdata-in-html-content")]
    CdataInHtmlContent,
    /// numeric reference above U+10FFFF
    #[error("character-reference-outside-unicode-range")]
    CharacterReferenceOutsideUnicodeRange,
    /// control character in the input
    #[error("control-character-in-input-stream")]
    ControlCharacterInInputStream,
    /// numeric reference to a control character
    #[error("control-character-reference")]
    ControlCharacterReference,
    /// attribute name repeated on one tag
    #[error("duplicate-attribute")]
    DuplicateAttribute,
    /// attributes on an end tag
    #[error("end-tag-with-attributes")]
    EndTagWithAttributes,
    /// `</br/>`
    #[error("end-tag-with-trailing-solidus")]
    EndTagWithTrailingSolidus,
    /// input ends after `<` or `</`
    #[error("eof-before-tag-name")]
    EofBeforeTagName,
    /// input ends inside a CDATA section
    #[error("eof-in-cdata")]
    EofInCdata,
    /// input ends inside a comment
    #[error("eof-in-comment")]
    EofInComment,
    /// input ends inside a DOCTYPE
    #[error("eof-in-doctype")]
    EofInDoctype,
    /// input ends inside `<!--` within a script
    #[error("eof-in-script-html-comment-like-text")]
    EofInScriptHtmlCommentLikeText,
    /// input ends inside a tag
    #[error("eof-in-tag")]
    EofInTag,
    /// input ends inside a processing instruction
    #[error("eof-in-processing-instruction")]
    EofInProcessingInstruction,
    /// `--!>`
    #[error("incorrectly-closed-comment")]
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, DOCTYPE or CDATA
    #[error("incorrectly-opened-comment")]
    IncorrectlyOpenedComment,
    /// junk after the DOCTYPE name
    #[error("invalid-character-sequence-after-doctype-name")]
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by a non-letter
    #[error("invalid-first-character-of-tag-name")]
    InvalidFirstCharacterOfTagName,
    /// `name=>`
    #[error("missing-attribute-value")]
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    #[error("missing-doctype-name")]
    MissingDoctypeName,
    /// `PUBLIC` without an identifier
    #[error("missing-doctype-public-identifier")]
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` without an identifier
    #[error("missing-doctype-system-identifier")]
    MissingDoctypeSystemIdentifier,
    /// `</>`
    #[error("missing-end-tag-name")]
    MissingEndTagName,
    /// unquoted public identifier
    #[error("missing-quote-before-doctype-public-identifier")]
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// unquoted system identifier
    #[error("missing-quote-before-doctype-system-identifier")]
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `&amp` without `;`
    #[error("missing-semicolon-after-character-reference")]
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"`
    #[error("missing-whitespace-after-doctype-public-keyword")]
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"`
    #[error("missing-whitespace-after-doctype-system-keyword")]
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    #[error("missing-whitespace-before-doctype-name")]
    MissingWhitespaceBeforeDoctypeName,
    /// `a="1"b="2"`
    #[error("missing-whitespace-between-attributes")]
    MissingWhitespaceBetweenAttributes,
    /// public and system identifiers run together
    #[error("missing-whitespace-between-doctype-public-and-system-identifiers")]
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment
    #[error("nested-comment")]
    NestedComment,
    /// numeric reference to a noncharacter
    #[error("noncharacter-character-reference")]
    NoncharacterCharacterReference,
    /// noncharacter in the input
    #[error("noncharacter-in-input-stream")]
    NoncharacterInInputStream,
    /// `<div/>`
    #[error("non-void-html-element-start-tag-with-trailing-solidus")]
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// `&#0;`
    #[error("null-character-reference")]
    NullCharacterReference,
    /// numeric reference to a surrogate
    #[error("surrogate-character-reference")]
    SurrogateCharacterReference,
    /// junk after the DOCTYPE system identifier
    #[error("unexpected-character-after-doctype-system-identifier")]
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name
    #[error("unexpected-character-in-attribute-name")]
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted value
    #[error("unexpected-character-in-unquoted-attribute-value")]
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `<div =x>`
    #[error("unexpected-equals-sign-before-attribute-name")]
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in the input
    #[error("unexpected-null-character")]
    UnexpectedNullCharacter,
    /// `<?`
    #[error("unexpected-question-mark-instead-of-tag-name")]
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not followed by `>`
    #[error("unexpected-solidus-in-tag")]
    UnexpectedSolidusInTag,
    /// `&foo;` with no such name
    #[error("unknown-named-character-reference")]
    UnknownNamedCharacterReference,

    // ===== Tree construction =====
    /// no DOCTYPE before the first content
    #[error("missing doctype")]
    MissingDoctype,
    /// DOCTYPE that is neither `html` nor an allowed legacy one
    #[error("non-conforming doctype")]
    NonConformingDoctype,
    /// DOCTYPE after the initial insertion mode
    #[error("unexpected doctype")]
    UnexpectedDoctype,
    /// start tag not allowed here
    #[error("unexpected start tag <{0}>")]
    UnexpectedStartTag(String),
    /// end tag with no matching open element, or not allowed here
    #[error("unexpected end tag </{0}>")]
    UnexpectedEndTag(String),
    /// non-whitespace text not allowed here
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    /// an element closed while others inside it were still open
    #[error("end tag </{0}> closes unclosed elements")]
    UnclosedElements(String),
    /// formatting element misnested with its end tag
    #[error("misnested formatting element <{0}>")]
    MisnestedFormattingElement(String),
    /// input ended with elements still open
    #[error("unexpected end of file")]
    UnexpectedEof,
}

/// A recorded, non-fatal parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where in the input it was detected.
    pub position: Position,
}

impl ParseError {
    /// A parse error of `kind` at `position`.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

impl std::error::Error for ParseError {}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseError", 3)?;
        state.serialize_field("line", &self.position.line)?;
        state.serialize_field("column", &self.position.column)?;
        state.serialize_field("message", &self.kind.to_string())?;
        state.end()
    }
}

/// Invalid serializer configuration. Raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No output rule strategy was configured.
    #[error("serializer options must name an output rule strategy")]
    MissingOutputRules,
    /// The configured output rule identifier is not known.
    #[error("unknown output rules {0:?}")]
    UnknownOutputRules(String),
}

/// Failure while serializing a tree.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The options were rejected before writing started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The sink failed.
    #[error("failed to write serialized output")]
    Io(#[from] io::Error),
}
