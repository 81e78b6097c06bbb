//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference resolution and the character reference states.
pub mod character_reference;
/// HTML tokenizer state machine implementation.
pub mod core;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Comment, DOCTYPE, CDATA and processing instruction states.
mod markup;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Script data states.
mod script;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
