//! Error-tolerant HTML5 parser and serializer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Character source** - line ending normalization and lookahead over the input
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, script data escapes included
//!   - Named, decimal and hexadecimal character references
//!   - CDATA sections and processing instructions kept as tokens
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the template insertion mode stack
//!   - Adoption agency algorithm, foster parenting, active formatting elements
//!   - Foreign content (SVG and MathML)
//!   - Quirks mode detection and fragment parsing
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!   - Pluggable output rules, minimal or full entity encoding
//!
//! Parse errors never stop parsing. They are returned next to the tree.
//!
//! ```
//! let (tree, errors) = heron_html::parse_document("<!DOCTYPE html><p>Hello");
//! assert!(errors.is_empty());
//! let html = tree.document_element().unwrap();
//! assert_eq!(tree.as_element(html).unwrap().tag_name, "html");
//! ```

/// Parse error, configuration error and serialization error types.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML serializer.
pub mod serializer;
/// The character source the tokenizer reads from.
pub mod source;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use heron_dom::DomTree;

pub use error::{ConfigError, ParseError, ParseErrorKind, SerializeError};
pub use parser::{HTMLParser, InsertionMode, ParserOptions, format_tree, print_tree};
pub use serializer::{
    OutputRules, OutputRulesKind, SerializerOptions, Traverser, serialize, serialize_to_string,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// Parse a whole document.
///
/// The tree's root is the Document. Its children are the doctype (if any),
/// comments and processing instructions outside the `html` element, and the
/// `html` element itself.
#[must_use]
pub fn parse_document(input: &str) -> (DomTree, Vec<ParseError>) {
    HTMLParser::new(input).run()
}

/// Parse `input` as the contents of an element named `context`.
///
/// The tree's root is a `DocumentFragment` holding the parsed nodes.
///
/// ```
/// let (tree, _) = heron_html::parse_fragment("<div>test</div>", "body");
/// let children = tree.children(tree.root());
/// assert_eq!(children.len(), 1);
/// assert_eq!(tree.text_content(children[0]), "test");
/// ```
#[must_use]
pub fn parse_fragment(input: &str, context: &str) -> (DomTree, Vec<ParseError>) {
    HTMLParser::new_fragment(input, context, ParserOptions::default()).run()
}
