//! HTML parser module for tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! and [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).

/// The "in body" insertion mode.
mod body;
/// HTML parser state, the tree construction dispatcher and debug printing.
pub mod core;
/// Foreign content (SVG and MathML) support.
pub mod foreign_content;
/// The list of active formatting elements and the adoption agency algorithm.
mod formatting;
/// The "after body", frameset and "after after" insertion modes.
mod frameset;
/// The insertion modes from "initial" to "after head", plus "text".
mod head;
/// Creating and inserting nodes.
mod insertion;
/// Quirks mode detection from the DOCTYPE token.
mod quirks;
/// The stack of open elements: scopes, implied end tags, mode reset.
mod stack;
/// The "in select", "in select in table" and "in template" insertion modes.
mod select;
/// The table insertion modes.
mod table;

pub use core::{
    ActiveFormattingElement, HTMLParser, InsertionMode, ParserOptions, format_tree, print_tree,
};
