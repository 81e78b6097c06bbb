//! HTML serializer.
//!
//! Walks a [`DomTree`] depth first and writes it back out as HTML text
//! through a pluggable [`OutputRules`] strategy. The walk never mutates the
//! tree.
//!
//! ```
//! use heron_html::serializer::{SerializerOptions, serialize_to_string};
//!
//! let (tree, _) = heron_html::parse_fragment("<p class=x>a &amp; b", "body");
//! let html = serialize_to_string(&tree, tree.root(), &SerializerOptions::default()).unwrap();
//! assert_eq!(html, "<p class=\"x\">a &amp; b</p>");
//! ```

/// Text and attribute value escaping.
pub mod escape;
/// The [`OutputRules`] trait and the HTML5 strategy.
pub mod rules;

use std::io::{self, Write};

use heron_dom::{DomTree, NodeId, NodeType};

use crate::error::{ConfigError, SerializeError};

pub use rules::{Html5OutputRules, OutputRules, OutputRulesKind};

/// Serializer configuration.
///
/// `output_rules` has to be set; the default options pick
/// [`OutputRulesKind::Html5`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Write every character that has a named reference as that reference,
    /// instead of escaping only `&`, `<`, `>`, `"` and U+00A0.
    pub encode_entities: bool,
    /// The output rule strategy.
    pub output_rules: Option<OutputRulesKind>,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            encode_entities: false,
            output_rules: Some(OutputRulesKind::Html5),
        }
    }
}

impl SerializerOptions {
    /// Turn full named entity encoding on or off.
    #[must_use]
    pub const fn with_encode_entities(mut self, encode_entities: bool) -> Self {
        self.encode_entities = encode_entities;
        self
    }

    /// Use the output rules named by `identifier` (such as `"html5"`).
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownOutputRules`] for an unknown identifier.
    pub fn with_output_rules(mut self, identifier: &str) -> Result<Self, ConfigError> {
        self.output_rules = Some(OutputRulesKind::from_identifier(identifier)?);
        Ok(self)
    }

    /// The configured strategy, ready to use.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingOutputRules`] when none is configured.
    pub fn rules(&self) -> Result<Box<dyn OutputRules>, ConfigError> {
        self.output_rules
            .map(OutputRulesKind::instantiate)
            .ok_or(ConfigError::MissingOutputRules)
    }
}

/// Depth-first walker that hands each node to an [`OutputRules`] strategy.
///
/// Output is written to the sink as the walk goes.
pub struct Traverser<'a> {
    tree: &'a DomTree,
    out: &'a mut dyn Write,
    encode_entities: bool,
}

impl<'a> Traverser<'a> {
    /// A traverser over `tree` writing into `out`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, out: &'a mut dyn Write, encode_entities: bool) -> Self {
        Self {
            tree,
            out,
            encode_entities,
        }
    }

    /// The tree being walked.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// Whether full named entity encoding is on.
    #[must_use]
    pub const fn encode_entities(&self) -> bool {
        self.encode_entities
    }

    /// Write raw text to the sink.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Whether an element belongs to one of the namespaces HTML serializes
    /// natively (html, mathml, svg).
    #[must_use]
    pub fn is_local_element(&self, id: NodeId) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|element| element.namespace.is_local())
    }

    /// Write `id` and its subtree using `rules`.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn node(&mut self, rules: &dyn OutputRules, id: NodeId) -> io::Result<()> {
        match self.tree.node_type(id) {
            Some(NodeType::Document | NodeType::DocumentFragment) => rules.document(self, id),
            Some(NodeType::Doctype(_)) => rules.doctype(self, id),
            Some(NodeType::Element(_)) => rules.element(self, id),
            Some(NodeType::Text(_)) => rules.text(self, id),
            Some(NodeType::CData(_)) => rules.cdata(self, id),
            Some(NodeType::Comment(_)) => rules.comment(self, id),
            Some(NodeType::ProcessingInstruction { .. }) => rules.processing_instruction(self, id),
            None => Ok(()),
        }
    }

    /// Write every child of `id`, in order.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn children(&mut self, rules: &dyn OutputRules, id: NodeId) -> io::Result<()> {
        let tree = self.tree;
        for &child in tree.children(id) {
            self.node(rules, child)?;
        }
        Ok(())
    }
}

/// Serialize the subtree at `node` into `sink`, and hand the sink back.
///
/// When `node` is a Document or `DocumentFragment` its children are written;
/// any other node is written itself, start tag and end tag included.
///
/// # Errors
///
/// [`SerializeError::Config`] before anything is written when the options
/// are invalid, [`SerializeError::Io`] when the sink fails.
pub fn serialize<W: Write>(
    tree: &DomTree,
    node: NodeId,
    mut sink: W,
    options: &SerializerOptions,
) -> Result<W, SerializeError> {
    let rules = options.rules()?;
    log::trace!("serializing node {node:?} with {:?}", options.output_rules);
    Traverser::new(tree, &mut sink, options.encode_entities).node(rules.as_ref(), node)?;
    sink.flush()?;
    Ok(sink)
}

/// Serialize the subtree at `node` into a `String`.
///
/// # Errors
///
/// [`SerializeError::Config`] when the options are invalid.
pub fn serialize_to_string(
    tree: &DomTree,
    node: NodeId,
    options: &SerializerOptions,
) -> Result<String, SerializeError> {
    let bytes = serialize(tree, node, Vec::new(), options)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
