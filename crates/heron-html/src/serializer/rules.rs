//! Output rule strategies.
//!
//! The [`Traverser`] decides *which* node comes next; an [`OutputRules`]
//! implementation decides *how* each node is written.

use std::io;

use heron_dom::{Namespace, NodeId, NodeType};
use strum_macros::{Display, EnumString};

use super::Traverser;
use super::escape::escape;
use crate::error::ConfigError;

/// One writer per node kind.
///
/// Every handler gets the traverser (sink plus tree) and the id of the node
/// to write. Handlers for nodes with children call back into
/// [`Traverser::children`].
pub trait OutputRules {
    /// A Document or `DocumentFragment` node.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn document(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// A `DocumentType` node.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn doctype(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// An element and its subtree.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn element(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// A text node.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn text(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// A CDATA section.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn cdata(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// A comment.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn comment(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()>;

    /// A processing instruction.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    fn processing_instruction(&self, traverser: &mut Traverser<'_>, id: NodeId)
    -> io::Result<()>;
}

/// Identifiers of the built-in output rule strategies.
///
/// ```
/// use heron_html::serializer::OutputRulesKind;
///
/// assert_eq!("html5".parse::<OutputRulesKind>(), Ok(OutputRulesKind::Html5));
/// assert_eq!(OutputRulesKind::Html5.to_string(), "html5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum OutputRulesKind {
    /// [`Html5OutputRules`]
    #[default]
    #[strum(serialize = "html5")]
    Html5,
}

impl OutputRulesKind {
    /// Parse an identifier such as `"html5"`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownOutputRules`] when no strategy has that name.
    pub fn from_identifier(identifier: &str) -> Result<Self, ConfigError> {
        identifier
            .parse()
            .map_err(|_| ConfigError::UnknownOutputRules(identifier.to_string()))
    }

    /// Create the strategy this identifier names.
    #[must_use]
    pub fn instantiate(self) -> Box<dyn OutputRules> {
        match self {
            Self::Html5 => Box::new(Html5OutputRules),
        }
    }
}

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Writes nodes the way the HTML fragment serialization algorithm does, with
/// two additions for content the parser keeps: CDATA sections and processing
/// instructions are written back in their source syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5OutputRules;

/// "If current node is an area, base, basefont, bgsound, br, col, embed, frame,
/// hr, img, input, keygen, link, meta, param, source, track or wbr element,
/// then continue on to the next child node at this point."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current node's
/// data IDL attribute literally."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose leading newline the parser drops, so one is added back.
const NEWLINE_SENSITIVE: &[&str] = &["pre", "textarea", "listing"];

impl OutputRules for Html5OutputRules {
    fn document(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        traverser.children(self, id)
    }

    fn doctype(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        let Some(NodeType::Doctype(doctype)) = traverser.tree().node_type(id) else {
            return Ok(());
        };
        let mut markup = format!("<!DOCTYPE {}", doctype.name);
        if !doctype.public_id.is_empty() {
            markup.push_str(&format!(" PUBLIC \"{}\"", doctype.public_id));
            if !doctype.system_id.is_empty() {
                markup.push_str(&format!(" \"{}\"", doctype.system_id));
            }
        } else if !doctype.system_id.is_empty() {
            markup.push_str(&format!(" SYSTEM \"{}\"", doctype.system_id));
        }
        markup.push_str(">\n");
        traverser.write(&markup)
    }

    fn element(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        let tree = traverser.tree();
        let Some(element) = tree.as_element(id) else {
            return Ok(());
        };
        let encode = traverser.encode_entities();

        let mut start_tag = format!("<{}", element.tag_name);
        if !traverser.is_local_element(id) {
            start_tag.push_str(&format!(" xmlns=\"{}\"", element.namespace.url()));
        }
        for attribute in element.attrs.iter() {
            start_tag.push_str(&format!(
                " {}=\"{}\"",
                attribute.qualified_name(),
                escape(&attribute.value, encode)
            ));
        }

        let is_html = element.namespace == Namespace::Html;
        let children = tree.children(id);
        if !is_html && children.is_empty() {
            start_tag.push_str("/>");
            return traverser.write(&start_tag);
        }
        start_tag.push('>');
        traverser.write(&start_tag)?;

        if is_html {
            if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                return Ok(());
            }
            if NEWLINE_SENSITIVE.contains(&element.tag_name.as_str())
                && children
                    .first()
                    .and_then(|&child| tree.as_text(child))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                traverser.write("\n")?;
            }
        }

        traverser.children(self, id)?;
        traverser.write(&format!("</{}>", element.tag_name))
    }

    fn text(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        let tree = traverser.tree();
        let Some(text) = tree.as_text(id) else {
            return Ok(());
        };
        let raw = tree
            .parent(id)
            .and_then(|parent| tree.as_element(parent))
            .is_some_and(|parent| {
                RAW_TEXT_PARENTS
                    .iter()
                    .any(|&tag_name| parent.is_html(tag_name))
            });
        if raw {
            traverser.write(text)
        } else {
            let escaped = escape(text, traverser.encode_entities());
            traverser.write(&escaped)
        }
    }

    fn cdata(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        match traverser.tree().node_type(id) {
            Some(NodeType::CData(data)) => traverser.write(&format!("<![CDATA[{data}]]>")),
            _ => Ok(()),
        }
    }

    fn comment(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        match traverser.tree().node_type(id) {
            Some(NodeType::Comment(data)) => traverser.write(&format!("<!--{data}-->")),
            _ => Ok(()),
        }
    }

    fn processing_instruction(
        &self,
        traverser: &mut Traverser<'_>,
        id: NodeId,
    ) -> io::Result<()> {
        match traverser.tree().node_type(id) {
            Some(NodeType::ProcessingInstruction { target, data }) if data.is_empty() => {
                traverser.write(&format!("<?{target}?>"))
            }
            Some(NodeType::ProcessingInstruction { target, data }) => {
                traverser.write(&format!("<?{target} {data}?>"))
            }
            _ => Ok(()),
        }
    }
}
