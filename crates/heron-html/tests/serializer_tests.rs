//! Integration tests for the HTML serializer.

use std::io::{self, Write};

use heron_dom::{DomTree, NodeId, NodeType};
use heron_html::{
    ConfigError, OutputRules, SerializeError, SerializerOptions, Traverser, parse_document,
    parse_fragment, serialize, serialize_to_string,
};

fn serialize_document(html: &str) -> String {
    let (tree, _) = parse_document(html);
    serialize_to_string(&tree, tree.root(), &SerializerOptions::default()).unwrap()
}

fn serialize_body_fragment(html: &str) -> String {
    let (tree, _) = parse_fragment(html, "body");
    serialize_to_string(&tree, tree.root(), &SerializerOptions::default()).unwrap()
}

#[test]
fn test_full_document() {
    assert_eq!(
        serialize_document("<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p>"),
        "<!DOCTYPE html>\n<html><head><title>t</title></head><body><p>x</p></body></html>"
    );
}

#[test]
fn test_implied_elements_are_written() {
    assert_eq!(
        serialize_document("<!DOCTYPE html>hi"),
        "<!DOCTYPE html>\n<html><head></head><body>hi</body></html>"
    );
}

#[test]
fn test_doctype_with_identifiers() {
    let html = serialize_document(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">",
    );
    assert!(html.starts_with(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n"
    ));

    let html = serialize_document("<!DOCTYPE html SYSTEM \"about:legacy-compat\">");
    assert!(html.starts_with("<!DOCTYPE html SYSTEM \"about:legacy-compat\">\n"));
}

#[test]
fn test_void_elements_have_no_end_tag() {
    assert_eq!(
        serialize_body_fragment("a<br>b<img src=x.png><hr>"),
        "a<br>b<img src=\"x.png\"><hr>"
    );
}

#[test]
fn test_attribute_values_are_escaped() {
    assert_eq!(
        serialize_body_fragment("<a title='say \"hi\" & <go>'>x</a>"),
        "<a title=\"say &quot;hi&quot; &amp; &lt;go&gt;\">x</a>"
    );
}

#[test]
fn test_text_is_escaped() {
    assert_eq!(
        serialize_body_fragment("<p>1 &lt; 2 &amp;&amp; 3 &gt; 2&nbsp;!</p>"),
        "<p>1 &lt; 2 &amp;&amp; 3 &gt; 2&nbsp;!</p>"
    );
}

#[test]
fn test_raw_text_elements_are_written_literally() {
    assert_eq!(
        serialize_body_fragment("<script>if (a < b && c) {}</script><style>a > b {}</style>"),
        "<script>if (a < b && c) {}</script><style>a > b {}</style>"
    );
}

#[test]
fn test_pre_gets_its_leading_newline_back() {
    // The parser drops the first newline, so "\n\nx" is stored as "\nx"
    assert_eq!(
        serialize_body_fragment("<pre>\n\nx</pre>"),
        "<pre>\n\nx</pre>"
    );
    assert_eq!(serialize_body_fragment("<pre>\nx</pre>"), "<pre>x</pre>");
}

#[test]
fn test_empty_foreign_elements_self_close() {
    assert_eq!(
        serialize_body_fragment("<svg viewbox=\"0 0 1 1\"><circle r=1></circle><g><rect/></g></svg>"),
        "<svg viewBox=\"0 0 1 1\"><circle r=\"1\"/><g><rect/></g></svg>"
    );
    assert_eq!(serialize_body_fragment("<math></math>"), "<math/>");
}

#[test]
fn test_namespaced_attributes_keep_prefix() {
    assert_eq!(
        serialize_body_fragment("<svg><use xlink:href=\"#a\"/></svg>"),
        "<svg><use xlink:href=\"#a\"/></svg>"
    );
}

#[test]
fn test_comments_processing_instructions_and_cdata() {
    assert_eq!(
        serialize_body_fragment("<!--c--><?target some data?><?bare?><svg><![CDATA[x<y]]></svg>"),
        "<!--c--><?target some data?><?bare?><svg><![CDATA[x<y]]></svg>"
    );
}

#[test]
fn test_encode_entities() {
    let (tree, _) = parse_fragment("<p title=\"\u{e9}\">\u{a9} caf\u{e9} \u{4e2d} &amp;</p>", "body");
    let options = SerializerOptions::default().with_encode_entities(true);
    assert_eq!(
        serialize_to_string(&tree, tree.root(), &options).unwrap(),
        "<p title=\"&eacute;\">&copy; caf&eacute; \u{4e2d} &amp;</p>"
    );

    let plain = SerializerOptions::default();
    assert_eq!(
        serialize_to_string(&tree, tree.root(), &plain).unwrap(),
        "<p title=\"\u{e9}\">\u{a9} caf\u{e9} \u{4e2d} &amp;</p>"
    );
}

#[test]
fn test_serialize_single_element() {
    let (tree, _) = parse_document("<!DOCTYPE html><div><span id=s>x</span></div>");
    let span = tree.get_element_by_id("s").unwrap();
    assert_eq!(
        serialize_to_string(&tree, span, &SerializerOptions::default()).unwrap(),
        "<span id=\"s\">x</span>"
    );
}

#[test]
fn test_serialize_into_writer() {
    let (tree, _) = parse_fragment("<b>x</b>", "div");
    let sink = serialize(&tree, tree.root(), Vec::new(), &SerializerOptions::default()).unwrap();
    assert_eq!(sink, b"<b>x</b>");
}

#[test]
fn test_missing_output_rules() {
    let (tree, _) = parse_fragment("x", "div");
    let options = SerializerOptions {
        encode_entities: false,
        output_rules: None,
    };
    let result = serialize_to_string(&tree, tree.root(), &options);
    assert!(matches!(
        result,
        Err(SerializeError::Config(ConfigError::MissingOutputRules))
    ));
}

#[test]
fn test_unknown_output_rules() {
    assert_eq!(
        SerializerOptions::default().with_output_rules("xml"),
        Err(ConfigError::UnknownOutputRules("xml".to_string()))
    );
    assert!(SerializerOptions::default().with_output_rules("html5").is_ok());
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_errors_are_reported() {
    let (tree, _) = parse_fragment("x", "div");
    let result = serialize(&tree, tree.root(), BrokenSink, &SerializerOptions::default());
    assert!(matches!(result, Err(SerializeError::Io(_))));
}

/// Writes only the text of a tree.
struct TextOnly;

impl OutputRules for TextOnly {
    fn document(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        traverser.children(self, id)
    }

    fn doctype(&self, _: &mut Traverser<'_>, _: NodeId) -> io::Result<()> {
        Ok(())
    }

    fn element(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        traverser.children(self, id)
    }

    fn text(&self, traverser: &mut Traverser<'_>, id: NodeId) -> io::Result<()> {
        let tree = traverser.tree();
        match tree.node_type(id) {
            Some(NodeType::Text(text)) => traverser.write(text),
            _ => Ok(()),
        }
    }

    fn cdata(&self, _: &mut Traverser<'_>, _: NodeId) -> io::Result<()> {
        Ok(())
    }

    fn comment(&self, _: &mut Traverser<'_>, _: NodeId) -> io::Result<()> {
        Ok(())
    }

    fn processing_instruction(&self, _: &mut Traverser<'_>, _: NodeId) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_custom_output_rules() {
    let (tree, _) = parse_document("<!DOCTYPE html><p>a<!--x--><b>b</b></p>c");
    let mut out = Vec::new();
    Traverser::new(&tree, &mut out, false)
        .node(&TextOnly, tree.root())
        .unwrap();
    assert_eq!(out, b"abc");
}

fn round_trip(tree: &DomTree) -> String {
    serialize_to_string(tree, tree.root(), &SerializerOptions::default()).unwrap()
}

#[test]
fn test_output_is_stable_when_reparsed() {
    let inputs = [
        "<!DOCTYPE html><title>a &amp; b</title><p class=x>one<p>two<table><td>3</table>",
        "<ul><li>a<li>b</ul><pre>\n\nkeep</pre><textarea>\nt</textarea>",
        "<svg><foreignObject><b>x</b></foreignObject><path d=\"M0 0\"/></svg><math><mi>y</mi></math>",
        "<b>1<p>2</b>3</p><!-- note --><script>x<y</script>",
        "<template><![CDATA[z]]></template><table><tr><td><![CDATA[c]]></td></tr></table>",
        "x<template><frameset><![CDATA[z]]></template>",
    ];
    for input in inputs {
        let first = round_trip(&parse_document(input).0);
        let second = round_trip(&parse_document(&first).0);
        assert_eq!(first, second, "unstable output for {input:?}");
    }
}
