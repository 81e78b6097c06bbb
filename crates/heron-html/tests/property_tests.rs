//! Property tests: the parser accepts any input, and serialized output
//! parses again.

use heron_dom::{NodeId, NodeType};
use heron_html::{
    HTMLTokenizer, SerializerOptions, parse_document, parse_fragment, serialize_to_string,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// Markup stitched together from pieces that drive the tree builder through
/// most of its insertion modes.
#[derive(Debug, Clone)]
struct Markup(String);

const PIECES: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<div>", "</div>",
    "<table>", "</table>", "<tr>", "<td>", "</td>", "<caption>", "<select>", "<option>",
    "</select>", "<template>", "</template>", "<svg>", "</svg>", "<math>", "<mi>", "<ul>",
    "<li>", "<pre>", "<textarea>", "</textarea>", "<title>", "</title>", "<script>",
    "</script>", "<!-- c -->", "<![CDATA[d]]>", "<?pi x?>", "<br>", "<frameset>", "<body>",
    "</body>", "</html>", "text", " ", "\n", "&amp;", "&notin;", "&#x41;", "<", "&", "<h1>",
    "</h2>", "<form>", "</form>", "<button>", "<nobr>", "<foreignObject>", "<font color=red>",
];

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 24;
        let markup = (0..count)
            .filter_map(|_| g.choose(PIECES).copied())
            .collect();
        Self(markup)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

/// A well-formed fragment, written exactly the way the serializer writes it.
#[derive(Debug, Clone)]
struct WellFormed(String);

const TAGS: &[&str] = &["div", "span", "section", "em"];
const TEXTS: &[&str] = &["a", "b c", "1 &lt; 2", "&amp;", "x &gt; y", "&quot;q&quot;", "&nbsp;"];
const ATTRIBUTES: &[&str] = &["", " id=\"x\"", " class=\"a &amp; b\"", " title=\"&quot;&lt;\""];

fn well_formed_children(g: &mut Gen, depth: usize) -> String {
    let count = usize::arbitrary(g) % 4;
    let mut out = String::new();
    let mut previous_was_text = false;
    for _ in 0..count {
        if depth == 0 || (bool::arbitrary(g) && !previous_was_text) {
            if previous_was_text {
                continue;
            }
            out.push_str(g.choose(TEXTS).copied().unwrap_or("a"));
            previous_was_text = true;
        } else {
            let tag = g.choose(TAGS).copied().unwrap_or("div");
            let attribute = g.choose(ATTRIBUTES).copied().unwrap_or_default();
            out.push_str(&format!(
                "<{tag}{attribute}>{}</{tag}>",
                well_formed_children(g, depth - 1)
            ));
            previous_was_text = false;
        }
    }
    out
}

impl Arbitrary for WellFormed {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(well_formed_children(g, 3))
    }
}

fn serialize_document(input: &str) -> String {
    let (tree, _) = parse_document(input);
    serialize_to_string(&tree, tree.root(), &SerializerOptions::default()).unwrap_or_default()
}

#[quickcheck]
fn prop_any_input_yields_an_html_root(input: String) -> bool {
    let (tree, _) = parse_document(&input);
    tree.document_element()
        .and_then(|id| tree.as_element(id))
        .is_some_and(|element| element.tag_name == "html")
}

#[quickcheck]
fn prop_tokenizer_always_ends_with_eof(input: String) -> bool {
    let tokens: Vec<_> = HTMLTokenizer::new(&input).collect();
    tokens.last().is_some_and(|token| token.is_eof())
        && tokens.iter().filter(|token| token.is_eof()).count() == 1
}

#[quickcheck]
fn prop_generated_markup_yields_an_html_root(markup: Markup) -> bool {
    let (tree, _) = parse_document(&markup.0);
    tree.document_element().is_some()
}

#[quickcheck]
fn prop_fragments_never_contain_the_synthetic_root(markup: Markup) -> bool {
    let (tree, _) = parse_fragment(&markup.0, "div");
    tree.is_fragment()
        && tree.children(NodeId::ROOT).iter().all(|&id| {
            !matches!(tree.node_type(id), Some(NodeType::Element(element)) if element.is_html("html"))
        })
}

#[quickcheck]
fn prop_serialized_output_reparses(markup: Markup) -> bool {
    let html = serialize_document(&format!("<!DOCTYPE html>{}", markup.0));
    let (tree, _) = parse_document(&html);
    html.starts_with("<!DOCTYPE html>\n") && tree.doctype().is_some()
}

#[quickcheck]
fn prop_well_formed_fragments_round_trip(markup: WellFormed) -> bool {
    let (tree, _) = parse_fragment(&markup.0, "div");
    serialize_to_string(&tree, tree.root(), &SerializerOptions::default())
        .is_ok_and(|html| html == markup.0)
}

#[quickcheck]
fn prop_text_survives_a_round_trip(text: String) -> bool {
    let text: String = text
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '<' | '&'))
        .collect();
    let (tree, _) = parse_fragment(&text, "div");
    let html = serialize_to_string(&tree, tree.root(), &SerializerOptions::default())
        .unwrap_or_default();
    let (reparsed, _) = parse_fragment(&html, "div");
    reparsed.text_content(reparsed.root()) == tree.text_content(tree.root())
}
