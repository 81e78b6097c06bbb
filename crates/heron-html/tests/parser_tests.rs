//! Integration tests for the HTML parser.

use heron_common::warn_once;
use heron_dom::{DomTree, NodeId, NodeType};
use heron_html::{HTMLParser, ParseError, ParseErrorKind, ParserOptions, parse_document};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html).0
}

/// Helper to parse HTML and return only the error kinds
fn error_kinds(html: &str) -> Vec<ParseErrorKind> {
    parse_document(html)
        .1
        .into_iter()
        .map(|error| error.kind)
        .collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        return Some(from);
    }
    tree.descendants(from)
        .find(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == tag))
}

/// Helper to find all elements with a given tag name under a subtree
fn find_all_elements(tree: &DomTree, from: NodeId, tag: &str) -> Vec<NodeId> {
    tree.descendants(from)
        .filter(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == tag))
        .collect()
}

/// Helper to collect all direct element children with a given tag name.
fn element_children(tree: &DomTree, parent: NodeId, tag: &str) -> Vec<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some_and(|d| d.tag_name == tag))
        .collect()
}

/// Tag names of the element children of `parent`, in order.
fn child_tags(tree: &DomTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|data| data.tag_name.clone()))
        .collect()
}

fn attribute<'a>(tree: &'a DomTree, id: NodeId, name: &str) -> Option<&'a str> {
    tree.as_element(id).and_then(|data| data.attrs.get(name))
}

fn has_stray_end_tag(errors: &[ParseError], tag_name: &str) -> bool {
    errors
        .iter()
        .any(|error| error.kind == ParseErrorKind::UnexpectedEndTag(tag_name.to_string()))
}

fn body(tree: &DomTree) -> NodeId {
    tree.body().expect("document has a body")
}

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    assert!(matches!(tree.node_type(NodeId::ROOT), Some(NodeType::Document)));
    let doctype = tree.doctype().expect("doctype node");
    assert_eq!(doctype.name, "html");

    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
}

#[test]
fn test_missing_html_head_and_body_are_implied() {
    let tree = parse("Hello");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
    assert_eq!(tree.text_content(body(&tree)), "Hello");
}

#[test]
fn test_text_node() {
    let tree = parse("<html><body>Hello World</body></html>");
    assert_eq!(tree.text_content(body(&tree)), "Hello World");
}

#[test]
fn test_comment_node() {
    let tree = parse("<html><body><!-- test comment --></body></html>");
    let has_comment = tree.children(body(&tree)).iter().any(|&child| {
        matches!(tree.node_type(child), Some(NodeType::Comment(data)) if data == " test comment ")
    });
    assert!(has_comment);
}

#[test]
fn test_comment_before_html_belongs_to_document() {
    let tree = parse("<!-- first --><html><body></body></html>");
    let first = tree.children(NodeId::ROOT)[0];
    assert!(matches!(tree.node_type(first), Some(NodeType::Comment(data)) if data == " first "));
}

#[test]
fn test_nested_elements() {
    let tree = parse("<html><body><div><p>Text</p></div></body></html>");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let p = find_element(&tree, div, "p").unwrap();
    assert_eq!(tree.text_content(p), "Text");
}

#[test]
fn test_element_attributes() {
    let tree = parse(r#"<html><body><div id="main" class="container"></div></body></html>"#);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(attribute(&tree, div, "id"), Some("main"));
    assert_eq!(attribute(&tree, div, "class"), Some("container"));
    assert_eq!(tree.get_element_by_id("main"), Some(div));
}

#[test]
fn test_void_elements() {
    let tree = parse(r#"<html><body><input type="text"><br></body></html>"#);
    assert_eq!(child_tags(&tree, body(&tree)), vec!["input", "br"]);
}

#[test]
fn test_end_br_becomes_start_br() {
    let tree = parse("<!DOCTYPE html><body>a</br>b");
    assert_eq!(child_tags(&tree, body(&tree)), vec!["br"]);
}

#[test]
fn test_title_element() {
    let tree = parse("<html><head><title>My Page</title></head><body></body></html>");
    let title = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(tree.text_content(title), "My Page");
    assert_eq!(tree.parent(title), tree.head());
}

#[test]
fn test_meta_element() {
    let tree = parse(r#"<html><head><meta charset="UTF-8"></head><body></body></html>"#);
    let meta = find_element(&tree, NodeId::ROOT, "meta").unwrap();
    assert_eq!(attribute(&tree, meta, "charset"), Some("UTF-8"));
}

#[test]
fn test_whitespace_preserved_in_text() {
    let tree = parse("<html><body>  hello  world  </body></html>");
    assert_eq!(tree.text_content(body(&tree)), "  hello  world  ");
}

#[test]
fn test_multiple_text_nodes_merged() {
    // Adjacent character tokens become a single text node
    let tree = parse("<html><body>a&amp;bc</body></html>");
    let body = body(&tree);
    let text_nodes = tree
        .children(body)
        .iter()
        .filter(|&&child| tree.as_text(child).is_some())
        .count();

    assert_eq!(text_nodes, 1);
    assert_eq!(tree.text_content(body), "a&bc");
}

#[test]
fn test_simple_html_file() {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <!-- This is a comment -->
    <title>Test</title>
</head>
<body class="main" id="content">
    <!-- more content goes here -->
    <div data-value='single quoted'>Hello</div>
    <input type="text" disabled />
</body>
</html>"#;

    let (tree, errors) = parse_document(html);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let html = tree.document_element().unwrap();
    assert_eq!(attribute(&tree, html, "lang"), Some("en"));

    let title = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(tree.text_content(title), "Test");

    let meta = find_element(&tree, NodeId::ROOT, "meta").unwrap();
    assert_eq!(attribute(&tree, meta, "charset"), Some("UTF-8"));

    let body = body(&tree);
    assert_eq!(attribute(&tree, body, "class"), Some("main"));
    assert_eq!(attribute(&tree, body, "id"), Some("content"));

    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(attribute(&tree, div, "data-value"), Some("single quoted"));
    assert_eq!(tree.text_content(div), "Hello");

    let input = find_element(&tree, NodeId::ROOT, "input").unwrap();
    assert_eq!(attribute(&tree, input, "type"), Some("text"));
    assert_eq!(attribute(&tree, input, "disabled"), Some(""));
}

// ========== Raw text element tests at parser level ==========

#[test]
fn test_style_element_content_preserved() {
    let html = r"<!DOCTYPE html>
<html>
<head>
<style>
body { color: red; }
.container { margin: 0; }
</style>
</head>
<body></body>
</html>";

    let tree = parse(html);
    let style = find_element(&tree, tree.root(), "style").unwrap();
    let content = tree.text_content(style);

    assert!(content.contains("body { color: red; }"));
    assert!(content.contains(".container { margin: 0; }"));
}

#[test]
fn test_style_with_html_like_content() {
    let html = "<html><head><style><div>not a tag</div></style></head><body></body></html>";

    let tree = parse(html);
    let style = find_element(&tree, tree.root(), "style").unwrap();
    assert_eq!(tree.text_content(style), "<div>not a tag</div>");
    assert!(find_element(&tree, body(&tree), "div").is_none());
}

#[test]
fn test_title_content_preserved() {
    let html = "<html><head><title>My <test> &amp; Title</title></head><body></body></html>";

    let tree = parse(html);
    let title = find_element(&tree, tree.root(), "title").unwrap();
    assert_eq!(tree.text_content(title), "My <test> & Title");
}

#[test]
fn test_textarea_drops_leading_newline() {
    let tree = parse("<!DOCTYPE html><textarea>\nline</textarea>");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(tree.text_content(textarea), "line");
}

#[test]
fn test_script_content_is_text() {
    let tree = parse("<!DOCTYPE html><script>if (a < b) { x = '</p>'; }</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(tree.text_content(script), "if (a < b) { x = '</p>'; }");
    assert!(find_element(&tree, NodeId::ROOT, "p").is_none());
}

#[test]
fn test_noscript_with_scripting_enabled_is_raw_text() {
    let input = "<!DOCTYPE html><body><noscript><b>x</b></noscript>";

    let (tree, _) = HTMLParser::with_options(input, ParserOptions::default().with_scripting(true)).run();
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").unwrap();
    assert_eq!(tree.text_content(noscript), "<b>x</b>");

    let (tree, _) = HTMLParser::with_options(input, ParserOptions::default()).run();
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").unwrap();
    assert!(find_element(&tree, noscript, "b").is_some());
}

// ========== Adoption Agency Algorithm Tests ==========

#[test]
fn test_adoption_agency_simple_misnesting() {
    // <p><b>X<i>Y</b>Z</i></p> becomes <p><b>X<i>Y</i></b><i>Z</i></p>
    let tree = parse("<html><body><p><b>X<i>Y</b>Z</i></p></body></html>");
    let p = find_element(&tree, body(&tree), "p").unwrap();

    assert_eq!(child_tags(&tree, p), vec!["b", "i"]);
    let b = element_children(&tree, p, "b")[0];
    assert_eq!(tree.text_content(b), "XY");
    let i_in_b = find_element(&tree, b, "i").unwrap();
    assert_eq!(tree.text_content(i_in_b), "Y");

    let i_after_b = element_children(&tree, p, "i")[0];
    assert_eq!(tree.text_content(i_after_b), "Z");
}

#[test]
fn test_adoption_agency_with_furthest_block() {
    // <b>1<p>2</b>3</p> moves the p out of the b and clones b into it
    let tree = parse("<!DOCTYPE html><b>1<p>2</b>3</p>");
    let body = body(&tree);
    assert_eq!(child_tags(&tree, body), vec!["b", "p"]);

    let b = element_children(&tree, body, "b")[0];
    assert_eq!(tree.text_content(b), "1");

    let p = element_children(&tree, body, "p")[0];
    let cloned_b = element_children(&tree, p, "b");
    assert_eq!(cloned_b.len(), 1);
    assert_eq!(tree.text_content(cloned_b[0]), "2");
    assert_eq!(tree.text_content(p), "23");
}

#[test]
fn test_adoption_agency_records_misnesting() {
    let errors = error_kinds("<!DOCTYPE html><b><i>x</b></i>");
    assert!(errors.contains(&ParseErrorKind::MisnestedFormattingElement("b".into())));
}

#[test]
fn test_adoption_agency_no_furthest_block() {
    // Only non-special elements above the <b>, so it is simply popped
    let tree = parse("<html><body><p><b><i>text</b></p></body></html>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let b = find_element(&tree, p, "b").unwrap();
    let i = find_element(&tree, b, "i").unwrap();
    assert_eq!(tree.text_content(i), "text");
}

#[test]
fn test_adoption_agency_outer_loop_stops_after_eight_blocks() {
    let mut html = String::from("<!DOCTYPE html><body><b>");
    for n in 1..=11 {
        html.push_str(&format!("<div>{n}"));
    }
    html.push_str("</b>end");
    let tree = parse(&html);
    let body = body(&tree);

    // The original <b> is left empty before the first block.
    assert_eq!(child_tags(&tree, body), vec!["b", "div"]);
    let original = element_children(&tree, body, "b")[0];
    assert!(tree.children(original).is_empty());

    let divs = find_all_elements(&tree, body, "div");
    assert_eq!(divs.len(), 11);

    // Each of the first seven blocks holds a clone of <b> with its own
    // text, followed by the next block.
    for (index, &div) in divs.iter().take(7).enumerate() {
        assert_eq!(child_tags(&tree, div), vec!["b", "div"]);
        let clone = tree.children(div)[0];
        assert_eq!(tree.text_content(clone), (index + 1).to_string());
        assert_eq!(tree.children(div)[1], divs[index + 1]);
    }

    // The eighth run ends the loop: the remaining blocks stay inside the
    // last clone.
    assert_eq!(child_tags(&tree, divs[7]), vec!["b"]);
    let last_clone = tree.children(divs[7])[0];
    assert_eq!(child_tags(&tree, last_clone), vec!["div"]);
    assert_eq!(tree.children(last_clone)[1], divs[8]);
    assert_eq!(tree.text_content(divs[10]), "11end");
    assert_eq!(find_all_elements(&tree, NodeId::ROOT, "b").len(), 9);
}

#[test]
fn test_adoption_agency_inner_loop_drops_distant_formatting() {
    let tree =
        parse("<!DOCTYPE html><body><a><b><i><u><s><em><strong><code><tt><div>x</a>y");
    let body = body(&tree);
    assert_eq!(child_tags(&tree, body), vec!["a", "strong"]);

    // The original chain stays in place, now without the block.
    let mut node = element_children(&tree, body, "a")[0];
    for tag in ["b", "i", "u", "s", "em", "strong", "code", "tt"] {
        assert_eq!(child_tags(&tree, node), vec![tag]);
        node = tree.children(node)[0];
    }
    assert!(tree.children(node).is_empty());

    // Only the three formatting elements nearest the block are cloned.
    let strong = element_children(&tree, body, "strong")[0];
    assert_eq!(child_tags(&tree, strong), vec!["code"]);
    let code = tree.children(strong)[0];
    assert_eq!(child_tags(&tree, code), vec!["tt"]);
    let tt = tree.children(code)[0];
    assert_eq!(child_tags(&tree, tt), vec!["div"]);
    let div = tree.children(tt)[0];
    assert_eq!(child_tags(&tree, div), vec!["a"]);
    assert_eq!(tree.text_content(div), "xy");

    for tag in ["b", "i", "u", "s", "em"] {
        assert_eq!(find_all_elements(&tree, NodeId::ROOT, tag).len(), 1, "{tag}");
    }
}

#[test]
fn test_formatting_reconstruction_across_blocks() {
    let tree = parse("<html><body><p><b>bold</p><p>still bold</p></b></body></html>");
    let ps = find_all_elements(&tree, body(&tree), "p");
    assert_eq!(ps.len(), 2);

    assert_eq!(tree.text_content(ps[0]), "bold");
    assert!(find_element(&tree, ps[0], "b").is_some());

    assert_eq!(tree.text_content(ps[1]), "still bold");
    assert!(
        find_element(&tree, ps[1], "b").is_some(),
        "Expected <b> inside second <p> from formatting reconstruction"
    );
}

#[test]
fn test_noahs_ark_limits_reconstructed_duplicates() {
    // Only three identical <b> entries survive in the formatting list
    let tree = parse("<!DOCTYPE html><p><b><b><b><b>x</p><p>y");
    let ps = find_all_elements(&tree, body(&tree), "p");
    assert_eq!(find_all_elements(&tree, ps[0], "b").len(), 4);
    assert_eq!(find_all_elements(&tree, ps[1], "b").len(), 3);
}

#[test]
fn test_properly_nested_formatting() {
    let tree = parse("<html><body><p><b>bold <i>bold-italic</i> bold</b></p></body></html>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let b = find_element(&tree, p, "b").unwrap();
    let i = find_element(&tree, b, "i").unwrap();

    assert_eq!(tree.text_content(i), "bold-italic");
    assert_eq!(tree.text_content(b), "bold bold-italic bold");
}

#[test]
fn test_any_other_end_tag_ignores_special() {
    let tree = parse("<html><body><span><div>text</div></span></body></html>");
    let span = find_element(&tree, body(&tree), "span").unwrap();
    assert!(find_element(&tree, span, "div").is_some());
}

#[test]
fn test_nested_anchor_tags() {
    let tree = parse(r#"<html><body><a href="1">first<a href="2">second</a></body></html>"#);
    let body = body(&tree);
    let anchors = element_children(&tree, body, "a");
    assert_eq!(anchors.len(), 2);
    assert_eq!(tree.text_content(anchors[0]), "first");
    assert_eq!(attribute(&tree, anchors[1], "href"), Some("2"));
    assert_eq!(tree.text_content(anchors[1]), "second");
}

#[test]
fn test_generate_implied_end_tags() {
    let tree = parse("<html><body><p>first<p>second</body></html>");
    let ps = element_children(&tree, body(&tree), "p");
    assert_eq!(ps.len(), 2);
    assert_eq!(tree.text_content(ps[0]), "first");
    assert_eq!(tree.text_content(ps[1]), "second");
}

#[test]
fn test_block_start_tag_closes_paragraph() {
    let tree = parse("<!DOCTYPE html><p><figure>x</figure>");
    let body = body(&tree);
    assert_eq!(child_tags(&tree, body), vec!["p", "figure"]);
    let p = element_children(&tree, body, "p")[0];
    assert!(tree.children(p).is_empty());
}

#[test]
fn test_stray_p_end_tag_inserts_empty_paragraph() {
    let (tree, errors) = parse_document("<!DOCTYPE html><body></p>text</body>");
    let body = body(&tree);
    assert_eq!(child_tags(&tree, body), vec!["p"]);
    assert!(tree.text_content(body).contains("text"));
    assert!(has_stray_end_tag(&errors, "p"));
}

// ---------------------------------------------------------------------------
// List element parsing tests
//
// [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
// ---------------------------------------------------------------------------

#[test]
fn test_li_implicit_close() {
    // "A start tag whose tag name is "li""
    let tree = parse("<ul><li>A<li>B</ul>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    let lis = element_children(&tree, ul, "li");
    assert_eq!(lis.len(), 2, "ul should have 2 <li> children");
    assert_eq!(tree.text_content(lis[0]), "A");
    assert_eq!(tree.text_content(lis[1]), "B");
}

#[test]
fn test_dd_dt_implicit_close() {
    // "A start tag whose tag name is one of: "dd", "dt""
    let tree = parse("<dl><dt>T<dd>D<dt>T2</dl>");
    let dl = find_element(&tree, NodeId::ROOT, "dl").unwrap();
    assert_eq!(child_tags(&tree, dl), vec!["dt", "dd", "dt"]);
    let dts = element_children(&tree, dl, "dt");
    assert_eq!(tree.text_content(dts[0]), "T");
    assert_eq!(tree.text_content(dts[1]), "T2");
}

#[test]
fn test_li_end_tag_no_scope() {
    // "If the stack of open elements does not have an li element in
    //  list item scope, then this is a parse error; ignore the token."
    let (tree, errors) = parse_document("<!DOCTYPE html><body></li>text</body>");
    assert_eq!(tree.text_content(body(&tree)), "text");
    assert!(has_stray_end_tag(&errors, "li"));
}

#[test]
fn test_nested_lists() {
    let tree = parse("<ul><li>A<ul><li>B</li></ul></li></ul>");
    let outer_ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    let outer_lis = element_children(&tree, outer_ul, "li");
    assert_eq!(outer_lis.len(), 1);

    let inner_ul = find_element(&tree, outer_lis[0], "ul").unwrap();
    let inner_lis = element_children(&tree, inner_ul, "li");
    assert_eq!(inner_lis.len(), 1);
    assert_eq!(tree.text_content(inner_lis[0]), "B");
}

#[test]
fn test_ol_end_tag_scope_checking() {
    let (tree, errors) = parse_document("<!DOCTYPE html><body></ol>text</body>");
    assert_eq!(tree.text_content(body(&tree)), "text");
    assert!(has_stray_end_tag(&errors, "ol"));
}

// ========== Processing instructions and CDATA ==========

#[test]
fn test_processing_instruction_in_document() {
    let tree = parse("<html><?foo bar?>");
    let pi = tree
        .descendants(NodeId::ROOT)
        .find(|&id| matches!(tree.node_type(id), Some(NodeType::ProcessingInstruction { .. })))
        .expect("processing instruction node");
    assert!(matches!(
        tree.node_type(pi),
        Some(NodeType::ProcessingInstruction { target, data }) if target == "foo" && data == "bar"
    ));
}

#[test]
fn test_leading_xml_declaration_is_dropped() {
    let tree = parse("<?xml version=\"1.0\"?><!DOCTYPE html><p>x");
    assert!(
        !tree
            .descendants(NodeId::ROOT)
            .any(|id| matches!(tree.node_type(id), Some(NodeType::ProcessingInstruction { .. })))
    );
    assert!(tree.doctype().is_some());
}

#[test]
fn test_cdata_in_html_content() {
    let tree = parse("<mathml><![CDATA[test]]></mathml>");
    let mathml = find_element(&tree, NodeId::ROOT, "mathml").unwrap();
    let children = tree.children(mathml);
    assert_eq!(children.len(), 1);
    assert!(matches!(tree.node_type(children[0]), Some(NodeType::CData(data)) if data == "test"));
}

#[test]
fn test_unterminated_cdata_records_errors() {
    let errors = error_kinds("<!DOCTYPE html><html><mathml><![CDATA[test");
    assert!(!errors.is_empty());
}

// ========== Error reporting ==========

#[test]
fn test_missing_doctype_is_reported() {
    let errors = error_kinds("<p>x</p>");
    assert_eq!(errors.first(), Some(&ParseErrorKind::MissingDoctype));
}

#[test]
fn test_well_formed_document_has_no_errors() {
    let errors = error_kinds(
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>",
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn test_unclosed_elements_at_eof() {
    let errors = error_kinds("<!DOCTYPE html><div><span>x");
    assert!(
        errors
            .iter()
            .any(|kind| matches!(kind, ParseErrorKind::UnclosedElements(_)))
    );
}

#[test]
fn test_error_positions_follow_the_input() {
    let (_, errors) = parse_document("<!DOCTYPE html>\n<body>\n</span>");
    let stray = errors
        .iter()
        .find(|error| error.kind == ParseErrorKind::UnexpectedEndTag("span".into()))
        .expect("stray end tag error");
    assert_eq!(stray.position.line, 3);
}

#[test]
fn test_logged_parse_errors_are_keyed_by_kind() {
    let options = ParserOptions::default().with_log_parse_errors(true);
    let html = "<!DOCTYPE html><body></marquee>\n</marquee>";
    let (_, errors) = HTMLParser::with_options(html, options).run();
    let stray: Vec<&ParseError> = errors
        .iter()
        .filter(|error| error.kind == ParseErrorKind::UnexpectedEndTag("marquee".into()))
        .collect();
    assert_eq!(stray.len(), 2);

    // The kind was already warned about, while the positioned messages
    // never entered the set.
    assert!(!warn_once("HTML Parser", &stray[0].kind.to_string()));
    assert!(warn_once("HTML Parser", &stray[1].to_string()));
}

#[test]
fn test_parsing_never_panics_on_garbage() {
    for input in ["<", "</", "<!", "<!-", "<?", "&#", "<table><", "<svg><![CDATA["] {
        let tree = parse(input);
        assert!(tree.document_element().is_some(), "no html element for {input:?}");
    }
}
