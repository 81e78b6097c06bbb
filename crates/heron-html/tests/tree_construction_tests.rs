//! Tree construction tests for tables, forms controls, templates, framesets,
//! foreign content, fragments and quirks mode.

use heron_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use heron_html::{HTMLParser, ParseErrorKind, ParserOptions, parse_document, parse_fragment};

fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.get_elements_by_tag_name(tag).first().copied()
}

fn child_tags(tree: &DomTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|data| data.tag_name.clone()))
        .collect()
}

fn namespace_of(tree: &DomTree, id: NodeId) -> Namespace {
    tree.as_element(id).expect("element").namespace
}

fn body(tree: &DomTree) -> NodeId {
    tree.body().expect("document has a body")
}

// ---------------------------------------------------------------------------
// Tables
//
// [§ 13.2.6.4.9 "in table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
// ---------------------------------------------------------------------------

#[test]
fn test_table_gets_implied_tbody() {
    let (tree, errors) = parse_document("<!DOCTYPE html><table><tr><td>1</td></tr></table>");
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let table = find_element(&tree, "table").unwrap();
    assert_eq!(child_tags(&tree, table), vec!["tbody"]);
    let tbody = tree.children(table)[0];
    assert_eq!(child_tags(&tree, tbody), vec!["tr"]);
    let td = find_element(&tree, "td").unwrap();
    assert_eq!(tree.text_content(td), "1");
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let (tree, errors) = parse_document("<!DOCTYPE html><table>x<tr><td>1</table>");
    let body = body(&tree);

    let first = tree.children(body)[0];
    assert_eq!(tree.as_text(first), Some("x"));
    assert_eq!(child_tags(&tree, body), vec!["table"]);
    assert!(!errors.is_empty());
}

#[test]
fn test_element_in_table_is_foster_parented() {
    let tree = parse_document("<!DOCTYPE html><table><div>a</div></table>").0;
    assert_eq!(child_tags(&tree, body(&tree)), vec!["div", "table"]);
    let table = find_element(&tree, "table").unwrap();
    assert!(tree.children(table).is_empty());
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    let tree = parse_document("<!DOCTYPE html><table> <tr><td>1</td></tr></table>").0;
    let table = find_element(&tree, "table").unwrap();
    let first = tree.children(table)[0];
    assert_eq!(tree.as_text(first), Some(" "));
}

#[test]
fn test_cells_close_each_other() {
    let tree = parse_document("<!DOCTYPE html><table><tr><td>a<td>b<th>c</table>").0;
    let tr = find_element(&tree, "tr").unwrap();
    assert_eq!(child_tags(&tree, tr), vec!["td", "td", "th"]);
}

#[test]
fn test_caption_and_colgroup() {
    let tree = parse_document("<!DOCTYPE html><table><caption>c</caption><col><tr><td>x</table>").0;
    let table = find_element(&tree, "table").unwrap();
    assert_eq!(child_tags(&tree, table), vec!["caption", "colgroup", "tbody"]);
    let colgroup = find_element(&tree, "colgroup").unwrap();
    assert_eq!(child_tags(&tree, colgroup), vec!["col"]);
}

#[test]
fn test_nested_table_closes_outer_table() {
    let tree = parse_document("<!DOCTYPE html><table><table>").0;
    assert_eq!(child_tags(&tree, body(&tree)), vec!["table", "table"]);
}

#[test]
fn test_formatting_inside_cell_stays_inside_cell() {
    let tree = parse_document("<!DOCTYPE html><table><tr><td><b>x</td><td>y</td></tr></table>").0;
    let cells = tree.get_elements_by_tag_name("td");
    assert_eq!(child_tags(&tree, cells[0]), vec!["b"]);
    assert!(child_tags(&tree, cells[1]).is_empty());
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

#[test]
fn test_options_close_each_other() {
    let tree = parse_document("<!DOCTYPE html><select><option>1<option>2</select>").0;
    let select = find_element(&tree, "select").unwrap();
    let options = tree.children(select);
    assert_eq!(child_tags(&tree, select), vec!["option", "option"]);
    assert_eq!(tree.text_content(options[0]), "1");
    assert_eq!(tree.text_content(options[1]), "2");
}

#[test]
fn test_optgroup_closes_option() {
    let tree =
        parse_document("<!DOCTYPE html><select><option>a<optgroup><option>b</select>").0;
    let select = find_element(&tree, "select").unwrap();
    assert_eq!(child_tags(&tree, select), vec!["option", "optgroup"]);
}

#[test]
fn test_nested_select_closes_select() {
    let (tree, errors) = parse_document("<!DOCTYPE html><select><select>x");
    assert_eq!(tree.get_elements_by_tag_name("select").len(), 1);
    assert!(
        errors
            .iter()
            .any(|error| error.kind == ParseErrorKind::UnexpectedStartTag("select".into()))
    );
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[test]
fn test_template_in_head_holds_table_rows() {
    let tree = parse_document("<template><tr><td>x</td></tr></template>").0;
    let template = find_element(&tree, "template").unwrap();

    assert_eq!(tree.parent(template), tree.head());
    assert_eq!(child_tags(&tree, template), vec!["tr"]);
    let td = find_element(&tree, "td").unwrap();
    assert_eq!(tree.text_content(td), "x");
    assert!(tree.body().is_some());
}

#[test]
fn test_template_end_tag_without_template_is_ignored() {
    let (tree, errors) = parse_document("<!DOCTYPE html><body></template>x");
    assert_eq!(tree.text_content(body(&tree)), "x");
    assert!(!errors.is_empty());
}

// ---------------------------------------------------------------------------
// CDATA sections outside foreign content
// ---------------------------------------------------------------------------

fn single_cdata_child(tree: &DomTree, parent: NodeId) -> Option<String> {
    match tree.children(parent) {
        [only] => match tree.node_type(*only) {
            Some(NodeType::CData(data)) => Some(data.clone()),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn test_cdata_in_table_cell_is_a_cdata_node() {
    let tree = parse_document("<!DOCTYPE html><table><tr><td><![CDATA[x]]></td></tr></table>").0;
    let td = find_element(&tree, "td").unwrap();
    assert_eq!(single_cdata_child(&tree, td).as_deref(), Some("x"));
}

#[test]
fn test_cdata_in_caption_is_a_cdata_node() {
    let tree = parse_document("<!DOCTYPE html><table><caption><![CDATA[x]]></caption></table>").0;
    let caption = find_element(&tree, "caption").unwrap();
    assert_eq!(single_cdata_child(&tree, caption).as_deref(), Some("x"));
}

#[test]
fn test_cdata_in_template_is_a_cdata_node() {
    let tree = parse_document("<template><![CDATA[x]]></template>").0;
    let template = find_element(&tree, "template").unwrap();
    assert_eq!(single_cdata_child(&tree, template).as_deref(), Some("x"));

    let tree = parse_document("<template><div></div><![CDATA[y]]></template>").0;
    let template = find_element(&tree, "template").unwrap();
    let last = tree.last_child(template).unwrap();
    assert!(matches!(tree.node_type(last), Some(NodeType::CData(data)) if data == "y"));
}

#[test]
fn test_cdata_before_body_is_a_cdata_node_in_body() {
    let tree = parse_document("<!DOCTYPE html><head></head><![CDATA[x]]>").0;
    assert_eq!(single_cdata_child(&tree, body(&tree)).as_deref(), Some("x"));
}

#[test]
fn test_cdata_directly_in_table_is_foster_parented_text() {
    let tree = parse_document("<!DOCTYPE html><table><![CDATA[x]]><tr><td>y</td></tr></table>").0;
    let body = body(&tree);
    let first = tree.first_child(body).unwrap();
    assert_eq!(tree.as_text(first), Some("x"));
    assert_eq!(child_tags(&tree, body), vec!["table"]);
}

// ---------------------------------------------------------------------------
// Framesets
// ---------------------------------------------------------------------------

#[test]
fn test_frameset_replaces_body() {
    let (tree, errors) = parse_document(
        "<!DOCTYPE html><html><head></head><frameset><frame></frameset></html>",
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "frameset"]);
    let frameset = find_element(&tree, "frameset").unwrap();
    assert_eq!(child_tags(&tree, frameset), vec!["frame"]);
    assert!(tree.get_elements_by_tag_name("body").is_empty());
}

#[test]
fn test_comment_after_html_goes_to_document() {
    let tree = parse_document("<!DOCTYPE html><html><body></body></html><!-- tail -->").0;
    let last = *tree.children(NodeId::ROOT).last().unwrap();
    assert!(matches!(tree.node_type(last), Some(NodeType::Comment(data)) if data == " tail "));
}

#[test]
fn test_content_after_body_end_returns_to_body() {
    let (tree, errors) = parse_document("<!DOCTYPE html><body></body><p>late");
    assert_eq!(child_tags(&tree, body(&tree)), vec!["p"]);
    assert!(!errors.is_empty());
}

// ---------------------------------------------------------------------------
// Foreign content
//
// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
// ---------------------------------------------------------------------------

#[test]
fn test_svg_elements_are_in_svg_namespace() {
    let tree = parse_document("<!DOCTYPE html><svg><circle r=1></circle></svg>").0;
    let svg = find_element(&tree, "svg").unwrap();
    let circle = find_element(&tree, "circle").unwrap();
    assert_eq!(namespace_of(&tree, svg), Namespace::Svg);
    assert_eq!(namespace_of(&tree, circle), Namespace::Svg);
}

#[test]
fn test_svg_tag_and_attribute_case_is_adjusted() {
    let tree = parse_document(
        "<!DOCTYPE html><svg viewbox=\"0 0 10 10\"><text textlength=5></text><animatecolor/></svg>",
    )
    .0;
    let svg = find_element(&tree, "svg").unwrap();
    assert_eq!(
        tree.as_element(svg).unwrap().attrs.get("viewBox"),
        Some("0 0 10 10")
    );
    let text = find_element(&tree, "text").unwrap();
    assert_eq!(tree.as_element(text).unwrap().attrs.get("textLength"), Some("5"));
    assert!(find_element(&tree, "animateColor").is_some());
}

#[test]
fn test_svg_attributes_without_doctype() {
    let tree = parse_document("<svg width='150' viewbox='2'><rect textlength='2'/></svg>").0;
    let svg = tree.as_element(find_element(&tree, "svg").unwrap()).unwrap();
    assert_eq!(svg.attrs.get("width"), Some("150"));
    assert_eq!(svg.attrs.get("viewBox"), Some("2"));
    assert_eq!(svg.attrs.get("viewbox"), None);
    let rect = tree.as_element(find_element(&tree, "rect").unwrap()).unwrap();
    assert_eq!(rect.attrs.get("textLength"), Some("2"));
}

#[test]
fn test_xlink_attributes_are_namespaced() {
    let tree = parse_document("<!DOCTYPE html><svg><use xlink:href=\"#a\"/></svg>").0;
    let element = tree.as_element(find_element(&tree, "use").unwrap()).unwrap();
    let attribute = element.attrs.iter().next().unwrap();
    assert_eq!(attribute.namespace, Some(Namespace::XLink));
    assert_eq!(attribute.local_name, "href");
    assert_eq!(attribute.qualified_name(), "xlink:href");
}

#[test]
fn test_mathml_elements_are_in_mathml_namespace() {
    let tree = parse_document("<!DOCTYPE html><math><mi>x</mi></math>").0;
    let mi = find_element(&tree, "mi").unwrap();
    assert_eq!(namespace_of(&tree, mi), Namespace::MathMl);
    assert_eq!(tree.text_content(mi), "x");
}

#[test]
fn test_foreign_object_is_html_integration_point() {
    let tree =
        parse_document("<!DOCTYPE html><svg><foreignObject><p>x</p></foreignObject></svg>").0;
    let foreign_object = find_element(&tree, "foreignObject").unwrap();
    assert_eq!(namespace_of(&tree, foreign_object), Namespace::Svg);
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(namespace_of(&tree, p), Namespace::Html);
    assert_eq!(tree.parent(p), Some(foreign_object));
}

#[test]
fn test_html_start_tag_breaks_out_of_svg() {
    let tree = parse_document("<!DOCTYPE html><svg><g></g><p>x</p>").0;
    assert_eq!(child_tags(&tree, body(&tree)), vec!["svg", "p"]);
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(namespace_of(&tree, p), Namespace::Html);
}

#[test]
fn test_font_with_color_breaks_out_of_svg() {
    let tree = parse_document("<!DOCTYPE html><svg><font color=red>x</font></svg>").0;
    let font = find_element(&tree, "font").unwrap();
    assert_eq!(namespace_of(&tree, font), Namespace::Html);
    assert_eq!(tree.parent(font), Some(body(&tree)));
}

#[test]
fn test_cdata_in_svg() {
    let (tree, errors) = parse_document("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&tree, "svg").unwrap();
    let children = tree.children(svg);
    assert_eq!(children.len(), 1);
    assert!(matches!(tree.node_type(children[0]), Some(NodeType::CData(data)) if data == "a<b"));
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

// ---------------------------------------------------------------------------
// Fragments
//
// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
// ---------------------------------------------------------------------------

#[test]
fn test_fragment_root_is_document_fragment() {
    let (tree, _) = parse_fragment("<p>a</p><p>b</p>", "div");
    assert!(tree.is_fragment());
    assert_eq!(child_tags(&tree, tree.root()), vec!["p", "p"]);
    assert!(tree.document_element().is_some_and(|id| {
        tree.as_element(id).is_some_and(|element| element.tag_name == "p")
    }));
}

#[test]
fn test_fragment_in_row_context() {
    let (tree, _) = parse_fragment("<td>x</td>", "tr");
    assert_eq!(child_tags(&tree, tree.root()), vec!["td"]);
    assert_eq!(tree.text_content(tree.root()), "x");
}

#[test]
fn test_fragment_in_title_context_is_text() {
    let (tree, _) = parse_fragment("<b>x</b>", "title");
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("<b>x</b>"));
}

#[test]
fn test_fragment_in_textarea_context_decodes_references() {
    let (tree, _) = parse_fragment("a &lt; b", "TEXTAREA");
    assert_eq!(tree.text_content(tree.root()), "a < b");
}

#[test]
fn test_fragment_in_script_context_is_raw() {
    let (tree, _) = parse_fragment("a &lt; b", "script");
    assert_eq!(tree.text_content(tree.root()), "a &lt; b");
}

#[test]
fn test_fragment_in_svg_context() {
    let (tree, _) = parse_fragment("<rect/>", "svg");
    let rect = tree.children(tree.root())[0];
    assert_eq!(tree.as_element(rect).unwrap().tag_name, "rect");
    assert_eq!(namespace_of(&tree, rect), Namespace::Svg);
}

#[test]
fn test_fragment_with_scripting_options() {
    let parser = HTMLParser::new_fragment(
        "<noscript><b>x</b></noscript>",
        "div",
        ParserOptions::default().with_scripting(true),
    );
    let (tree, _) = parser.run();
    let noscript = find_element(&tree, "noscript").unwrap();
    assert!(child_tags(&tree, noscript).is_empty());
}

// ---------------------------------------------------------------------------
// Quirks mode
//
// [§ 13.2.6.4.1 "initial"](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
// ---------------------------------------------------------------------------

#[test]
fn test_missing_doctype_is_quirks() {
    let tree = parse_document("<p>x").0;
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    let tree = parse_document("<!doctype html><p>x").0;
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_html401_transitional_without_system_id_is_quirks() {
    let tree =
        parse_document("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\">").0;
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_html401_transitional_with_system_id_is_limited_quirks() {
    let tree = parse_document(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \
         \"http://www.w3.org/TR/html4/loose.dtd\">",
    )
    .0;
    assert_eq!(tree.quirks_mode(), QuirksMode::LimitedQuirks);
}

#[test]
fn test_xhtml_transitional_is_limited_quirks() {
    let tree = parse_document(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
         \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">",
    )
    .0;
    assert_eq!(tree.quirks_mode(), QuirksMode::LimitedQuirks);
    let doctype = tree.doctype().unwrap();
    assert_eq!(doctype.public_id, "-//W3C//DTD XHTML 1.0 Transitional//EN");
}

#[test]
fn test_table_closes_paragraph_only_outside_quirks_mode() {
    let standards = parse_document("<!DOCTYPE html><p><table></table>").0;
    assert_eq!(child_tags(&standards, body(&standards)), vec!["p", "table"]);

    let quirks = parse_document("<p><table></table>").0;
    let p = find_element(&quirks, "p").unwrap();
    assert_eq!(child_tags(&quirks, p), vec!["table"]);
}

#[test]
fn test_doctype_after_content_is_an_error() {
    let (tree, errors) = parse_document("<!DOCTYPE html><p><!DOCTYPE html>");
    assert_eq!(
        tree.children(NodeId::ROOT)
            .iter()
            .filter(|&&id| matches!(tree.node_type(id), Some(NodeType::Doctype(_))))
            .count(),
        1
    );
    assert!(errors.iter().any(|error| error.kind == ParseErrorKind::UnexpectedDoctype));
}
