//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use heron_dom::{Namespace, NodeId};

use super::core::{HTMLParser, InsertionMode};
use crate::error::ParseErrorKind;

/// The element types that bound a scope check.
///
/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": the default list plus ol, ul.
    ListItem,
    /// "has an element in button scope": the default list plus button.
    Button,
    /// "has an element in table scope": html, table, template.
    Table,
    /// "has an element in select scope": everything except optgroup, option.
    Select,
}

/// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
const THOROUGH_IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl HTMLParser {
    /// Whether the element `id` ends the search of a scope check.
    fn is_scope_boundary(&self, id: NodeId, scope: Scope) -> bool {
        let Some(element) = self.tree.as_element(id) else {
            return false;
        };
        let tag = element.tag_name.as_str();
        let html = element.namespace == Namespace::Html;
        match scope {
            Scope::Select => !(html && matches!(tag, "optgroup" | "option")),
            Scope::Table => html && matches!(tag, "html" | "table" | "template"),
            Scope::Default | Scope::ListItem | Scope::Button => {
                let default = match element.namespace {
                    Namespace::Html => matches!(
                        tag,
                        "applet"
                            | "caption"
                            | "html"
                            | "table"
                            | "td"
                            | "th"
                            | "marquee"
                            | "object"
                            | "template"
                    ),
                    Namespace::MathMl => {
                        matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
                    }
                    Namespace::Svg => matches!(tag, "foreignObject" | "desc" | "title"),
                    _ => false,
                };
                default
                    || (scope == Scope::ListItem && html && matches!(tag, "ol" | "ul"))
                    || (scope == Scope::Button && html && tag == "button")
            }
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have an element target node in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node
    ///          of the stack)."
    ///
    /// STEP 2: "If node is the target node, terminate in a match state."
    ///
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    ///
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    pub(super) fn has_element_in_specific_scope(&self, tag_names: &[&str], scope: Scope) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if self.is_html_element_in(node_id, tag_names) {
                return true;
            }
            if self.is_scope_boundary(node_id, scope) {
                return false;
            }
        }
        false
    }

    /// "has an element in scope" for one particular node.
    pub(super) fn has_node_in_scope(&self, target: NodeId) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if node_id == target {
                return true;
            }
            if self.is_scope_boundary(node_id, Scope::Default) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    pub(super) fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], Scope::Default)
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    pub(super) fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], Scope::Button)
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    pub(super) fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], Scope::ListItem)
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    pub(super) fn has_element_in_table_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], Scope::Table)
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope)
    pub(super) fn has_element_in_select_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(&[tag_name], Scope::Select)
    }

    /// Pop elements from the stack of open elements until an HTML element
    /// with the given tag name has been popped.
    pub(super) fn pop_until_tag(&mut self, tag_name: &str) {
        self.pop_until_one_of(&[tag_name]);
    }

    /// Pop elements until an HTML element named one of `tag_names` has been
    /// popped.
    ///
    /// Used for heading elements: "pop elements from the stack of open elements
    /// until an h1, h2, h3, h4, h5, or h6 element has been popped from the
    /// stack."
    pub(super) fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element_in(id, tag_names) {
                break;
            }
        }
    }

    /// Pop elements until `target` has been popped.
    pub(super) fn pop_until_node(&mut self, target: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == target {
                break;
            }
        }
    }

    /// Remove a node from the stack of open elements wherever it is.
    pub(super) fn remove_from_stack(&mut self, target: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != target);
    }

    /// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "When the steps below require the user agent to generate implied end tags,
    /// then, while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an rp
    /// element, an rt element, or an rtc element, the user agent must pop the
    /// current node off the stack of open elements."
    pub(super) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// "If a step requires the user agent to generate implied end tags but lists
    /// an element to exclude from the process, then the user agent must perform
    /// the above steps as if that element was not in the above list."
    pub(super) fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        while let Some(current) = self.current_node() {
            match self.tag_name(current) {
                Some(tag)
                    if self.is_html_element_in(current, IMPLIED_END_TAG_ELEMENTS)
                        && exclude != Some(tag) =>
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                _ => break,
            }
        }
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    ///
    /// "When the steps below require the user agent to generate all implied end
    /// tags thoroughly, then, while the current node is a caption element, a
    /// colgroup element, ... or a tr element, the user agent must pop the
    /// current node off the stack of open elements."
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(THOROUGH_IMPLIED_END_TAG_ELEMENTS) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(super) fn close_a_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseErrorKind::UnclosedElements("p".to_string()));
        }
        self.pop_until_tag("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_a_p_element();
        }
    }

    /// Pop while the current node is not one of `tag_names`.
    fn clear_stack_back_to(&mut self, tag_names: &[&str]) {
        while let Some(current) = self.current_node() {
            if self.is_html_element_in(current, tag_names) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.9 Clear the stack back to a table context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13 Clear the stack back to a table body context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "while the current node is not a tbody, tfoot, thead, template, or html
    /// element, pop elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14 Clear the stack back to a table row context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "while the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "When the steps below require the UA to reset the insertion mode
    /// appropriately, the UA must follow these steps:"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_to(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        let mut last = false;

        // STEP 2: "Let node be the last node in the stack of open elements."
        let mut index = self.stack_of_open_elements.len();
        while index > 0 {
            index -= 1;
            let mut node = self.stack_of_open_elements[index];

            // STEP 3: "Loop: If node is the first node in the stack of open
            //          elements, then set last to true, and, if the parser was
            //          created as part of the HTML fragment parsing algorithm
            //          (fragment case), set node to the context element passed
            //          to that algorithm."
            if index == 0 {
                last = true;
                if let Some(context) = self.context_element {
                    node = context;
                }
            }

            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match element.tag_name.as_str() {
                // STEP 4: "If node is a select element, run these substeps:"
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    if !last {
                        // "Let ancestor be node. Loop: If ancestor is the first
                        //  node in the stack of open elements, jump to done. Let
                        //  ancestor be the node before ancestor. If ancestor is
                        //  a template node, jump to done. If ancestor is a table
                        //  node, switch to "in select in table" and return."
                        for &ancestor in self.stack_of_open_elements[..index].iter().rev() {
                            if self.is_html_element(ancestor, "template") {
                                break;
                            }
                            if self.is_html_element(ancestor, "table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    // "Done: Switch the insertion mode to "in select" and return."
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false"
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6
                "tr" => return InsertionMode::InRow,
                // STEP 7
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                // STEP 8
                "caption" => return InsertionMode::InCaption,
                // STEP 9
                "colgroup" => return InsertionMode::InColumnGroup,
                // STEP 10
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                //           insertion mode to the current template insertion
                //           mode and return."
                "template" => {
                    return self
                        .current_template_insertion_mode()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12
                "head" if !last => return InsertionMode::InHead,
                // STEP 13
                "body" => return InsertionMode::InBody,
                // STEP 14
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps: If
                //           the head element pointer is null, switch the
                //           insertion mode to "before head" and return.
                //           Otherwise, switch to "after head" and return."
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }

            // STEP 16: "If last is true, then switch the insertion mode to
            //           "in body" and return. (fragment case)"
            if last {
                return InsertionMode::InBody;
            }
            // STEP 17: "Let node now be the node before node in the stack of
            //           open elements. Return to the step labeled loop."
        }
        InsertionMode::InBody
    }

    /// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules"
    pub(super) fn is_special_element(&self, id: NodeId) -> bool {
        let Some(element) = self.tree.as_element(id) else {
            return false;
        };
        let tag = element.tag_name.as_str();
        match element.namespace {
            Namespace::Html => matches!(
                tag,
                "address"
                    | "applet"
                    | "area"
                    | "article"
                    | "aside"
                    | "base"
                    | "basefont"
                    | "bgsound"
                    | "blockquote"
                    | "body"
                    | "br"
                    | "button"
                    | "caption"
                    | "center"
                    | "col"
                    | "colgroup"
                    | "dd"
                    | "details"
                    | "dir"
                    | "div"
                    | "dl"
                    | "dt"
                    | "embed"
                    | "fieldset"
                    | "figcaption"
                    | "figure"
                    | "footer"
                    | "form"
                    | "frame"
                    | "frameset"
                    | "h1"
                    | "h2"
                    | "h3"
                    | "h4"
                    | "h5"
                    | "h6"
                    | "head"
                    | "header"
                    | "hgroup"
                    | "hr"
                    | "html"
                    | "iframe"
                    | "img"
                    | "input"
                    | "keygen"
                    | "li"
                    | "link"
                    | "listing"
                    | "main"
                    | "marquee"
                    | "menu"
                    | "meta"
                    | "nav"
                    | "noembed"
                    | "noframes"
                    | "noscript"
                    | "object"
                    | "ol"
                    | "p"
                    | "param"
                    | "plaintext"
                    | "pre"
                    | "script"
                    | "search"
                    | "section"
                    | "select"
                    | "source"
                    | "style"
                    | "summary"
                    | "table"
                    | "tbody"
                    | "td"
                    | "template"
                    | "textarea"
                    | "tfoot"
                    | "th"
                    | "thead"
                    | "title"
                    | "tr"
                    | "track"
                    | "ul"
                    | "wbr"
                    | "xmp"
            ),
            Namespace::MathMl => {
                matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
            }
            Namespace::Svg => matches!(tag, "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }
}
