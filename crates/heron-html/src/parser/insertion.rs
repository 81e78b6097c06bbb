//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use heron_dom::{Attributes, DomAttribute, ElementData, Namespace, NodeId, NodeType};

use super::core::{HTMLParser, InsertionMode};
use super::foreign_content::adjust_foreign_attribute;
use crate::tokenizer::{Token, TokenizerState};

/// An insertion location: the parent, and the child to insert before
/// (`None` means "after its last child").
pub(super) type InsertionLocation = (NodeId, Option<NodeId>);

impl HTMLParser {
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target, is the position in an element returned by
    /// running the following steps:"
    pub(super) fn appropriate_place_for_inserting_a_node(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        //          matching steps from the following list:"
        //
        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        //  thead, or tr element"
        if self.foster_parenting
            && self.is_html_element_in(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        //  its last child (if any)."
        //
        // STEP 3: A template's contents are kept as its ordinary children, so
        //         "inside the template element's template contents" is the
        //         same location.
        (target, None)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of the appropriate place for inserting a
    /// node.
    fn foster_parent_location(&self) -> InsertionLocation {
        // STEP 2.1: "Let last template be the last template element in the
        //            stack of open elements, if any."
        let last_template = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "template"));

        // STEP 2.2: "Let last table be the last table element in the stack of
        //            open elements, if any."
        let last_table = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_html_element(id, "table"));

        // STEP 2.3: "If there is a last template and either there is no last
        //            table, or there is one, but last template is lower
        //            (more recently added) than last table in the stack of open
        //            elements, then: let adjusted insertion location be inside
        //            last template's template contents, after its last child"
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            return (self.stack_of_open_elements[template_index], None);
        }

        // STEP 2.4: "If there is no last table, then let adjusted insertion
        //            location be inside the first element in the stack of open
        //            elements (the html element), after its last child"
        let Some(table_index) = last_table else {
            let first = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            return (first, None);
        };
        let table_id = self.stack_of_open_elements[table_index];

        // STEP 2.5: "If last table has a parent node, then let adjusted
        //            insertion location be inside last table's parent node,
        //            immediately before last table"
        if let Some(parent_id) = self.tree.parent(table_id) {
            return (parent_id, Some(table_id));
        }

        // STEP 2.6-2.7: "Let previous element be the element immediately above
        //                last table in the stack of open elements. Let adjusted
        //                insertion location be inside previous element, after
        //                its last child"
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);
        (previous, None)
    }

    /// Insert a detached node at an insertion location.
    pub(super) fn insert_at(&mut self, (parent_id, before_id): InsertionLocation, node: NodeId) {
        match before_id {
            Some(reference) => self.tree.insert_before(parent_id, node, reference),
            None => self.tree.append_child(parent_id, node),
        }
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "When the steps below require the user agent to create an element for a
    /// token in a particular given namespace and with a particular intended
    /// parent, the user agent must run the following steps:"
    ///
    /// Custom elements and form-associated element owners do not apply here:
    /// nothing is ever scripted.
    pub(super) fn create_element_for_token(
        &mut self,
        token: &Token,
        namespace: Namespace,
    ) -> NodeId {
        let (name, attributes) = match token {
            Token::StartTag {
                name, attributes, ..
            }
            | Token::EndTag {
                name, attributes, ..
            } => (name.as_str(), attributes.as_slice()),
            _ => ("", &[][..]),
        };

        // STEP 3: "Let local name be the tag name of the token."
        let mut element = ElementData::new(name, namespace);

        // STEP 9: "Append each attribute in the given token to element."
        //
        // Foreign elements get xlink:, xml: and xmlns attributes namespaced.
        element.attrs = attributes
            .iter()
            .map(|attr| {
                if namespace == Namespace::Html {
                    DomAttribute::new(attr.name.clone(), attr.value.clone())
                } else {
                    adjust_foreign_attribute(attr)
                }
            })
            .collect::<Attributes>();

        self.tree.alloc(NodeType::Element(element))
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "When the steps below require the user agent to insert a foreign element
    /// for a token in a given namespace and with a boolean onlyAddToElementStack"
    pub(super) fn insert_foreign_element(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let location = self.appropriate_place_for_inserting_a_node(None);

        // STEP 2: "Let element be the result of creating an element for the
        //          token in the given namespace"
        let element_id = self.create_element_for_token(token, namespace);

        // STEP 3: "If onlyAddToElementStack is false, then run insert an
        //          element at the adjusted insertion location with element."
        self.insert_at(location, element_id);

        // STEP 4: "Push element onto the stack of open elements so that it is
        //          the new current node."
        self.stack_of_open_elements.push(element_id);

        element_id
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// with the HTML namespace and false."
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        self.insert_foreign_element(token, Namespace::Html)
    }

    /// Insert an HTML element for a start tag synthesized by the parser
    /// ("insert an HTML element for a "body" start tag token with no
    /// attributes").
    pub(super) fn insert_html_element_named(&mut self, tag_name: &str) -> NodeId {
        self.insert_html_element(&Token::start_tag_named(tag_name))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "When the steps below require the user agent to insert a character
    /// while processing a token, the user agent must run the following steps..."
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let (parent_id, before_id) = self.appropriate_place_for_inserting_a_node(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        //          node, then ignore the token."
        if matches!(
            self.tree.node_type(parent_id),
            Some(NodeType::Document | NodeType::DocumentFragment)
        ) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data."
        let adjacent = match before_id {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent_id),
        };
        if let Some(text_id) = adjacent
            && let Some(node) = self.tree.get_mut(text_id)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data... and insert
        //  the newly created node at the adjusted insertion location."
        let text_id = self.tree.alloc(NodeType::Text(String::from(c)));
        self.insert_at((parent_id, before_id), text_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "When the steps below require the user agent to insert a comment
    /// while processing a comment token, optionally with an explicitly
    /// insertion position position..."
    ///
    /// Processing instructions take the same path.
    pub(super) fn insert_comment(&mut self, token: &Token) {
        // STEP 2: "If position was specified, then let the adjusted insertion
        //          location be position. Otherwise, let adjusted insertion
        //          location be the appropriate place for inserting a node."
        let location = self.appropriate_place_for_inserting_a_node(None);
        self.insert_comment_at(token, location);
    }

    /// "Insert a comment as the last child of" `parent`.
    pub(super) fn insert_comment_as_last_child_of(&mut self, token: &Token, parent: NodeId) {
        self.insert_comment_at(token, (parent, None));
    }

    fn insert_comment_at(&mut self, token: &Token, location: InsertionLocation) {
        // STEP 3: "Create a Comment node whose data attribute is set to data"
        let node_type = match token {
            Token::Comment { data } => NodeType::Comment(data.clone()),
            Token::ProcessingInstruction { target, data } => NodeType::ProcessingInstruction {
                target: target.clone(),
                data: data.clone(),
            },
            _ => return,
        };
        let node_id = self.tree.alloc(node_type);
        // STEP 4: "Insert the newly created node at the adjusted insertion
        //          location."
        self.insert_at(location, node_id);
    }

    /// Insert a CDATA section node at the appropriate place.
    pub(super) fn insert_cdata(&mut self, data: &str) {
        let location = self.appropriate_place_for_inserting_a_node(None);
        let node_id = self.tree.alloc(NodeType::CData(data.to_string()));
        self.insert_at(location, node_id);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "for each attribute on the token, check to see if the attribute is
    /// already present on the top element of the stack of open elements. If
    /// it is not, add the attribute and its corresponding value to that
    /// element."
    pub(super) fn merge_attributes(&mut self, element_id: NodeId, token: &Token) {
        let Token::StartTag { attributes, .. } = token else {
            return;
        };
        if let Some(element) = self.tree.as_element_mut(element_id) {
            for attr in attributes {
                let _ = element
                    .attrs
                    .insert(DomAttribute::new(attr.name.clone(), attr.value.clone()));
            }
        }
    }

    /// [§ 13.2.6.2 Generic raw text element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    /// and the generic RCDATA element parsing algorithm.
    ///
    /// "1. Insert an HTML element for the token. 2. If the algorithm that was
    /// invoked is the generic raw text element parsing algorithm, switch the
    /// tokenizer to the RAWTEXT state; otherwise the algorithm invoked was the
    /// generic RCDATA element parsing algorithm, switch the tokenizer to the
    /// RCDATA state. 3. Let the original insertion mode be the current
    /// insertion mode. 4. Then, switch the insertion mode to "text"."
    pub(super) fn parse_text_element(&mut self, token: &Token, state: TokenizerState) {
        let _ = self.insert_html_element(token);
        self.tokenizer.set_state(state);
        self.switch_to_with_original(InsertionMode::Text);
    }
}
