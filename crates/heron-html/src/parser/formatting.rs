//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//! and [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm).

use heron_dom::{Namespace, NodeId};

use super::core::{ActiveFormattingElement, HTMLParser};
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The following HTML elements are those that end up in the list of active
/// formatting elements: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, and u."
pub(super) fn is_formatting_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "a" | "b"
            | "big"
            | "code"
            | "em"
            | "font"
            | "i"
            | "nobr"
            | "s"
            | "small"
            | "strike"
            | "strong"
            | "tt"
            | "u"
    )
}

impl ActiveFormattingElement {
    /// The element's node, or `None` for a marker.
    const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }
}

impl HTMLParser {
    /// Position of `node_id` in the list of active formatting elements.
    pub(super) fn active_formatting_index(&self, node_id: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .position(|entry| entry.node_id() == Some(node_id))
    }

    /// Whether two elements have "the same tag name, namespace, and
    /// attributes". Attribute order does not matter.
    fn same_element_signature(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.tree.as_element(a), self.tree.as_element(b)) else {
            return false;
        };
        a.tag_name == b.tag_name
            && a.namespace == b.namespace
            && a.attrs.len() == b.attrs.len()
            && a.attrs.iter().all(|attr| {
                b.attrs.iter().any(|other| {
                    other.local_name == attr.local_name
                        && other.namespace == attr.namespace
                        && other.value == attr.value
                })
            })
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "When the steps below require the UA to push onto the list of active
    /// formatting elements an element element, the UA must perform the
    /// following steps:"
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        // STEP 1: "If there are already three elements in the list of active
        //          formatting elements after the last marker, if any, or
        //          anywhere in the list if there are no markers, that have the
        //          same tag name, namespace, and attributes as element, then
        //          remove the earliest such element from the list of active
        //          formatting elements."
        //
        // This is the Noah's Ark clause.
        let mut count = 0;
        let mut earliest = None;
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            let Some(entry_id) = entry.node_id() else {
                break;
            };
            if self.same_element_signature(entry_id, node_id) {
                count += 1;
                earliest = Some(index);
            }
        }
        if count >= 3
            && let Some(index) = earliest
        {
            let _ = self.active_formatting_elements.remove(index);
        }

        // STEP 2: "Add element to the list of active formatting elements."
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    /// Insert a marker at the end of the list of active formatting elements.
    pub(super) fn push_active_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// Whether an entry stops the rewind of the reconstruction algorithm: a
    /// marker, or an element that is still open.
    fn is_marker_or_open(&self, entry: &ActiveFormattingElement) -> bool {
        entry
            .node_id()
            .is_none_or(|id| self.stack_of_open_elements.contains(&id))
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps:"
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct"
        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there is
        //          nothing to reconstruct"
        match self.active_formatting_elements.last() {
            None => return,
            Some(last) if self.is_marker_or_open(last) => return,
            Some(_) => {}
        }

        // STEP 3-6: Rewind. "If there are no entries before entry in the list
        //           of active formatting elements, then jump to the step
        //           labeled create. Let entry be the entry one earlier than
        //           entry. If entry is neither a marker nor an element that is
        //           also in the stack of open elements, go to the step labeled
        //           rewind."
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 && !self.is_marker_or_open(&self.active_formatting_elements[index - 1]) {
            index -= 1;
        }

        // STEP 7-10: Advance and create.
        for entry_index in index..self.active_formatting_elements.len() {
            let ActiveFormattingElement::Element { token, .. } =
                &self.active_formatting_elements[entry_index]
            else {
                continue;
            };
            let token = token.clone();

            // STEP 8: "Create: Insert an HTML element for the token for which
            //          the element entry was created, to obtain new element."
            let new_element_id = self.insert_html_element(&token);

            // STEP 9: "Replace the entry for entry in the list with an entry
            //          for new element."
            self.active_formatting_elements[entry_index] = ActiveFormattingElement::Element {
                node_id: new_element_id,
                token,
            };
        }
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list.
    /// 2. Remove entry from the list.
    /// 3. If entry was a marker, stop. Otherwise, go to step 1."
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// The last element named `tag_name` after the last marker.
    pub(super) fn active_formatting_element_named(&self, tag_name: &str) -> Option<usize> {
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, .. } => {
                    if self.is_html_element(*node_id, tag_name) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "When the steps below require the UA to run the adoption agency
    /// algorithm for a token, the UA must perform the following steps:"
    pub(super) fn run_adoption_agency(&mut self, token: &Token) {
        // STEP 1: "Let subject be token's tag name."
        let Some(subject) = token.tag_name() else {
            return;
        };

        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && self.active_formatting_index(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return;
        }

        // STEP 3-6: "Let outer loop counter be 0. Outer loop: If outer loop
        //            counter is greater than or equal to 8, then return.
        //            Increment outer loop counter by 1."
        for _ in 0..8 {
            // STEP 7: "Let formatting element be the last element in the list
            //          of active formatting elements that is between the end of
            //          the list and the last marker in the list, if any, or the
            //          start of the list otherwise, and has the tag name
            //          subject."
            //
            // STEP 8: "If there is no such element, then return and instead act
            //          as described in the "any other end tag" entry above."
            let Some(formatting_index) = self.active_formatting_element_named(subject) else {
                self.any_other_end_tag(token);
                return;
            };
            let ActiveFormattingElement::Element {
                node_id: formatting_element,
                token: formatting_token,
            } = self.active_formatting_elements[formatting_index].clone()
            else {
                return;
            };

            // STEP 9: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the element
            //          from the list, and return."
            let Some(formatting_stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement(
                    subject.to_string(),
                ));
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };

            // STEP 10: "If formatting element is in the stack of open elements,
            //           but the element is not in scope, then this is a parse
            //           error; return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement(
                    subject.to_string(),
                ));
                return;
            }

            // STEP 11: "If formatting element is not the current node, this is
            //           a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ParseErrorKind::MisnestedFormattingElement(
                    subject.to_string(),
                ));
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than formatting
            //           element, and is an element in the special category."
            let furthest_block = self.stack_of_open_elements[formatting_stack_index + 1..]
                .iter()
                .copied()
                .find(|&id| self.is_special_element(id));

            // STEP 13: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element from
            //           the list of active formatting elements, and finally
            //           return."
            let Some(furthest_block) = furthest_block else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };

            // STEP 14: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .map(|index| self.stack_of_open_elements[index])
            else {
                return;
            };

            // STEP 15: "Let a bookmark note the position of formatting element
            //           in the list of active formatting elements relative to
            //           the elements on either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 16: "Let node and last node be furthest block."
            let mut node_stack_index = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
                .unwrap_or(formatting_stack_index + 1);
            let mut last_node = furthest_block;

            // STEP 17: "Let inner loop counter be 0."
            let mut inner_loop_counter = 0;

            // STEP 18: "Inner loop:"
            loop {
                // STEP 18.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in
                //             the stack of open elements, or if node is no
                //             longer in the stack of open elements (e.g. because
                //             it got removed by this algorithm), the element
                //             that was immediately above node in the stack of
                //             open elements before node was removed."
                node_stack_index -= 1;
                let node = self.stack_of_open_elements[node_stack_index];

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than 3 and node
                //             is in the list of active formatting elements, then
                //             remove node from the list of active formatting
                //             elements."
                if inner_loop_counter > 3
                    && let Some(index) = self.active_formatting_index(node)
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                }

                // STEP 18.5: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of open
                //             elements and continue."
                let Some(node_index) = self.active_formatting_index(node) else {
                    let _ = self.stack_of_open_elements.remove(node_stack_index);
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the
                //             element node was created, in the HTML namespace,
                //             with common ancestor as the intended parent;
                //             replace the entry for node in the list of active
                //             formatting elements with an entry for the new
                //             element, replace the entry for node in the stack
                //             of open elements with an entry for the new
                //             element, and let node be the new element."
                let ActiveFormattingElement::Element {
                    token: node_token, ..
                } = self.active_formatting_elements[node_index].clone()
                else {
                    break;
                };
                let new_element = self.create_element_for_token(&node_token, Namespace::Html);
                self.active_formatting_elements[node_index] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    token: node_token,
                };
                self.stack_of_open_elements[node_stack_index] = new_element;

                // STEP 18.7: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after
                //             the new node in the list of active formatting
                //             elements."
                if last_node == furthest_block {
                    bookmark = node_index + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.tree.append_child(new_element, last_node);

                // STEP 18.9: "Set last node to node."
                last_node = new_element;
            }

            // STEP 19: "Insert whatever last node ended up being in the previous
            //           step at the appropriate place for inserting a node, but
            //           using common ancestor as the override target."
            let location = self.appropriate_place_for_inserting_a_node(Some(common_ancestor));
            self.insert_at(location, last_node);

            // STEP 20: "Create an element for the token for which formatting
            //           element was created, in the HTML namespace, with
            //           furthest block as the intended parent."
            let new_element = self.create_element_for_token(&formatting_token, Namespace::Html);

            // STEP 21: "Take all of the child nodes of furthest block and append
            //           them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 22: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 23: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into the
            //           list of active formatting elements at the position of
            //           the aforementioned bookmark."
            if let Some(index) = self.active_formatting_index(formatting_element) {
                let _ = self.active_formatting_elements.remove(index);
                if bookmark > index {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token: formatting_token,
                },
            );

            // STEP 24: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack of
            //           open elements immediately below the position of furthest
            //           block in that stack."
            self.remove_from_stack(formatting_element);
            if let Some(position) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
            {
                self.stack_of_open_elements.insert(position + 1, new_element);
            }

            // STEP 25: "Jump back to the step labeled outer loop."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_formatting_element;

    #[test]
    fn formatting_elements_are_recognized() {
        for tag in ["a", "b", "nobr", "tt", "u"] {
            assert!(is_formatting_element(tag), "{tag}");
        }
        for tag in ["div", "span", "p", "em-x"] {
            assert!(!is_formatting_element(tag), "{tag}");
        }
    }
}
