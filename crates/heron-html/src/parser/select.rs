//! [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect),
//! "in select in table" and "in template".

use super::core::{HTMLParser, InsertionMode};
use crate::tokenizer::Token;

const TABLE_TAGS_IN_SELECT: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.unexpected(token),

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment(token);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from
                // the stack of open elements. Insert an HTML element for the
                // token."
                "option" => {
                    self.pop_if_current_is("option");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node from
                // the stack of open elements. If the current node is an
                // optgroup element, pop that node from the stack of open
                // elements. Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                // "... Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements. Acknowledge the
                // token's self-closing flag, if it is set."
                "hr" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token);
                    let _ = self.stack_of_open_elements.pop();
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: Pop elements from the stack of open elements
                // until a select element has been popped from the stack. Reset
                // the insertion mode appropriately."
                "select" => {
                    self.unexpected(token);
                    if self.has_element_in_select_scope("select") {
                        self.close_select();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea""
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: ... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.unexpected(token);
                    if self.has_element_in_select_scope("select") {
                        self.close_select();
                        self.reprocess_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.unexpected(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    //  node immediately before it in the stack of open elements
                    //  is an optgroup element, then pop the current node from
                    //  the stack of open elements."
                    let len = self.stack_of_open_elements.len();
                    if len >= 2
                        && self.current_node_is("option")
                        && self.is_html_element(self.stack_of_open_elements[len - 2], "optgroup")
                    {
                        let _ = self.stack_of_open_elements.pop();
                    }
                    // "If the current node is an optgroup element, then pop that
                    //  node from the stack of open elements. Otherwise, this is
                    //  a parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.unexpected(token);
                    }
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node
                // from the stack of open elements. Otherwise, this is a parse
                // error; ignore the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.unexpected(token);
                    }
                }

                // "An end tag whose tag name is "select""
                // "If the stack of open elements does not have a select element
                // in select scope, this is a parse error; ignore the token.
                // (fragment case) Otherwise: Pop elements from the stack of open
                // elements until a select element has been popped from the
                // stack. Reset the insertion mode appropriately."
                "select" => {
                    if self.has_element_in_select_scope("select") {
                        self.close_select();
                    } else {
                        self.unexpected(token);
                    }
                }

                // "An end tag whose tag name is "template""
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.unexpected(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // CDATA is read as characters before it gets here.
            Token::Cdata { .. } => {}
        }
    }

    fn pop_if_current_is(&mut self, tag_name: &str) {
        if self.current_node_is(tag_name) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// "Pop elements from the stack of open elements until a select element
    /// has been popped from the stack. Reset the insertion mode
    /// appropriately."
    fn close_select(&mut self) {
        self.pop_until_tag("select");
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            // a select element has been popped from the stack. Reset the
            // insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS_IN_SELECT.contains(&name.as_str()) => {
                self.unexpected(token);
                self.close_select();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same tag
            // name as that of the token, then ignore the token. Otherwise: ...
            // Reprocess the token."
            Token::EndTag { name, .. } if TABLE_TAGS_IN_SELECT.contains(&name.as_str()) => {
                self.unexpected(token);
                if self.has_element_in_table_scope(name) {
                    self.close_select();
                    self.reprocess_token(token);
                }
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion
            // mode."
            _ => self.process_using_rules_for(InsertionMode::InSelect, token),
        }
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(super) fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Character { .. }
            | Token::Cdata { .. }
            | Token::Comment { .. }
            | Token::ProcessingInstruction { .. }
            | Token::Doctype { .. } => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is one of: "caption", "colgroup",
                // "tbody", "tfoot", "thead""
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.switch_template_mode(InsertionMode::InTable, token);
                }

                // "A start tag whose tag name is "col""
                "col" => self.switch_template_mode(InsertionMode::InColumnGroup, token),

                // "A start tag whose tag name is "tr""
                "tr" => self.switch_template_mode(InsertionMode::InTableBody, token),

                // "A start tag whose tag name is one of: "td", "th""
                "td" | "th" => self.switch_template_mode(InsertionMode::InRow, token),

                // "Any other start tag"
                _ => self.switch_template_mode(InsertionMode::InBody, token),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.unexpected(token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                //  elements, then stop parsing. (fragment case)"
                if !self.stack_contains("template") {
                    self.stop_parsing();
                    return;
                }
                // "Otherwise, this is a parse error."
                self.unexpected(token);
                // "Pop elements from the stack of open elements until a template
                //  element has been popped from the stack. Clear the list of
                //  active formatting elements up to the last marker. Pop the
                //  current template insertion mode off the stack of template
                //  insertion modes. Reset the insertion mode appropriately.
                //  Reprocess the token."
                self.pop_until_tag("template");
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes. Push `mode` onto the stack of template insertion modes
    /// so that it is the new current template insertion mode. Switch the
    /// insertion mode to `mode`, and reprocess the token."
    fn switch_template_mode(&mut self, mode: InsertionMode, token: &Token) {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.switch_to(mode);
        self.reprocess_token(token);
    }
}
