//! The table insertion modes, [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
//! through [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell).

use super::core::{HTMLParser, InsertionMode};
use super::stack::Scope;
use crate::error::ParseErrorKind;
use crate::tokenizer::Token;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens. Let the original insertion mode be the current insertion
            // mode. Switch the insertion mode to "in table text" and reprocess
            // the token."
            Token::Character { .. }
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_character_tokens.clear();
                self.switch_to_with_original(InsertionMode::InTableText);
                self.reprocess_token(token);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment(token);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at
                // the end of the list of active formatting elements. Insert an
                // HTML element for the token, then switch the insertion mode to
                // "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.push_active_formatting_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                // "Clear the stack back to a table context. Insert an HTML
                // element for the token, then switch the insertion mode to "in
                // column group"."
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context. Insert an HTML
                // element for a "colgroup" start tag token with no attributes,
                // then switch the insertion mode to "in column group".
                // Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("colgroup");
                    self.switch_to(InsertionMode::InColumnGroup);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                // "thead""
                // "Clear the stack back to a table context. Insert an HTML
                // element for the token, then switch the insertion mode to "in
                // table body"."
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context. Insert an HTML
                // element for a "tbody" start tag token with no attributes,
                // then switch the insertion mode to "in table body". Reprocess
                // the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("tbody");
                    self.switch_to(InsertionMode::InTableBody);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is "table""
                // "Parse error. If the stack of open elements does not have a
                // table element in table scope, ignore the token. Otherwise: Pop
                // elements from this stack until a table element has been
                // popped from the stack. Reset the insertion mode
                // appropriately. Reprocess the token."
                "table" => {
                    self.unexpected(token);
                    if self.has_element_in_table_scope("table") {
                        self.pop_until_tag("table");
                        self.reset_insertion_mode_appropriately();
                        self.reprocess_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "style", "script",
                // "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "style" | "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                // "type", or if it does, but that attribute's value is not an
                // ASCII case-insensitive match for the string "hidden", then:
                // act as described in the "anything else" entry below.
                // Otherwise: Parse error. Insert an HTML element for the token.
                // Pop that input element off the stack of open elements.
                // Acknowledge the token's self-closing flag, if it is set."
                "input" if Self::is_hidden_input(token) => {
                    self.unexpected(token);
                    let _ = self.insert_html_element(token);
                    let _ = self.stack_of_open_elements.pop();
                }

                // "A start tag whose tag name is "form""
                // "Parse error. If there is a template element on the stack of
                // open elements, or if the form element pointer is not null,
                // ignore the token. Otherwise: Insert an HTML element for the
                // token, and set the form element pointer to point to the
                // element created. Pop that form element off the stack of open
                // elements."
                "form" => {
                    self.unexpected(token);
                    if self.stack_contains("template") || self.form_element_pointer.is_some() {
                        return;
                    }
                    let form = self.insert_html_element(token);
                    self.form_element_pointer = Some(form);
                    let _ = self.stack_of_open_elements.pop();
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                // "If the stack of open elements does not have a table element
                // in table scope, this is a parse error; ignore the token.
                // Otherwise: Pop elements from this stack until a table element
                // has been popped from the stack. Reset the insertion mode
                // appropriately."
                "table" => {
                    if !self.has_element_in_table_scope("table") {
                        self.unexpected(token);
                        return;
                    }
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => self.unexpected(token),

                // "An end tag whose tag name is "template""
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            _ => self.in_table_anything_else(token),
        }
    }

    /// "Anything else"
    ///
    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.unexpected(token);
        self.foster_parenting = true;
        self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.unexpected(token),

            // "Any other character token"
            // "Append the character token to the pending table character
            // tokens list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);

                // "If any of the tokens in the pending table character tokens
                //  list are character tokens that are not ASCII whitespace,
                //  then this is a parse error: reprocess the character tokens
                //  in the pending table character tokens list using the rules
                //  given in the "anything else" entry in the "in table"
                //  insertion mode."
                if pending.iter().any(|&c| !Self::is_whitespace(c)) {
                    for c in pending {
                        self.in_table_anything_else(&Token::Character { data: c });
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending
                    //  table character tokens list."
                    for c in pending {
                        self.insert_character(c);
                    }
                }

                // "Switch the insertion mode to the original insertion mode and
                //  reprocess the token."
                self.switch_to_original_insertion_mode();
                self.reprocess_token(token);
            }
        }
    }

    /// Steps shared by the "caption" end tag and the tags that implicitly
    /// close a caption. Returns `false` when there is no caption to close.
    fn close_caption(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a caption element in
        //  table scope, this is a parse error; ignore the token. (fragment
        //  case)"
        if !self.has_element_in_table_scope("caption") {
            self.unexpected(token);
            return false;
        }
        // "Otherwise: Generate implied end tags. Now, if the current node is
        //  not a caption element, then this is a parse error. Pop elements from
        //  this stack until a caption element has been popped from the stack.
        //  Clear the list of active formatting elements up to the last marker.
        //  Switch the insertion mode to "in table"."
        self.generate_implied_end_tags();
        if !self.current_node_is("caption") {
            self.parse_error(ParseErrorKind::UnclosedElements("caption".to_string()));
        }
        self.pop_until_tag("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "... Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if self.close_caption(token) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.unexpected(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment(token);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.unexpected(token);
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => self.unexpected(token),

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table". Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.unexpected(token);
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error. Clear the stack back to a table body context.
            // Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row".
            // Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.unexpected(token);
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element_named("tr");
                self.switch_to(InsertionMode::InRow);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the
            // token, this is a parse error; ignore the token. Otherwise: Clear
            // the stack back to a table body context. Pop the current node from
            // the stack of open elements. Switch the insertion mode to "in
            // table"."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_table_scope(name) {
                    self.unexpected(token);
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a tbody, thead, or
            // tfoot element in table scope, this is a parse error; ignore the
            // token. Otherwise: Clear the stack back to a table body context.
            // Pop the current node from the stack of open elements. Switch the
            // insertion mode to "in table". Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.leave_table_body(token);
            }
            Token::EndTag { name, .. } if name == "table" => self.leave_table_body(token),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.unexpected(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    fn leave_table_body(&mut self, token: &Token) {
        if !self.has_element_in_specific_scope(TABLE_SECTIONS, Scope::Table) {
            self.unexpected(token);
            return;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::InTable);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // cell". Insert a marker at the end of the list of active
            // formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InCell);
                self.push_active_formatting_marker();
            }

            // "An end tag whose tag name is "tr""
            // "If the stack of open elements does not have a tr element in
            // table scope, this is a parse error; ignore the token. Otherwise:
            // Clear the stack back to a table row context. Pop the current node
            // (which will be a tr element) from the stack of open elements.
            // Switch the insertion mode to "in table body"."
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_table_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "... Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_table_row(token) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_table_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the
            // token, this is a parse error; ignore the token. If the stack of
            // open elements does not have a tr element in table scope, ignore
            // the token. Otherwise: ... Reprocess the token."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_table_scope(name) {
                    self.unexpected(token);
                    return;
                }
                if self.close_table_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.unexpected(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// Close the current table row. Returns `false` when there is no `tr` in
    /// table scope.
    fn close_table_row(&mut self, token: &Token) -> bool {
        if !self.has_element_in_table_scope("tr") {
            self.unexpected(token);
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as that of the token, then this is a parse error; ignore the
                //  token."
                if !self.has_element_in_table_scope(name) {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise: Generate implied end tags. Now, if the current
                //  node is not an HTML element with the same tag name as the
                //  token, then this is a parse error. Pop elements from the
                //  stack of open elements until an HTML element with the same
                //  tag name as the token has been popped from the stack. Clear
                //  the list of active formatting elements up to the last
                //  marker. Switch the insertion mode to "in row"."
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::UnclosedElements(name.clone()));
                }
                self.pop_until_tag(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope. Close the cell (see below) and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if !self.has_element_in_specific_scope(&["td", "th"], Scope::Table) {
                    self.unexpected(token);
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html"
                ) =>
            {
                self.unexpected(token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token.
            // Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "table" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if !self.has_element_in_table_scope(name) {
                    self.unexpected(token);
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm:
    /// 1. Generate implied end tags.
    /// 2. If the current node is not now a td element or a th element, then
    ///    this is a parse error.
    /// 3. Pop elements from the stack of open elements stack until a td element
    ///    or a th element has been popped from the stack.
    /// 4. Clear the list of active formatting elements up to the last marker.
    /// 5. Switch the insertion mode to "in row"."
    pub(super) fn close_the_cell(&mut self) {
        self.generate_implied_end_tags();
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorKind::UnclosedElements("td".to_string()));
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_active_formatting_elements_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }
}
