//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use heron_dom::{Namespace, QuirksMode};

use super::core::{ActiveFormattingElement, HTMLParser, InsertionMode};
use super::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes};
use super::formatting::is_formatting_element;
use super::stack::Scope;
use crate::error::ParseErrorKind;
use crate::tokenizer::{Token, TokenizerState};

/// Start tags that close a `p` element in button scope and then insert
/// themselves.
const BLOCK_START_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

/// End tags that generate implied end tags and pop up to the matching
/// element.
const BLOCK_END_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that may legitimately still be open at the end of the body.
const ALLOWED_OPEN_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.unexpected(token),

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            // A CDATA section in body content is kept as a CDATA node.
            Token::Cdata { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_cdata(data);
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment(token);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            Token::StartTag { name, .. } => self.in_body_start_tag(name, token),

            Token::EndTag { name, .. } => self.in_body_end_tag(name, token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                //  process the token using the rules for the "in template"
                //  insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.process_using_rules_for(InsertionMode::InTemplate, token);
                    return;
                }

                // "Otherwise, follow these steps: If there is a node in the
                //  stack of open elements that is not either a dd element, a
                //  dt element, ... the body element, or the html element, then
                //  this is a parse error."
                if self.has_unexpected_open_elements() {
                    self.unexpected(token);
                }

                // "Stop parsing."
                self.stop_parsing();
            }
        }
    }

    /// Whether the stack holds something other than the elements that may
    /// be left open at the end of the body.
    pub(super) fn has_unexpected_open_elements(&self) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| !self.is_html_element_in(id, ALLOWED_OPEN_AT_END))
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.unexpected(token);
                // "If there is a template element on the stack of open
                //  elements, then ignore the token."
                // "Otherwise, for each attribute on the token, check to see if
                //  the attribute is already present on the top element of the
                //  stack of open elements. If it is not, add the attribute and
                //  its corresponding value to that element."
                if !self.stack_contains("template")
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_attributes(html, token);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.unexpected(token);
                // "If the stack of open elements has only one node on it, if
                //  the second element on the stack of open elements is not a
                //  body element, or if there is a template element on the
                //  stack of open elements, then ignore the token. (fragment
                //  case or there is a template element on the stack)"
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") || self.stack_contains("template") {
                    return;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                //  each attribute on the token, check to see if the attribute
                //  is already present on the body element (the second element)
                //  on the stack of open elements, and if it is not, add the
                //  attribute and its corresponding value to that element."
                self.frameset_ok = false;
                self.merge_attributes(body, token);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.unexpected(token);
                // "If the stack of open elements has only one node on it, or if
                //  the second element on the stack of open elements is not a
                //  body element, then ignore the token."
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") {
                    return;
                }
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return;
                }
                // "Otherwise, run the following steps:
                //  1. Remove the second element on the stack of open elements
                //     from its parent node, if it has one.
                //  2. Pop all the nodes from the bottom of the stack of open
                //     elements, from the current node up to, but not including,
                //     the root html element.
                //  3. Insert an HTML element for the token.
                //  4. Switch the insertion mode to "in frameset"."
                self.tree.detach(body);
                self.stack_of_open_elements.truncate(1);
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", ... "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element. Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                //  of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                //  parse error; pop the current node off the stack of open
                //  elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.unexpected(token);
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element. Insert an HTML element for the token. If
            // the next token is a U+000A LINE FEED (LF) character token, then
            // ignore that token and move on to the next one. (Newlines at the
            // start of pre blocks are ignored as an authoring convenience.)
            // Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                //  template element on the stack of open elements, then this is
                //  a parse error; ignore the token."
                let no_template = !self.stack_contains("template");
                if self.form_element_pointer.is_some() && no_template {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                //  button scope, then close a p element. Insert an HTML element
                //  for the token, and, if there is no template element on the
                //  stack of open elements, set the form element pointer to
                //  point to the element created."
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(token);
                if no_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            // "A start tag whose tag name is one of: "dd", "dt""
            "li" | "dd" | "dt" => self.in_body_list_item_start_tag(name, token),

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element. Insert an HTML element for the token.
            // Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.tokenizer.set_state(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "1. If the stack of open elements has a button element in
                //     scope, then run these substeps: Parse error. Generate
                //     implied end tags. Pop elements from the stack of open
                //     elements until a button element has been popped from the
                //     stack."
                if self.has_element_in_scope("button") {
                    self.unexpected(token);
                    self.generate_implied_end_tags();
                    self.pop_until_tag("button");
                }
                // "2. Reconstruct the active formatting elements, if any.
                //  3. Insert an HTML element for the token.
                //  4. Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                //  element between the end of the list and the last marker on
                //  the list (or the start of the list if there is no marker on
                //  the list), then this is a parse error; run the adoption
                //  agency algorithm for the token, then remove that element
                //  from the list of active formatting elements and the stack of
                //  open elements if the adoption agency algorithm didn't
                //  already remove it (it might not have if the element is not
                //  in table scope)."
                if let Some(index) = self.active_formatting_element_named("a")
                    && let ActiveFormattingElement::Element { node_id, .. } =
                        self.active_formatting_elements[index]
                {
                    self.unexpected(token);
                    self.run_adoption_agency(token);
                    if let Some(index) = self.active_formatting_index(node_id) {
                        let _ = self.active_formatting_elements.remove(index);
                    }
                    self.remove_from_stack(node_id);
                }
                // "Reconstruct the active formatting elements, if any. Insert
                //  an HTML element for the token. Push onto the list of active
                //  formatting elements that element."
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any. If the
                //  stack of open elements has a nobr element in scope, then
                //  this is a parse error; run the adoption agency algorithm for
                //  the token, then once again reconstruct the active formatting
                //  elements, if any."
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr") {
                    self.unexpected(token);
                    self.run_adoption_agency(token);
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            _ if is_formatting_element(name) => self.insert_formatting_element(token),

            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object""
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Insert a marker at the end of the list
            // of active formatting elements. Set the frameset-ok flag to "not
            // ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.push_active_formatting_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p element.
            // Insert an HTML element for the token. Set the frameset-ok flag to
            // "not ok". Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Immediately pop the current node off
            // the stack of open elements. Acknowledge the token's self-closing
            // flag, if it is set. Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            // "... If the token does not have an attribute with the name
            // "type", or if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: set the
            // frameset-ok flag to "not ok"."
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                if !Self::is_hidden_input(token) {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements. Acknowledge the token's
            // self-closing flag, if it is set."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.unexpected(token);
                let mut renamed = token.clone();
                if let Token::StartTag { name, .. } = &mut renamed {
                    *name = "img".to_string();
                }
                self.reprocess_token(&renamed);
            }

            // "A start tag whose tag name is "textarea""
            // "1. Insert an HTML element for the token.
            //  2. If the next token is a U+000A LINE FEED (LF) character token,
            //     then ignore that token and move on to the next one.
            //  3. Switch the tokenizer to the RCDATA state.
            //  4. Let the original insertion mode be the current insertion mode.
            //  5. Set the frameset-ok flag to "not ok".
            //  6. Switch the insertion mode to "text"."
            "textarea" => {
                self.parse_text_element(token, TokenizerState::RCDATA);
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(token, TokenizerState::RAWTEXT),
            "noscript" if self.options.scripting => {
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption",
                //  "in table body", "in row", or "in cell", then switch the
                //  insertion mode to "in select in table". Otherwise, switch
                //  the insertion mode to "in select"."
                let mode = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                self.switch_to(mode);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements. Reconstruct the active
            // formatting elements, if any. Insert an HTML element for the
            // token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error. Insert an HTML element for the
            // token."
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags();
                    if !self.current_node_is("ruby") {
                        self.unexpected(token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the
            // current node is not now a rtc element or a ruby element, this is
            // a parse error. Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.unexpected(token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            "math" | "svg" => self.insert_foreign_root(token),

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.unexpected(token),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    /// "A start tag whose tag name is "li"" / "one of: "dd", "dt""
    fn in_body_list_item_start_tag(&mut self, name: &str, token: &Token) {
        let closes: &[&str] = if name == "li" { &["li"] } else { &["dd", "dt"] };

        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // STEP 2-5: "Initialize node to be the current node. Loop: If node is
        //            an li element, then run these substeps: Generate implied
        //            end tags, except for li elements. If the current node is
        //            not an li element, then this is a parse error. Pop
        //            elements from the stack of open elements until an li
        //            element has been popped from the stack. Jump to the step
        //            labeled done below. If node is in the special category,
        //            but is not an address, div, or p element, then jump to the
        //            step labeled done below. Otherwise, set node to the
        //            previous entry in the stack of open elements and return to
        //            the step labeled loop."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            if self.is_html_element_in(node, closes) {
                let Some(tag) = self.tag_name(node).map(str::to_string) else {
                    break;
                };
                self.generate_implied_end_tags_excluding(Some(&tag));
                if !self.current_node_is(&tag) {
                    self.parse_error(ParseErrorKind::UnclosedElements(tag.clone()));
                }
                self.pop_until_tag(&tag);
                break;
            }
            if self.is_special_element(node)
                && !self.is_html_element_in(node, &["address", "div", "p"])
            {
                break;
            }
        }

        // STEP 6: "Done: If the stack of open elements has a p element in
        //          button scope, then close a p element."
        self.close_p_element_in_button_scope();

        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(token);
    }

    /// Reconstruct, insert a formatting element and push it onto the list of
    /// active formatting elements.
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.push_active_formatting_element(element, token);
    }

    /// "A start tag whose tag name is "math"" and "... "svg""
    ///
    /// "Reconstruct the active formatting elements, if any. Adjust MathML
    /// attributes for the token. (This fixes the case of MathML attributes
    /// that are not all lowercase.) Adjust foreign attributes for the token.
    /// (This fixes the use of namespaced attributes, in particular XLink.)
    /// Insert a foreign element for the token, with MathML namespace and
    /// false. If the token has its self-closing flag set, pop the current node
    /// off the stack of open elements and acknowledge the token's self-closing
    /// flag."
    fn insert_foreign_root(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let mut adjusted = token.clone();
        let Token::StartTag {
            name,
            attributes,
            self_closing,
        } = &mut adjusted
        else {
            return;
        };
        let namespace = if name == "math" {
            adjust_mathml_attributes(attributes);
            Namespace::MathMl
        } else {
            adjust_svg_attributes(attributes);
            Namespace::Svg
        };
        let self_closing = *self_closing;
        let _ = self.insert_foreign_element(&adjusted, namespace);
        if self_closing {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Whether an `input` start tag has `type="hidden"`.
    pub(super) fn is_hidden_input(token: &Token) -> bool {
        token
            .attribute("type")
            .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_end_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            "template" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            // "An end tag whose tag name is "html""
            "body" | "html" => {
                // "If the stack of open elements does not have a body element
                //  in scope, this is a parse error; ignore the token."
                if !self.has_element_in_scope("body") {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise, if there is a node in the stack of open elements
                //  that is not either a dd element, ... or the html element,
                //  then this is a parse error."
                if self.has_unexpected_open_elements() {
                    self.parse_error(ParseErrorKind::UnclosedElements(name.to_string()));
                }
                // "Switch the insertion mode to "after body"."
                self.switch_to(InsertionMode::AfterBody);
                // For "html": "Reprocess the token."
                if name == "html" {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", ... "summary", "ul""
            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element with the same tag name as that
                //  of the token, then this is a parse error; ignore the token."
                if !self.has_element_in_scope(name) {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags. If
                //  the current node is not an HTML element with the same tag
                //  name as that of the token, then this is a parse error. Pop
                //  elements from the stack of open elements until an HTML
                //  element with the same tag name as the token has been popped
                //  from the stack."
                self.close_element_in_scope(name);
            }

            // "An end tag whose tag name is "form""
            "form" => self.in_body_form_end_tag(token),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in
            // button scope, then this is a parse error; insert an HTML element
            // for a "p" start tag token with no attributes. Close a p element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.unexpected(token);
                    let _ = self.insert_html_element_named("p");
                }
                self.close_a_p_element();
            }

            // "An end tag whose tag name is "li""
            "li" => {
                // "If the stack of open elements does not have an li element in
                //  list item scope, then this is a parse error; ignore the
                //  token."
                if !self.has_element_in_list_item_scope("li") {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags,
                //  except for li elements. If the current node is not an li
                //  element, then this is a parse error. Pop elements from the
                //  stack of open elements until an li element has been popped
                //  from the stack."
                self.generate_implied_end_tags_excluding(Some("li"));
                if !self.current_node_is("li") {
                    self.parse_error(ParseErrorKind::UnclosedElements("li".to_string()));
                }
                self.pop_until_tag("li");
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.has_element_in_scope(name) {
                    self.unexpected(token);
                    return;
                }
                self.generate_implied_end_tags_excluding(Some(name));
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::UnclosedElements(name.to_string()));
                }
                self.pop_until_tag(name);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element and whose tag name is one of
                //  "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                //  error; ignore the token."
                if !self.has_element_in_specific_scope(HEADINGS, Scope::Default) {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags. If
                //  the current node is not an HTML element with the same tag
                //  name as that of the token, then this is a parse error. Pop
                //  elements from the stack of open elements until an HTML
                //  element whose tag name is one of "h1", "h2", "h3", "h4",
                //  "h5", or "h6" has been popped from the stack."
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::UnclosedElements(name.to_string()));
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if is_formatting_element(name) => self.run_adoption_agency(token),

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            "applet" | "marquee" | "object" => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element with the same tag name as that
                //  of the token, then this is a parse error; ignore the token."
                if !self.has_element_in_scope(name) {
                    self.unexpected(token);
                    return;
                }
                // "Otherwise, run these steps: Generate implied end tags. If
                //  the current node is not an HTML element with the same tag
                //  name as that of the token, then this is a parse error. Pop
                //  elements from the stack of open elements until an HTML
                //  element with the same tag name as the token has been popped
                //  from the stack. Clear the list of active formatting elements
                //  up to the last marker."
                self.close_element_in_scope(name);
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            "br" => {
                self.unexpected(token);
                self.in_body_start_tag("br", &Token::start_tag_named("br"));
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(token),
        }
    }

    /// Generate implied end tags, report a parse error if the current node is
    /// not `name`, then pop until `name` has been popped.
    fn close_element_in_scope(&mut self, name: &str) {
        self.generate_implied_end_tags();
        if !self.current_node_is(name) {
            self.parse_error(ParseErrorKind::UnclosedElements(name.to_string()));
        }
        self.pop_until_tag(name);
    }

    /// "An end tag whose tag name is "form""
    fn in_body_form_end_tag(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        //  run these substeps:"
        if !self.stack_contains("template") {
            // "1. Let node be the element that the form element pointer is set
            //     to, or null if it is not set to an element.
            //  2. Set the form element pointer to null."
            let node = self.form_element_pointer.take();

            // "3. If node is null or if the stack of open elements does not
            //     have node in scope, then this is a parse error; return and
            //     ignore the token."
            let Some(node) = node.filter(|&node| self.has_node_in_scope(node)) else {
                self.unexpected(token);
                return;
            };

            // "4. Generate implied end tags.
            //  5. If the current node is not node, then this is a parse error.
            //  6. Remove node from the stack of open elements."
            self.generate_implied_end_tags();
            if self.current_node() != Some(node) {
                self.parse_error(ParseErrorKind::UnclosedElements("form".to_string()));
            }
            self.remove_from_stack(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        //  run these substeps instead: If the stack of open elements does not
        //  have a form element in scope, then this is a parse error; return and
        //  ignore the token. Generate implied end tags. If the current node is
        //  not a form element, then this is a parse error. Pop elements from
        //  the stack of open elements until a form element has been popped from
        //  the stack."
        if !self.has_element_in_scope("form") {
            self.unexpected(token);
            return;
        }
        self.close_element_in_scope("form");
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    pub(super) fn any_other_end_tag(&mut self, token: &Token) {
        let Some(name) = token.tag_name() else {
            return;
        };

        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];

            // STEP 2: "Loop: If node is an HTML element with the same tag name
            //          as the token, then: Generate implied end tags, except
            //          for HTML elements with the same tag name as the token.
            //          If node is not the current node, then this is a parse
            //          error. Pop all the nodes from the current node up to
            //          node, including node, then stop these steps."
            if self.is_html_element(node, name) {
                self.generate_implied_end_tags_excluding(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ParseErrorKind::UnclosedElements(name.to_string()));
                }
                self.pop_until_node(node);
                return;
            }

            // STEP 3: "Otherwise, if node is in the special category, then this
            //          is a parse error; ignore the token, and return."
            if self.is_special_element(node) {
                self.unexpected(token);
                return;
            }

            // STEP 4: "Set node to the previous entry in the stack of open
            //          elements. Return to the step labeled loop."
        }
    }
}
