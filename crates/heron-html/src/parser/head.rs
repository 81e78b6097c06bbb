//! The insertion modes that run before the body: "initial" through "after
//! head", plus the "text" mode used by raw text and RCDATA elements.

use heron_dom::{DoctypeData, ElementData, Namespace, NodeId, NodeType, QuirksMode};

use super::core::{HTMLParser, InsertionMode};
use super::quirks::{is_conforming_doctype, quirks_mode_for_doctype};
use crate::error::ParseErrorKind;
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // An XML declaration in front of the document is dropped.
            Token::ProcessingInstruction { target, .. } if target.eq_ignore_ascii_case("xml") => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment_as_last_child_of(token, NodeId::ROOT);
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let name = name.as_deref();
                let public_id = public_identifier.as_deref();
                let system_id = system_identifier.as_deref();

                // "If the DOCTYPE token's name is not "html", or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor "about:legacy-compat",
                //  then there is a parse error."
                if !is_conforming_doctype(name, public_id, system_id) {
                    self.parse_error(ParseErrorKind::NonConformingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                //  name set to the name given in the DOCTYPE token, or the
                //  empty string if the name was missing; its public ID set to
                //  the public identifier given in the DOCTYPE token, or the
                //  empty string if the public identifier was missing; and its
                //  system ID set to the system identifier given in the DOCTYPE
                //  token, or the empty string if the system identifier was
                //  missing."
                let doctype = self.tree.alloc(NodeType::Doctype(DoctypeData {
                    name: name.unwrap_or_default().to_string(),
                    public_id: public_id.unwrap_or_default().to_string(),
                    system_id: system_id.unwrap_or_default().to_string(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype);

                // Then set the document mode from the quirks tables.
                let mode = quirks_mode_for_doctype(name, public_id, system_id, *force_quirks);
                self.tree.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            // a parse error; if the parser cannot change the mode flag is
            // false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.parse_error(ParseErrorKind::MissingDoctype);
                self.tree.set_quirks_mode(QuirksMode::Quirks);
                self.switch_to(InsertionMode::BeforeHtml);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment_as_last_child_of(token, NodeId::ROOT);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag { name, .. } if name == "html" => {
                let html = self.create_element_for_token(token, Namespace::Html);
                self.tree.append_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.switch_to(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_html_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.unexpected(token),

            // "Anything else"
            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of
    /// open elements. Switch the insertion mode to "before head", then
    /// reprocess the token."
    fn before_html_anything_else(&mut self, token: &Token) {
        let html = self
            .tree
            .alloc(NodeType::Element(ElementData::html("html")));
        self.tree.append_child(NodeId::ROOT, html);
        self.stack_of_open_elements.push(html);
        self.switch_to(InsertionMode::BeforeHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment."
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.insert_comment(token);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element
            // pointer to the newly created head element. Switch the insertion
            // mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element_pointer = Some(head);
                self.switch_to(InsertionMode::InHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.unexpected(token),

            // "Anything else"
            _ => self.before_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no
    /// attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self, token: &Token) {
        let head = self.insert_html_element_named("head");
        self.head_element_pointer = Some(head);
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) {
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

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body"
                // insertion mode."
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements. Acknowledge the
                // token's self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta"" follows the same steps;
                // the character encoding is already decided.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.stack_of_open_elements.pop();
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => self.parse_text_element(token, TokenizerState::RCDATA),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is enabled"
                // "A start tag whose tag name is one of: "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.options.scripting => {
                    self.parse_text_element(token, TokenizerState::RAWTEXT);
                }
                "noframes" | "style" => self.parse_text_element(token, TokenizerState::RAWTEXT),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is disabled"
                // "Insert an HTML element for the token. Switch the insertion
                // mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InHeadNoscript);
                }

                // "A start tag whose tag name is "script""
                //
                // The element is inserted, the tokenizer switches to the
                // script data state and the insertion mode to "text". The
                // script itself is never run.
                "script" => self.parse_text_element(token, TokenizerState::ScriptData),

                // "A start tag whose tag name is "template""
                "template" => {
                    // STEP 1: "Insert an HTML element for the token."
                    let _ = self.insert_html_element(token);
                    // STEP 2: "Insert a marker at the end of the list of active
                    //          formatting elements."
                    self.push_active_formatting_marker();
                    // STEP 3: "Set the frameset-ok flag to "not ok"."
                    self.frameset_ok = false;
                    // STEP 4: "Switch the insertion mode to "in template"."
                    self.switch_to(InsertionMode::InTemplate);
                    // STEP 5: "Push "in template" onto the stack of template
                    //          insertion modes"
                    self.template_insertion_modes
                        .push(InsertionMode::InTemplate);
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.unexpected(token),

                // "Anything else"
                _ => self.in_head_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off
                // the stack of open elements. Switch the insertion mode to
                // "after head"."
                "head" => {
                    let _ = self.stack_of_open_elements.pop();
                    self.switch_to(InsertionMode::AfterHead);
                }

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.in_head_anything_else(token),

                // "An end tag whose tag name is "template""
                "template" => self.close_template_element(token),

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => self.unexpected(token),
            },

            // "Anything else"
            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::AfterHead);
        self.reprocess_token(token);
    }

    /// The "in head" rules for an end tag whose tag name is "template".
    pub(super) fn close_template_element(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        //  this is a parse error; ignore the token."
        if !self.stack_contains("template") {
            self.unexpected(token);
            return;
        }

        // STEP 1: "Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();

        // STEP 2: "If the current node is not a template element, then this is
        //          a parse error."
        if !self.current_node_is("template") {
            self.parse_error(ParseErrorKind::UnclosedElements("template".to_string()));
        }

        // STEP 3: "Pop elements from the stack of open elements until a
        //          template element has been popped from the stack."
        self.pop_until_tag("template");

        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.clear_active_formatting_elements_to_last_marker();

        // STEP 5: "Pop the current template insertion mode off the stack of
        //          template insertion modes."
        let _ = self.template_insertion_modes.pop();

        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.unexpected(token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element. Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InHead);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if name == "br" => {
                self.in_head_noscript_anything_else(token);
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.unexpected(token);
            }
            Token::EndTag { .. } => self.unexpected(token),

            // "Anything else"
            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        self.unexpected(token);
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) {
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

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token. Set the frameset-ok
                // flag to "not ok". Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.switch_to(InsertionMode::InBody);
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token. Switch the insertion
                // mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InFrameset);
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // "Parse error."
                    self.unexpected(token);
                    // "Push the node pointed to by the head element pointer onto
                    //  the stack of open elements."
                    let Some(head) = self.head_element_pointer else {
                        self.after_head_anything_else(token);
                        return;
                    };
                    self.stack_of_open_elements.push(head);
                    // "Process the token using the rules for the "in head"
                    //  insertion mode."
                    self.process_using_rules_for(InsertionMode::InHead, token);
                    // "Remove the node pointed to by the head element pointer
                    //  from the stack of open elements. (It might not be the
                    //  current node at this point.)"
                    self.remove_from_stack(head);
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.unexpected(token),

                _ => self.after_head_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.after_head_anything_else(token),

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => self.unexpected(token),
            },

            // "Anything else"
            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element_named("body");
        self.switch_to(InsertionMode::InBody);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error. If the current node is a script element, then set
            // its already started to true. Pop the current node off the stack
            // of open elements. Switch the insertion mode to the original
            // insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.unexpected(token);
                let _ = self.stack_of_open_elements.pop();
                self.switch_to_original_insertion_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to_original_insertion_mode();
            }

            // The tokenizer only produces characters, end tags and EOF in the
            // raw text states.
            _ => {}
        }
    }
}
