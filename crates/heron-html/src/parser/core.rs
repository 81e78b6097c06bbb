use heron_common::warn_once;
use heron_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};
use strum_macros::Display;

use super::foreign_content::{mathml, svg};
use crate::error::{ParseError, ParseErrorKind};
use crate::tokenizer::{HTMLTokenizer, Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
///
/// The list contains entries that are either elements or markers.
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element entry.
    ///
    /// Formatting elements are: a, b, big, code, em, font, i, nobr, s, small,
    /// strike, strong, tt, u.
    Element {
        /// The `NodeId` of the element in the DOM tree.
        node_id: NodeId,
        /// The original token, kept to recreate the element if needed during
        /// the adoption agency algorithm or when reconstructing.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Markers are pushed when entering: applet, object, marquee, template,
    /// td, th, caption.
    Marker,
}

/// Parser switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Nothing is ever executed. The flag only decides how `<noscript>` is
    /// parsed.
    pub scripting: bool,
    /// Also report every parse error through the shared warning log.
    pub log_parse_errors: bool,
}

impl ParserOptions {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Report each kind of parse error through `warn_once` the first time
    /// it is found. Positions are logged at `debug` level.
    #[must_use]
    pub const fn with_log_parse_errors(mut self, log_parse_errors: bool) -> Self {
        self.log_parse_errors = log_parse_errors;
        self
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser. It pulls tokens from its own tokenizer and builds a
/// [`DomTree`] from them.
pub struct HTMLParser {
    pub(super) tokenizer: HTMLTokenizer,

    pub(super) options: ParserOptions,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// "When the insertion mode is switched to "text" or "in table text", the
    /// original insertion mode is also set. This is the insertion mode to which
    /// the tree construction stage will return."
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// "The current template insertion mode is the insertion mode most
    /// recently pushed onto the stack of template insertion modes."
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena. The last entry is the current node.
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was opened
    /// and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    /// The context element of the fragment parsing algorithm. It lives in the
    /// arena but is never attached to the tree.
    pub(super) context_element: Option<NodeId>,

    /// DOM tree under construction. `NodeId::ROOT` is the Document (or the
    /// `DocumentFragment` when parsing a fragment).
    pub(super) tree: DomTree,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "The pending table character tokens list"
    pub(super) pending_table_character_tokens: Vec<char>,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is a
    /// U+000A LINE FEED (LF) character token, then ignore that token".
    pub(super) skip_next_line_feed: bool,

    stopped: bool,

    errors: Vec<ParseError>,
}

impl HTMLParser {
    /// Create a parser for a whole document.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Create a parser for a whole document with the given options.
    #[must_use]
    pub fn with_options(input: &str, options: ParserOptions) -> Self {
        Self::with_tree(HTMLTokenizer::new(input), DomTree::new(), options)
    }

    fn with_tree(tokenizer: HTMLTokenizer, tree: DomTree, options: ParserOptions) -> Self {
        Self {
            tokenizer,
            options,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            context_element: None,
            tree,
            foster_parenting: false,
            frameset_ok: true,
            pending_table_character_tokens: Vec::new(),
            skip_next_line_feed: false,
            stopped: false,
            errors: Vec::new(),
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Create a parser for `input` as if it were the content of an element
    /// named `context`. A context of `svg` or `math` puts the fragment in the
    /// matching foreign namespace; anything else is an HTML element.
    #[must_use]
    pub fn new_fragment(input: &str, context: &str, options: ParserOptions) -> Self {
        let context = context.to_ascii_lowercase();
        let namespace = match context.as_str() {
            "svg" => Namespace::Svg,
            "math" => Namespace::MathMl,
            _ => Namespace::Html,
        };

        // STEP 1-4: "Create a new Document node... Create a new HTML parser"
        let mut tokenizer = HTMLTokenizer::new(input);

        // STEP 5: "Set the state of the HTML parser's tokenization stage as
        //          follows, switching on the context element"
        if namespace == Namespace::Html {
            let state = match context.as_str() {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "script" => Some(TokenizerState::ScriptData),
                "noscript" if options.scripting => Some(TokenizerState::RAWTEXT),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
            if let Some(state) = state {
                tokenizer.set_state(state);
            }
        }

        let mut parser = Self::with_tree(tokenizer, DomTree::new_fragment(), options);
        let context_element = parser
            .tree
            .alloc(NodeType::Element(ElementData::new(&context, namespace)));
        parser.context_element = Some(context_element);

        // STEP 7: "Let root be the result of creating an html element"
        // STEP 8: "Append the element root to the Document node created above."
        let root = parser.tree.alloc(NodeType::Element(ElementData::html("html")));
        parser.tree.append_child(NodeId::ROOT, root);

        // STEP 9: "Set up the HTML parser's stack of open elements so that it
        //          contains just the single element root."
        parser.stack_of_open_elements.push(root);

        // STEP 10: "If the context element is a template element, then push
        //           "in template" onto the stack of template insertion modes"
        if namespace == Namespace::Html && context == "template" {
            parser.template_insertion_modes.push(InsertionMode::InTemplate);
        }

        // STEP 12: "Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        // STEP 13: "Set the parser's form element pointer to the nearest node
        //           to the context element that is a form element". The
        //           context element has no ancestors here.
        if namespace == Namespace::Html && context == "form" {
            parser.form_element_pointer = Some(context_element);
        }

        parser
    }

    /// Run the parser to the end of the input and return the tree together
    /// with every parse error, in the order they were found.
    #[must_use]
    pub fn run(mut self) -> (DomTree, Vec<ParseError>) {
        while !self.stopped {
            let cdata_allowed = self
                .adjusted_current_node()
                .and_then(|id| self.tree.as_element(id))
                .is_some_and(|element| element.namespace != Namespace::Html);
            self.tokenizer.set_cdata_allowed(cdata_allowed);

            let token = self.tokenizer.next_token();
            for error in self.tokenizer.take_errors() {
                self.record_error(error);
            }

            if std::mem::take(&mut self.skip_next_line_feed)
                && matches!(token, Token::Character { data: '\n' })
            {
                continue;
            }

            // "If the token has its self-closing flag set" and nothing
            // acknowledges it, that is a parse error. Foreign elements and the
            // void elements acknowledge it.
            if let Token::StartTag {
                name,
                self_closing: true,
                ..
            } = &token
                && !Self::acknowledges_self_closing_flag(name)
                && self.uses_current_insertion_mode(&token)
            {
                self.parse_error(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus);
            }

            self.process_token(&token);

            // Every end-of-file path ends in "stop parsing".
            if token.is_eof() {
                self.stopped = true;
            }
        }
        self.finish()
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// "Return root's children, in tree order." For a fragment the children
    /// of the synthetic `html` element are moved under the `DocumentFragment`.
    fn finish(mut self) -> (DomTree, Vec<ParseError>) {
        if self.context_element.is_some()
            && let Some(root) = self.tree.first_child(NodeId::ROOT)
        {
            self.tree.move_children(root, NodeId::ROOT);
            self.tree.remove_child(NodeId::ROOT, root);
        }
        (self.tree, self.errors)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher"
    pub(super) fn process_token(&mut self, token: &Token) {
        if self.uses_current_insertion_mode(token) {
            self.process_using_rules_for(self.insertion_mode, token);
        } else {
            self.process_foreign_content(token);
        }
    }

    /// "Reprocess the token" - process the same token again in the new
    /// insertion mode.
    pub(super) fn reprocess_token(&mut self, token: &Token) {
        self.process_token(token);
    }

    /// The dispatcher's list of cases that are handled by the current
    /// insertion mode rather than by the rules for foreign content.
    fn uses_current_insertion_mode(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };
        let is_start_tag = matches!(token, Token::StartTag { .. });
        let is_character = matches!(token, Token::Character { .. } | Token::Cdata { .. });

        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }

        // "If the adjusted current node is a MathML text integration point and
        //  the token is a start tag whose tag name is neither "mglyph" nor
        //  "malignmark"" / "...and the token is a character token"
        if element.namespace == Namespace::MathMl
            && mathml::is_text_integration_point(&element.tag_name)
        {
            match token {
                Token::StartTag { name, .. } if name != "mglyph" && name != "malignmark" => {
                    return true;
                }
                _ if is_character => return true,
                _ => {}
            }
        }

        // "If the adjusted current node is a MathML annotation-xml element and
        //  the token is a start tag whose tag name is "svg""
        if element.is(Namespace::MathMl, "annotation-xml") && token.is_start_tag("svg") {
            return true;
        }

        // "If the adjusted current node is an HTML integration point and the
        //  token is a start tag" / "...and the token is a character token"
        if Self::is_html_integration_point(element) && (is_start_tag || is_character) {
            return true;
        }

        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// Start tags whose rules acknowledge the self-closing flag: the void
    /// elements, `<image>` (read as `<img>`), and the roots of foreign content.
    fn acknowledges_self_closing_flag(name: &str) -> bool {
        matches!(
            name,
            "area"
                | "base"
                | "basefont"
                | "bgsound"
                | "br"
                | "col"
                | "embed"
                | "frame"
                | "hr"
                | "image"
                | "img"
                | "input"
                | "keygen"
                | "link"
                | "math"
                | "meta"
                | "param"
                | "source"
                | "svg"
                | "track"
                | "wbr"
        )
    }

    /// [§ 13.2.6.5 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    pub(super) fn is_html_integration_point(element: &ElementData) -> bool {
        match element.namespace {
            Namespace::MathMl => mathml::is_html_integration_point(element),
            Namespace::Svg => svg::is_html_integration_point(&element.tag_name),
            _ => false,
        }
    }

    /// "Process the token using the rules for the X insertion mode"
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        // A CDATA section becomes a CDATA node wherever character tokens end
        // up in the "in body" rules. Table, select, raw text and frameset
        // content read it as the characters it contains.
        if let Token::Cdata { data } = token
            && !Self::keeps_cdata_sections(mode)
        {
            for c in data.chars() {
                self.process_token(&Token::Character { data: c });
            }
            return;
        }

        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Modes whose character handling reaches the "in body" rules, either
    /// directly or after implying `html`, `head` or `body`.
    const fn keeps_cdata_sections(mode: InsertionMode) -> bool {
        matches!(
            mode,
            InsertionMode::Initial
                | InsertionMode::BeforeHtml
                | InsertionMode::BeforeHead
                | InsertionMode::InHead
                | InsertionMode::InHeadNoscript
                | InsertionMode::AfterHead
                | InsertionMode::InBody
                | InsertionMode::InCaption
                | InsertionMode::InCell
                | InsertionMode::InTemplate
                | InsertionMode::AfterBody
                | InsertionMode::AfterAfterBody
        )
    }

    /// "Switch the insertion mode to X"
    pub(super) fn switch_to(&mut self, mode: InsertionMode) {
        if self.insertion_mode != mode {
            log::trace!(target: "heron::parser", "{} -> {}", self.insertion_mode, mode);
        }
        self.insertion_mode = mode;
    }

    /// Switch to "text" or "in table text", remembering where to come back to.
    pub(super) fn switch_to_with_original(&mut self, mode: InsertionMode) {
        self.original_insertion_mode = Some(self.insertion_mode);
        self.switch_to(mode);
    }

    /// "Switch the insertion mode to the original insertion mode"
    pub(super) fn switch_to_original_insertion_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record a tree construction parse error at the tokenizer's position.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        let error = ParseError::new(kind, self.tokenizer.position());
        log::debug!(target: "heron::parser", "parse error in {}: {error}", self.insertion_mode);
        self.record_error(error);
    }

    /// Record the parse error for a token that is not allowed where it
    /// appears. Comments, CDATA sections and processing instructions are
    /// always allowed somewhere, so they never produce one.
    pub(super) fn unexpected(&mut self, token: &Token) {
        let kind = match token {
            Token::StartTag { name, .. } => ParseErrorKind::UnexpectedStartTag(name.clone()),
            Token::EndTag { name, .. } => ParseErrorKind::UnexpectedEndTag(name.clone()),
            Token::Doctype { .. } => ParseErrorKind::UnexpectedDoctype,
            Token::Character { data } => ParseErrorKind::UnexpectedCharacter(*data),
            Token::Cdata { data } => match data.chars().next() {
                Some(c) => ParseErrorKind::UnexpectedCharacter(c),
                None => return,
            },
            Token::EndOfFile => ParseErrorKind::UnexpectedEof,
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => return,
        };
        self.parse_error(kind);
    }

    fn record_error(&mut self, error: ParseError) {
        if self.options.log_parse_errors {
            let _ = warn_once("HTML Parser", &error.kind.to_string());
        }
        self.errors.push(error);
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    pub(super) const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise, the
    /// adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.stack_of_open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// Local name of an element node.
    pub(super) fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// Whether `id` is the HTML element `tag_name`.
    pub(super) fn is_html_element(&self, id: NodeId, tag_name: &str) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.is_html(tag_name))
    }

    /// Whether `id` is an HTML element whose name is one of `tag_names`.
    pub(super) fn is_html_element_in(&self, id: NodeId, tag_names: &[&str]) -> bool {
        self.tree.as_element(id).is_some_and(|e| {
            e.namespace == Namespace::Html && tag_names.contains(&e.tag_name.as_str())
        })
    }

    /// Whether the current node is the HTML element `tag_name`.
    pub(super) fn current_node_is(&self, tag_name: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element(id, tag_name))
    }

    /// Whether the current node is an HTML element named one of `tag_names`.
    pub(super) fn current_node_is_one_of(&self, tag_names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element_in(id, tag_names))
    }

    /// Whether an HTML element named `tag_name` is on the stack of open elements.
    pub(super) fn stack_contains(&self, tag_name: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, tag_name))
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#current-template-insertion-mode)
    pub(super) fn current_template_insertion_mode(&self) -> Option<InsertionMode> {
        self.template_insertion_modes.last().copied()
    }

    /// "Stop parsing"
    pub(super) const fn stop_parsing(&mut self) {
        self.stopped = true;
    }
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    print!("{}", format_tree(tree, id, indent));
}

/// Render a DOM tree as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    write_tree(tree, id, indent, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    use std::fmt::Write;

    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::DocumentFragment => writeln!(out, "{prefix}#document-fragment"),
        NodeType::Doctype(doctype) => writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name),
        NodeType::Element(data) => {
            let name = match data.namespace {
                Namespace::Svg => format!("svg {}", data.tag_name),
                Namespace::MathMl => format!("math {}", data.tag_name),
                _ => data.tag_name.clone(),
            };
            let attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|attr| {
                    if attr.value.is_empty() {
                        attr.qualified_name()
                    } else {
                        format!("{}=\"{}\"", attr.qualified_name(), attr.value)
                    }
                })
                .collect();
            if attrs.is_empty() {
                writeln!(out, "{prefix}<{name}>")
            } else {
                writeln!(out, "{prefix}<{name} {}>", attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::CData(data) => writeln!(out, "{prefix}<![CDATA[{data}]]>"),
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
        NodeType::ProcessingInstruction { target, data } => {
            writeln!(out, "{prefix}<?{target} {data}?>")
        }
    };
    for &child_id in tree.children(id) {
        write_tree(tree, child_id, indent + 1, out);
    }
}
