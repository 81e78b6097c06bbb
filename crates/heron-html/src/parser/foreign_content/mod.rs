//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use heron_dom::{DomAttribute, Namespace};

use super::core::HTMLParser;
use crate::error::ParseErrorKind;
use crate::tokenizer::character_reference::REPLACEMENT_CHARACTER;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the local
/// name being the string in the third column, and the namespace being the
/// namespace in the fourth column."
///
/// Format: (`attribute_name`, prefix, `local_name`, namespace)
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Option<&str>, &str, Namespace)] = &[
    // XLink namespace attributes
    ("xlink:actuate", Some("xlink"), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some("xlink"), "arcrole", Namespace::XLink),
    ("xlink:href", Some("xlink"), "href", Namespace::XLink),
    ("xlink:role", Some("xlink"), "role", Namespace::XLink),
    ("xlink:show", Some("xlink"), "show", Namespace::XLink),
    ("xlink:title", Some("xlink"), "title", Namespace::XLink),
    ("xlink:type", Some("xlink"), "type", Namespace::XLink),
    // XML namespace attributes
    ("xml:lang", Some("xml"), "lang", Namespace::Xml),
    ("xml:space", Some("xml"), "space", Namespace::Xml),
    // XMLNS namespace attributes
    ("xmlns", None, "xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Some("xmlns"), "xlink", Namespace::Xmlns),
];

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Turn a token attribute into a DOM attribute, namespacing `xlink:href`,
/// `xml:lang`, `xmlns` and friends.
#[must_use]
pub fn adjust_foreign_attribute(attr: &Attribute) -> DomAttribute {
    match FOREIGN_ATTRIBUTE_ADJUSTMENTS
        .iter()
        .find(|(from, ..)| attr.name == *from)
    {
        Some(&(_, prefix, local_name, namespace)) => DomAttribute {
            namespace: Some(namespace),
            prefix: prefix.map(str::to_string),
            local_name: local_name.to_string(),
            value: attr.value.clone(),
        },
        None => DomAttribute::new(attr.name.clone(), attr.value.clone()),
    }
}

/// Start tags that break out of foreign content back into HTML.
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_START_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

/// Whether a token leaves foreign content for the HTML insertion modes.
fn is_breakout_token(token: &Token) -> bool {
    match token {
        Token::StartTag { name, .. } if BREAKOUT_START_TAGS.contains(&name.as_str()) => true,
        // "A start tag whose tag name is "font", if the token has any
        //  attributes named "color", "face", or "size""
        Token::StartTag { name, .. } if name == "font" => ["color", "face", "size"]
            .iter()
            .any(|attr| token.attribute(attr).is_some()),
        // "An end tag whose tag name is "br", "p""
        Token::EndTag { name, .. } => name == "br" || name == "p",
        _ => false,
    }
}

impl HTMLParser {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    ///
    /// "When the user agent is to apply the rules for parsing tokens in foreign
    /// content, the user agent must handle the token as follows:"
    pub(super) fn process_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.insert_character(REPLACEMENT_CHARACTER);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "Insert the token's character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Cdata { data } => {
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
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            _ if is_breakout_token(token) => {
                // "Parse error."
                self.unexpected(token);

                // "While the current node is not a MathML text integration
                //  point, an HTML integration point, or an element in the HTML
                //  namespace, pop elements from the stack of open elements."
                while let Some(current) = self.current_node() {
                    let Some(element) = self.tree.as_element(current) else {
                        break;
                    };
                    let stays = element.namespace == Namespace::Html
                        || Self::is_html_integration_point(element)
                        || (element.namespace == Namespace::MathMl
                            && mathml::is_text_integration_point(&element.tag_name));
                    if stays {
                        break;
                    }
                    let _ = self.stack_of_open_elements.pop();
                }

                // "Reprocess the token according to the rules given in the
                //  section corresponding to the current insertion mode in HTML
                //  content."
                self.process_using_rules_for(self.insertion_mode, token);
            }

            // "Any other start tag"
            Token::StartTag { self_closing, .. } => {
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|id| self.tree.as_element(id))
                    .map_or(Namespace::Html, |element| element.namespace);

                let mut adjusted = token.clone();
                if let Token::StartTag {
                    name, attributes, ..
                } = &mut adjusted
                {
                    match namespace {
                        // "If the adjusted current node is an element in the
                        //  MathML namespace, adjust MathML attributes for the
                        //  token."
                        Namespace::MathMl => adjust_mathml_attributes(attributes),
                        // "If the adjusted current node is an element in the SVG
                        //  namespace, and the token's tag name is one of the
                        //  ones in the first column of the following table,
                        //  change the tag name... Adjust SVG attributes for the
                        //  token."
                        Namespace::Svg => {
                            *name = adjust_svg_tag_name(name).to_string();
                            adjust_svg_attributes(attributes);
                        }
                        _ => {}
                    }
                }

                // "Adjust foreign attributes for the token. Insert a foreign
                //  element for the token, with adjusted current node's
                //  namespace and false."
                let _ = self.insert_foreign_element(&adjusted, namespace);

                // "If the token has its self-closing flag set, then run the
                //  appropriate steps from the following list:"
                //
                // Both branches (an SVG script or anything else) come down to
                // popping the element that was just inserted.
                if *self_closing {
                    let _ = self.stack_of_open_elements.pop();
                }
            }

            // "An end tag whose tag name is "script", if the current node is an
            //  SVG script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. }
                if name == "script"
                    && self
                        .current_node()
                        .and_then(|id| self.tree.as_element(id))
                        .is_some_and(|element| element.is(Namespace::Svg, "script")) =>
            {
                let _ = self.stack_of_open_elements.pop();
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.foreign_content_any_other_end_tag(name, token),

            Token::EndOfFile => self.process_using_rules_for(self.insertion_mode, token),
        }
    }

    /// "Any other end tag" in foreign content.
    fn foreign_content_any_other_end_tag(&mut self, name: &str, token: &Token) {
        let matches_token = |parser: &Self, index: usize| {
            parser
                .tag_name(parser.stack_of_open_elements[index])
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        };

        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        //          same as the tag name of the token, then this is a parse
        //          error."
        if !matches_token(self, index) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag(name.to_string()));
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            //          open elements, then return. (fragment case)"
            if index == 0 {
                return;
            }

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the
            //          same as the tag name of the token, pop elements from the
            //          stack of open elements until node has been popped from
            //          the stack, and then return."
            if matches_token(self, index) {
                self.stack_of_open_elements.truncate(index);
                return;
            }

            // STEP 5: "Set node to the previous entry in the stack of open
            //          elements."
            index -= 1;

            // STEP 6: "If node is not an element in the HTML namespace, return
            //          to the step labeled loop."
            let node = self.stack_of_open_elements[index];
            if self
                .tree
                .as_element(node)
                .is_some_and(|element| element.namespace == Namespace::Html)
            {
                // STEP 7: "Otherwise, process the token according to the rules
                //          given in the section corresponding to the current
                //          insertion mode in HTML content."
                self.process_using_rules_for(self.insertion_mode, token);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlink_href_is_namespaced() {
        let attr = adjust_foreign_attribute(&Attribute::new("xlink:href", "#a"));
        assert_eq!(attr.namespace, Some(Namespace::XLink));
        assert_eq!(attr.prefix.as_deref(), Some("xlink"));
        assert_eq!(attr.local_name, "href");
        assert_eq!(attr.qualified_name(), "xlink:href");
    }

    #[test]
    fn bare_xmlns_has_no_prefix() {
        let attr = adjust_foreign_attribute(&Attribute::new("xmlns", "http://www.w3.org/2000/svg"));
        assert_eq!(attr.namespace, Some(Namespace::Xmlns));
        assert_eq!(attr.prefix, None);
        assert_eq!(attr.local_name, "xmlns");
    }

    #[test]
    fn ordinary_attributes_stay_plain() {
        let attr = adjust_foreign_attribute(&Attribute::new("width", "10"));
        assert_eq!(attr.namespace, None);
        assert_eq!(attr.local_name, "width");
    }

    #[test]
    fn font_breaks_out_only_with_presentational_attributes() {
        let mut plain = Token::start_tag_named("font");
        assert!(!is_breakout_token(&plain));
        if let Token::StartTag { attributes, .. } = &mut plain {
            attributes.push(Attribute::new("color", "red"));
        }
        assert!(is_breakout_token(&plain));
    }
}
