//! Integration tests for the HTML tokenizer.

use heron_html::tokenizer::TokenizerState;
use heron_html::{HTMLTokenizer, ParseErrorKind, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).tokenize_all()
}

/// Helper to tokenize a string and return the error kinds, in order
fn error_kinds(input: &str) -> Vec<ParseErrorKind> {
    let mut tokenizer = HTMLTokenizer::new(input);
    let _ = tokenizer.tokenize_all();
    tokenizer
        .take_errors()
        .into_iter()
        .map(|error| error.kind)
        .collect()
}

/// Helper to tokenize the content of an element the tree builder would have
/// switched into `state`, as if its start tag `tag` had just been emitted
fn tokenize_in(state: TokenizerState, tag: &str, input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.set_state(state);
    tokenizer.set_last_start_tag(Some(tag));
    tokenizer.tokenize_all()
}

/// Helper to collect the character tokens into a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| {
            if let Token::Character { data } = t {
                Some(*data)
            } else {
                None
            }
        })
        .collect()
}

/// Helper to get the first attribute value of the first start tag
fn first_attribute_value(input: &str) -> String {
    match &tokenize(input)[0] {
        Token::StartTag { attributes, .. } => attributes[0].value.clone(),
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_empty_input() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_end_of_file_repeats() {
    let mut tokenizer = HTMLTokenizer::new("a");
    assert_eq!(tokenizer.next_token(), Token::Character { data: 'a' });
    assert!(tokenizer.next_token().is_eof());
    assert!(tokenizer.next_token().is_eof());
    assert!(tokenizer.next_token().is_eof());
}

#[test]
fn test_iterator_stops_after_end_of_file() {
    let tokens: Vec<Token> = HTMLTokenizer::new("<b>x").collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens[2].is_eof());
}

#[test]
fn test_line_endings_are_normalized() {
    assert_eq!(text_of(&tokenize("a\r\nb\rc")), "a\nb\nc");
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_name_is_lowercased() {
    let tokens = tokenize("<!doctype HTML>");
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n), .. } if n == "html"));
}

#[test]
fn test_truncated_doctype_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE");
    assert!(matches!(
        &tokens[0],
        Token::Doctype {
            force_quirks: true,
            ..
        }
    ));
    assert!(error_kinds("<!DOCTYPE").contains(&ParseErrorKind::EofInDoctype));
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_tag_name_is_lowercased() {
    let tokens = tokenize("<DiV>");
    assert!(tokens[0].is_start_tag("div"));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name, .. } => {
            assert_eq!(name, "div");
        }
        _ => panic!("Expected EndTag token"),
    }
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    let tokens = tokenize("</div class=x>");
    assert!(matches!(&tokens[0], Token::EndTag { attributes, .. } if attributes.is_empty()));
    assert_eq!(error_kinds("</div class=x>"), vec![ParseErrorKind::EndTagWithAttributes]);
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected self-closing StartTag token"),
    }
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Comment { data } => {
            assert_eq!(data, " hello ");
        }
        _ => panic!("Expected Comment token"),
    }
}

#[test]
fn test_abrupt_empty_comment() {
    let tokens = tokenize("<!-->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data.is_empty()));
    assert_eq!(
        error_kinds("<!-->"),
        vec![ParseErrorKind::AbruptClosingOfEmptyComment]
    );
}

#[test]
fn test_unterminated_comment() {
    let tokens = tokenize("<!-- open");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " open"));
    assert!(tokens[1].is_eof());
    assert_eq!(error_kinds("<!-- open"), vec![ParseErrorKind::EofInComment]);
}

#[test]
fn test_attribute_double_quoted() {
    let tokens = tokenize(r#"<div class="foo">"#);
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "div");
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "class");
            assert_eq!(attributes[0].value, "foo");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_attribute_single_quoted() {
    assert_eq!(first_attribute_value("<div class='bar'>"), "bar");
}

#[test]
fn test_attribute_unquoted() {
    assert_eq!(first_attribute_value("<div class=baz>"), "baz");
}

#[test]
fn test_boolean_attribute() {
    let tokens = tokenize("<input disabled>");
    assert_eq!(tokens[0].attribute("disabled"), Some(""));
}

#[test]
fn test_multiple_attributes() {
    let tokens = tokenize(r#"<input type="text" id="name" disabled>"#);
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "input");
            assert_eq!(attributes.len(), 3);
            assert_eq!(attributes[0].name, "type");
            assert_eq!(attributes[0].value, "text");
            assert_eq!(attributes[1].name, "id");
            assert_eq!(attributes[1].value, "name");
            assert_eq!(attributes[2].name, "disabled");
            assert_eq!(attributes[2].value, "");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<p id="one" id="two">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "one");
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(
        error_kinds(r#"<p id="one" id="two">"#),
        vec![ParseErrorKind::DuplicateAttribute]
    );
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 5); // <p>, H, i, </p>, EOF
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert!(matches!(tokens[1], Token::Character { data: 'H' }));
    assert!(matches!(tokens[2], Token::Character { data: 'i' }));
    assert!(matches!(&tokens[3], Token::EndTag { name, .. } if name == "p"));
    assert!(matches!(tokens[4], Token::EndOfFile));
}

#[test]
fn test_simple_html_document() {
    let html = r"<!DOCTYPE html>
<html>
<head><title>Test</title></head>
<body>Hello</body>
</html>";
    let tokens = tokenize(html);

    // Should have DOCTYPE as first token
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n), .. } if n == "html"));

    // Should end with EOF
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));

    let start_tags = tokens
        .iter()
        .filter(|t| matches!(t, Token::StartTag { .. }))
        .count();
    let end_tags = tokens
        .iter()
        .filter(|t| matches!(t, Token::EndTag { .. }))
        .count();

    assert_eq!(start_tags, 4); // html, head, title, body
    assert_eq!(end_tags, 4); // /title, /head, /body, /html
}

#[test]
fn test_invalid_first_character_of_tag_name() {
    assert_eq!(text_of(&tokenize("a <1 b")), "a <1 b");
    assert_eq!(
        error_kinds("a <1 b"),
        vec![ParseErrorKind::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn test_eof_before_tag_name() {
    let tokens = tokenize("<");
    assert_eq!(tokens, vec![Token::Character { data: '<' }, Token::EndOfFile]);
    assert_eq!(error_kinds("<"), vec![ParseErrorKind::EofBeforeTagName]);
}

// ========== Raw text element (RCDATA/RAWTEXT/script data) tests ==========

#[test]
fn test_style_element_rawtext() {
    let tokens = tokenize_in(TokenizerState::RAWTEXT, "style", "body { color: red; }</style>");
    assert_eq!(text_of(&tokens), "body { color: red; }");
    assert!(tokens[tokens.len() - 2].is_end_tag("style"));
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));
}

#[test]
fn test_style_with_fake_tags() {
    let tokens = tokenize_in(TokenizerState::RAWTEXT, "style", "<div>not a tag</div></style>");
    assert_eq!(text_of(&tokens), "<div>not a tag</div>");
    assert!(tokens[tokens.len() - 2].is_end_tag("style"));
}

#[test]
fn test_style_with_wrong_end_tag() {
    let tokens = tokenize_in(TokenizerState::RAWTEXT, "style", "a</notastyle>b</style>");
    assert_eq!(text_of(&tokens), "a</notastyle>b");
}

#[test]
fn test_rawtext_does_not_resolve_references() {
    let tokens = tokenize_in(TokenizerState::RAWTEXT, "xmp", "&amp;</xmp>");
    assert_eq!(text_of(&tokens), "&amp;");
}

#[test]
fn test_title_element_rcdata() {
    let tokens = tokenize_in(TokenizerState::RCDATA, "title", "My Page</title>");
    assert_eq!(text_of(&tokens), "My Page");
    assert!(tokens[tokens.len() - 2].is_end_tag("title"));
}

#[test]
fn test_title_with_less_than() {
    let tokens = tokenize_in(TokenizerState::RCDATA, "title", "a < b</title>");
    assert_eq!(text_of(&tokens), "a < b");
}

#[test]
fn test_rcdata_resolves_references() {
    let tokens = tokenize_in(
        TokenizerState::RCDATA,
        "textarea",
        "<b>&lt;bold&gt;</b></textarea>",
    );
    assert_eq!(text_of(&tokens), "<b><bold></b>");
    assert!(tokens[tokens.len() - 2].is_end_tag("textarea"));
}

#[test]
fn test_script_data() {
    let tokens = tokenize_in(
        TokenizerState::ScriptData,
        "script",
        "if (a < b && c) { x(\"</div>\"); }</script>",
    );
    assert_eq!(text_of(&tokens), "if (a < b && c) { x(\"</div>\"); }");
    assert!(tokens[tokens.len() - 2].is_end_tag("script"));
}

#[test]
fn test_script_data_escaped_end_tag() {
    let tokens = tokenize_in(
        TokenizerState::ScriptData,
        "script",
        "<!-- x </script> after",
    );
    let end = tokens
        .iter()
        .position(|t| t.is_end_tag("script"))
        .expect("escaped script data still ends at </script>");
    assert_eq!(text_of(&tokens[..end]), "<!-- x ");
}

#[test]
fn test_script_data_double_escaped() {
    // Inside "<!--<script>" the first "</script>" is still script text.
    let tokens = tokenize_in(
        TokenizerState::ScriptData,
        "script",
        "<!--<script>a</script>-->b</script>",
    );
    assert_eq!(text_of(&tokens), "<!--<script>a</script>-->b");
    let end_tags = tokens.iter().filter(|t| t.is_end_tag("script")).count();
    assert_eq!(end_tags, 1);
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize_in(TokenizerState::PLAINTEXT, "plaintext", "</plaintext><b>");
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

// ========== Character references ==========

#[test]
fn test_character_reference_bare_ampersand() {
    // Bare ampersand followed by non-alphanumeric should flush as literal '&'
    let tokens = tokenize("a & b");
    assert_eq!(tokens.len(), 6);
    assert!(matches!(tokens[2], Token::Character { data: '&' }));
    assert!(error_kinds("a & b").is_empty());
}

#[test]
fn test_named_character_reference_amp() {
    assert_eq!(text_of(&tokenize("a &amp; b")), "a & b");
}

#[test]
fn test_named_character_reference_lt_gt() {
    assert_eq!(text_of(&tokenize("&lt;div&gt;")), "<div>");
}

#[test]
fn test_multi_code_point_reference() {
    assert_eq!(text_of(&tokenize("&NotEqualTilde;")), "\u{2242}\u{338}");
}

#[test]
fn test_numeric_character_references() {
    assert_eq!(text_of(&tokenize("&#65;&#x42;&#X43;")), "ABC");
    assert!(error_kinds("&#65;&#x42;").is_empty());
}

#[test]
fn test_numeric_reference_without_semicolon() {
    assert_eq!(text_of(&tokenize("&#65 x")), "A x");
    assert_eq!(
        error_kinds("&#65 x"),
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_numeric_reference_windows_1252_remap() {
    assert_eq!(text_of(&tokenize("&#x80;")), "\u{20AC}");
    assert_eq!(
        error_kinds("&#x80;"),
        vec![ParseErrorKind::ControlCharacterReference]
    );
}

#[test]
fn test_numeric_reference_out_of_range() {
    assert_eq!(text_of(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(text_of(&tokenize("&#0;")), "\u{FFFD}");
    assert_eq!(
        error_kinds("&#xD800;"),
        vec![ParseErrorKind::SurrogateCharacterReference]
    );
}

#[test]
fn test_numeric_reference_without_digits() {
    assert_eq!(text_of(&tokenize("&#;")), "&#;");
    assert_eq!(
        error_kinds("&#;"),
        vec![ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference]
    );
}

#[test]
fn test_named_character_reference_in_attribute() {
    assert_eq!(first_attribute_value(r#"<a href="?a=1&amp;b=2">"#), "?a=1&b=2");
}

// ========== Ambiguous ampersand ==========

#[test]
fn test_legacy_reference_without_semicolon_in_text() {
    // Accepted, with a missing-semicolon error.
    assert_eq!(text_of(&tokenize("&amp is ok")), "& is ok");
    assert_eq!(
        error_kinds("&amp is ok"),
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_legacy_reference_prefix_in_text() {
    // "&notit;" matches the legacy "&not" and leaves "it;" as text.
    assert_eq!(text_of(&tokenize("I'm &notit; I tell you")), "I'm \u{AC}it; I tell you");
}

#[test]
fn test_longest_match_wins_in_text() {
    assert_eq!(text_of(&tokenize("I'm &notin; I tell you")), "I'm \u{2209} I tell you");
}

#[test]
fn test_attribute_reference_followed_by_equals_is_literal() {
    assert_eq!(first_attribute_value(r#"<a href="?x=1&copy=2">"#), "?x=1&copy=2");
    assert!(error_kinds(r#"<a href="?x=1&copy=2">"#).is_empty());
}

#[test]
fn test_attribute_reference_followed_by_alphanumeric_is_literal() {
    assert_eq!(first_attribute_value(r#"<a href="?x=1&copyright">"#), "?x=1&copyright");
}

#[test]
fn test_attribute_reference_followed_by_other_is_resolved() {
    assert_eq!(first_attribute_value(r#"<a title="&copy 2024">"#), "\u{A9} 2024");
    assert_eq!(
        error_kinds(r#"<a title="&copy 2024">"#),
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_attribute_reference_with_semicolon_is_resolved() {
    assert_eq!(first_attribute_value(r#"<a href="?x=1&copy;=2">"#), "?x=1\u{A9}=2");
}

#[test]
fn test_unknown_named_reference() {
    assert_eq!(text_of(&tokenize("&xyzzy;")), "&xyzzy;");
    assert_eq!(
        error_kinds("&xyzzy;"),
        vec![ParseErrorKind::UnknownNamedCharacterReference]
    );
}

#[test]
fn test_unknown_name_without_semicolon_is_not_an_error() {
    assert_eq!(text_of(&tokenize("&xyzzy x")), "&xyzzy x");
    assert!(error_kinds("&xyzzy x").is_empty());
}

// ========== CDATA and processing instructions ==========

#[test]
fn test_cdata_in_html_content() {
    let tokens = tokenize("<![CDATA[a<b]]>");
    assert_eq!(
        tokens[0],
        Token::Cdata {
            data: "a<b".to_string()
        }
    );
    assert_eq!(error_kinds("<![CDATA[a<b]]>"), vec![ParseErrorKind::CdataInHtmlContent]);
}

#[test]
fn test_cdata_in_foreign_content() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[x]]y]]>");
    tokenizer.set_cdata_allowed(true);
    let tokens = tokenizer.tokenize_all();
    assert_eq!(
        tokens[0],
        Token::Cdata {
            data: "x]]y".to_string()
        }
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_unterminated_cdata() {
    let tokens = tokenize("<![CDATA[test");
    assert_eq!(
        tokens[0],
        Token::Cdata {
            data: "test".to_string()
        }
    );
    assert!(tokens[1].is_eof());
    assert!(error_kinds("<![CDATA[test").contains(&ParseErrorKind::EofInCdata));
}

#[test]
fn test_processing_instruction() {
    let tokens = tokenize("<?foo bar?>");
    assert_eq!(
        tokens[0],
        Token::ProcessingInstruction {
            target: "foo".to_string(),
            data: "bar".to_string(),
        }
    );
    assert_eq!(
        error_kinds("<?foo bar?>"),
        vec![ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

#[test]
fn test_xml_declaration_is_a_processing_instruction() {
    let tokens = tokenize(r#"<?xml version="1.0"?>"#);
    assert!(matches!(
        &tokens[0],
        Token::ProcessingInstruction { target, data }
            if target == "xml" && data == r#"version="1.0""#
    ));
}

#[test]
fn test_unterminated_processing_instruction() {
    let tokens = tokenize("<?app echo");
    assert!(matches!(
        &tokens[0],
        Token::ProcessingInstruction { target, data } if target == "app" && data == "echo"
    ));
    assert!(error_kinds("<?app echo").contains(&ParseErrorKind::EofInProcessingInstruction));
}

#[test]
fn test_error_positions_are_one_based() {
    let mut tokenizer = HTMLTokenizer::new("ok\n</>");
    let _ = tokenizer.tokenize_all();
    let errors = tokenizer.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::MissingEndTagName);
    assert_eq!(errors[0].position.line, 2);
}
