//! Heron CLI - HTML parsing and serialization tool
//!
//! Usage:
//!   heron <file>                     Parse and display the DOM tree
//!   heron <file> --errors            Also list every parse error
//!   heron <file> --serialize         Write the tree back out as HTML
//!   heron <file> --json              Output the tree and errors as JSON
//!   heron --html '<p>Hi' --fragment div
//!
//! Without a file or `--html`, input is read from stdin. Set `RUST_LOG` to see
//! tokenizer and tree builder logging.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use heron_dom::{DomTree, NodeId, NodeType};
use heron_html::{HTMLParser, ParseError, ParserOptions, SerializerOptions, print_tree, serialize};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// Parse HTML the way a browser does and show what came out.
#[derive(Parser, Debug)]
#[command(name = "heron", version, about)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// HTML file to parse (stdin when neither this nor --html is given)
    file: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, conflicts_with = "file")]
    html: Option<String>,

    /// Parse the input as the contents of an element with this name
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Print the serialized HTML instead of the tree
    #[arg(long)]
    serialize: bool,

    /// Serialize every character that has a named reference as that reference
    #[arg(long, requires = "serialize")]
    encode_entities: bool,

    /// Output rule strategy for --serialize
    #[arg(long, value_name = "ID", default_value = "html5")]
    output_rules: String,

    /// Print the tree and the parse errors as JSON
    #[arg(long, conflicts_with = "serialize")]
    json: bool,

    /// List the parse errors after the output
    #[arg(long)]
    errors: bool,

    /// Parse as if scripting were enabled (changes how <noscript> is read)
    #[arg(long)]
    scripting: bool,

    /// Also log each parse error as a warning
    #[arg(long)]
    log_parse_errors: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_input(&cli)?;
    let options = ParserOptions::default()
        .with_scripting(cli.scripting)
        .with_log_parse_errors(cli.log_parse_errors);
    log::debug!("parsing {} bytes with {options:?}", input.len());

    let parser = match &cli.fragment {
        Some(context) => HTMLParser::new_fragment(&input, context, options),
        None => HTMLParser::with_options(&input, options),
    };
    let (tree, errors) = parser.run();

    if cli.json {
        let dump = json!({
            "tree": node_to_json(&tree, tree.root()),
            "errors": errors,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&dump).context("failed to encode the tree as JSON")?
        );
        return Ok(());
    }

    if cli.serialize {
        let serializer_options = SerializerOptions::default()
            .with_encode_entities(cli.encode_entities)
            .with_output_rules(&cli.output_rules)?;
        let mut stdout = serialize(&tree, tree.root(), io::stdout().lock(), &serializer_options)
            .context("failed to serialize the tree")?;
        writeln!(stdout)?;
    } else {
        println!("{}", "=== DOM Tree ===".bold());
        print_tree(&tree, tree.root(), 0);
    }

    if cli.errors {
        print_errors(&errors);
    }

    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

fn print_errors(errors: &[ParseError]) {
    println!();
    if errors.is_empty() {
        println!("{}", "=== No parse errors ===".green());
        return;
    }
    println!("{}", format!("=== Parse Errors ({}) ===", errors.len()).yellow());
    for error in errors {
        println!(
            "  {}: {}",
            format!("{}:{}", error.position.line, error.position.column).dimmed(),
            error.kind
        );
    }
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let mut obj = Map::new();

    match tree.node_type(id) {
        Some(NodeType::Document) => {
            let _ = obj.insert("type".to_string(), json!("document"));
            let _ = obj.insert(
                "quirksMode".to_string(),
                json!(format!("{:?}", tree.quirks_mode())),
            );
        }
        Some(NodeType::DocumentFragment) => {
            let _ = obj.insert("type".to_string(), json!("fragment"));
        }
        Some(NodeType::Doctype(doctype)) => {
            let _ = obj.insert("type".to_string(), json!("doctype"));
            let _ = obj.insert("name".to_string(), json!(doctype.name));
            let _ = obj.insert("publicId".to_string(), json!(doctype.public_id));
            let _ = obj.insert("systemId".to_string(), json!(doctype.system_id));
        }
        Some(NodeType::Element(data)) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name));
            let _ = obj.insert("namespace".to_string(), json!(data.namespace.url()));
            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|attr| (attr.qualified_name(), json!(attr.value)))
                .collect();
            let _ = obj.insert("attributes".to_string(), Value::Object(attrs));
        }
        Some(NodeType::Text(text)) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        Some(NodeType::CData(text)) => {
            let _ = obj.insert("type".to_string(), json!("cdata"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        Some(NodeType::Comment(text)) => {
            let _ = obj.insert("type".to_string(), json!("comment"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        Some(NodeType::ProcessingInstruction { target, data }) => {
            let _ = obj.insert("type".to_string(), json!("processingInstruction"));
            let _ = obj.insert("target".to_string(), json!(target));
            let _ = obj.insert("data".to_string(), json!(data));
        }
        None => return Value::Null,
    }

    let children = tree.children(id);
    if !children.is_empty() {
        let children: Vec<Value> = children
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect();
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}
