//! Markdown source to syntax tree.
//!
//! Parsing runs in three passes:
//!
//! 1. A line scanner splits the document into markdown runs, leaf directives
//!    and (nested) container directives, skipping fenced code and list item
//!    continuation lines.
//! 2. Each markdown run is parsed with pulldown-cmark into tree nodes. Block
//!    quotes and list items that may hold directives go back through pass 1
//!    with their own content.
//! 3. Text nodes are searched for inline text directives.

mod blocks;
mod inline;
mod markdown;

use pulldown_cmark::Options;
use sfdocs_tree::{Node, NodeKind};

use blocks::{Block, split_blocks};

/// Options for [`parse_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown extensions (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl ParseOptions {
    /// pulldown-cmark options for these settings.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }
}

/// Parse a markdown document with directive syntax into a tree.
///
/// # Example
///
/// ```
/// use sfdocs_renderer::{ParseOptions, parse_document};
/// use sfdocs_tree::NodeKind;
///
/// let tree = parse_document(":::tip\nUse the CLI.\n:::\n", &ParseOptions::default());
/// let tip = &tree.children[0];
/// assert_eq!(tip.kind, NodeKind::ContainerDirective);
/// assert_eq!(tip.name.as_deref(), Some("tip"));
/// ```
#[must_use]
pub fn parse_document(source: &str, options: &ParseOptions) -> Node {
    let parser_options = options.parser_options();
    let mut root = Node::root(parse_fragment(source, parser_options));
    inline::expand_text_directives(&mut root, parser_options);
    root
}

/// Block passes over a document or a container's stripped content.
fn parse_fragment(source: &str, options: Options) -> Vec<Node> {
    build_nodes(split_blocks(source), options)
}

fn build_nodes(blocks: Vec<Block>, options: Options) -> Vec<Node> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Markdown(text) => nodes.extend(markdown::parse_blocks(&text, options)),
            Block::Leaf { name, args } => {
                let children = markdown::parse_inline(&args.label, options);
                let mut node = Node::new(NodeKind::LeafDirective)
                    .with_name(name)
                    .with_children(children);
                node.attributes = args.into_attributes();
                nodes.push(node);
            }
            Block::Container { name, args, body } => {
                let label = args.label.clone();
                let mut node = Node::new(NodeKind::ContainerDirective)
                    .with_name(name)
                    .with_children(build_nodes(body, options));
                node.attributes = args.into_attributes();
                if !label.is_empty() {
                    node.attributes.insert("label".to_owned(), label);
                }
                nodes.push(node);
            }
        }
    }
    nodes
}
