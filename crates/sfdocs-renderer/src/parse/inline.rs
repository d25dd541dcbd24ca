//! Text directive expansion inside parsed inline content.

use pulldown_cmark::Options;
use sfdocs_tree::{Node, NodeKind};

use super::markdown::parse_inline;
use crate::directive::find_text_directive;

/// Replace `:name[label]{attrs}` occurrences in text nodes with text
/// directive nodes, recursively.
pub(crate) fn expand_text_directives(node: &mut Node, options: Options) {
    let has_candidate = node
        .children
        .iter()
        .any(|child| child.kind == NodeKind::Text && child.value.contains(':'));

    if has_candidate {
        let children = std::mem::take(&mut node.children);
        node.children = children
            .into_iter()
            .flat_map(|child| split_text(child, options))
            .collect();
    }

    for child in &mut node.children {
        expand_text_directives(child, options);
    }
}

/// Split one text node around its text directives.
fn split_text(node: Node, options: Options) -> Vec<Node> {
    if node.kind != NodeKind::Text {
        return vec![node];
    }

    let text = node.value.as_str();
    let mut out = Vec::new();
    let mut cursor = 0;

    while let Some(found) = find_text_directive(text, cursor) {
        if found.start > cursor {
            out.push(Node::text(&text[cursor..found.start]));
        }
        let mut directive = Node::new(NodeKind::TextDirective)
            .with_name(found.name)
            .with_children(parse_inline(&found.args.label, options));
        directive.attributes = found.args.into_attributes();
        out.push(directive);
        cursor = found.end;
    }

    if cursor == 0 {
        return vec![node];
    }
    if cursor < text.len() {
        out.push(Node::text(&text[cursor..]));
    }
    out
}
