//! Line scanner that splits a document into markdown runs and block directives.
//!
//! Only directives outside markdown containers are found here. Lines that
//! continue a list item stay in the markdown run, and block quote lines never
//! look like directives. Both are re-parsed from their own content when the
//! markdown run is turned into nodes.

use crate::directive::{BlockDirective, DirectiveArgs, FenceTracker, parse_block_line};

/// A block-level segment of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    /// Run of plain markdown lines.
    Markdown(String),
    /// `::name[label]{attrs}` on its own line.
    Leaf { name: String, args: DirectiveArgs },
    /// `:::name[label]{attrs}` with its body.
    Container {
        name: String,
        args: DirectiveArgs,
        body: Vec<Block>,
    },
}

/// An open container while scanning.
struct Frame {
    name: String,
    args: DirectiveArgs,
    colon_count: usize,
    blocks: Vec<Block>,
    pending: String,
}

impl Frame {
    fn new(name: String, args: DirectiveArgs, colon_count: usize) -> Self {
        Self {
            name,
            args,
            colon_count,
            blocks: Vec::new(),
            pending: String::new(),
        }
    }

    /// Move buffered markdown lines into `blocks`.
    fn flush(&mut self) {
        if !self.pending.trim().is_empty() {
            self.blocks
                .push(Block::Markdown(std::mem::take(&mut self.pending)));
        }
        self.pending.clear();
    }

    fn into_block(mut self) -> Block {
        self.flush();
        Block::Container {
            name: self.name,
            args: self.args,
            body: self.blocks,
        }
    }
}

/// Content columns of the list items a line may continue.
#[derive(Debug, Default)]
struct ListContext {
    /// Innermost item last.
    indents: Vec<usize>,
    after_blank: bool,
}

impl ListContext {
    /// Feed one line outside fenced code. Returns `true` if the line belongs
    /// to a list item.
    fn update(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            self.after_blank = true;
            return !self.indents.is_empty();
        }
        let after_blank = std::mem::replace(&mut self.after_blank, false);
        let column = leading_spaces(line);

        if let Some(indent) = list_item_indent(line) {
            self.indents.retain(|&open| open <= column);
            self.indents.push(indent);
            return true;
        }

        let open = self.indents.iter().filter(|&&indent| indent <= column).count();
        if open == 0 && !after_blank {
            // Lazy paragraph continuation; the item stays open.
            return false;
        }
        self.indents.truncate(open);
        open > 0
    }

    fn reset(&mut self) {
        self.indents.clear();
        self.after_blank = false;
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Content column of a list item opened on `line`, if it starts with a
/// bullet (`-`, `*`, `+`) or ordered (`1.`, `1)`) marker.
pub(super) fn list_item_indent(line: &str) -> Option<usize> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let marker = if rest.starts_with(['-', '*', '+']) {
        1
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 9 || !rest[digits..].starts_with(['.', ')']) {
            return None;
        }
        digits + 1
    };

    let after = &rest[marker..];
    if after.trim().is_empty() {
        return Some(indent + marker + 1);
    }
    match leading_spaces(after) {
        0 => None,
        // Content indented as code: the item content starts after one space.
        spaces if spaces > 4 => Some(indent + marker + 1),
        spaces => Some(indent + marker + spaces),
    }
}

/// Split `source` into top-level blocks.
///
/// A closing `:::` line closes the innermost open container whose opening
/// had no more colons than the closing line. Closing lines that match no
/// open container stay in the markdown. Containers still open at the end
/// of the document are closed there.
pub(crate) fn split_blocks(source: &str) -> Vec<Block> {
    let mut fence = FenceTracker::new();
    let mut list = ListContext::default();
    let mut stack = vec![Frame::new(String::new(), DirectiveArgs::default(), 0)];

    for line in source.split_inclusive('\n') {
        let in_code = fence.update(line) || fence.in_fence();
        let directive = if in_code || list.update(line) {
            None
        } else {
            parse_block_line(line)
        };
        if directive.is_some() {
            list.reset();
        }

        let depth = stack.len();
        let Some(top) = stack.last_mut() else {
            break;
        };

        match directive {
            Some(BlockDirective::Leaf { name, args }) => {
                top.flush();
                top.blocks.push(Block::Leaf { name, args });
            }
            Some(BlockDirective::ContainerStart {
                name,
                args,
                colon_count,
            }) => {
                top.flush();
                stack.push(Frame::new(name, args, colon_count));
            }
            Some(BlockDirective::ContainerEnd { colon_count })
                if depth > 1 && top.colon_count <= colon_count =>
            {
                close_top(&mut stack);
            }
            _ => top.pending.push_str(line),
        }
    }

    while stack.len() > 1 {
        if let Some(frame) = stack.last() {
            tracing::warn!(name = %frame.name, "Unclosed container directive");
        }
        close_top(&mut stack);
    }

    stack
        .pop()
        .map(|mut root| {
            root.flush();
            root.blocks
        })
        .unwrap_or_default()
}

/// Pop the innermost container and append it to its parent.
fn close_top(stack: &mut Vec<Frame>) {
    if let Some(frame) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.blocks.push(frame.into_block());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn container(name: &str, body: Vec<Block>) -> Block {
        Block::Container {
            name: name.to_owned(),
            args: DirectiveArgs::default(),
            body,
        }
    }

    fn markdown(text: &str) -> Block {
        Block::Markdown(text.to_owned())
    }

    #[test]
    fn test_plain_markdown() {
        assert_eq!(split_blocks("# Title\n\nText\n"), vec![markdown("# Title\n\nText\n")]);
    }

    #[test]
    fn test_container() {
        let blocks = split_blocks(":::warning\nBe careful.\n:::\n");
        assert_eq!(blocks, vec![container("warning", vec![markdown("Be careful.\n")])]);
    }

    #[test]
    fn test_leaf_between_markdown() {
        let blocks = split_blocks("Before\n\n::video{type=local src=a.mp4}\n\nAfter\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], markdown("Before\n\n"));
        assert!(matches!(
            &blocks[1],
            Block::Leaf { name, args } if name == "video" && args.get("src") == Some("a.mp4")
        ));
        assert_eq!(blocks[2], markdown("\nAfter\n"));
    }

    #[test]
    fn test_nested_containers() {
        let source = "::::note\nOuter\n:::tip\nInner\n:::\nTail\n::::\n";
        let blocks = split_blocks(source);
        assert_eq!(
            blocks,
            vec![container(
                "note",
                vec![
                    markdown("Outer\n"),
                    container("tip", vec![markdown("Inner\n")]),
                    markdown("Tail\n"),
                ]
            )]
        );
    }

    #[test]
    fn test_short_closing_line_does_not_close_longer_opening() {
        let blocks = split_blocks("::::note\nText\n:::\n::::\n");
        assert_eq!(
            blocks,
            vec![container("note", vec![markdown("Text\n:::\n")])]
        );
    }

    #[test]
    fn test_directives_inside_code_fence_are_code() {
        let source = "```\n:::warning\n::video{src=a}\n:::\n```\n";
        assert_eq!(split_blocks(source), vec![markdown(source)]);
    }

    #[test]
    fn test_unclosed_container_runs_to_end() {
        let blocks = split_blocks(":::note\nNo end\n");
        assert_eq!(blocks, vec![container("note", vec![markdown("No end\n")])]);
    }

    #[test]
    fn test_stray_closing_line_is_markdown() {
        assert_eq!(split_blocks("Text\n:::\n"), vec![markdown("Text\n:::\n")]);
    }

    #[test]
    fn test_list_item_continuation_stays_markdown() {
        let source = "- step one\n\n  ::video{type=local}\n\n- step two\n";
        assert_eq!(split_blocks(source), vec![markdown(source)]);
    }

    #[test]
    fn test_nested_list_item_continuation() {
        let source = "- outer\n  - inner\n\n    :::note\n    Text\n    :::\n\n  ::video{type=local}\n";
        assert_eq!(split_blocks(source), vec![markdown(source)]);
    }

    #[test]
    fn test_directive_after_list_is_top_level() {
        let blocks = split_blocks("- item\n\n::video{type=local}\n\n- next\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], markdown("- item\n\n"));
        assert!(matches!(&blocks[1], Block::Leaf { name, .. } if name == "video"));
        assert_eq!(blocks[2], markdown("\n- next\n"));
    }

    #[test]
    fn test_lazy_continuation_keeps_item_open() {
        let source = "- item\nlazy text\n\n  ::video{type=local}\n";
        assert_eq!(split_blocks(source), vec![markdown(source)]);
    }

    #[test]
    fn test_quoted_directive_stays_markdown() {
        let source = "> :::warning\n> Careful\n> :::\n";
        assert_eq!(split_blocks(source), vec![markdown(source)]);
    }

    #[test]
    fn test_list_item_indent() {
        assert_eq!(list_item_indent("- a\n"), Some(2));
        assert_eq!(list_item_indent("  *   a\n"), Some(6));
        assert_eq!(list_item_indent("10. a\n"), Some(4));
        assert_eq!(list_item_indent("1) a"), Some(3));
        assert_eq!(list_item_indent("-\n"), Some(2));
        assert_eq!(list_item_indent("-      code\n"), Some(2));
        assert_eq!(list_item_indent("---\n"), None);
        assert_eq!(list_item_indent("1.5 apples\n"), None);
        assert_eq!(list_item_indent("    - code\n"), None);
        assert_eq!(list_item_indent("::video\n"), None);
    }

    #[test]
    fn test_blank_runs_are_dropped() {
        let blocks = split_blocks("\n\n:::note\n\n:::\n\n");
        assert_eq!(blocks, vec![container("note", vec![])]);
    }
}
