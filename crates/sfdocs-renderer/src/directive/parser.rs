//! Directive syntax parsing.
//!
//! Recognizes `CommonMark` directive syntax: `:name`, `::name`, `:::name`

use super::DirectiveArgs;

/// Block-level directive recognized on a line of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockDirective {
    /// Leaf directive: `::name[label]{attrs}`
    Leaf { name: String, args: DirectiveArgs },
    /// Container opening: `:::name[label]{attrs}`
    ContainerStart {
        name: String,
        args: DirectiveArgs,
        colon_count: usize,
    },
    /// Container closing: `:::`
    ContainerEnd { colon_count: usize },
}

/// Text directive found inside a run of text: `:name[label]{attrs}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextDirective {
    pub(crate) name: String,
    pub(crate) args: DirectiveArgs,
    /// Byte offset of the leading colon.
    pub(crate) start: usize,
    /// Byte offset just past the directive.
    pub(crate) end: usize,
}

/// Parse a whole line as a block directive.
///
/// The line may be indented by up to three spaces and must contain nothing
/// after the directive except whitespace. Returns `None` for any other line.
pub(crate) fn parse_block_line(line: &str) -> Option<BlockDirective> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let trimmed = trimmed.trim_end();

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    if colon_count < 2 {
        return None;
    }

    let after_colons = &trimmed[colon_count..];

    if after_colons.is_empty() {
        return (colon_count >= 3).then_some(BlockDirective::ContainerEnd { colon_count });
    }

    let (name, args, consumed) = parse_directive_body(after_colons)?;
    if !after_colons[consumed..].trim().is_empty() {
        return None;
    }

    if colon_count == 2 {
        Some(BlockDirective::Leaf { name, args })
    } else {
        Some(BlockDirective::ContainerStart {
            name,
            args,
            colon_count,
        })
    }
}

/// Find the first text directive in `text`, starting the search at `from`.
///
/// A text directive needs a `[label]` or `{attrs}` after its name, its name
/// must start with an ASCII letter, and the colon must not follow an
/// alphanumeric character or another colon. This keeps times (`10:30`),
/// URLs and prose colons as plain text.
pub(crate) fn find_text_directive(text: &str, from: usize) -> Option<TextDirective> {
    let mut search = from;

    while let Some(offset) = text[search..].find(':') {
        let start = search + offset;
        search = start + 1;

        let preceded_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != ':');
        if !preceded_ok {
            continue;
        }

        let body = &text[start + 1..];
        if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }

        if let Some((name, args, consumed)) = parse_directive_body(body) {
            let name_len = name.len();
            if consumed > name_len {
                return Some(TextDirective {
                    name,
                    args,
                    start,
                    end: start + 1 + consumed,
                });
            }
        }
    }

    None
}

/// Parse `name[label]{attrs}` from the start of `s`.
///
/// Returns the name, parsed arguments and number of bytes consumed.
fn parse_directive_body(s: &str) -> Option<(String, DirectiveArgs, usize)> {
    let name_end = s
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(s.len());

    let name = &s[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let mut pos = name_end;

    let (label, label_consumed) = parse_delimited(&s[pos..], '[', ']');
    pos += label_consumed;

    let (attrs_str, attrs_consumed) = parse_delimited(&s[pos..], '{', '}');
    pos += attrs_consumed;

    Some((name.to_owned(), DirectiveArgs::parse(label, attrs_str), pos))
}

/// Check if a name is a valid directive name.
///
/// Valid names start with a letter and contain only alphanumeric characters,
/// hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_alphabetic())
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse content between `open` and its matching `close`, handling nesting.
///
/// Returns (content, `bytes_consumed`); `("", 0)` when `s` does not start
/// with `open` or the delimiter is never closed.
fn parse_delimited(s: &str, open: char, close: char) -> (&str, usize) {
    if !s.starts_with(open) {
        return ("", 0);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (&s[open.len_utf8()..i], i + close.len_utf8());
            }
        }
    }

    ("", 0)
}
