//! Builds tree nodes from pulldown-cmark events.
//!
//! pulldown-cmark knows nothing of directive syntax. A block quote or list
//! item whose content may hold block directives is cut out of the source,
//! stripped of its markers and parsed again with the directive-aware parser.

use std::ops::Range;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use sfdocs_tree::{Node, NodeKind};

use super::blocks::list_item_indent;

type Spanned<'a> = (Event<'a>, Range<usize>);

/// Parse block-level markdown into a list of nodes.
pub(crate) fn parse_blocks(markdown: &str, options: Options) -> Vec<Node> {
    let events: Vec<Spanned<'_>> = Parser::new_ext(markdown, options)
        .into_offset_iter()
        .collect();
    let mut builder = TreeBuilder::new();

    let mut index = 0;
    while index < events.len() {
        let (event, range) = &events[index];
        if let Event::Start(tag @ (Tag::BlockQuote(_) | Tag::Item)) = event
            && let Some(end) = matching_end(&events, index)
            && let Some(node) =
                reparse(markdown, tag, range.clone(), &events[index + 1..end], options)
        {
            builder.push(node);
            index = end + 1;
            continue;
        }
        builder.event(event.clone());
        index += 1;
    }
    builder.finish()
}

/// Parse a single line of inline markdown (a directive label).
///
/// The wrapping paragraph is removed so only phrasing content remains.
pub(crate) fn parse_inline(markdown: &str, options: Options) -> Vec<Node> {
    if markdown.is_empty() {
        return Vec::new();
    }
    unwrap_paragraphs(parse_blocks(markdown, options))
}

fn unwrap_paragraphs(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| {
            if node.kind == NodeKind::Paragraph {
                node.children
            } else {
                vec![node]
            }
        })
        .collect()
}

/// Index of the `End` event closing the `Start` at `start`.
fn matching_end(events: &[Spanned<'_>], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, (event, _)) in events[start..].iter().enumerate() {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Re-parse a block quote or list item with directive support.
///
/// Returns `None` when the content has no `::` or its markers cannot be
/// stripped; the caller then keeps pulldown-cmark's events.
fn reparse(
    source: &str,
    tag: &Tag<'_>,
    range: Range<usize>,
    inner: &[Spanned<'_>],
    options: Options,
) -> Option<Node> {
    if !source.get(range.clone())?.contains("::") {
        return None;
    }
    match tag {
        Tag::BlockQuote(_) => {
            let text = source.get(range)?;
            let content = strip_quote_markers(text);
            if content.len() >= text.len() {
                return None;
            }
            let children = super::parse_fragment(&content, options);
            Some(Node::new(NodeKind::BlockQuote).with_children(children))
        }
        Tag::Item => {
            let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
            let checked = task_marker(inner);
            let text = source.get(line_start..range.end)?;
            let content = strip_item_marker(text, checked.is_some())?;

            let mut children = super::parse_fragment(&content, options);
            if !is_loose(inner) {
                children = unwrap_paragraphs(children);
            }
            let mut item = Node::new(NodeKind::ListItem).with_children(children);
            if let Some(checked) = checked {
                item.attributes.insert("checked".to_owned(), checked.to_string());
            }
            Some(item)
        }
        _ => None,
    }
}

/// Remove `>` markers; lazy continuation lines are kept as they are.
fn strip_quote_markers(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            match trimmed.strip_prefix('>') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect()
}

/// Remove the list marker from the first line and the content indentation
/// from the rest.
fn strip_item_marker(text: &str, task: bool) -> Option<String> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    let indent = list_item_indent(first)?;

    let mut head = first.get(indent..).unwrap_or_default();
    if task && head.starts_with('[') {
        head = head.get(3..).unwrap_or_default().trim_start_matches([' ', '\t']);
    }

    let mut content = String::with_capacity(text.len());
    content.push_str(head);
    for line in lines {
        let spaces = line.bytes().take(indent).take_while(|&b| b == b' ').count();
        content.push_str(&line[spaces..]);
    }
    Some(content)
}

/// Task state of a list item, from its own marker (not a nested item's).
fn task_marker(inner: &[Spanned<'_>]) -> Option<bool> {
    inner
        .iter()
        .take_while(|(event, _)| !matches!(event, Event::Start(Tag::List(_))))
        .find_map(|(event, _)| match event {
            Event::TaskListMarker(checked) => Some(*checked),
            _ => None,
        })
}

/// Loose items wrap their text in paragraphs; tight items do not.
fn is_loose(inner: &[Spanned<'_>]) -> bool {
    let mut depth = 0usize;
    for (event, _) in inner {
        match event {
            Event::Start(Tag::Paragraph) if depth == 0 => return true,
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

/// Stack-based tree construction from a flat event stream.
///
/// Every `Start` pushes a node and the matching `End` pops it into its
/// parent. Tags without a tree counterpart push a transparent placeholder
/// (a nested root) whose children are spliced into the parent.
struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Root)],
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(start_node(tag)),
            Event::End(end) => self.end(end),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(Node::new(NodeKind::InlineCode).with_value(&*code)),
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push(Node::new(NodeKind::Break)),
            Event::Rule => self.push(Node::new(NodeKind::ThematicBreak)),
            Event::TaskListMarker(checked) => self.task_marker(checked),
            Event::FootnoteReference(text)
            | Event::InlineMath(text)
            | Event::DisplayMath(text) => self.text(&text),
        }
    }

    fn end(&mut self, end: TagEnd) {
        if end == TagEnd::Image
            && let Some(image) = self.stack.last_mut()
        {
            // Image descriptions arrive as children; the tree keeps them as `alt`.
            let alt = image.text_content();
            image.children.clear();
            image.attributes.insert("alt".to_owned(), alt);
        }
        self.close();
    }

    /// Pop the top node into its parent.
    fn close(&mut self) {
        let Some(node) = self.stack.pop() else {
            return;
        };
        let Some(parent) = self.stack.last_mut() else {
            self.stack.push(node);
            return;
        };
        if node.kind == NodeKind::Root {
            parent.children.extend(node.children);
        } else {
            parent.children.push(node);
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn text(&mut self, text: &str) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.kind == NodeKind::Code {
            top.value.push_str(text);
            return;
        }
        match top.children.last_mut() {
            Some(last) if last.kind == NodeKind::Text => last.value.push_str(text),
            _ => top.children.push(Node::text(text)),
        }
    }

    fn html(&mut self, html: &str) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.kind == NodeKind::Html {
            top.value.push_str(html);
        } else {
            top.children.push(Node::raw(html));
        }
    }

    fn task_marker(&mut self, checked: bool) {
        if let Some(item) = self
            .stack
            .iter_mut()
            .rev()
            .find(|node| node.kind == NodeKind::ListItem)
        {
            item.attributes
                .insert("checked".to_owned(), checked.to_string());
        }
    }
}

fn start_node(tag: Tag<'_>) -> Node {
    match tag {
        Tag::Paragraph => Node::new(NodeKind::Paragraph),
        Tag::Heading { level, .. } => {
            Node::new(NodeKind::Heading).with_attribute("depth", heading_depth(level).to_string())
        }
        Tag::BlockQuote(_) => Node::new(NodeKind::BlockQuote),
        Tag::CodeBlock(kind) => {
            let node = Node::new(NodeKind::Code);
            match kind {
                CodeBlockKind::Fenced(info) => {
                    match info.split_whitespace().next() {
                        Some(lang) => node.with_attribute("lang", lang),
                        None => node,
                    }
                }
                CodeBlockKind::Indented => node,
            }
        }
        Tag::HtmlBlock => Node::raw(""),
        Tag::List(start) => {
            let node = Node::new(NodeKind::List);
            match start {
                Some(start) => node
                    .with_attribute("ordered", "true")
                    .with_attribute("start", start.to_string()),
                None => node.with_attribute("ordered", "false"),
            }
        }
        Tag::Item => Node::new(NodeKind::ListItem),
        Tag::Table(alignments) => {
            let align: Vec<&str> = alignments.iter().copied().map(alignment_name).collect();
            Node::new(NodeKind::Table).with_attribute("align", align.join(","))
        }
        // pulldown-cmark puts head cells directly under TableHead
        Tag::TableHead => Node::new(NodeKind::TableRow).with_attribute("header", "true"),
        Tag::TableRow => Node::new(NodeKind::TableRow),
        Tag::TableCell => Node::new(NodeKind::TableCell),
        Tag::Emphasis => Node::new(NodeKind::Emphasis),
        Tag::Strong => Node::new(NodeKind::Strong),
        Tag::Strikethrough => Node::new(NodeKind::Delete),
        Tag::Link {
            dest_url, title, ..
        } => with_title(Node::new(NodeKind::Link).with_attribute("url", &*dest_url), &title),
        Tag::Image {
            dest_url, title, ..
        } => with_title(Node::new(NodeKind::Image).with_attribute("url", &*dest_url), &title),
        Tag::FootnoteDefinition(_)
        | Tag::DefinitionList
        | Tag::DefinitionListTitle
        | Tag::DefinitionListDefinition
        | Tag::Superscript
        | Tag::Subscript
        | Tag::MetadataBlock(_) => Node::new(NodeKind::Root),
    }
}

fn with_title(node: Node, title: &str) -> Node {
    if title.is_empty() {
        node
    } else {
        node.with_attribute("title", title)
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment_name(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "none",
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}
