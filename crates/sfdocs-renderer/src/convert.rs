//! Syntax tree to HTML tree conversion.
//!
//! Nodes carrying [`Metadata`](sfdocs_tree::Metadata) become the element it
//! names. Directives without metadata become a bare `div`. Both keep their
//! converted children as they are, with no separators added.
//!
//! Everything else follows the default markdown to HTML mapping. Markdown
//! block containers separate their children with newline text nodes so the
//! serialized output keeps one block per line.

use sfdocs_tree::{Node, NodeKind};

use crate::hast::{Element, HtmlNode};

/// Options for [`to_target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Keep raw HTML nodes (source HTML and rule output) in the target tree.
    pub allow_raw_html: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

/// Convert a syntax tree into an HTML tree.
///
/// # Example
///
/// ```
/// use sfdocs_renderer::{ConvertOptions, to_html, to_target};
/// use sfdocs_tree::{Metadata, Node, NodeKind};
///
/// let mut callout = Node::new(NodeKind::ContainerDirective)
///     .with_name("tip")
///     .with_children(vec![Node::new(NodeKind::Paragraph).with_children(vec![Node::text("Hi")])]);
/// callout.metadata = Some(Metadata::new("aside").with_property("variant", "tip"));
///
/// let html = to_html(&to_target(&Node::root(vec![callout]), &ConvertOptions::default()));
/// assert_eq!(html, "<aside variant=\"tip\"><p>Hi</p></aside>");
/// ```
#[must_use]
pub fn to_target(root: &Node, options: &ConvertOptions) -> HtmlNode {
    Converter { options }.node(root).unwrap_or(HtmlNode::Root {
        children: Vec::new(),
    })
}

struct Converter<'a> {
    options: &'a ConvertOptions,
}

impl Converter<'_> {
    /// Convert one node. `None` means the node produces no output.
    fn node(&self, node: &Node) -> Option<HtmlNode> {
        if let Some(metadata) = &node.metadata {
            let mut element = Element::new(&metadata.target_element);
            element.properties.clone_from(&metadata.target_properties);
            element.children = self.inline(&node.children);
            return Some(element.into());
        }

        let converted: HtmlNode = match node.kind {
            NodeKind::Root => HtmlNode::Root {
                children: self.blocks(&node.children, false),
            },
            NodeKind::Text => HtmlNode::text(&node.value),
            NodeKind::Html => {
                if !self.options.allow_raw_html {
                    tracing::warn!(len = node.value.len(), "Dropping raw HTML");
                    return None;
                }
                HtmlNode::raw(&node.value)
            }
            NodeKind::Paragraph => self.element("p", node).into(),
            NodeKind::Heading => {
                let depth = node.attribute("depth").unwrap_or("1");
                self.element(&format!("h{depth}"), node).into()
            }
            NodeKind::ThematicBreak => Element::new("hr").into(),
            NodeKind::Break => {
                return Some(HtmlNode::Root {
                    children: vec![Element::new("br").into(), HtmlNode::text("\n")],
                });
            }
            NodeKind::BlockQuote => Element::new("blockquote")
                .with_children(self.blocks(&node.children, true))
                .into(),
            NodeKind::List => self.list(node).into(),
            NodeKind::ListItem => self.list_item(node).into(),
            NodeKind::Code => code_block(node).into(),
            NodeKind::InlineCode => Element::new("code")
                .with_child(HtmlNode::text(&node.value))
                .into(),
            NodeKind::Emphasis => self.element("em", node).into(),
            NodeKind::Strong => self.element("strong", node).into(),
            NodeKind::Delete => self.element("del", node).into(),
            NodeKind::Link => {
                let mut element = self.element("a", node);
                copy_attribute(node, "url", &mut element, "href");
                copy_attribute(node, "title", &mut element, "title");
                element.into()
            }
            NodeKind::Image => {
                let mut element = Element::new("img");
                copy_attribute(node, "url", &mut element, "src");
                element.properties.insert(
                    "alt".to_owned(),
                    node.attribute("alt").unwrap_or_default().to_owned(),
                );
                copy_attribute(node, "title", &mut element, "title");
                element.into()
            }
            NodeKind::Table => self.table(node).into(),
            NodeKind::TableRow => self.row(node, &[]).into(),
            NodeKind::TableCell => self.element("td", node).into(),
            NodeKind::ContainerDirective
            | NodeKind::LeafDirective
            | NodeKind::TextDirective => self.element("div", node).into(),
        };
        Some(converted)
    }

    /// Element with inline children.
    fn element(&self, tag: &str, node: &Node) -> Element {
        Element::new(tag).with_children(self.inline(&node.children))
    }

    fn inline(&self, children: &[Node]) -> Vec<HtmlNode> {
        children.iter().filter_map(|child| self.node(child)).collect()
    }

    /// Block children separated by newlines, optionally also before the
    /// first and after the last child.
    fn blocks(&self, children: &[Node], edges: bool) -> Vec<HtmlNode> {
        let converted = self.inline(children);
        if converted.is_empty() {
            return converted;
        }
        let mut out = Vec::with_capacity(converted.len() * 2 + 1);
        if edges {
            out.push(HtmlNode::text("\n"));
        }
        for (index, child) in converted.into_iter().enumerate() {
            if index > 0 {
                out.push(HtmlNode::text("\n"));
            }
            out.push(child);
        }
        if edges {
            out.push(HtmlNode::text("\n"));
        }
        out
    }

    fn list(&self, node: &Node) -> Element {
        let ordered = node.attribute("ordered") == Some("true");
        let mut element = Element::new(if ordered { "ol" } else { "ul" })
            .with_children(self.blocks(&node.children, true));
        if ordered
            && let Some(start) = node.attribute("start")
            && start != "1"
        {
            element.properties.insert("start".to_owned(), start.to_owned());
        }
        element
    }

    fn list_item(&self, node: &Node) -> Element {
        let mut element = Element::new("li");
        let mut children: Vec<HtmlNode> = Vec::new();
        if let Some(checked) = node.attribute("checked") {
            element
                .properties
                .insert("class".to_owned(), "task-list-item".to_owned());
            let mut checkbox = Element::new("input")
                .with_property("type", "checkbox")
                .with_property("disabled", "");
            if checked == "true" {
                checkbox.properties.insert("checked".to_owned(), String::new());
            }
            children.push(checkbox.into());
            children.push(HtmlNode::text(" "));
        }

        // Loose items hold paragraphs and nested blocks; tight items hold phrasing.
        if node.children.iter().all(|child| is_phrasing(child.kind)) {
            children.extend(self.inline(&node.children));
        } else {
            children.extend(self.blocks(&node.children, true));
        }
        element.children = children;
        element
    }

    fn table(&self, node: &Node) -> Element {
        let align: Vec<&str> = node
            .attribute("align")
            .map(|value| value.split(',').collect())
            .unwrap_or_default();

        let (head, body): (Vec<&Node>, Vec<&Node>) = node
            .children
            .iter()
            .partition(|row| row.attribute("header") == Some("true"));

        let mut sections = Vec::new();
        for (tag, rows) in [("thead", head), ("tbody", body)] {
            if rows.is_empty() {
                continue;
            }
            let rows = rows
                .iter()
                .map(|row| HtmlNode::from(self.row(row, &align)))
                .collect();
            sections.push(Element::new(tag).with_children(join_lines(rows)).into());
        }
        Element::new("table").with_children(join_lines(sections))
    }

    fn row(&self, node: &Node, align: &[&str]) -> Element {
        let tag = if node.attribute("header") == Some("true") {
            "th"
        } else {
            "td"
        };
        let cells = node
            .children
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let mut element = self.element(tag, cell);
                if let Some(&value) = align.get(index)
                    && value != "none"
                {
                    element.properties.insert("align".to_owned(), value.to_owned());
                }
                HtmlNode::from(element)
            })
            .collect();
        Element::new("tr").with_children(join_lines(cells))
    }
}

/// Wrap nodes with newlines before, between and after.
fn join_lines(nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    let mut out = vec![HtmlNode::text("\n")];
    for node in nodes {
        out.push(node);
        out.push(HtmlNode::text("\n"));
    }
    out
}

fn code_block(node: &Node) -> Element {
    let mut code = Element::new("code").with_child(HtmlNode::text(&node.value));
    if let Some(lang) = node.attribute("lang") {
        code.properties
            .insert("class".to_owned(), format!("language-{lang}"));
    }
    Element::new("pre").with_child(code)
}

fn copy_attribute(node: &Node, from: &str, element: &mut Element, to: &str) {
    if let Some(value) = node.attribute(from) {
        element.properties.insert(to.to_owned(), value.to_owned());
    }
}

fn is_phrasing(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Delete
            | NodeKind::InlineCode
            | NodeKind::Break
            | NodeKind::Link
            | NodeKind::Image
            | NodeKind::Html
            | NodeKind::TextDirective
    )
}
