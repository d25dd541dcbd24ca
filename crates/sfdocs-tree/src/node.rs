//! Tree node representation for parsed markdown.

use std::collections::BTreeMap;

/// Category of a [`Node`].
///
/// The kind decides which other fields of the node are meaningful: text-like
/// kinds carry [`Node::value`], containers carry [`Node::children`], and
/// directive kinds carry [`Node::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum NodeKind {
    /// Document root.
    Root,
    Paragraph,
    /// Heading, level stored in the `depth` attribute.
    Heading,
    ThematicBreak,
    BlockQuote,
    /// List, `ordered` and `start` attributes.
    List,
    /// List item, `checked` attribute for task items.
    ListItem,
    /// Fenced or indented code block, language in the `lang` attribute.
    Code,
    /// Raw output. [`Node::value`] is emitted without escaping.
    Html,
    Text,
    Emphasis,
    Strong,
    Delete,
    InlineCode,
    Break,
    /// Link, `url` and `title` attributes.
    Link,
    /// Image, `url`, `alt` and `title` attributes.
    Image,
    /// Table, column alignments in the `align` attribute.
    Table,
    /// Table row, `header` attribute on the head row.
    TableRow,
    TableCell,
    /// Container directive: `:::name` ... `:::`
    ContainerDirective,
    /// Leaf directive: `::name[label]{attrs}`
    LeafDirective,
    /// Text directive: `:name[label]{attrs}`
    TextDirective,
}

impl NodeKind {
    /// Whether this kind is one of the three directive kinds.
    #[must_use]
    pub fn is_directive(self) -> bool {
        matches!(
            self,
            Self::ContainerDirective | Self::LeafDirective | Self::TextDirective
        )
    }

    /// Whether nodes of this kind hold literal text in [`Node::value`].
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Text | Self::Code | Self::InlineCode | Self::Html)
    }
}

/// Renderer-facing hints written by rewrite rules.
///
/// Unlike [`Node::attributes`], which come from the source document, metadata
/// tells the tree converter how to render the node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Metadata {
    /// Element tag name to emit instead of the default mapping.
    pub target_element: String,
    /// Properties of the emitted element.
    pub target_properties: BTreeMap<String, String>,
}

impl Metadata {
    /// Create metadata targeting the given element.
    #[must_use]
    pub fn new(target_element: impl Into<String>) -> Self {
        Self {
            target_element: target_element.into(),
            target_properties: BTreeMap::new(),
        }
    }

    /// Add a target property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.target_properties.insert(key.into(), value.into());
        self
    }
}

/// Node in a parsed markdown tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Node {
    /// Node category.
    pub kind: NodeKind,
    /// Directive name (e.g., "warning", "video").
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Attributes supplied by the source syntax.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub attributes: BTreeMap<String, String>,
    /// Rendering hints attached by rewrite rules.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub metadata: Option<Metadata>,
    /// Child nodes in document order.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
    /// Literal text, or raw output content for [`NodeKind::Html`].
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub value: String,
}

impl Node {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            attributes: BTreeMap::new(),
            metadata: None,
            children: Vec::new(),
            value: String::new(),
        }
    }

    /// Create a document root with the given children.
    #[must_use]
    pub fn root(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Root).with_children(children)
    }

    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_value(value)
    }

    /// Create a raw output node whose content bypasses escaping.
    #[must_use]
    pub fn raw(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Html).with_value(content)
    }

    /// Set the directive name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Set literal value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Check whether this node is a directive of the given kind and name.
    #[must_use]
    pub fn is_directive(&self, kind: NodeKind, name: &str) -> bool {
        self.kind == kind && kind.is_directive() && self.name.as_deref() == Some(name)
    }

    /// Concatenated literal text of this node and all descendants.
    ///
    /// Raw output is not text and is skipped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node.kind {
        NodeKind::Html => {}
        kind if kind.is_literal() => out.push_str(&node.value),
        _ => {
            for child in &node.children {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_empty() {
        let node = Node::new(NodeKind::Paragraph);
        assert_eq!(node.kind, NodeKind::Paragraph);
        assert!(node.name.is_none());
        assert!(node.attributes.is_empty());
        assert!(node.metadata.is_none());
        assert!(node.children.is_empty());
        assert!(node.value.is_empty());
    }

    #[test]
    fn test_is_directive_matches_kind_and_name() {
        let node = Node::new(NodeKind::LeafDirective).with_name("video");
        assert!(node.is_directive(NodeKind::LeafDirective, "video"));
        assert!(!node.is_directive(NodeKind::ContainerDirective, "video"));
        assert!(!node.is_directive(NodeKind::LeafDirective, "youtube"));
    }

    #[test]
    fn test_is_directive_requires_directive_kind() {
        let node = Node::new(NodeKind::Paragraph).with_name("note");
        assert!(!node.is_directive(NodeKind::Paragraph, "note"));
    }

    #[test]
    fn test_attribute_lookup() {
        let node = Node::new(NodeKind::LeafDirective)
            .with_attribute("src", "a.mp4")
            .with_attribute("type", "local");
        assert_eq!(node.attribute("src"), Some("a.mp4"));
        assert_eq!(node.attribute("title"), None);
    }

    #[test]
    fn test_text_content_skips_raw() {
        let node = Node::new(NodeKind::Paragraph).with_children(vec![
            Node::text("Hello "),
            Node::new(NodeKind::Strong).with_children(vec![Node::text("world")]),
            Node::raw("<br>"),
        ]);
        assert_eq!(node.text_content(), "Hello world");
    }

    #[test]
    fn test_node_count_counts_subtree() {
        let tree = Node::root(vec![
            Node::new(NodeKind::Paragraph).with_children(vec![Node::text("a")]),
            Node::new(NodeKind::ThematicBreak),
        ]);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_metadata_builder() {
        let meta = Metadata::new("doc-content-callout")
            .with_property("variant", "tip")
            .with_property("header", "Tip");
        assert_eq!(meta.target_element, "doc-content-callout");
        let keys: Vec<_> = meta.target_properties.keys().collect();
        assert_eq!(keys, vec!["header", "variant"]);
    }
}
