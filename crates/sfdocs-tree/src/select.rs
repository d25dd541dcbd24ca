//! Selection sets: which nodes a rewrite rule matches.
//!
//! Two rules whose selection sets are disjoint never touch the same node, so
//! running them in either order yields the same tree.

use std::fmt;

use crate::{Node, NodeKind};

/// A `(kind, name)` pair matched by a rewrite rule.
///
/// A `None` name matches every node of the kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Node kind.
    pub kind: NodeKind,
    /// Directive name, or `None` for any name.
    pub name: Option<String>,
}

impl Selector {
    /// Match nodes of `kind` with the given `name`.
    #[must_use]
    pub fn named(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
        }
    }

    /// Match every node of `kind`.
    #[must_use]
    pub fn any(kind: NodeKind) -> Self {
        Self { kind, name: None }
    }

    /// Check whether `node` is selected.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        node.kind == self.kind
            && self
                .name
                .as_deref()
                .is_none_or(|name| node.name.as_deref() == Some(name))
    }

    /// Check whether some node could be selected by both selectors.
    #[must_use]
    pub fn overlaps(&self, other: &Selector) -> bool {
        self.kind == other.kind
            && match (&self.name, &other.name) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{:?} '{name}'", self.kind),
            None => write!(f, "any {:?}", self.kind),
        }
    }
}

/// The set of [`Selector`]s a rewrite rule matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selectors: Vec<Selector>,
}

impl SelectionSet {
    /// Create an empty selection set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selector.
    #[must_use]
    pub fn with(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Check whether `node` is selected by any selector.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        self.selectors.iter().any(|s| s.matches(node))
    }

    /// First pair of selectors shared between `self` and `other`, if any.
    #[must_use]
    pub fn overlap<'a>(&'a self, other: &'a SelectionSet) -> Option<(&'a Selector, &'a Selector)> {
        self.selectors.iter().find_map(|a| {
            other
                .selectors
                .iter()
                .find(|b| a.overlaps(b))
                .map(|b| (a, b))
        })
    }

    /// Iterate over selectors.
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }
}

impl FromIterator<Selector> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self {
            selectors: iter.into_iter().collect(),
        }
    }
}
