//! Depth-first rewrite traversal.
//!
//! The traversal visits every node once in pre-order (parent before its
//! children). The visitor never mutates the tree itself; it returns an
//! [`Action`] and the traversal applies it before descending.

use std::convert::Infallible;

use crate::{Metadata, Node};

/// What to do with a visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the node unchanged.
    Keep,
    /// Set the node's metadata, overwriting any earlier value.
    Annotate(Metadata),
    /// Replace the node at its position in the parent's child list.
    ///
    /// The replacement's children are visited in the same pass; the
    /// replacement itself is not offered to the visitor again.
    Replace(Node),
}

/// Where a visited node sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Position<'a> {
    /// Index in the parent's child list, `None` for the root.
    pub index: Option<usize>,
    /// Parent node, `None` for the root.
    pub parent: Option<&'a Node>,
    /// Distance from the root (the root is at depth 0).
    pub depth: usize,
}

impl Position<'_> {
    /// Position of the tree root.
    #[must_use]
    pub fn root() -> Self {
        Position {
            index: None,
            parent: None,
            depth: 0,
        }
    }

    /// Whether this is the root position.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Visit every node of `root` in pre-order with an infallible visitor.
pub fn traverse<F>(root: &mut Node, mut visitor: F)
where
    F: FnMut(&Node, Position<'_>) -> Action,
{
    let result: Result<(), Infallible> =
        try_traverse(root, |node, position| Ok(visitor(node, position)));
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Visit every node of `root` in pre-order, stopping at the first error.
///
/// Actions already applied before the error stay applied; callers treat the
/// tree as invalid once an error is returned.
pub fn try_traverse<E, F>(root: &mut Node, mut visitor: F) -> Result<(), E>
where
    F: FnMut(&Node, Position<'_>) -> Result<Action, E>,
{
    let action = visitor(root, Position::root())?;
    apply(root, action);
    walk_children(root, &mut visitor, 1)
}

fn walk_children<E, F>(parent: &mut Node, visitor: &mut F, depth: usize) -> Result<(), E>
where
    F: FnMut(&Node, Position<'_>) -> Result<Action, E>,
{
    for index in 0..parent.children.len() {
        let position = Position {
            index: Some(index),
            parent: Some(&*parent),
            depth,
        };
        let action = visitor(&parent.children[index], position)?;
        let child = &mut parent.children[index];
        apply(child, action);
        walk_children(child, visitor, depth + 1)?;
    }
    Ok(())
}

fn apply(node: &mut Node, action: Action) {
    match action {
        Action::Keep => {}
        Action::Annotate(metadata) => node.metadata = Some(metadata),
        Action::Replace(replacement) => *node = replacement,
    }
}
