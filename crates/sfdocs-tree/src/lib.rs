//! Syntax tree model and rewrite traversal for sfdocs.
//!
//! A markdown document is parsed into a tree of [`Node`]s. Rewrite rules walk
//! the tree with [`traverse`] (or [`try_traverse`] for fallible visitors) and
//! answer each visit with an [`Action`]: keep the node, annotate it with
//! renderer [`Metadata`], or replace it in its parent's child list.
//!
//! # Example
//!
//! ```
//! use sfdocs_tree::{Action, Node, NodeKind, traverse};
//!
//! let mut tree = Node::root(vec![
//!     Node::new(NodeKind::LeafDirective).with_name("toc"),
//! ]);
//!
//! traverse(&mut tree, |node, _position| {
//!     if node.is_directive(NodeKind::LeafDirective, "toc") {
//!         Action::Replace(Node::raw("<nav></nav>"))
//!     } else {
//!         Action::Keep
//!     }
//! });
//!
//! assert_eq!(tree.children[0].value, "<nav></nav>");
//! ```

mod node;
mod select;
mod visit;

pub use node::{Metadata, Node, NodeKind};
pub use select::{SelectionSet, Selector};
pub use visit::{Action, Position, traverse, try_traverse};
