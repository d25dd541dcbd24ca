//! Rewrite rules applied to the parsed tree.
//!
//! A rule declares the nodes it matches as a [`SelectionSet`] and answers
//! each matching node with an [`Action`]. The pipeline only offers a rule
//! the nodes in its selection set, so rules with disjoint selection sets
//! commute.
//!
//! # Example
//!
//! ```
//! use sfdocs_renderer::rules::{RewriteError, RewriteRule};
//! use sfdocs_tree::{Action, Node, NodeKind, Position, SelectionSet, Selector};
//!
//! struct TocRule;
//!
//! impl RewriteRule for TocRule {
//!     fn name(&self) -> &str { "toc" }
//!
//!     fn selection(&self) -> SelectionSet {
//!         SelectionSet::new().with(Selector::named(NodeKind::LeafDirective, "toc"))
//!     }
//!
//!     fn rewrite(&self, node: &Node, _position: Position<'_>) -> Result<Action, RewriteError> {
//!         if !node.children.is_empty() {
//!             return Err(RewriteError::Invalid("toc takes no label".to_owned()));
//!         }
//!         Ok(Action::Replace(Node::raw("<nav class=\"toc\"></nav>")))
//!     }
//! }
//!
//! let toc = Node::new(NodeKind::LeafDirective).with_name("toc");
//! assert!(TocRule.rewrite(&toc, Position::root()).is_ok());
//!
//! let labelled = toc.with_children(vec![Node::text("Contents")]);
//! assert_eq!(
//!     TocRule.rewrite(&labelled, Position::root()).unwrap_err().to_string(),
//!     "toc takes no label"
//! );
//! ```

mod callout;
mod video;

pub use callout::{CalloutConfig, CalloutRule, DEFAULT_CALLOUT_ELEMENT, DEFAULT_CATEGORIES};
pub use video::{VideoPolicy, VideoRule, VideoSource, VideoSpec};

use sfdocs_tree::{Action, Node, Position, SelectionSet};

/// A self-contained tree transformation.
///
/// Rules are immutable once built and may be shared between threads; each
/// document run owns its own tree.
pub trait RewriteRule: Send + Sync {
    /// Rule name used in logs and errors.
    fn name(&self) -> &str;

    /// Nodes this rule matches.
    fn selection(&self) -> SelectionSet;

    /// Rewrite a node from the selection set.
    ///
    /// Returning an error aborts the whole pipeline run for the document.
    fn rewrite(&self, node: &Node, position: Position<'_>) -> Result<Action, RewriteError>;
}

/// Error building a rewrite rule from its configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    /// A callout category has no display title.
    #[error("Callout category '{0}' has no display title")]
    MissingTitle(String),
    /// The callout element name is not a valid tag name.
    #[error("Invalid callout element name: '{0}'")]
    InvalidElement(String),
}

/// Error raised by a rule while rewriting a node.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RewriteError {
    /// A video directive has no `type` attribute.
    #[error("Video directive has no type (expected 'youtube' or 'local')")]
    MissingVideoType,
    /// A video directive has an unsupported `type` attribute.
    #[error("Unknown video type '{0}' (expected 'youtube' or 'local')")]
    UnknownVideoType(String),
    /// Failure reported by a rule outside this crate.
    #[error("{0}")]
    Invalid(String),
}

/// Check whether `name` can be used as an HTML tag name.
#[must_use]
pub fn is_valid_tag_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
