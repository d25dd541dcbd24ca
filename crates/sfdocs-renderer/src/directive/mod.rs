//! `CommonMark` directive syntax.
//!
//! Three directive forms are recognized:
//!
//! - **Text** `:name[label]{attrs}` inside a paragraph
//! - **Leaf** `::name[label]{attrs}` alone on a line
//! - **Container** `:::name[label]{attrs}` ... `:::` wrapping block content
//!
//! Containers nest; a closing line needs at least as many colons as the
//! opening line. Directive markers inside fenced code are ignored.

mod args;
mod fence;
mod parser;

pub use args::DirectiveArgs;
pub(crate) use fence::FenceTracker;
pub(crate) use parser::{BlockDirective, find_text_directive, parse_block_line};
