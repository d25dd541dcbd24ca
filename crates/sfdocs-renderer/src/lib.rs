//! Directive-aware markdown to HTML rendering.
//!
//! Documents go through four stages:
//!
//! 1. **Parse**: markdown with directive syntax becomes a [`Node`] tree
//!    ([`parse_document`]).
//! 2. **Rewrite**: [`rules::RewriteRule`]s annotate or replace directive
//!    nodes, one traversal per rule ([`Pipeline::rewrite`]).
//! 3. **Convert**: the tree becomes an [`HtmlNode`] tree ([`to_target`]).
//! 4. **Serialize**: the HTML tree becomes text ([`to_html`]).
//!
//! Two rules ship with the crate: [`rules::CalloutRule`] turns
//! `:::note`-style containers into callout elements, and
//! [`rules::VideoRule`] turns `::video{...}` leaves into embed markup.
//!
//! # Example
//!
//! ```
//! use sfdocs_renderer::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::from_config(PipelineConfig::default()).unwrap();
//! let html = pipeline
//!     .render(r#"::video{src="https://x/y" title="Demo" type="youtube"}"#)
//!     .unwrap();
//! assert!(html.contains(r#"<iframe src="https://x/y"></iframe>"#));
//! ```
//!
//! [`Node`]: sfdocs_tree::Node

mod convert;
pub mod directive;
mod hast;
mod parse;
mod pipeline;
pub mod rules;
mod serialize;

pub use convert::{ConvertOptions, to_target};
pub use hast::{Element, HtmlNode};
pub use parse::{ParseOptions, parse_document};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, PipelineError, RenderError, Stages};
pub use serialize::{escape_html, to_html};
