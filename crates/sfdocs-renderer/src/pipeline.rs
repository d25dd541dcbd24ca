//! Parse, rewrite, convert and serialize in one place.
//!
//! A [`Pipeline`] owns an ordered list of rewrite rules. Each rule runs in its
//! own traversal of the tree, in registration order. Rules must select
//! disjoint node sets so that their order does not matter; a rule that
//! deliberately depends on an earlier one is registered with
//! [`PipelineBuilder::with_ordered_rule`].

use sfdocs_tree::{Action, Node, SelectionSet, try_traverse};

use crate::convert::{ConvertOptions, to_target};
use crate::hast::HtmlNode;
use crate::parse::{ParseOptions, parse_document};
use crate::rules::{
    CalloutConfig, CalloutRule, RewriteError, RewriteRule, RuleError, VideoPolicy, VideoRule,
};
use crate::serialize::to_html;

/// Error building a pipeline.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Two rules can match the same node and no order was declared.
    #[error("Rules '{first}' and '{second}' both select {selector}")]
    OverlappingRules {
        first: String,
        second: String,
        selector: String,
    },
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Error rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A rule failed; the partially rewritten tree is discarded.
    #[error("Rule '{rule}' failed: {source}")]
    Rewrite {
        rule: String,
        #[source]
        source: RewriteError,
    },
}

/// Settings for [`Pipeline::from_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub callouts: CalloutConfig,
    pub video: VideoPolicy,
    pub parse: ParseOptions,
    pub convert: ConvertOptions,
}

/// Every intermediate result of one document run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stages {
    /// Tree straight from the parser.
    pub source: Node,
    /// Tree after all rewrite rules.
    pub rewritten: Node,
    /// HTML tree.
    pub target: HtmlNode,
    /// Serialized output.
    pub html: String,
}

struct RegisteredRule {
    rule: Box<dyn RewriteRule>,
    selection: SelectionSet,
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    rules: Vec<(RegisteredRule, bool)>,
    parse: ParseOptions,
    convert: ConvertOptions,
}

impl PipelineBuilder {
    /// Add a rule that must not overlap any earlier rule.
    #[must_use]
    pub fn with_rule(self, rule: impl RewriteRule + 'static) -> Self {
        self.push(rule, false)
    }

    /// Add a rule that intentionally runs after, and may see the output of,
    /// earlier overlapping rules.
    #[must_use]
    pub fn with_ordered_rule(self, rule: impl RewriteRule + 'static) -> Self {
        self.push(rule, true)
    }

    #[must_use]
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    #[must_use]
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }

    fn push(mut self, rule: impl RewriteRule + 'static, ordered: bool) -> Self {
        let selection = rule.selection();
        self.rules.push((
            RegisteredRule {
                rule: Box::new(rule),
                selection,
            },
            ordered,
        ));
        self
    }

    /// Check rule disjointness and build the pipeline.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        for (index, (later, ordered)) in self.rules.iter().enumerate() {
            if *ordered {
                continue;
            }
            for (earlier, _) in &self.rules[..index] {
                if let Some((selector, _)) = earlier.selection.overlap(&later.selection) {
                    return Err(PipelineError::OverlappingRules {
                        first: earlier.rule.name().to_owned(),
                        second: later.rule.name().to_owned(),
                        selector: selector.to_string(),
                    });
                }
            }
        }

        Ok(Pipeline {
            rules: self.rules.into_iter().map(|(rule, _)| rule).collect(),
            parse: self.parse,
            convert: self.convert,
        })
    }
}

/// Markdown to HTML pipeline with rewrite rules.
///
/// # Example
///
/// ```
/// use sfdocs_renderer::{Pipeline, PipelineConfig};
///
/// let pipeline = Pipeline::from_config(PipelineConfig::default()).unwrap();
/// let html = pipeline.render(":::warning\nBe careful.\n:::\n").unwrap();
/// assert_eq!(
///     html,
///     "<doc-content-callout header=\"Warning\" variant=\"warning\"><p>Be careful.</p></doc-content-callout>"
/// );
/// ```
pub struct Pipeline {
    rules: Vec<RegisteredRule>,
    parse: ParseOptions,
    convert: ConvertOptions,
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Pipeline with the video and callout rules.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::builder()
            .with_parse_options(config.parse)
            .with_convert_options(config.convert)
            .with_rule(VideoRule::new(config.video))
            .with_rule(CalloutRule::new(config.callouts)?)
            .build()
    }

    /// Rule names in execution order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|registered| registered.rule.name())
    }

    #[must_use]
    pub fn parse(&self, source: &str) -> Node {
        parse_document(source, &self.parse)
    }

    /// Run every rule over `tree`, one traversal per rule.
    ///
    /// On error the tree may be partially rewritten and should be dropped.
    pub fn rewrite(&self, tree: &mut Node) -> Result<(), RenderError> {
        for RegisteredRule { rule, selection } in &self.rules {
            let mut touched = 0usize;
            try_traverse(tree, |node, position| -> Result<Action, RewriteError> {
                if !selection.matches(node) {
                    return Ok(Action::Keep);
                }
                let action = rule.rewrite(node, position)?;
                if action != Action::Keep {
                    touched += 1;
                }
                Ok(action)
            })
            .map_err(|source| RenderError::Rewrite {
                rule: rule.name().to_owned(),
                source,
            })?;
            tracing::debug!(rule = rule.name(), touched, "Applied rewrite rule");
        }
        Ok(())
    }

    #[must_use]
    pub fn convert(&self, tree: &Node) -> HtmlNode {
        to_target(tree, &self.convert)
    }

    /// Render markdown source to HTML.
    pub fn render(&self, source: &str) -> Result<String, RenderError> {
        let mut tree = self.parse(source);
        self.rewrite(&mut tree)?;
        Ok(to_html(&self.convert(&tree)))
    }

    /// Render markdown source, keeping every intermediate stage.
    pub fn stages(&self, source: &str) -> Result<Stages, RenderError> {
        let parsed = self.parse(source);
        let mut rewritten = parsed.clone();
        self.rewrite(&mut rewritten)?;
        let target = self.convert(&rewritten);
        let html = to_html(&target);
        Ok(Stages {
            source: parsed,
            rewritten,
            target,
            html,
        })
    }
}
