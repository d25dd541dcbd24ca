//! CLI command implementations.

pub(crate) mod demo;
pub(crate) mod render;

pub(crate) use demo::DemoArgs;
pub(crate) use render::RenderArgs;

use clap::ValueEnum;
use sfdocs_config::Config;
use sfdocs_renderer::rules::CalloutConfig;
use sfdocs_renderer::{ConvertOptions, ParseOptions, Pipeline, PipelineConfig, Stages};

use crate::error::CliError;

/// Pipeline stage to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Stage {
    /// Syntax tree straight from the parser (JSON).
    Source,
    /// Syntax tree after rewrite rules (JSON).
    Rewritten,
    /// HTML tree (JSON).
    Target,
    /// Serialized HTML.
    Html,
}

impl Stage {
    /// Text for this stage of a rendered document.
    pub(crate) fn format(self, stages: &Stages) -> Result<String, CliError> {
        let text = match self {
            Self::Source => serde_json::to_string_pretty(&stages.source)?,
            Self::Rewritten => serde_json::to_string_pretty(&stages.rewritten)?,
            Self::Target => serde_json::to_string_pretty(&stages.target)?,
            Self::Html => stages.html.clone(),
        };
        Ok(text)
    }
}

/// Map loaded configuration onto renderer settings.
pub(crate) fn pipeline_config(config: &Config) -> PipelineConfig {
    PipelineConfig {
        callouts: CalloutConfig::from(&config.callouts),
        video: config.video.policy,
        parse: ParseOptions {
            gfm: config.render.gfm,
        },
        convert: ConvertOptions {
            allow_raw_html: config.render.allow_raw_html,
        },
    }
}

/// Build the default pipeline for a configuration.
pub(crate) fn build_pipeline(config: &Config) -> Result<Pipeline, CliError> {
    let pipeline = Pipeline::from_config(pipeline_config(config))?;
    tracing::info!(
        rules = ?pipeline.rule_names().collect::<Vec<_>>(),
        config = ?config.config_path,
        "Pipeline ready"
    );
    Ok(pipeline)
}
