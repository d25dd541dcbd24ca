//! CLI error types.

use sfdocs_config::ConfigError;
use sfdocs_renderer::{PipelineError, RenderError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("Failed to serialize stage: {0}")]
    Json(#[from] serde_json::Error),
}
