//! Configuration management for SFDocs.
//!
//! Parses `sfdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [callouts]
//! element = "doc-content-callout"
//! categories = ["note", "tip", "warning", "important", "caution", "danger"]
//!
//! [callouts.titles]
//! danger = "Danger"
//!
//! [video]
//! policy = "strict"
//!
//! [render]
//! gfm = true
//! allow_raw_html = true
//! ```
//!
//! Titles for the built-in categories are always available; `[callouts.titles]`
//! adds titles for new categories or overrides built-in ones.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sfdocs_renderer::rules::{CalloutConfig, DEFAULT_CATEGORIES, is_valid_tag_name};

pub use sfdocs_renderer::rules::VideoPolicy;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sfdocs.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Fail on video directives with a missing or unknown type.
    pub strict_video: Option<bool>,
    /// Override GFM extensions flag.
    pub gfm: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Callout rule configuration.
    pub callouts: CalloutsConfig,
    /// Video rule configuration.
    pub video: VideoConfig,
    /// Parser and HTML output configuration.
    pub render: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[callouts]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalloutsConfig {
    /// Element emitted for callouts.
    pub element: String,
    /// Container directive names treated as callouts.
    pub categories: Vec<String>,
    /// Display title per category, merged over the built-in titles.
    pub titles: BTreeMap<String, String>,
}

impl Default for CalloutsConfig {
    fn default() -> Self {
        CalloutConfig::default().into()
    }
}

impl From<CalloutConfig> for CalloutsConfig {
    fn from(config: CalloutConfig) -> Self {
        Self {
            element: config.element,
            categories: config.categories,
            titles: config.titles,
        }
    }
}

impl From<&CalloutsConfig> for CalloutConfig {
    fn from(config: &CalloutsConfig) -> Self {
        Self {
            element: config.element.clone(),
            categories: config.categories.clone(),
            titles: config.titles.clone(),
        }
    }
}

/// `[video]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Handling of video directives with a missing or unknown `type`.
    pub policy: VideoPolicy,
}

/// `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable GFM extensions (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Keep raw HTML, including video embeds, in the output.
    pub allow_raw_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            allow_raw_html: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sfdocs.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.merge_default_titles();
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(strict) = settings.strict_video {
            self.video.policy = if strict {
                VideoPolicy::Strict
            } else {
                VideoPolicy::Lenient
            };
        }
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn merge_default_titles(&mut self) {
        for (name, title) in DEFAULT_CATEGORIES {
            self.callouts
                .titles
                .entry(name.to_owned())
                .or_insert_with(|| title.to_owned());
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_callouts()
    }

    fn validate_callouts(&self) -> Result<(), ConfigError> {
        let callouts = &self.callouts;
        if !is_valid_tag_name(&callouts.element) {
            return Err(ConfigError::Validation(format!(
                "callouts.element '{}' is not a valid element name",
                callouts.element
            )));
        }

        for (index, category) in callouts.categories.iter().enumerate() {
            if category.is_empty() {
                return Err(ConfigError::Validation(
                    "callouts.categories cannot contain empty names".to_owned(),
                ));
            }
            if callouts.categories[..index].contains(category) {
                return Err(ConfigError::Validation(format!(
                    "callouts.categories lists '{category}' more than once"
                )));
            }
            if !callouts.titles.contains_key(category) {
                return Err(ConfigError::Validation(format!(
                    "callout category '{category}' needs a title in [callouts.titles]"
                )));
            }
        }

        Ok(())
    }
}
