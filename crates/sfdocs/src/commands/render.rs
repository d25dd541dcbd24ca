//! `sfdocs render` command implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use sfdocs_config::{CliSettings, Config};

use super::{Stage, build_pipeline};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render, or `-` for stdin.
    input: PathBuf,

    /// Pipeline stage to print.
    #[arg(long, value_enum, default_value = "html")]
    stage: Stage,

    /// Path to configuration file (default: auto-discover sfdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail on video directives with a missing or unknown type.
    #[arg(long)]
    strict_video: bool,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rendering or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            strict_video: self.strict_video.then_some(true),
            gfm: self.no_gfm.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = build_pipeline(&config)?;

        let source = read_input(&self.input)?;
        let stages = pipeline.stages(&source)?;
        let text = self.stage.format(&stages)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{text}\n"))?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => writeln!(io::stdout().lock(), "{text}")?,
        }
        Ok(())
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let content = if path == Path::new("-") {
        io::read_to_string(io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(input: PathBuf, output: PathBuf, config: PathBuf) -> RenderArgs {
        RenderArgs {
            input,
            stage: Stage::Html,
            config: Some(config),
            strict_video: false,
            no_gfm: false,
            output: Some(output),
            verbose: false,
        }
    }

    #[test]
    fn test_render_file_to_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("page.md");
        let output = tmp.path().join("page.html");
        let config = tmp.path().join("sfdocs.toml");
        std::fs::write(&input, "# Title\n\n:::note\nBody\n:::\n").unwrap();
        std::fs::write(&config, "").unwrap();

        args(input, output.clone(), config).execute().unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "<h1>Title</h1>\n<doc-content-callout header=\"Note\" variant=\"note\"><p>Body</p></doc-content-callout>\n"
        );
    }

    #[test]
    fn test_strict_video_flag_fails_render() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("page.md");
        let output = tmp.path().join("page.html");
        let config = tmp.path().join("sfdocs.toml");
        std::fs::write(&input, "::video{type=vimeo src=a}\n").unwrap();
        std::fs::write(&config, "").unwrap();

        let mut render = args(input, output.clone(), config);
        render.strict_video = true;
        let err = render.execute().unwrap_err();

        assert!(matches!(err, CliError::Render(_)));
        assert!(err.to_string().contains("vimeo"));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("sfdocs.toml");
        std::fs::write(&config, "").unwrap();

        let err = args(
            tmp.path().join("missing.md"),
            tmp.path().join("out.html"),
            config,
        )
        .execute()
        .unwrap_err();

        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("page.md");
        std::fs::write(&input, "text\n").unwrap();

        let err = args(
            input,
            tmp.path().join("out.html"),
            tmp.path().join("nope.toml"),
        )
        .execute()
        .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
