//! `sfdocs demo` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use sfdocs_config::Config;

use super::{Stage, build_pipeline};
use crate::error::CliError;
use crate::output::Output;

/// Sample document covering a heading, a text directive, a video, a callout
/// and an image.
const SAMPLE_MARKDOWN: &str = r#"# Welcome to SFDocs

This is a paragraph with :abbr[HTML]{title="HyperText Markup Language"} abbreviation.

::video{src="https://youtube.com/embed/abc123" title="Demo Video" type="youtube"}

:::warning
Be careful when deleting records. This action cannot be undone.
:::

![Alt Text](https://example.com/image.jpg)"#;

/// Arguments for the demo command.
#[derive(Args)]
pub(crate) struct DemoArgs {
    /// Path to configuration file (default: auto-discover sfdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DemoArgs {
    /// Execute the demo command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let pipeline = build_pipeline(&config)?;
        let stages = pipeline.stages(SAMPLE_MARKDOWN)?;

        let sections = [
            ("INPUT: Markdown", SAMPLE_MARKDOWN.to_owned()),
            ("STAGE 1: Markdown -> syntax tree", Stage::Source.format(&stages)?),
            (
                "STAGE 2: Rewrite rules (video, callout)",
                Stage::Rewritten.format(&stages)?,
            ),
            ("STAGE 3: Syntax tree -> HTML tree", Stage::Target.format(&stages)?),
            ("STAGE 4: HTML tree -> HTML", Stage::Html.format(&stages)?),
        ];

        let mut stdout = io::stdout().lock();
        for (title, body) in sections {
            output.separator();
            output.highlight(title);
            output.separator();
            writeln!(stdout, "{body}")?;
            // Keep section output ordered against the stderr headings.
            stdout.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_renders_every_directive() {
        let pipeline = build_pipeline(&Config::default()).unwrap();
        let html = pipeline.render(SAMPLE_MARKDOWN).unwrap();
        assert_eq!(html.lines().count(), 5);
        assert!(html.contains("<div>HTML</div>"));
        assert!(html.contains(r#"<iframe src="https://youtube.com/embed/abc123"></iframe>"#));
        assert!(html.contains(r#"<doc-content-callout header="Warning" variant="warning">"#));
        assert!(html.ends_with(r#"<p><img alt="Alt Text" src="https://example.com/image.jpg"></p>"#));
    }
}
