//! SFDocs CLI - directive-aware markdown renderer.
//!
//! Provides commands for:
//! - `render`: Render a markdown file (or stdin) to HTML or an intermediate stage
//! - `demo`: Walk the built-in sample document through every stage

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{DemoArgs, RenderArgs};
use output::Output;

/// SFDocs - directive-aware markdown renderer.
#[derive(Parser)]
#[command(name = "sfdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown document.
    Render(RenderArgs),
    /// Show every pipeline stage for a sample document.
    Demo(DemoArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Render(args) => args.verbose,
        Commands::Demo(args) => args.verbose,
    };

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Demo(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
        assert_eq!(log_filter(false, Some("")).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_verbose_is_info() {
        assert_eq!(log_filter(true, Some("error")).to_string(), "info");
    }

    #[test]
    fn test_log_filter_honors_rust_log() {
        let filter = log_filter(false, Some("sfdocs_renderer=debug")).to_string();
        assert!(filter.contains("sfdocs_renderer=debug"), "got {filter}");
    }
}
