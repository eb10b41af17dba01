//! CLI command definitions and dispatch.

pub mod batch;
pub mod convert;
pub mod formats;
pub mod info;
pub mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use unifile_core::{ConversionOptions, Quality};

use crate::app::App;
use crate::output::OutputFormat;

/// unifile: convert files by routing them to the right external tool
#[derive(Debug, Parser)]
#[command(name = "unifile", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to ./unifile.toml if present)
    #[arg(short, long, env = "UNIFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute; omit for the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a single file
    Convert(convert::ConvertArgs),
    /// Convert every matching file in a directory
    Batch(batch::BatchArgs),
    /// Show which external tools are available
    Tools,
    /// List supported formats and conversions
    Formats,
    /// Show details about a file
    Info(info::InfoArgs),
}

impl Commands {
    /// Execute the CLI command
    pub async fn execute(&self, app: &App, format: OutputFormat) -> Result<()> {
        match self {
            Commands::Convert(args) => convert::execute(args, app, format).await,
            Commands::Batch(args) => batch::execute(args, app, format).await,
            Commands::Tools => tools::execute(app, format).await,
            Commands::Formats => formats::execute(app, format),
            Commands::Info(args) => info::execute(args, app, format),
        }
    }
}

/// Conversion flags shared by `convert` and `batch`.
#[derive(Debug, Clone, Args)]
pub struct ConversionFlags {
    /// Target format: an extension (mp3, pdf, jpeg...) or a category (audio, ebook...)
    #[arg(short, long)]
    pub to: String,

    /// Quality preset: low, medium, high, ultra
    #[arg(short, long)]
    pub quality: Option<Quality>,

    /// Directory for converted files (defaults to next to the source)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Extra backend option, e.g. -O resolution=1280x720 (repeatable)
    #[arg(short = 'O', long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Print the command that would run without running it
    #[arg(long)]
    pub dry_run: bool,
}

impl ConversionFlags {
    pub fn options(&self, app: &App) -> ConversionOptions {
        app.options(self.quality, self.output_dir.clone(), &self.options)
    }
}

fn parse_option(pair: &str) -> Result<(String, String), String> {
    ConversionOptions::parse_pair(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "unifile",
            "convert",
            "clip.mkv",
            "--to",
            "mp4",
            "-q",
            "high",
            "-O",
            "fps=30",
            "--dry-run",
        ])
        .unwrap();

        let Some(Commands::Convert(args)) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.path, PathBuf::from("clip.mkv"));
        assert_eq!(args.flags.to, "mp4");
        assert_eq!(args.flags.quality, Some(Quality::High));
        assert_eq!(
            args.flags.options,
            vec![("fps".to_string(), "30".to_string())]
        );
        assert!(args.flags.dry_run);
    }

    #[test]
    fn test_cli_rejects_bad_option_pair() {
        let result = Cli::try_parse_from(["unifile", "convert", "a.md", "--to", "pdf", "-O", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_without_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["unifile"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_global_format_flag() {
        let cli = Cli::try_parse_from(["unifile", "tools", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
