//! File details.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use unifile_core::FileInfo;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for the info command
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// File to inspect
    pub path: PathBuf,
}

/// Execute the info command
pub fn execute(args: &InfoArgs, app: &App, format: OutputFormat) -> Result<()> {
    let info = FileInfo::inspect(&args.path, &app.registry)
        .with_context(|| format!("Failed to read {:?}", args.path))?;

    match format {
        OutputFormat::Json => output::print_json(&info),
        OutputFormat::Text => print_info(&info, app),
    }
    Ok(())
}

pub fn print_info(info: &FileInfo, app: &App) {
    output::print_kv("Name", &info.name);
    output::print_kv("Path", &info.path.display().to_string());
    output::print_kv("Size", &info.human_size());
    match info.format {
        Some(spec) => {
            output::print_kv("Format", &format!("{} ({})", spec.label, spec.extension));
            output::print_kv("Category", spec.category.as_str());
            let targets: Vec<_> = app
                .registry
                .supported_targets(spec)
                .iter()
                .map(|f| f.extension)
                .collect();
            if targets.is_empty() {
                output::print_kv("Converts to", "(no backend)");
            } else {
                output::print_kv("Converts to", &targets.join(", "));
            }
        }
        None => output::print_kv("Format", "unknown"),
    }
}
