//! Single-file conversion.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use unifile_core::ExecutionPlan;

use super::ConversionFlags;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for the convert command
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// File to convert
    pub path: PathBuf,

    #[command(flatten)]
    pub flags: ConversionFlags,
}

/// Execute the convert command
pub async fn execute(args: &ConvertArgs, app: &App, format: OutputFormat) -> Result<()> {
    let options = args.flags.options(app);
    let plan = app
        .router()
        .dispatch(&args.path, &args.flags.to, &options)
        .await?;

    if args.flags.dry_run {
        print_plan(&plan, format);
        return Ok(());
    }

    run_plan(app, &plan, format).await
}

/// Runs a plan and reports its outcome; fails when the conversion did.
pub async fn run_plan(app: &App, plan: &ExecutionPlan, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        println!(
            "Converting {} -> {} with {}...",
            plan.source_path.display(),
            plan.target_format.extension,
            plan.adapter_name
        );
    }

    let outcome = app.runner.run(plan, app.cancel_token()).await;

    match format {
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Text if outcome.success => output::print_success(&outcome.summary()),
        OutputFormat::Text => {}
    }

    if !outcome.success {
        bail!(outcome.summary());
    }
    Ok(())
}

pub fn print_plan(plan: &ExecutionPlan, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(plan),
        OutputFormat::Text => {
            output::print_kv("Backend", &plan.adapter_name);
            output::print_kv("Source", &plan.source_format.to_string());
            output::print_kv("Target", &plan.target_format.to_string());
            output::print_kv("Output", &plan.output_path.display().to_string());
            output::print_kv("Command", &plan.command_line());
        }
    }
}
