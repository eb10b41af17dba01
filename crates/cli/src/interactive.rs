//! Menu-driven mode used when no subcommand is given.

use std::path::{Path, PathBuf};

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use unifile_core::{detect_format, FileInfo, FormatSpec, Quality};

use crate::app::App;
use crate::commands::{batch, convert, formats, info, tools, ConversionFlags};
use crate::output::{self, OutputFormat};

const MENU: [&str; 6] = [
    "Convert a file",
    "Convert a folder",
    "Check tools",
    "Supported formats",
    "File info",
    "Exit",
];

pub async fn run(app: &App) -> Result<()> {
    println!("=== unifile ===");
    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&MENU)
            .default(0)
            .interact_opt()?;

        let result = match choice {
            Some(0) => convert_file(app).await,
            Some(1) => convert_folder(app).await,
            Some(2) => tools::execute(app, OutputFormat::Text).await,
            Some(3) => formats::execute(app, OutputFormat::Text),
            Some(4) => show_info(app),
            _ => return Ok(()),
        };

        // Stay in the menu after a failed action.
        if let Err(e) = result {
            output::print_error(&format!("{:#}", e));
        }
        println!();
    }
}

async fn convert_file(app: &App) -> Result<()> {
    let path = ask_path("File to convert", false)?;
    let source = detect_format(&path)?;

    let targets = app.registry.supported_targets(source);
    if targets.is_empty() {
        output::print_warning(&format!("No backend converts {} files", source.category));
        return Ok(());
    }
    let Some(target) = ask_target(&targets, source)? else {
        return Ok(());
    };
    let Some(quality) = ask_quality(app.config.conversion.default_quality)? else {
        return Ok(());
    };

    let flags = flags(target.extension, quality);
    let options = flags.options(app);
    let plan = app.router().dispatch(&path, target.extension, &options).await?;

    convert::print_plan(&plan, OutputFormat::Text);
    if !Confirm::new()
        .with_prompt("Start conversion?")
        .default(true)
        .interact()?
    {
        output::print_warning("Conversion cancelled");
        return Ok(());
    }
    convert::run_plan(app, &plan, OutputFormat::Text).await
}

async fn convert_folder(app: &App) -> Result<()> {
    let dir = ask_path("Folder to convert", true)?;
    let to: String = Input::new()
        .with_prompt("Target format (extension or category, e.g. mp3, pdf, image)")
        .interact_text()?;
    let Some(quality) = ask_quality(app.config.conversion.default_quality)? else {
        return Ok(());
    };
    let recursive = Confirm::new()
        .with_prompt("Include subfolders?")
        .default(false)
        .interact()?;

    let args = batch::BatchArgs {
        dir,
        recursive,
        flags: flags(to.trim(), quality),
    };
    batch::execute(&args, app, OutputFormat::Text).await
}

fn show_info(app: &App) -> Result<()> {
    let path = ask_path("File to inspect", false)?;
    let info = FileInfo::inspect(&path, &app.registry)?;
    info::print_info(&info, app);
    Ok(())
}

fn flags(to: &str, quality: Quality) -> ConversionFlags {
    ConversionFlags {
        to: to.to_string(),
        quality: Some(quality),
        output_dir: None,
        options: Vec::new(),
        dry_run: false,
    }
}

fn ask_path(prompt: &str, want_dir: bool) -> Result<PathBuf> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), String> {
            let path = Path::new(input.trim());
            match (path.exists(), path.is_dir()) {
                (false, _) => Err(format!("'{}' does not exist", input.trim())),
                (true, true) if !want_dir => Err("that is a folder".to_string()),
                (true, false) if want_dir => Err("that is not a folder".to_string()),
                _ => Ok(()),
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(raw.trim()))
}

/// `targets` only holds the source's own format when its backend
/// re-encodes, so that entry is labelled as such.
fn ask_target(targets: &[FormatSpec], source: FormatSpec) -> Result<Option<FormatSpec>> {
    let items: Vec<String> = targets
        .iter()
        .map(|f| {
            if *f == source {
                format!("{} ({}, re-encode)", f.extension, f.label)
            } else {
                format!("{} ({})", f.extension, f.label)
            }
        })
        .collect();

    let choice = Select::new()
        .with_prompt(format!("Convert {} to", source.extension))
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| targets[i]))
}

fn ask_quality(default: Quality) -> Result<Option<Quality>> {
    let items: Vec<String> = Quality::ALL
        .iter()
        .map(|q| format!("{:<7} {}", q.as_str(), q.description()))
        .collect();
    let default_index = Quality::ALL.iter().position(|q| *q == default).unwrap_or(1);

    let choice = Select::new()
        .with_prompt("Quality")
        .items(&items)
        .default(default_index)
        .interact_opt()?;
    Ok(choice.map(|i| Quality::ALL[i]))
}
