//! Directory conversion, one file at a time.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use unifile_core::{
    detect_format, format::format_from_extension, parse_target, ConversionOptions,
    ConversionRequest, ExecutionPlan, FormatSpec, Router, RouterError,
};

use super::ConversionFlags;
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for the batch command
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory to scan
    pub dir: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub flags: ConversionFlags,
}

/// What happened to one file in a batch.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileResult {
    Converted { path: PathBuf, output: PathBuf },
    Planned { path: PathBuf, command: String },
    Skipped { path: PathBuf, reason: String },
    Failed { path: PathBuf, reason: String },
}

/// Totals for a finished batch.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<FileResult>,
}

impl BatchSummary {
    fn record(&mut self, result: FileResult) {
        match &result {
            FileResult::Converted { .. } | FileResult::Planned { .. } => self.converted += 1,
            FileResult::Skipped { .. } => self.skipped += 1,
            FileResult::Failed { .. } => self.failed += 1,
        }
        self.files.push(result);
    }
}

/// Execute the batch command
pub async fn execute(args: &BatchArgs, app: &App, format: OutputFormat) -> Result<()> {
    let files = collect_files(&args.dir, args.recursive)
        .with_context(|| format!("Failed to read directory {:?}", args.dir))?;
    info!("Batch: {} candidate files in {:?}", files.len(), args.dir);

    // Only an unknown target is fatal; everything else is decided per file.
    let target = parse_target(&args.flags.to)?;
    let options = args.flags.options(app);
    let router = app.router();
    let cancel = app.cancel_token();
    let mut summary = BatchSummary::default();

    for path in files {
        if cancel.is_cancelled() {
            break;
        }

        let plan = match plan_file(router, &path, target, &options).await {
            Ok(plan) => plan,
            Err(result) => {
                let failed = matches!(result, FileResult::Failed { .. });
                if failed && format == OutputFormat::Text && !args.flags.dry_run {
                    print_result(&result);
                }
                summary.record(result);
                continue;
            }
        };

        if args.flags.dry_run {
            summary.record(FileResult::Planned {
                path,
                command: plan.command_line(),
            });
            continue;
        }

        if format == OutputFormat::Text {
            println!("Converting {}...", path.display());
        }
        let outcome = app.runner.run(&plan, cancel.clone()).await;
        let result = match (&outcome.output_path, outcome.success) {
            (Some(output), true) => FileResult::Converted {
                path,
                output: output.clone(),
            },
            _ => FileResult::Failed {
                path,
                reason: outcome.summary(),
            },
        };
        if format == OutputFormat::Text {
            print_result(&result);
        }
        summary.record(result);
    }

    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Text => {
            if args.flags.dry_run {
                for result in &summary.files {
                    print_result(result);
                }
            }
            println!(
                "\n{} converted, {} skipped, {} failed",
                summary.converted, summary.skipped, summary.failed
            );
        }
    }

    if summary.failed > 0 {
        bail!("{} of the files failed to convert", summary.failed);
    }
    Ok(())
}

/// Routes one file, turning routing errors into a summary entry.
///
/// Formats nothing handles are skipped. A missing tool fails just this
/// file: other files in the folder may need a different backend.
pub async fn plan_file(
    router: Router<'_>,
    path: &Path,
    target: FormatSpec,
    options: &ConversionOptions,
) -> Result<ExecutionPlan, FileResult> {
    let routed = match detect_format(path) {
        Ok(source) => {
            let request = ConversionRequest::new(path, source, target);
            router.resolve(&request, options).await
        }
        Err(e) => Err(e),
    };
    routed.map_err(|e| routing_failure(path.to_path_buf(), e))
}

fn routing_failure(path: PathBuf, error: RouterError) -> FileResult {
    match error {
        RouterError::UnsupportedConversion { .. }
        | RouterError::NoOpConversion { .. }
        | RouterError::UnknownFormat { .. } => {
            debug!("Skipping {:?}: {}", path, error);
            FileResult::Skipped {
                path,
                reason: error.to_string(),
            }
        }
        RouterError::NoBackendAvailable { .. } | RouterError::UnknownTarget { .. } => {
            FileResult::Failed {
                path,
                reason: error.to_string(),
            }
        }
    }
}

fn print_result(result: &FileResult) {
    match result {
        FileResult::Converted { output, .. } => {
            output::print_success(&format!("{}", output.display()))
        }
        FileResult::Planned { command, .. } => println!("  {}", command),
        FileResult::Skipped { path, reason } => {
            println!("  - {} ({})", path.display(), reason)
        }
        FileResult::Failed { path, reason } => {
            output::print_error(&format!("{}: {}", path.display(), reason))
        }
    }
}

/// Regular files under `dir` with a registered extension, sorted by path.
///
/// Files with unknown extensions are left out here rather than sniffed, so a
/// large directory does not open every file.
pub fn collect_files(dir: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if format_from_extension(&path).is_some() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use unifile_core::testing::{fixtures, MockAdapter};
    use unifile_core::{BackendRegistry, Category, ProbeCache};

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.MKV"), b"").unwrap();
        std::fs::write(dir.path().join("notes.xyz"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.png"), b"").unwrap();

        let flat = collect_files(dir.path(), false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MKV", "b.mp3"]);

        let deep = collect_files(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    fn registry_with_missing_calibre() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(
            MockAdapter::new("pandoc")
                .with_capability(Category::Document, Category::Document)
                .rejecting_identical(),
        ));
        registry.register(Arc::new(
            MockAdapter::new("calibre")
                .with_capability(Category::Ebook, Category::Document)
                .with_status(fixtures::not_installed("ebook-convert")),
        ));
        registry
    }

    #[tokio::test]
    async fn test_missing_tool_fails_only_its_file() {
        let registry = registry_with_missing_calibre();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let router = Router::new(&registry, &cache);
        let pdf = parse_target("pdf").unwrap();
        let options = ConversionOptions::new();

        let first = plan_file(router, Path::new("/in/a.epub"), pdf, &options).await;
        assert!(matches!(first, Err(FileResult::Failed { .. })));

        let second = plan_file(router, Path::new("/in/b.md"), pdf, &options)
            .await
            .unwrap();
        assert_eq!(second.adapter_id, "pandoc");
        assert_eq!(second.output_path, PathBuf::from("/in/b.pdf"));
    }

    #[tokio::test]
    async fn test_unsupported_and_noop_are_skipped() {
        let registry = registry_with_missing_calibre();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let router = Router::new(&registry, &cache);
        let options = ConversionOptions::new();

        let unsupported =
            plan_file(router, Path::new("/in/a.psd"), parse_target("pdf").unwrap(), &options).await;
        assert!(matches!(unsupported, Err(FileResult::Skipped { .. })));

        let noop =
            plan_file(router, Path::new("/in/b.md"), parse_target("md").unwrap(), &options).await;
        assert!(matches!(noop, Err(FileResult::Skipped { .. })));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(FileResult::Skipped {
            path: "a.psd".into(),
            reason: "unsupported".to_string(),
        });
        summary.record(FileResult::Planned {
            path: "b.mp3".into(),
            command: "ffmpeg".to_string(),
        });
        assert_eq!((summary.converted, summary.skipped, summary.failed), (1, 1, 0));
    }
}
