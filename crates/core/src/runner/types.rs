//! Types for the runner module.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a plan did not produce its output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunnerError {
    /// The input file vanished between dispatch and execution.
    #[error("Source file not found: {}", .path.display())]
    SourceMissing { path: PathBuf },

    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {message}", .path.display())]
    OutputDirectory { path: PathBuf, message: String },

    /// The program could not be found at spawn time.
    #[error("{} not found", .program.display())]
    ProgramNotFound { program: PathBuf },

    /// Spawning or waiting on the process failed.
    #[error("Failed to run {}: {message}", .program.display())]
    Io { program: PathBuf, message: String },

    /// The process exited unsuccessfully.
    #[error("{}", describe_exit(.code))]
    ExitStatus { code: Option<i32> },

    /// The process exceeded the conversion timeout and was killed.
    #[error("Conversion timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The caller cancelled the conversion and the process was killed.
    #[error("Conversion cancelled")]
    Cancelled,

    /// The process reported success but left no output file.
    #[error("Expected output was not created: {}", .path.display())]
    OutputMissing { path: PathBuf },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("Process exited with code {}", code),
        None => "Process terminated by signal".to_string(),
    }
}

/// Result of running one [`ExecutionPlan`](crate::router::ExecutionPlan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    pub success: bool,
    pub adapter_id: String,
    /// Set on success.
    pub output_path: Option<PathBuf>,
    /// Size of the produced file in bytes, on success.
    pub output_size_bytes: Option<u64>,
    /// Set on failure.
    pub failure: Option<RunnerError>,
    /// Most relevant stderr line from the tool, if it wrote any.
    pub diagnostic: Option<String>,
    pub elapsed_ms: u64,
}

impl ConversionOutcome {
    /// One-line summary for display.
    pub fn summary(&self) -> String {
        match (&self.output_path, &self.failure) {
            (Some(path), _) if self.success => {
                format!("Converted to {} in {} ms", path.display(), self.elapsed_ms)
            }
            (_, Some(failure)) => match &self.diagnostic {
                Some(diagnostic) => format!("{}: {}", failure, diagnostic),
                None => failure.to_string(),
            },
            _ => "Conversion failed".to_string(),
        }
    }
}
