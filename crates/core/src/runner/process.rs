//! Executes plans as child processes.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::diagnostic::extract_diagnostic;
use super::types::{ConversionOutcome, RunnerError};
use crate::config::ConversionConfig;
use crate::router::ExecutionPlan;

/// How long to wait for stderr to drain after the process exits.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs [`ExecutionPlan`]s under a timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

struct Failure {
    error: RunnerError,
    diagnostic: Option<String>,
}

impl From<RunnerError> for Failure {
    fn from(error: RunnerError) -> Self {
        Self {
            error,
            diagnostic: None,
        }
    }
}

enum Ended {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::new(config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `plan` to completion, timeout, or cancellation.
    ///
    /// Every failure is reported in the returned outcome.
    pub async fn run(&self, plan: &ExecutionPlan, cancel: CancellationToken) -> ConversionOutcome {
        let start = Instant::now();
        let result = self.execute(plan, &cancel).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((size, diagnostic)) => {
                info!(
                    "Converted {:?} -> {:?} via {} in {} ms",
                    plan.source_path, plan.output_path, plan.adapter_id, elapsed_ms
                );
                ConversionOutcome {
                    success: true,
                    adapter_id: plan.adapter_id.clone(),
                    output_path: Some(plan.output_path.clone()),
                    output_size_bytes: Some(size),
                    failure: None,
                    diagnostic,
                    elapsed_ms,
                }
            }
            Err(Failure { error, diagnostic }) => {
                warn!(
                    "Conversion of {:?} via {} failed: {}",
                    plan.source_path, plan.adapter_id, error
                );
                ConversionOutcome {
                    success: false,
                    adapter_id: plan.adapter_id.clone(),
                    output_path: None,
                    output_size_bytes: None,
                    failure: Some(error),
                    diagnostic,
                    elapsed_ms,
                }
            }
        }
    }

    async fn execute(
        &self,
        plan: &ExecutionPlan,
        cancel: &CancellationToken,
    ) -> Result<(u64, Option<String>), Failure> {
        if tokio::fs::metadata(&plan.source_path).await.is_err() {
            return Err(RunnerError::SourceMissing {
                path: plan.source_path.clone(),
            }
            .into());
        }

        if let Some(parent) = plan.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    RunnerError::OutputDirectory {
                        path: parent.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
            }
        }

        debug!("Running {}", plan.command_line());
        let mut child = Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RunnerError::ProgramNotFound {
                        program: plan.program.clone(),
                    }
                } else {
                    RunnerError::Io {
                        program: plan.program.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let stderr = child.stderr.take();
        let stderr_reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf).await;
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

        let ended = tokio::select! {
            status = child.wait() => Ended::Exited(status),
            _ = tokio::time::sleep(self.timeout) => Ended::TimedOut,
            _ = cancel.cancelled() => Ended::Cancelled,
        };

        let status = match ended {
            Ended::Exited(Ok(status)) => status,
            Ended::Exited(Err(e)) => {
                stderr_reader.abort();
                return Err(RunnerError::Io {
                    program: plan.program.clone(),
                    message: e.to_string(),
                }
                .into());
            }
            Ended::TimedOut => {
                let _ = child.kill().await;
                stderr_reader.abort();
                return Err(RunnerError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
                .into());
            }
            Ended::Cancelled => {
                let _ = child.kill().await;
                stderr_reader.abort();
                return Err(RunnerError::Cancelled.into());
            }
        };

        // A grandchild may keep the pipe open after the tool itself exits.
        let stderr = match tokio::time::timeout(STDERR_DRAIN_TIMEOUT, stderr_reader).await {
            Ok(Ok(text)) => text,
            _ => String::new(),
        };
        let diagnostic = extract_diagnostic(&stderr);

        if !status.success() {
            return Err(Failure {
                error: RunnerError::ExitStatus {
                    code: status.code(),
                },
                diagnostic,
            });
        }

        match tokio::fs::metadata(&plan.output_path).await {
            Ok(meta) if meta.is_file() => Ok((meta.len(), diagnostic)),
            _ => Err(Failure {
                error: RunnerError::OutputMissing {
                    path: plan.output_path.clone(),
                },
                diagnostic,
            }),
        }
    }
}
