//! Shared helper for version-flag probes.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::types::{ProbeStatus, UnavailableReason};

/// Longest stderr excerpt kept in an unavailability reason.
const STDERR_EXCERPT_LEN: usize = 200;

/// Runs `program args...` and maps the outcome to a [`ProbeStatus`].
///
/// The child is killed if the returned future is dropped, so callers can
/// bound it with `tokio::time::timeout`.
pub async fn probe_command(program: &Path, args: &[&str]) -> ProbeStatus {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Probe: {:?} not found", program);
            return ProbeStatus::unavailable(UnavailableReason::NotInstalled {
                program: program.to_path_buf(),
            });
        }
        Err(e) => {
            return ProbeStatus::unavailable(UnavailableReason::Io {
                message: e.to_string(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return ProbeStatus::unavailable(UnavailableReason::ExitStatus {
            code: output.status.code(),
            stderr: excerpt(stderr.trim()),
        });
    }

    // Some tools (older ImageMagick, ebook-convert) print the version banner
    // on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string();

    debug!("Probe: {:?} answered {:?}", program, version);
    ProbeStatus::available(version)
}

fn excerpt(text: &str) -> String {
    text.chars().take(STDERR_EXCERPT_LEN).collect()
}
