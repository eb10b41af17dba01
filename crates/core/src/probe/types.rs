//! Types for the probe module.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Result of probing one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The tool answered its version check.
    Available {
        /// First line of the tool's version output.
        version: String,
    },
    /// The tool cannot be used right now.
    Unavailable {
        reason: UnavailableReason,
    },
}

impl ProbeStatus {
    pub fn available(version: impl Into<String>) -> Self {
        Self::Available {
            version: version.into(),
        }
    }

    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// The unavailability reason, if any.
    pub fn reason(&self) -> Option<&UnavailableReason> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { version } if version.is_empty() => f.write_str("available"),
            Self::Available { version } => write!(f, "available ({})", version),
            Self::Unavailable { reason } => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Why a backend could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The program could not be found.
    NotInstalled { program: PathBuf },
    /// The program ran but exited unsuccessfully.
    ExitStatus {
        code: Option<i32>,
        stderr: String,
    },
    /// The probe did not finish within its time bound.
    Timeout { timeout_ms: u64 },
    /// Spawning or reading from the program failed for another reason.
    Io { message: String },
    /// The program runs but lacks something this backend needs.
    MissingFeature { feature: String },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled { program } => {
                write!(f, "{} not found; install it or set its path", program.display())
            }
            Self::ExitStatus { code, stderr } => {
                match code {
                    Some(code) => write!(f, "exited with code {}", code)?,
                    None => f.write_str("terminated by signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            Self::Timeout { timeout_ms } => {
                write!(f, "probe timed out after {} ms", timeout_ms)
            }
            Self::Io { message } => write!(f, "I/O error: {}", message),
            Self::MissingFeature { feature } => write!(f, "missing {}", feature),
        }
    }
}

/// One failed probe recorded during dispatch, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeAttempt {
    pub adapter_id: String,
    pub display_name: String,
    pub reason: UnavailableReason,
}

impl fmt::Display for ProbeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name, self.reason)
    }
}
