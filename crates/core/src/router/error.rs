//! Error types for the router module.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::FormatSpec;
use crate::probe::ProbeAttempt;

/// Reasons a conversion request could not be turned into a plan.
///
/// Each variant carries enough context to tell the user what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The source file's format could not be identified.
    #[error("Unknown format: {}", .path.display())]
    UnknownFormat { path: PathBuf },

    /// The requested target is neither a known extension nor a category.
    #[error("Unknown target format: {requested}")]
    UnknownTarget { requested: String },

    /// No backend declares this category pair.
    #[error("No backend can convert {from} to {to}")]
    UnsupportedConversion { from: FormatSpec, to: FormatSpec },

    /// Backends declare the pair, but none of them is usable.
    #[error("No available backend for {from} to {to}: {}", format_attempts(.attempts))]
    NoBackendAvailable {
        from: FormatSpec,
        to: FormatSpec,
        attempts: Vec<ProbeAttempt>,
    },

    /// Source and target are the same format and the chosen backend would
    /// only copy the file.
    #[error("{adapter} would not change {format}; pick a different target")]
    NoOpConversion { adapter: String, format: FormatSpec },
}

impl RouterError {
    /// Short machine-friendly kind, for logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownFormat { .. } => "unknown_format",
            Self::UnknownTarget { .. } => "unknown_target",
            Self::UnsupportedConversion { .. } => "unsupported_conversion",
            Self::NoBackendAvailable { .. } => "no_backend_available",
            Self::NoOpConversion { .. } => "no_op_conversion",
        }
    }
}

fn format_attempts(attempts: &[ProbeAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
