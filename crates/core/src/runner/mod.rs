//! Execution of resolved plans.
//!
//! The router only decides; this module runs the chosen tool, bounds it with
//! a timeout and a cancellation token, and condenses the result into a
//! [`ConversionOutcome`].

mod diagnostic;
mod process;
mod types;

pub use diagnostic::{extract_diagnostic, EXCERPT_LEN};
pub use process::ProcessRunner;
pub use types::{ConversionOutcome, RunnerError};
