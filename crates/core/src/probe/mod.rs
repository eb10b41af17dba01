//! Backend availability probing.
//!
//! A probe is a bounded, read-only check that a backend's external tool can
//! actually be invoked. Results are memoized in a [`ProbeCache`] owned by the
//! caller, so repeated conversions do not respawn version checks.

mod cache;
mod command;
mod types;

pub use cache::ProbeCache;
pub use command::probe_command;
pub use types::{ProbeAttempt, ProbeStatus, UnavailableReason};
