//! Routing of conversion requests to backends.
//!
//! The router owns no state of its own: it combines format detection, the
//! backend registry, and the probe cache into a single decision that ends in
//! either an [`ExecutionPlan`] or a [`RouterError`] saying why not.

mod dispatch;
mod error;
mod types;

pub use dispatch::Router;
pub use error::RouterError;
pub use types::{ConversionRequest, ExecutionPlan, CONVERTED_SUFFIX};
