//! Testing utilities and mock implementations.
//!
//! Lets router and probe behaviour be exercised without any external tool
//! installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use unifile_core::testing::{fixtures, MockAdapter};
//!
//! let adapter = Arc::new(MockAdapter::new("office")
//!     .with_capability(Category::Office, Category::Document));
//! let mut registry = BackendRegistry::new();
//! registry.register(adapter.clone());
//!
//! let plan = Router::new(&registry, &cache).resolve(&fixtures::request("a.docx", "pdf"), &options).await?;
//! assert_eq!(adapter.probe_count(), 1);
//! ```

mod mock_adapter;

pub use mock_adapter::MockAdapter;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::format::{detect_format, lookup_extension};
    use crate::probe::{ProbeStatus, UnavailableReason};
    use crate::router::ConversionRequest;
    use std::path::Path;

    /// Build a request from a path with a registered extension and a target
    /// extension. Panics on unknown formats.
    pub fn request(source: &str, target: &str) -> ConversionRequest {
        let source_format = detect_format(Path::new(source))
            .unwrap_or_else(|e| panic!("fixture source {}: {}", source, e));
        let target_format = lookup_extension(target)
            .unwrap_or_else(|| panic!("fixture target {} is not registered", target));
        ConversionRequest::new(source, source_format, target_format)
    }

    /// A probe result for a tool that is not installed.
    pub fn not_installed(program: &str) -> ProbeStatus {
        ProbeStatus::unavailable(UnavailableReason::NotInstalled {
            program: program.into(),
        })
    }
}
