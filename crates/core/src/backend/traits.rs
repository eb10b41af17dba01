//! Trait definitions for the backend module.

use async_trait::async_trait;
use std::path::Path;

use super::options::ConversionOptions;
use crate::format::{Category, FormatSpec};
use crate::probe::ProbeStatus;
use crate::router::{ConversionRequest, ExecutionPlan};

/// A wrapper around one external conversion tool.
///
/// Adapters declare what they can do as category pairs, report whether their
/// tool is usable through [`probe`](Self::probe), and turn a resolved request
/// into an [`ExecutionPlan`] without touching the filesystem.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Stable identifier, used as the probe cache key.
    fn id(&self) -> &str;

    /// Human-readable name for diagnostics.
    fn display_name(&self) -> &str;

    /// The program this adapter spawns.
    fn program(&self) -> &Path;

    /// Supported `(source, target)` category pairs.
    fn capabilities(&self) -> &[(Category, Category)];

    /// Whether this adapter declares the given category pair.
    fn supports(&self, source: Category, target: Category) -> bool {
        self.capabilities().contains(&(source, target))
    }

    /// Whether this adapter handles these concrete formats.
    ///
    /// Defaults to the category check. Adapters whose tool cannot read some
    /// format of a declared category narrow it here.
    fn supports_format(&self, source: FormatSpec, target: FormatSpec) -> bool {
        self.supports(source.category, target.category)
    }

    /// Whether a conversion to the source's own format is meaningful.
    ///
    /// Encoders re-encode at a new quality; document tools would only
    /// produce a copy.
    fn accepts_identical(&self) -> bool {
        true
    }

    /// Checks whether the tool is installed and working.
    ///
    /// Must not hang indefinitely; the probe cache additionally bounds it.
    async fn probe(&self) -> ProbeStatus;

    /// Builds the command for a request. Pure: no I/O.
    fn build_plan(&self, request: &ConversionRequest, options: &ConversionOptions)
        -> ExecutionPlan;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::lookup_extension;
    use crate::testing::MockAdapter;

    #[test]
    fn test_supports_uses_capabilities() {
        let adapter = MockAdapter::new("mock").with_capability(Category::Audio, Category::Audio);
        assert!(adapter.supports(Category::Audio, Category::Audio));
        assert!(!adapter.supports(Category::Audio, Category::Video));
    }

    #[test]
    fn test_supports_format_defaults_to_categories() {
        let adapter = MockAdapter::new("mock").with_capability(Category::Document, Category::Ebook);
        let md = lookup_extension("md").unwrap();
        let epub = lookup_extension("epub").unwrap();
        assert!(adapter.supports_format(md, epub));
        assert!(!adapter.supports_format(epub, md));

        let adapter = adapter.refusing_source("md");
        assert!(!adapter.supports_format(md, epub));
    }

    #[test]
    fn test_accepts_identical_default() {
        let adapter = MockAdapter::new("mock");
        assert!(adapter.accepts_identical());
        let adapter = MockAdapter::new("mock").rejecting_identical();
        assert!(!adapter.accepts_identical());
    }
}
