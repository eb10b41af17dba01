//! Mock backend adapter for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::backend::{BackendAdapter, ConversionOptions};
use crate::format::{Category, FormatSpec};
use crate::probe::ProbeStatus;
use crate::router::{ConversionRequest, ExecutionPlan};

/// Mock implementation of the [`BackendAdapter`] trait.
///
/// Provides controllable behavior for testing:
/// - Scripted probe status and probe latency
/// - Probe call counting
/// - Recording of every request a plan was built for
///
/// # Example
///
/// ```rust,ignore
/// use unifile_core::testing::MockAdapter;
///
/// let adapter = MockAdapter::new("office")
///     .with_capability(Category::Office, Category::Document)
///     .with_status(ProbeStatus::available("1.0"));
///
/// registry.register(Arc::new(adapter));
/// ```
#[derive(Debug)]
pub struct MockAdapter {
    id: String,
    display_name: String,
    program: PathBuf,
    capabilities: Vec<(Category, Category)>,
    accepts_identical: bool,
    unreadable: Vec<String>,
    status: Mutex<ProbeStatus>,
    probe_delay: Option<Duration>,
    probe_calls: AtomicUsize,
    planned: Mutex<Vec<ConversionRequest>>,
}

impl MockAdapter {
    /// Create an available mock with no capabilities.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: format!("Mock {}", id),
            program: PathBuf::from(format!("mock-{}", id)),
            id,
            capabilities: Vec::new(),
            accepts_identical: true,
            unreadable: Vec::new(),
            status: Mutex::new(ProbeStatus::available("mock 1.0")),
            probe_delay: None,
            probe_calls: AtomicUsize::new(0),
            planned: Mutex::new(Vec::new()),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_capability(mut self, source: Category, target: Category) -> Self {
        self.capabilities.push((source, target));
        self
    }

    /// Make the mock decline same-format conversions.
    pub fn rejecting_identical(mut self) -> Self {
        self.accepts_identical = false;
        self
    }

    /// Make the mock refuse sources with this extension.
    pub fn refusing_source(mut self, extension: impl Into<String>) -> Self {
        self.unreadable.push(extension.into());
        self
    }

    pub fn with_status(self, status: ProbeStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Delay every probe by `delay` before answering.
    pub fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    /// Change what the next probe reports.
    pub fn set_status(&self, status: ProbeStatus) {
        *lock(&self.status) = status;
    }

    /// Number of times `probe` actually ran.
    pub fn probe_count(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Requests passed to `build_plan`, oldest first.
    pub fn planned_requests(&self) -> Vec<ConversionRequest> {
        lock(&self.planned).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl BackendAdapter for MockAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn program(&self) -> &Path {
        &self.program
    }

    fn capabilities(&self) -> &[(Category, Category)] {
        &self.capabilities
    }

    fn supports_format(&self, source: FormatSpec, target: FormatSpec) -> bool {
        !self.unreadable.iter().any(|ext| ext == source.extension)
            && self.supports(source.category, target.category)
    }

    fn accepts_identical(&self) -> bool {
        self.accepts_identical
    }

    async fn probe(&self) -> ProbeStatus {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.status).clone()
    }

    fn build_plan(
        &self,
        request: &ConversionRequest,
        options: &ConversionOptions,
    ) -> ExecutionPlan {
        lock(&self.planned).push(request.clone());

        let output_path = request.output_path(options.output_dir().as_deref());
        ExecutionPlan {
            adapter_id: self.id.clone(),
            adapter_name: self.display_name.clone(),
            program: self.program.clone(),
            args: vec![
                request.source_path.to_string_lossy().into_owned(),
                output_path.to_string_lossy().into_owned(),
            ],
            source_path: request.source_path.clone(),
            output_path,
            source_format: request.source_format,
            target_format: request.target_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::lookup_extension;
    use crate::probe::UnavailableReason;

    #[tokio::test]
    async fn test_mock_counts_probes() {
        let adapter = MockAdapter::new("m");
        assert_eq!(adapter.probe_count(), 0);
        adapter.probe().await;
        adapter.probe().await;
        assert_eq!(adapter.probe_count(), 2);
    }

    #[test]
    fn test_mock_scripted_status() {
        let adapter = MockAdapter::new("m").with_status(ProbeStatus::unavailable(
            UnavailableReason::Io {
                message: "boom".to_string(),
            },
        ));
        assert!(!tokio_test::block_on(adapter.probe()).is_available());
    }

    #[test]
    fn test_mock_records_plans() {
        let adapter = MockAdapter::new("m");
        let request = ConversionRequest::new(
            "/in/a.md",
            lookup_extension("md").unwrap(),
            lookup_extension("html").unwrap(),
        );
        let plan = adapter.build_plan(&request, &ConversionOptions::new());
        assert_eq!(plan.output_path, PathBuf::from("/in/a.html"));
        assert_eq!(plan.program, PathBuf::from("mock-m"));
        assert_eq!(adapter.planned_requests(), vec![request]);
    }
}
