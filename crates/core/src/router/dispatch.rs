//! Request resolution: detection, candidate lookup, probing, planning.

use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

use super::error::RouterError;
use super::types::{strip_cur_dir, ConversionRequest, ExecutionPlan};
use crate::backend::options::OUTPUT_DIR;
use crate::backend::{BackendRegistry, ConversionOptions};
use crate::format::{detect_format, parse_target};
use crate::probe::{ProbeAttempt, ProbeCache, ProbeStatus};

/// Picks the first usable backend for a request and asks it for a plan.
///
/// The router borrows its registry and probe cache so several routers (or
/// concurrent dispatches on one router) share the same probe results.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    registry: &'a BackendRegistry,
    probes: &'a ProbeCache,
}

impl<'a> Router<'a> {
    pub fn new(registry: &'a BackendRegistry, probes: &'a ProbeCache) -> Self {
        Self { registry, probes }
    }

    /// Detects `source`, resolves `target`, and resolves the request.
    pub async fn dispatch(
        &self,
        source: &Path,
        target: &str,
        options: &ConversionOptions,
    ) -> Result<ExecutionPlan, RouterError> {
        let source_format = detect_format(source)?;
        let target_format = parse_target(target)?;
        let request = ConversionRequest::new(source, source_format, target_format);
        self.resolve(&request, options).await
    }

    /// Resolves an already-detected request to a plan.
    ///
    /// Candidates are tried in registration order. Only the first available
    /// one decides the outcome; unavailable ones are collected for the error.
    pub async fn resolve(
        &self,
        request: &ConversionRequest,
        options: &ConversionOptions,
    ) -> Result<ExecutionPlan, RouterError> {
        let from = request.source_format;
        let to = request.target_format;

        let candidates = self.registry.find_candidates_for(from, to);
        if candidates.is_empty() {
            debug!("No backend declares {} -> {}", from.category, to.category);
            return Err(RouterError::UnsupportedConversion { from, to });
        }

        let mut attempts = Vec::new();
        for adapter in candidates {
            match self.probes.probe(adapter.as_ref()).await {
                ProbeStatus::Available { .. } => {
                    if request.is_identical() && !adapter.accepts_identical() {
                        return Err(RouterError::NoOpConversion {
                            adapter: adapter.display_name().to_string(),
                            format: from,
                        });
                    }

                    let options = same_dir_as_source(request, options);
                    let plan = adapter.build_plan(request, &options);
                    info!(
                        "Routing {} -> {} via {}",
                        from.extension,
                        to.extension,
                        adapter.id()
                    );
                    return Ok(plan);
                }
                ProbeStatus::Unavailable { reason } => {
                    debug!("Skipping {}: {}", adapter.id(), reason);
                    attempts.push(ProbeAttempt {
                        adapter_id: adapter.id().to_string(),
                        display_name: adapter.display_name().to_string(),
                        reason,
                    });
                }
            }
        }

        Err(RouterError::NoBackendAvailable { from, to, attempts })
    }
}

/// Drops an `output_dir` that is the source's own directory under another
/// spelling (`.`, a symlink), so the plan's collision check sees the
/// source's directory as written.
fn same_dir_as_source<'o>(
    request: &ConversionRequest,
    options: &'o ConversionOptions,
) -> Cow<'o, ConversionOptions> {
    let Some(dir) = options.output_dir() else {
        return Cow::Borrowed(options);
    };
    let source_dir = match request.source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let same = match (dir.canonicalize(), source_dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => strip_cur_dir(&dir) == strip_cur_dir(source_dir),
    };
    if !same {
        return Cow::Borrowed(options);
    }

    debug!("Output directory {:?} is the source directory", dir);
    let mut options = options.clone();
    options.remove(OUTPUT_DIR);
    Cow::Owned(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{lookup_extension, Category};
    use crate::probe::UnavailableReason;
    use crate::testing::MockAdapter;
    use std::sync::Arc;
    use std::time::Duration;

    fn missing(program: &str) -> ProbeStatus {
        ProbeStatus::unavailable(UnavailableReason::NotInstalled {
            program: program.into(),
        })
    }

    fn request(path: &str, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest::new(
            path,
            lookup_extension(from).unwrap(),
            lookup_extension(to).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_first_available_candidate_wins() {
        let primary = Arc::new(
            MockAdapter::new("primary").with_capability(Category::Office, Category::Document),
        );
        let fallback = Arc::new(
            MockAdapter::new("fallback").with_capability(Category::Office, Category::Document),
        );
        let mut registry = BackendRegistry::new();
        registry.register(primary.clone());
        registry.register(fallback.clone());
        let cache = ProbeCache::new(Duration::from_secs(1));

        let plan = Router::new(&registry, &cache)
            .resolve(&request("/d/a.docx", "docx", "pdf"), &ConversionOptions::new())
            .await
            .unwrap();

        assert_eq!(plan.adapter_id, "primary");
        // Never probed once an earlier candidate answered.
        assert_eq!(fallback.probe_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_past_unavailable() {
        let primary = Arc::new(
            MockAdapter::new("primary")
                .with_capability(Category::Office, Category::Document)
                .with_status(missing("soffice")),
        );
        let fallback = Arc::new(
            MockAdapter::new("fallback").with_capability(Category::Office, Category::Document),
        );
        let mut registry = BackendRegistry::new();
        registry.register(primary.clone());
        registry.register(fallback.clone());
        let cache = ProbeCache::new(Duration::from_secs(1));

        let plan = Router::new(&registry, &cache)
            .resolve(&request("/d/a.docx", "docx", "pdf"), &ConversionOptions::new())
            .await
            .unwrap();

        assert_eq!(plan.adapter_id, "fallback");
        assert!(primary.planned_requests().is_empty());
    }

    #[tokio::test]
    async fn test_all_unavailable_reports_every_attempt() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(
            MockAdapter::new("a")
                .with_capability(Category::Ebook, Category::Ebook)
                .with_status(missing("a")),
        ));
        registry.register(Arc::new(
            MockAdapter::new("b")
                .with_capability(Category::Ebook, Category::Ebook)
                .with_probe_delay(Duration::from_secs(5)),
        ));
        let cache = ProbeCache::new(Duration::from_millis(20));

        let err = Router::new(&registry, &cache)
            .resolve(&request("/b/x.epub", "epub", "mobi"), &ConversionOptions::new())
            .await
            .unwrap_err();

        match err {
            RouterError::NoBackendAvailable { attempts, .. } => {
                let ids: Vec<_> = attempts.iter().map(|a| a.adapter_id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b"]);
                assert_eq!(
                    attempts[1].reason,
                    UnavailableReason::Timeout { timeout_ms: 20 }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_pair() {
        let registry = BackendRegistry::new();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let err = Router::new(&registry, &cache)
            .resolve(&request("/p/a.psd", "psd", "png"), &ConversionOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unsupported_conversion");
    }

    #[tokio::test]
    async fn test_identical_declined_is_noop() {
        let adapter = Arc::new(
            MockAdapter::new("docs")
                .with_capability(Category::Document, Category::Document)
                .rejecting_identical(),
        );
        let mut registry = BackendRegistry::new();
        registry.register(adapter.clone());
        let cache = ProbeCache::new(Duration::from_secs(1));

        let err = Router::new(&registry, &cache)
            .resolve(&request("/n/a.md", "md", "md"), &ConversionOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::NoOpConversion { .. }));
        assert!(adapter.planned_requests().is_empty());
    }

    #[tokio::test]
    async fn test_identical_accepted_builds_plan() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(
            MockAdapter::new("enc").with_capability(Category::Audio, Category::Audio),
        ));
        let cache = ProbeCache::new(Duration::from_secs(1));

        let plan = Router::new(&registry, &cache)
            .resolve(&request("/m/a.mp3", "mp3", "mp3"), &ConversionOptions::new())
            .await
            .unwrap();
        assert_eq!(plan.output_path, std::path::PathBuf::from("/m/a_converted.mp3"));
    }

    fn image_registry() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(
            MockAdapter::new("img").with_capability(Category::Image, Category::Image),
        ));
        registry
    }

    #[tokio::test]
    async fn test_output_dir_dot_does_not_overwrite_source() {
        let registry = image_registry();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let options = ConversionOptions::new().with(OUTPUT_DIR, ".");

        let plan = Router::new(&registry, &cache)
            .dispatch(Path::new("photo.png"), "png", &options)
            .await
            .unwrap();
        assert_ne!(strip_cur_dir(&plan.output_path), strip_cur_dir(&plan.source_path));
        assert_eq!(
            plan.output_path.file_name().unwrap(),
            std::ffi::OsStr::new("photo_converted.png")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_dir_symlink_to_source_dir() {
        let root = tempfile::tempdir().unwrap();
        let real = root.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = root.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let source = real.join("photo.png");
        std::fs::write(&source, b"").unwrap();

        let registry = image_registry();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let options = ConversionOptions::new().with(OUTPUT_DIR, link.to_string_lossy());

        let plan = Router::new(&registry, &cache)
            .dispatch(&source, "png", &options)
            .await
            .unwrap();
        assert_eq!(plan.output_path, real.join("photo_converted.png"));
    }

    #[tokio::test]
    async fn test_other_output_dir_is_kept() {
        let registry = image_registry();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let options = ConversionOptions::new().with(OUTPUT_DIR, "/srv/out");

        let plan = Router::new(&registry, &cache)
            .dispatch(Path::new("/pics/photo.png"), "png", &options)
            .await
            .unwrap();
        assert_eq!(plan.output_path, std::path::PathBuf::from("/srv/out/photo.png"));
    }

    #[tokio::test]
    async fn test_refused_source_format_is_unsupported() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(
            MockAdapter::new("docs")
                .with_capability(Category::Document, Category::Ebook)
                .refusing_source("pdf"),
        ));
        let cache = ProbeCache::new(Duration::from_secs(1));

        let err = Router::new(&registry, &cache)
            .resolve(&request("/d/a.pdf", "pdf", "epub"), &ConversionOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unsupported_conversion");
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unknown_target() {
        let registry = BackendRegistry::new();
        let cache = ProbeCache::new(Duration::from_secs(1));
        let err = Router::new(&registry, &cache)
            .dispatch(Path::new("/m/a.mp3"), "xyz", &ConversionOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::UnknownTarget {
                requested: "xyz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_repeated_dispatch_probes_once() {
        let adapter = Arc::new(
            MockAdapter::new("enc").with_capability(Category::Audio, Category::Audio),
        );
        let mut registry = BackendRegistry::new();
        registry.register(adapter.clone());
        let cache = ProbeCache::new(Duration::from_secs(1));
        let router = Router::new(&registry, &cache);

        for _ in 0..3 {
            router
                .dispatch(Path::new("/m/a.flac"), "mp3", &ConversionOptions::new())
                .await
                .unwrap();
        }
        assert_eq!(adapter.probe_count(), 1);
    }
}
