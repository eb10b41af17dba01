//! Ordered collection of backend adapters.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

use super::calibre::CalibreAdapter;
use super::ffmpeg::FfmpegAdapter;
use super::imagemagick::ImageMagickAdapter;
use super::libreoffice::LibreOfficeAdapter;
use super::pandoc::PandocAdapter;
use super::traits::BackendAdapter;
use crate::config::ToolsConfig;
use crate::format::{formats_in, Category, FormatSpec};

/// Adapters in priority order. Earlier registrations win when several
/// adapters declare the same category pair.
#[derive(Default, Clone)]
pub struct BackendRegistry {
    adapters: Vec<Arc<dyn BackendAdapter>>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The five built-in adapters, configured from `tools`.
    pub fn builtin(tools: &ToolsConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FfmpegAdapter::new(&tools.ffmpeg)));
        registry.register(Arc::new(ImageMagickAdapter::new(&tools.magick)));
        registry.register(Arc::new(LibreOfficeAdapter::new(&tools.soffice)));
        registry.register(Arc::new(PandocAdapter::new(&tools.pandoc)));
        registry.register(Arc::new(CalibreAdapter::new(&tools.ebook_convert)));
        registry
    }

    /// Appends an adapter at the lowest priority.
    ///
    /// Returns `false` and keeps the existing adapter if the id is taken.
    pub fn register(&mut self, adapter: Arc<dyn BackendAdapter>) -> bool {
        if self.get(adapter.id()).is_some() {
            warn!("Backend {} already registered, ignoring duplicate", adapter.id());
            return false;
        }
        self.adapters.push(adapter);
        true
    }

    pub fn adapters(&self) -> &[Arc<dyn BackendAdapter>] {
        &self.adapters
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn BackendAdapter>> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapters declaring `(source, target)`, in priority order.
    pub fn find_candidates(
        &self,
        source: Category,
        target: Category,
    ) -> Vec<Arc<dyn BackendAdapter>> {
        self.adapters
            .iter()
            .filter(|a| a.supports(source, target))
            .cloned()
            .collect()
    }

    /// Adapters able to turn `source` into `target`, in priority order.
    ///
    /// Narrower than [`find_candidates`](Self::find_candidates): adapters may
    /// refuse individual formats of a category they declare.
    pub fn find_candidates_for(
        &self,
        source: FormatSpec,
        target: FormatSpec,
    ) -> Vec<Arc<dyn BackendAdapter>> {
        self.adapters
            .iter()
            .filter(|a| a.supports_format(source, target))
            .cloned()
            .collect()
    }

    /// Categories reachable from `source` through any adapter.
    pub fn target_categories(&self, source: Category) -> BTreeSet<Category> {
        self.adapters
            .iter()
            .flat_map(|a| a.capabilities().iter())
            .filter(|(from, _)| *from == source)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Every format some adapter declares it can produce from `source`.
    ///
    /// The source's own format is listed only when the first adapter
    /// handling it re-encodes. Declared, not probed: availability is only
    /// known at dispatch time.
    pub fn supported_targets(&self, source: FormatSpec) -> Vec<FormatSpec> {
        Category::ALL
            .into_iter()
            .flat_map(formats_in)
            .filter(|target| {
                let mut candidates = self
                    .adapters
                    .iter()
                    .filter(|a| a.supports_format(source, *target));
                if *target == source {
                    candidates.next().is_some_and(|a| a.accepts_identical())
                } else {
                    candidates.next().is_some()
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| a.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::lookup_extension;
    use crate::testing::MockAdapter;

    #[test]
    fn test_builtin_order() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        let ids: Vec<_> = registry.adapters().iter().map(|a| a.id()).collect();
        assert_eq!(
            ids,
            vec!["ffmpeg", "imagemagick", "libreoffice", "pandoc", "calibre"]
        );
    }

    #[test]
    fn test_builtin_uses_configured_paths() {
        let mut tools = ToolsConfig::default();
        tools.magick = "/usr/bin/convert".into();
        let registry = BackendRegistry::builtin(&tools);
        let magick = registry.get("imagemagick").unwrap();
        assert_eq!(magick.program(), std::path::Path::new("/usr/bin/convert"));
    }

    #[test]
    fn test_candidates_in_priority_order() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        let ids: Vec<_> = registry
            .find_candidates(Category::Office, Category::Document)
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(ids, vec!["libreoffice", "pandoc"]);

        let ids: Vec<_> = registry
            .find_candidates(Category::Document, Category::Ebook)
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(ids, vec!["pandoc", "calibre"]);
    }

    #[test]
    fn test_pdf_sources_go_to_calibre() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        let pdf = lookup_extension("pdf").unwrap();
        let ids: Vec<_> = registry
            .find_candidates_for(pdf, lookup_extension("epub").unwrap())
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(ids, vec!["calibre"]);
        assert!(registry
            .find_candidates_for(pdf, lookup_extension("docx").unwrap())
            .is_empty());

        let targets = registry.supported_targets(pdf);
        assert!(targets.iter().any(|f| f.extension == "mobi"));
        assert!(!targets.iter().any(|f| f.extension == "docx"));
    }

    #[test]
    fn test_same_format_listed_only_when_reencoded() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        let mp3 = lookup_extension("mp3").unwrap();
        assert!(registry.supported_targets(mp3).contains(&mp3));

        let md = lookup_extension("md").unwrap();
        let targets = registry.supported_targets(md);
        assert!(!targets.contains(&md));
        assert!(targets.iter().any(|f| f.extension == "html"));
    }

    #[test]
    fn test_no_candidates_for_proprietary_images() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        for target in Category::ALL {
            assert!(registry
                .find_candidates(Category::ImageProprietary, target)
                .is_empty());
        }
        assert!(registry
            .supported_targets(lookup_extension("psd").unwrap())
            .is_empty());
    }

    #[test]
    fn test_supported_targets_for_video() {
        let registry = BackendRegistry::builtin(&ToolsConfig::default());
        let targets = registry.supported_targets(lookup_extension("mkv").unwrap());
        assert!(targets.iter().any(|f| f.extension == "mp3"));
        assert!(targets.iter().any(|f| f.extension == "webm"));
        assert!(!targets.iter().any(|f| f.extension == "png"));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = BackendRegistry::new();
        assert!(registry.register(Arc::new(MockAdapter::new("x"))));
        assert!(!registry.register(Arc::new(
            MockAdapter::new("x").with_capability(Category::Audio, Category::Audio)
        )));
        assert_eq!(registry.len(), 1);
        assert!(registry
            .find_candidates(Category::Audio, Category::Audio)
            .is_empty());
    }
}
