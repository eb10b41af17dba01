//! Calibre adapter for e-books.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::options::ConversionOptions;
use super::path_arg;
use super::traits::BackendAdapter;
use crate::format::Category;
use crate::probe::{probe_command, ProbeStatus};
use crate::router::{ConversionRequest, ExecutionPlan};

const CAPABILITIES: &[(Category, Category)] = &[
    (Category::Ebook, Category::Ebook),
    (Category::Ebook, Category::Document),
    (Category::Document, Category::Ebook),
];

/// Adapter around calibre's `ebook-convert`.
pub struct CalibreAdapter {
    program: PathBuf,
}

impl CalibreAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl BackendAdapter for CalibreAdapter {
    fn id(&self) -> &str {
        "calibre"
    }

    fn display_name(&self) -> &str {
        "Calibre"
    }

    fn program(&self) -> &Path {
        &self.program
    }

    fn capabilities(&self) -> &[(Category, Category)] {
        CAPABILITIES
    }

    fn accepts_identical(&self) -> bool {
        false
    }

    async fn probe(&self) -> ProbeStatus {
        probe_command(&self.program, &["--version"]).await
    }

    fn build_plan(
        &self,
        request: &ConversionRequest,
        options: &ConversionOptions,
    ) -> ExecutionPlan {
        let output_path = request.output_path(options.output_dir().as_deref());
        let args = vec![path_arg(&request.source_path), path_arg(&output_path)];

        ExecutionPlan {
            adapter_id: self.id().to_string(),
            adapter_name: self.display_name().to_string(),
            program: self.program.clone(),
            args,
            source_path: request.source_path.clone(),
            output_path,
            source_format: request.source_format,
            target_format: request.target_format,
        }
    }
}
