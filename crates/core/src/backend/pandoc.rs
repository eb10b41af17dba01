//! Pandoc adapter for markup documents.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::options::ConversionOptions;
use super::path_arg;
use super::traits::BackendAdapter;
use crate::format::{Category, FormatSpec};
use crate::probe::{probe_command, ProbeStatus};
use crate::router::{ConversionRequest, ExecutionPlan};

const CAPABILITIES: &[(Category, Category)] = &[
    (Category::Document, Category::Document),
    (Category::Document, Category::Office),
    (Category::Document, Category::Ebook),
    (Category::Office, Category::Document),
];

/// Formats in the declared categories that pandoc has no reader for.
const UNREADABLE: &[&str] = &["pdf", "doc", "xls", "xlsx", "ppt"];

/// Adapter around `pandoc`.
pub struct PandocAdapter {
    program: PathBuf,
}

impl PandocAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl BackendAdapter for PandocAdapter {
    fn id(&self) -> &str {
        "pandoc"
    }

    fn display_name(&self) -> &str {
        "Pandoc"
    }

    fn program(&self) -> &Path {
        &self.program
    }

    fn capabilities(&self) -> &[(Category, Category)] {
        CAPABILITIES
    }

    fn supports_format(&self, source: FormatSpec, target: FormatSpec) -> bool {
        !UNREADABLE.contains(&source.extension) && self.supports(source.category, target.category)
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
        let mut args = vec![path_arg(&request.source_path)];
        if request.target_format.extension == "html" {
            args.push("--standalone".to_string());
        }
        args.extend(["-o".to_string(), path_arg(&output_path)]);

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::lookup_extension;

    fn request(path: &str, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest::new(
            path,
            lookup_extension(from).unwrap(),
            lookup_extension(to).unwrap(),
        )
    }

    #[test]
    fn test_markdown_to_pdf() {
        let adapter = PandocAdapter::new("pandoc");
        let plan = adapter.build_plan(
            &request("/n/readme.md", "md", "pdf"),
            &ConversionOptions::new(),
        );
        assert_eq!(plan.args, vec!["/n/readme.md", "-o", "/n/readme.pdf"]);
    }

    #[test]
    fn test_html_output_is_standalone() {
        let adapter = PandocAdapter::new("pandoc");
        let plan = adapter.build_plan(
            &request("/n/readme.md", "md", "html"),
            &ConversionOptions::new(),
        );
        assert!(plan.args.contains(&"--standalone".to_string()));
    }

    #[test]
    fn test_office_to_document() {
        let adapter = PandocAdapter::new("pandoc");
        assert!(adapter.supports(Category::Office, Category::Document));
        assert!(adapter.supports(Category::Document, Category::Ebook));
        assert!(!adapter.supports(Category::Ebook, Category::Document));
        assert!(!adapter.accepts_identical());
    }

    #[test]
    fn test_pdf_is_not_a_source() {
        let adapter = PandocAdapter::new("pandoc");
        let pdf = lookup_extension("pdf").unwrap();
        let epub = lookup_extension("epub").unwrap();
        let docx = lookup_extension("docx").unwrap();
        assert!(!adapter.supports_format(pdf, epub));
        assert!(!adapter.supports_format(pdf, docx));
        assert!(adapter.supports_format(lookup_extension("md").unwrap(), pdf));
        assert!(!adapter.supports_format(lookup_extension("xlsx").unwrap(), pdf));
        assert!(adapter.supports_format(docx, pdf));
    }
}
