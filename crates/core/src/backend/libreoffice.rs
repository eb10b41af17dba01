//! LibreOffice adapter for office documents.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::options::ConversionOptions;
use super::path_arg;
use super::traits::BackendAdapter;
use crate::format::Category;
use crate::probe::{probe_command, ProbeStatus};
use crate::router::{ConversionRequest, ExecutionPlan};

const CAPABILITIES: &[(Category, Category)] = &[
    (Category::Office, Category::Office),
    (Category::Office, Category::Document),
];

/// Adapter around headless `soffice`.
///
/// `soffice --convert-to` always names its output `<stem>.<ext>` inside
/// `--outdir`, so same-format requests are declined rather than left to
/// overwrite the source.
pub struct LibreOfficeAdapter {
    program: PathBuf,
}

impl LibreOfficeAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl BackendAdapter for LibreOfficeAdapter {
    fn id(&self) -> &str {
        "libreoffice"
    }

    fn display_name(&self) -> &str {
        "LibreOffice"
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
        probe_command(&self.program, &["--headless", "--version"]).await
    }

    fn build_plan(
        &self,
        request: &ConversionRequest,
        options: &ConversionOptions,
    ) -> ExecutionPlan {
        let output_path = request.output_path(options.output_dir().as_deref());
        let outdir = output_path
            .parent()
            .map(Path::to_path_buf)
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        let args = vec![
            "--headless".to_string(),
            "--convert-to".to_string(),
            request.target_format.extension.to_string(),
            "--outdir".to_string(),
            path_arg(&outdir),
            path_arg(&request.source_path),
        ];

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
    use crate::backend::options::OUTPUT_DIR;
    use crate::format::lookup_extension;

    fn request(path: &str, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest::new(
            path,
            lookup_extension(from).unwrap(),
            lookup_extension(to).unwrap(),
        )
    }

    #[test]
    fn test_convert_to_pdf() {
        let adapter = LibreOfficeAdapter::new("soffice");
        let plan = adapter.build_plan(
            &request("/d/report.docx", "docx", "pdf"),
            &ConversionOptions::new(),
        );
        assert_eq!(
            plan.args,
            vec![
                "--headless",
                "--convert-to",
                "pdf",
                "--outdir",
                "/d",
                "/d/report.docx"
            ]
        );
        assert_eq!(plan.output_path, PathBuf::from("/d/report.pdf"));
    }

    #[test]
    fn test_outdir_follows_output_dir_option() {
        let adapter = LibreOfficeAdapter::new("soffice");
        let plan = adapter.build_plan(
            &request("/d/sheet.xls", "xls", "xlsx"),
            &ConversionOptions::new().with(OUTPUT_DIR, "/exports"),
        );
        assert!(plan.args.contains(&"/exports".to_string()));
        assert_eq!(plan.output_path, PathBuf::from("/exports/sheet.xlsx"));
    }

    #[test]
    fn test_relative_source_uses_current_dir() {
        let adapter = LibreOfficeAdapter::new("soffice");
        let plan = adapter.build_plan(
            &request("slides.pptx", "pptx", "pdf"),
            &ConversionOptions::new(),
        );
        assert_eq!(plan.args[4], ".");
    }

    #[test]
    fn test_declines_identical() {
        let adapter = LibreOfficeAdapter::new("soffice");
        assert!(!adapter.accepts_identical());
        assert!(adapter.supports(Category::Office, Category::Document));
        assert!(!adapter.supports(Category::Document, Category::Office));
    }
}
