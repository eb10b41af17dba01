//! ImageMagick adapter for raster and vector images.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::options::ConversionOptions;
use super::path_arg;
use super::traits::BackendAdapter;
use crate::format::Category;
use crate::probe::{probe_command, ProbeStatus};
use crate::router::{ConversionRequest, ExecutionPlan};

const CAPABILITIES: &[(Category, Category)] = &[(Category::Image, Category::Image)];

/// Image quality above which PNG output uses maximum zlib compression.
const PNG_MAX_COMPRESSION_ABOVE: u8 = 90;

/// Adapter around ImageMagick's `magick` (or legacy `convert`) binary.
pub struct ImageMagickAdapter {
    program: PathBuf,
}

impl ImageMagickAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_args(&self, request: &ConversionRequest, options: &ConversionOptions) -> Vec<String> {
        let preset = options.quality().preset();
        let output = request.output_path(options.output_dir().as_deref());

        let mut args = vec![path_arg(&request.source_path)];

        if let Some(resize) = options.resize() {
            args.extend(["-resize".to_string(), resize.to_string()]);
        }

        match request.target_format.extension {
            // JPEG has no alpha channel; flatten onto white.
            "jpg" => {
                args.extend([
                    "-background".to_string(),
                    "white".to_string(),
                    "-flatten".to_string(),
                    "-quality".to_string(),
                    preset.image_quality.to_string(),
                ]);
            }
            "png" => {
                let level = if preset.image_quality > PNG_MAX_COMPRESSION_ABOVE {
                    9
                } else {
                    6
                };
                args.extend([
                    "-define".to_string(),
                    format!("png:compression-level={}", level),
                ]);
            }
            _ => {
                args.extend(["-quality".to_string(), preset.image_quality.to_string()]);
            }
        }

        args.push(path_arg(&output));
        args
    }
}

#[async_trait]
impl BackendAdapter for ImageMagickAdapter {
    fn id(&self) -> &str {
        "imagemagick"
    }

    fn display_name(&self) -> &str {
        "ImageMagick"
    }

    fn program(&self) -> &Path {
        &self.program
    }

    fn capabilities(&self) -> &[(Category, Category)] {
        CAPABILITIES
    }

    async fn probe(&self) -> ProbeStatus {
        probe_command(&self.program, &["-version"]).await
    }

    fn build_plan(
        &self,
        request: &ConversionRequest,
        options: &ConversionOptions,
    ) -> ExecutionPlan {
        ExecutionPlan {
            adapter_id: self.id().to_string(),
            adapter_name: self.display_name().to_string(),
            program: self.program.clone(),
            args: self.build_args(request, options),
            source_path: request.source_path.clone(),
            output_path: request.output_path(options.output_dir().as_deref()),
            source_format: request.source_format,
            target_format: request.target_format,
        }
    }
}
