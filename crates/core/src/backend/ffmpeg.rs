//! FFmpeg adapter for audio and video.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::options::ConversionOptions;
use super::path_arg;
use super::traits::BackendAdapter;
use crate::format::Category;
use crate::probe::{probe_command, ProbeStatus};
use crate::router::{ConversionRequest, ExecutionPlan};

const CAPABILITIES: &[(Category, Category)] = &[
    (Category::Video, Category::Video),
    (Category::Video, Category::Audio),
    (Category::Audio, Category::Audio),
];

/// Adapter around the `ffmpeg` binary.
///
/// Same-format requests are accepted: they re-encode at the requested
/// quality.
pub struct FfmpegAdapter {
    program: PathBuf,
}

impl FfmpegAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_args(&self, request: &ConversionRequest, options: &ConversionOptions) -> Vec<String> {
        let preset = options.quality().preset();
        let output = request.output_path(options.output_dir().as_deref());
        let target = request.target_format;

        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            path_arg(&request.source_path),
        ];

        match target.category {
            Category::Video => {
                if let Some(codec) = options.codec() {
                    args.extend(["-c:v".to_string(), codec.to_string()]);
                }
                args.extend(["-crf".to_string(), preset.crf.to_string()]);
                args.extend(["-b:a".to_string(), format!("{}k", preset.audio_bitrate_kbps)]);
                if let Some(resolution) = options.resolution() {
                    args.extend(["-s".to_string(), resolution.to_string()]);
                }
                if let Some(fps) = options.fps() {
                    args.extend(["-r".to_string(), fps.to_string()]);
                }
            }
            _ => {
                if request.source_format.category == Category::Video {
                    // Drop the picture when extracting audio.
                    args.push("-vn".to_string());
                }
                if !is_lossless(target.extension) {
                    args.extend(["-b:a".to_string(), format!("{}k", preset.audio_bitrate_kbps)]);
                }
            }
        }

        args.push("-y".to_string());
        args.push(path_arg(&output));
        args
    }
}

fn is_lossless(extension: &str) -> bool {
    matches!(extension, "flac" | "wav")
}

#[async_trait]
impl BackendAdapter for FfmpegAdapter {
    fn id(&self) -> &str {
        "ffmpeg"
    }

    fn display_name(&self) -> &str {
        "FFmpeg"
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
