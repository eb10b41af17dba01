use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::backend::Quality;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            probe: ProbeConfig::default(),
            conversion: ConversionConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locations of the external programs each backend wraps.
///
/// Bare names are resolved through `PATH` when spawned.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
    #[serde(default = "default_magick")]
    pub magick: PathBuf,
    #[serde(default = "default_soffice")]
    pub soffice: PathBuf,
    #[serde(default = "default_pandoc")]
    pub pandoc: PathBuf,
    #[serde(default = "default_ebook_convert")]
    pub ebook_convert: PathBuf,
}

impl ToolsConfig {
    /// Name/path pairs, in backend registration order.
    pub fn entries(&self) -> [(&'static str, &PathBuf); 5] {
        [
            ("ffmpeg", &self.ffmpeg),
            ("magick", &self.magick),
            ("soffice", &self.soffice),
            ("pandoc", &self.pandoc),
            ("ebook_convert", &self.ebook_convert),
        ]
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            magick: default_magick(),
            soffice: default_soffice(),
            pandoc: default_pandoc(),
            ebook_convert: default_ebook_convert(),
        }
    }
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_magick() -> PathBuf {
    PathBuf::from("magick")
}

fn default_soffice() -> PathBuf {
    PathBuf::from("soffice")
}

fn default_pandoc() -> PathBuf {
    PathBuf::from("pandoc")
}

fn default_ebook_convert() -> PathBuf {
    PathBuf::from("ebook-convert")
}

/// Availability probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Upper bound for a single backend probe.
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_probe_timeout() -> u64 {
    5
}

/// Conversion execution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Upper bound for one external conversion process.
    #[serde(default = "default_conversion_timeout")]
    pub timeout_secs: u64,
    /// Quality preset used when the caller does not pick one.
    #[serde(default)]
    pub default_quality: Quality,
    /// Directory for converted files. Defaults to the source file's directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ConversionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_conversion_timeout(),
            default_quality: Quality::default(),
            output_dir: None,
        }
    }
}

fn default_conversion_timeout() -> u64 {
    600
}
