//! Per-request conversion options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Option key for the quality preset.
pub const QUALITY: &str = "quality";
/// Option key for video frame size, e.g. `1280x720`.
pub const RESOLUTION: &str = "resolution";
/// Option key for video frame rate.
pub const FPS: &str = "fps";
/// Option key for an explicit video codec.
pub const CODEC: &str = "codec";
/// Option key for image resizing, e.g. `50%` or `1920x1080`.
pub const RESIZE: &str = "resize";
/// Option key for the output directory.
pub const OUTPUT_DIR: &str = "output_dir";

/// Named quality levels shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

/// Concrete encoder settings behind a [`Quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityPreset {
    /// x264-style constant rate factor (lower is better).
    pub crf: u8,
    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
    /// Image quality, 1-100.
    pub image_quality: u8,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Low, Quality::Medium, Quality::High, Quality::Ultra];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }

    pub fn preset(&self) -> QualityPreset {
        match self {
            Self::Low => QualityPreset {
                crf: 28,
                audio_bitrate_kbps: 128,
                image_quality: 60,
            },
            Self::Medium => QualityPreset {
                crf: 23,
                audio_bitrate_kbps: 192,
                image_quality: 80,
            },
            Self::High => QualityPreset {
                crf: 18,
                audio_bitrate_kbps: 256,
                image_quality: 95,
            },
            Self::Ultra => QualityPreset {
                crf: 15,
                audio_bitrate_kbps: 320,
                image_quality: 100,
            },
        }
    }

    /// One-line summary for menus.
    pub fn description(&self) -> String {
        let preset = self.preset();
        format!(
            "{}k audio / CRF {} / image quality {}",
            preset.audio_bitrate_kbps, preset.crf, preset.image_quality
        )
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str() == lowered)
            .ok_or_else(|| format!("unknown quality: {}", s))
    }
}

/// Flat option map supplied by the caller alongside a conversion request.
///
/// Keys are free-form; adapters read the ones they understand through the
/// typed accessors and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionOptions {
    values: BTreeMap<String, String>,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a `key=value` pair as typed on the command line.
    pub fn parse_pair(pair: &str) -> Result<(String, String), String> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty option name in '{}'", pair));
        }
        Ok((key.to_string(), value.trim().to_string()))
    }

    /// The requested quality; unknown values fall back to the default preset.
    pub fn quality(&self) -> Quality {
        match self.get(QUALITY) {
            None => Quality::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, Quality::default());
                Quality::default()
            }),
        }
    }

    pub fn resolution(&self) -> Option<&str> {
        self.non_original(RESOLUTION)
    }

    pub fn fps(&self) -> Option<&str> {
        self.non_original(FPS)
    }

    pub fn codec(&self) -> Option<&str> {
        self.non_original(CODEC)
    }

    pub fn resize(&self) -> Option<&str> {
        self.non_original(RESIZE)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.get(OUTPUT_DIR)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }

    /// Values equal to "original" (any case) or empty mean "leave as is".
    fn non_original(&self, key: &str) -> Option<&str> {
        self.get(key)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("original"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConversionOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_presets_match_levels() {
        assert_eq!(Quality::Low.preset().crf, 28);
        assert_eq!(Quality::Medium.preset().audio_bitrate_kbps, 192);
        assert_eq!(Quality::High.preset().image_quality, 95);
        assert_eq!(Quality::Ultra.preset().audio_bitrate_kbps, 320);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("HIGH".parse::<Quality>().unwrap(), Quality::High);
        assert!("extreme".parse::<Quality>().is_err());
    }

    #[test]
    fn test_options_quality_fallback() {
        assert_eq!(ConversionOptions::new().quality(), Quality::Medium);
        let opts = ConversionOptions::new().with(QUALITY, "ultra");
        assert_eq!(opts.quality(), Quality::Ultra);
        let opts = ConversionOptions::new().with(QUALITY, "bogus");
        assert_eq!(opts.quality(), Quality::Medium);
    }

    #[test]
    fn test_original_means_unset() {
        let opts = ConversionOptions::new()
            .with(RESOLUTION, "Original")
            .with(FPS, "30")
            .with(RESIZE, "");
        assert_eq!(opts.resolution(), None);
        assert_eq!(opts.fps(), Some("30"));
        assert_eq!(opts.resize(), None);
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            ConversionOptions::parse_pair("codec = libx265").unwrap(),
            ("codec".to_string(), "libx265".to_string())
        );
        assert!(ConversionOptions::parse_pair("novalue").is_err());
        assert!(ConversionOptions::parse_pair("=x").is_err());
    }

    #[test]
    fn test_collect_and_iterate_sorted() {
        let opts: ConversionOptions = vec![("fps", "24"), ("codec", "libx264")]
            .into_iter()
            .collect();
        let keys: Vec<_> = opts.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["codec", "fps"]);
    }

    #[test]
    fn test_output_dir() {
        let opts = ConversionOptions::new().with(OUTPUT_DIR, "/tmp/out");
        assert_eq!(opts.output_dir(), Some(PathBuf::from("/tmp/out")));
        assert_eq!(ConversionOptions::new().output_dir(), None);
    }
}
