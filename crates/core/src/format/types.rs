//! Types for the format module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad family of file kinds. Backends advertise capabilities in terms of
/// category pairs rather than individual extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Audio streams (mp3, flac, wav...)
    Audio,
    /// Video containers (mp4, mkv, webm...)
    Video,
    /// Raster and vector images readable by common image tools
    Image,
    /// Layered editor formats (psd, xcf) that no backend converts
    ImageProprietary,
    /// Markup and text documents (md, html, tex, pdf...)
    Document,
    /// Office suite documents (docx, xlsx, pptx...)
    Office,
    /// E-books (epub, mobi, azw3)
    Ebook,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Video,
        Category::Audio,
        Category::Image,
        Category::ImageProprietary,
        Category::Document,
        Category::Office,
        Category::Ebook,
    ];

    /// Returns the stable lowercase name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
            Self::ImageProprietary => "image-proprietary",
            Self::Document => "document",
            Self::Office => "office",
            Self::Ebook => "ebook",
        }
    }

    /// Extension picked when a target is requested by category name only.
    ///
    /// `None` for categories nothing can produce.
    pub fn default_extension(&self) -> Option<&'static str> {
        match self {
            Self::Audio => Some("mp3"),
            Self::Video => Some("mp4"),
            Self::Image => Some("png"),
            Self::ImageProprietary => None,
            Self::Document => Some("pdf"),
            Self::Office => Some("docx"),
            Self::Ebook => Some("epub"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Canonical identifier for a file kind.
///
/// Instances only come from the static registry, so they are cheap to copy
/// and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FormatSpec {
    /// Canonical lowercase extension without the dot.
    pub extension: &'static str,
    /// Category used for backend lookup.
    pub category: Category,
    /// Human readable label.
    pub label: &'static str,
}

impl FormatSpec {
    pub(crate) const fn new(
        extension: &'static str,
        category: Category,
        label: &'static str,
    ) -> Self {
        Self {
            extension,
            category,
            label,
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.extension, self.category)
    }
}
