//! Static registry of known file formats.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{Category, FormatSpec};

/// Every format the tool knows about, grouped by category.
pub static FORMATS: &[FormatSpec] = &[
    // Video
    FormatSpec::new("mp4", Category::Video, "MPEG-4 video"),
    FormatSpec::new("mkv", Category::Video, "Matroska video"),
    FormatSpec::new("avi", Category::Video, "AVI video"),
    FormatSpec::new("mov", Category::Video, "QuickTime video"),
    FormatSpec::new("webm", Category::Video, "WebM video"),
    FormatSpec::new("flv", Category::Video, "Flash video"),
    FormatSpec::new("wmv", Category::Video, "Windows Media video"),
    FormatSpec::new("m4v", Category::Video, "iTunes video"),
    // Audio
    FormatSpec::new("mp3", Category::Audio, "MP3 audio"),
    FormatSpec::new("wav", Category::Audio, "WAVE audio"),
    FormatSpec::new("flac", Category::Audio, "FLAC audio"),
    FormatSpec::new("aac", Category::Audio, "AAC audio"),
    FormatSpec::new("ogg", Category::Audio, "Ogg Vorbis audio"),
    FormatSpec::new("m4a", Category::Audio, "MPEG-4 audio"),
    FormatSpec::new("wma", Category::Audio, "Windows Media audio"),
    FormatSpec::new("opus", Category::Audio, "Opus audio"),
    // Image
    FormatSpec::new("png", Category::Image, "PNG image"),
    FormatSpec::new("jpg", Category::Image, "JPEG image"),
    FormatSpec::new("gif", Category::Image, "GIF image"),
    FormatSpec::new("bmp", Category::Image, "Bitmap image"),
    FormatSpec::new("webp", Category::Image, "WebP image"),
    FormatSpec::new("svg", Category::Image, "SVG image"),
    FormatSpec::new("tiff", Category::Image, "TIFF image"),
    // Layered editor images
    FormatSpec::new("psd", Category::ImageProprietary, "Photoshop document"),
    FormatSpec::new("xcf", Category::ImageProprietary, "GIMP image"),
    // Document
    FormatSpec::new("md", Category::Document, "Markdown"),
    FormatSpec::new("html", Category::Document, "HTML"),
    FormatSpec::new("txt", Category::Document, "Plain text"),
    FormatSpec::new("tex", Category::Document, "LaTeX"),
    FormatSpec::new("rst", Category::Document, "reStructuredText"),
    FormatSpec::new("pdf", Category::Document, "PDF"),
    // Office
    FormatSpec::new("doc", Category::Office, "Word 97 document"),
    FormatSpec::new("docx", Category::Office, "Word document"),
    FormatSpec::new("odt", Category::Office, "OpenDocument text"),
    FormatSpec::new("xls", Category::Office, "Excel 97 workbook"),
    FormatSpec::new("xlsx", Category::Office, "Excel workbook"),
    FormatSpec::new("ppt", Category::Office, "PowerPoint 97 presentation"),
    FormatSpec::new("pptx", Category::Office, "PowerPoint presentation"),
    // Ebook
    FormatSpec::new("epub", Category::Ebook, "EPUB e-book"),
    FormatSpec::new("mobi", Category::Ebook, "Mobipocket e-book"),
    FormatSpec::new("azw3", Category::Ebook, "Kindle e-book"),
];

/// Alternate spellings mapped to their canonical extension.
static ALIASES: &[(&str, &str)] = &[
    ("jpeg", "jpg"),
    ("jpe", "jpg"),
    ("tif", "tiff"),
    ("htm", "html"),
    ("markdown", "md"),
    ("text", "txt"),
    ("latex", "tex"),
    ("oga", "ogg"),
];

static BY_EXTENSION: Lazy<HashMap<&'static str, FormatSpec>> = Lazy::new(|| {
    let mut index: HashMap<&'static str, FormatSpec> =
        FORMATS.iter().map(|spec| (spec.extension, *spec)).collect();
    for (alias, canonical) in ALIASES {
        if let Some(spec) = index.get(canonical).copied() {
            index.insert(*alias, spec);
        }
    }
    index
});

/// Normalizes an extension (any case, optional leading dot, aliases) to its
/// canonical form. Returns `None` for unregistered extensions.
pub fn canonical_extension(ext: &str) -> Option<&'static str> {
    lookup_extension(ext).map(|spec| spec.extension)
}

/// Looks up a format by extension or alias.
pub fn lookup_extension(ext: &str) -> Option<FormatSpec> {
    let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    BY_EXTENSION.get(normalized.as_str()).copied()
}

/// All registered formats of one category, in registry order.
pub fn formats_in(category: Category) -> Vec<FormatSpec> {
    FORMATS
        .iter()
        .filter(|spec| spec.category == category)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = HashSet::new();
        for spec in FORMATS {
            assert!(seen.insert(spec.extension), "duplicate {}", spec.extension);
        }
    }

    #[test]
    fn test_aliases_normalize_to_canonical() {
        assert_eq!(canonical_extension("jpeg"), Some("jpg"));
        assert_eq!(canonical_extension("JPG"), Some("jpg"));
        assert_eq!(canonical_extension(".HTM"), Some("html"));
        assert_eq!(canonical_extension("tif"), Some("tiff"));
        assert_eq!(canonical_extension("xyz"), None);
    }

    #[test]
    fn test_aliases_never_shadow_canonical_entries() {
        for (alias, canonical) in ALIASES {
            assert!(FORMATS.iter().all(|s| s.extension != *alias));
            assert!(FORMATS.iter().any(|s| s.extension == *canonical));
        }
    }

    #[test]
    fn test_every_default_extension_is_registered() {
        for category in Category::ALL {
            if let Some(ext) = category.default_extension() {
                let spec = lookup_extension(ext).unwrap();
                assert_eq!(spec.category, category);
            }
        }
    }

    #[test]
    fn test_formats_in_preserves_order() {
        let audio: Vec<_> = formats_in(Category::Audio)
            .iter()
            .map(|s| s.extension)
            .collect();
        assert_eq!(audio[0], "mp3");
        assert!(audio.contains(&"opus"));
        assert!(formats_in(Category::Video).iter().all(|s| s.category == Category::Video));
    }
}
