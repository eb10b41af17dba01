//! Format detection by extension, with a content sniff fallback.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::registry::lookup_extension;
use super::types::{Category, FormatSpec};
use crate::router::RouterError;

/// Maximum number of header bytes read when sniffing content.
pub const SNIFF_LEN: usize = 128;

/// Detects the format of `path`.
///
/// The extension wins whenever it is registered; the file is not opened in
/// that case. Otherwise up to [`SNIFF_LEN`] bytes are read and matched
/// against known signatures.
pub fn detect_format(path: &Path) -> Result<FormatSpec, RouterError> {
    if let Some(spec) = format_from_extension(path) {
        debug!("Detected {:?} as {} by extension", path, spec.extension);
        return Ok(spec);
    }

    let header = match read_header(path) {
        Ok(header) => header,
        Err(e) => {
            debug!("Could not read header of {:?}: {}", path, e);
            return Err(RouterError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
    };

    match sniff_signature(&header) {
        Some(spec) => {
            debug!("Detected {:?} as {} by signature", path, spec.extension);
            Ok(spec)
        }
        None => Err(RouterError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Returns the registered format for the path's extension, if any.
pub fn format_from_extension(path: &Path) -> Option<FormatSpec> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(lookup_extension)
}

/// Resolves a requested target given as an extension, an alias, or a
/// category name.
pub fn parse_target(requested: &str) -> Result<FormatSpec, RouterError> {
    if let Some(spec) = lookup_extension(requested) {
        return Ok(spec);
    }

    requested
        .parse::<Category>()
        .ok()
        .and_then(|category| category.default_extension())
        .and_then(lookup_extension)
        .ok_or_else(|| RouterError::UnknownTarget {
            requested: requested.to_string(),
        })
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Matches a header prefix against known magic signatures.
pub fn sniff_signature(header: &[u8]) -> Option<FormatSpec> {
    let ext = sniff_extension(header)?;
    lookup_extension(ext)
}

fn has_at(h: &[u8], offset: usize, magic: &[u8]) -> bool {
    h.len() >= offset + magic.len() && &h[offset..offset + magic.len()] == magic
}

fn sniff_extension(h: &[u8]) -> Option<&'static str> {
    if has_at(h, 0, b"\x89PNG\r\n\x1a\n") {
        return Some("png");
    }
    if has_at(h, 0, b"\xff\xd8\xff") {
        return Some("jpg");
    }
    if has_at(h, 0, b"GIF87a") || has_at(h, 0, b"GIF89a") {
        return Some("gif");
    }
    if has_at(h, 0, b"II*\0") || has_at(h, 0, b"MM\0*") {
        return Some("tiff");
    }
    if has_at(h, 0, b"8BPS") {
        return Some("psd");
    }
    if has_at(h, 0, b"gimp xcf") {
        return Some("xcf");
    }
    if has_at(h, 0, b"%PDF-") {
        return Some("pdf");
    }
    if has_at(h, 0, b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1") {
        return Some("doc");
    }
    if has_at(h, 0, b"PK\x03\x04") {
        // Only EPUB carries a readable marker this early; other zip-based
        // formats are ambiguous without opening the archive.
        return has_at(h, 30, b"mimetypeapplication/epub+zip").then_some("epub");
    }
    if has_at(h, 60, b"BOOKMOBI") {
        return Some("mobi");
    }
    if has_at(h, 0, b"RIFF") {
        if has_at(h, 8, b"WEBP") {
            return Some("webp");
        }
        if has_at(h, 8, b"WAVE") {
            return Some("wav");
        }
        if has_at(h, 8, b"AVI ") {
            return Some("avi");
        }
        return None;
    }
    if has_at(h, 0, b"\x1a\x45\xdf\xa3") {
        let is_webm = h.windows(4).any(|w| w == b"webm");
        return Some(if is_webm { "webm" } else { "mkv" });
    }
    if has_at(h, 4, b"ftyp") {
        return Some(if has_at(h, 8, b"M4A ") {
            "m4a"
        } else if has_at(h, 8, b"qt  ") {
            "mov"
        } else {
            "mp4"
        });
    }
    if has_at(h, 0, b"fLaC") {
        return Some("flac");
    }
    if has_at(h, 0, b"OggS") {
        return Some(if has_at(h, 28, b"OpusHead") { "opus" } else { "ogg" });
    }
    if has_at(h, 0, b"ID3") || (h.len() >= 2 && h[0] == 0xff && h[1] & 0xe0 == 0xe0) {
        return Some("mp3");
    }
    if has_at(h, 0, b"BM") {
        return Some("bmp");
    }

    let text = String::from_utf8_lossy(h).trim_start().to_ascii_lowercase();
    if text.starts_with("<!doctype html") || text.starts_with("<html") {
        return Some("html");
    }
    if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
        return Some("svg");
    }

    None
}
