//! File inspection for the `info` command.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::backend::BackendRegistry;
use crate::format::{detect_format, FormatSpec};

/// What unifile knows about a file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// `None` when neither the extension nor the content is recognised.
    pub format: Option<FormatSpec>,
    /// Whether any registered backend declares a conversion from this format.
    pub convertible: bool,
}

impl FileInfo {
    /// Reads metadata and detects the format of `path`.
    pub fn inspect(path: &Path, registry: &BackendRegistry) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let path = std::fs::canonicalize(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = detect_format(&path).ok();
        let convertible = format
            .map(|f| !registry.target_categories(f.category).is_empty())
            .unwrap_or(false);

        Ok(Self {
            name,
            path,
            size_bytes: metadata.len(),
            format,
            convertible,
        })
    }

    /// Size rendered with a binary unit, e.g. `1.5 MiB`.
    pub fn human_size(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
        let mut size = self.size_bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} B", self.size_bytes)
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}
