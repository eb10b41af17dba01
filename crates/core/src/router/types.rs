//! Types for the router module.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::format::FormatSpec;

/// Suffix appended to the output stem when it would otherwise overwrite the
/// source file.
pub const CONVERTED_SUFFIX: &str = "_converted";

/// A detected source file paired with a resolved target format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source_path: PathBuf,
    pub source_format: FormatSpec,
    pub target_format: FormatSpec,
}

impl ConversionRequest {
    pub fn new(
        source_path: impl Into<PathBuf>,
        source_format: FormatSpec,
        target_format: FormatSpec,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            source_format,
            target_format,
        }
    }

    /// Whether source and target are the same canonical format.
    pub fn is_identical(&self) -> bool {
        self.source_format == self.target_format
    }

    /// Where the converted file should land.
    ///
    /// Uses `output_dir` when given, else the source's directory. The file is
    /// `<stem>.<target ext>`, or `<stem>_converted.<target ext>` when that
    /// would be the source path itself. The comparison ignores `.` components
    /// and the case of the file name, so `Photo.JPG` never becomes the
    /// target of its own `jpg` re-encode.
    pub fn output_path(&self, output_dir: Option<&Path>) -> PathBuf {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => self
                .source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let ext = self.target_format.extension;

        let candidate = dir.join(format!("{}.{}", stem, ext));
        if same_location(&candidate, &self.source_path) {
            dir.join(format!("{}{}.{}", stem, CONVERTED_SUFFIX, ext))
        } else {
            candidate
        }
    }
}

/// `path` without `.` components.
pub(crate) fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Whether two paths name the same file, up to `.` components and the case
/// of the file name.
fn same_location(a: &Path, b: &Path) -> bool {
    let (a, b) = (strip_cur_dir(a), strip_cur_dir(b));
    if a.parent() != b.parent() {
        return false;
    }
    match (a.file_name(), b.file_name()) {
        (Some(x), Some(y)) => x
            .to_string_lossy()
            .eq_ignore_ascii_case(&y.to_string_lossy()),
        _ => a == b,
    }
}

/// A fully resolved command, ready to hand to the process runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    /// Adapter that built the plan.
    pub adapter_id: String,
    pub adapter_name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub source_path: PathBuf,
    /// Where the tool is expected to write its result.
    pub output_path: PathBuf,
    pub source_format: FormatSpec,
    pub target_format: FormatSpec,
}

impl ExecutionPlan {
    /// Shell-like rendering of the command, for logs and dry runs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .map(|part| quote(&part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(part: &str) -> String {
    if part.is_empty() || part.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", part.replace('\'', r"'\''"))
    } else {
        part.to_string()
    }
}
