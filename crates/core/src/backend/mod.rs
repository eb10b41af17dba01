//! Backend adapters for external conversion tools.
//!
//! Each adapter wraps one program, declares the category pairs it handles,
//! and builds the command line for a resolved request. Adapters never run
//! anything except their own version probe; execution belongs to
//! [`crate::runner`].
//!
//! # Example
//!
//! ```ignore
//! use unifile_core::backend::{BackendRegistry, ConversionOptions};
//! use unifile_core::config::ToolsConfig;
//! use unifile_core::format::Category;
//!
//! let registry = BackendRegistry::builtin(&ToolsConfig::default());
//! for adapter in registry.find_candidates(Category::Office, Category::Document) {
//!     println!("{}", adapter.display_name());
//! }
//! ```

mod calibre;
mod ffmpeg;
mod imagemagick;
mod libreoffice;
pub mod options;
mod pandoc;
mod registry;
mod traits;

pub use calibre::CalibreAdapter;
pub use ffmpeg::FfmpegAdapter;
pub use imagemagick::ImageMagickAdapter;
pub use libreoffice::LibreOfficeAdapter;
pub use options::{ConversionOptions, Quality, QualityPreset};
pub use pandoc::PandocAdapter;
pub use registry::BackendRegistry;
pub use traits::BackendAdapter;

use std::path::Path;

/// Renders a path as a single command argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
