//! File format identification.
//!
//! Formats live in a static registry keyed by canonical extension. Detection
//! prefers the extension and only falls back to sniffing a bounded header
//! prefix when the extension is missing or unregistered.

mod detect;
mod registry;
mod types;

pub use detect::{detect_format, format_from_extension, parse_target, sniff_signature, SNIFF_LEN};
pub use registry::{canonical_extension, formats_in, lookup_extension, FORMATS};
pub use types::{Category, FormatSpec};
