pub mod backend;
pub mod config;
pub mod format;
pub mod info;
pub mod probe;
pub mod router;
pub mod runner;
pub mod testing;

pub use backend::{BackendAdapter, BackendRegistry, ConversionOptions, Quality};
pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
};
pub use format::{detect_format, parse_target, Category, FormatSpec};
pub use info::FileInfo;
pub use probe::{ProbeCache, ProbeStatus, UnavailableReason};
pub use router::{ConversionRequest, ExecutionPlan, Router, RouterError};
pub use runner::{ConversionOutcome, ProcessRunner, RunnerError};
