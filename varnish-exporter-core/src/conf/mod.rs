//! Startup configuration: flag values in, one validated [`ExporterConfig`] out.

pub mod error;
mod mappings;
mod types;
mod validate;
#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use mappings::{load_rewriter, parse_mappings};
pub use types::{
    DEFAULT_LISTEN_ADDR, DEFAULT_METRICS_PATH, DEFAULT_PROGRAM, ExporterConfig, ExporterSettings,
    LineSource, VarnishncsaSource,
};
pub use validate::{normalize_listen_addr, validate_metrics_path};
