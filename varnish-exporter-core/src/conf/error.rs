use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO
    #[error("failed to read path mappings file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Rules
    #[error("invalid rewrite rule at {path}:{line} '{rule}': {source}")]
    InvalidRule {
        path: PathBuf,
        line: usize,
        rule: String,
        #[source]
        source: regex::Error,
    },

    // HTTP
    #[error("invalid listen address '{addr}': {reason}")]
    InvalidListenAddress { addr: String, reason: String },

    #[error("invalid metrics path '{path}': must start with '/' and not be '/'")]
    InvalidMetricsPath { path: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_listen_address(addr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidListenAddress {
            addr: addr.into(),
            reason: reason.into(),
        }
    }
}
