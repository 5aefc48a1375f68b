use std::path::PathBuf;
use thiserror::Error;

/// A bad `EXTRACTQA_*` value or a model directory that is not usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `EXTRACTQA_PORT=0`.
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("EXTRACTQA_BIND_ADDR '{value}' is not an IP address: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid max sequence length '{value}': must be between 1 and {max}")]
    InvalidMaxSeqLen { value: String, max: usize },

    /// `EXTRACTQA_MODEL_PATH` points nowhere.
    #[error("model directory does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("model path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
