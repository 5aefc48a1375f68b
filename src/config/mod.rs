//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `EXTRACTQA_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::MAX_SEQ_LEN;
use crate::model::ModelConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `EXTRACTQA_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Local model directory (`config.json`, `tokenizer.json`, weights).
    ///
    /// When unset the model is downloaded from the hub on first load.
    pub model_path: Option<PathBuf>,

    /// Tokenizer truncation length. Default: `512`.
    pub max_seq_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Self::DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "EXTRACTQA_PORT";
    pub const ENV_BIND_ADDR: &'static str = "EXTRACTQA_BIND_ADDR";
    pub const ENV_MODEL_PATH: &'static str = "EXTRACTQA_MODEL_PATH";
    pub const ENV_MAX_SEQ_LEN: &'static str = "EXTRACTQA_MAX_SEQ_LEN";

    pub const DEFAULT_PORT: u16 = 8080;

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let max_seq_len = Self::parse_max_seq_len_from_env(defaults.max_seq_len)?;

        Ok(Self {
            port,
            bind_addr,
            model_path,
            max_seq_len,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.max_seq_len == 0 || self.max_seq_len > MAX_SEQ_LEN {
            return Err(ConfigError::InvalidMaxSeqLen {
                value: self.max_seq_len.to_string(),
                max: MAX_SEQ_LEN,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Model loading settings derived from this configuration.
    pub fn model_config(&self) -> ModelConfig {
        let config = match &self.model_path {
            Some(path) => ModelConfig::local(path.clone()),
            None => ModelConfig::hub(),
        };
        config.with_max_seq_len(self.max_seq_len)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_max_seq_len_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_MAX_SEQ_LEN) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(len) if (1..=MAX_SEQ_LEN).contains(&len) => Ok(len),
                _ => Err(ConfigError::InvalidMaxSeqLen {
                    value,
                    max: MAX_SEQ_LEN,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
