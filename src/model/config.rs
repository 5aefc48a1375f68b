use std::path::PathBuf;

use crate::constants::{MAX_SEQ_LEN, MODEL_ID, MODEL_REVISION};

/// Where the QA model files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A directory holding `config.json`, `tokenizer.json` and the weights.
    Local(PathBuf),
    /// A hub repository, downloaded into the local hub cache on first use.
    Hub { model_id: String },
}

/// Configuration for [`BertQaEngine`](super::BertQaEngine).
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub source: ModelSource,

    /// Hub revision (ignored for local sources).
    pub revision: String,

    /// Tokenizer truncation length.
    pub max_seq_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::hub()
    }
}

impl ModelConfig {
    /// The pinned SQuAD checkpoint from the hub.
    pub fn hub() -> Self {
        Self {
            source: ModelSource::Hub {
                model_id: MODEL_ID.to_string(),
            },
            revision: MODEL_REVISION.to_string(),
            max_seq_len: MAX_SEQ_LEN,
        }
    }

    pub fn local<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            source: ModelSource::Local(model_dir.into()),
            ..Self::hub()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len == 0 || self.max_seq_len > MAX_SEQ_LEN {
            return Err(format!(
                "max_seq_len must be between 1 and {}, got {}",
                MAX_SEQ_LEN, self.max_seq_len
            ));
        }

        match &self.source {
            ModelSource::Local(path) if path.as_os_str().is_empty() => {
                Err("model_path cannot be empty when provided".to_string())
            }
            ModelSource::Hub { model_id } if model_id.trim().is_empty() => {
                Err("model_id cannot be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Human-readable label for logs.
    pub fn describe(&self) -> String {
        match &self.source {
            ModelSource::Local(path) => path.display().to_string(),
            ModelSource::Hub { model_id } => format!("{}@{}", model_id, self.revision),
        }
    }
}
