//! Model-file resolution and tokenizer setup.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::config::{ModelConfig, ModelSource};
use super::error::ModelError;

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightsFormat {
    Safetensors,
    Pytorch,
}

/// Paths to everything needed to build the engine.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
    pub weights_format: WeightsFormat,
}

impl ModelFiles {
    /// Resolves files for `config`, downloading from the hub when needed.
    pub fn resolve(config: &ModelConfig) -> Result<Self, ModelError> {
        match &config.source {
            ModelSource::Local(dir) => Self::from_dir(dir),
            ModelSource::Hub { model_id } => Self::from_hub(model_id, &config.revision),
        }
    }

    /// Looks for the model files inside a local directory.
    pub fn from_dir(dir: &Path) -> Result<Self, ModelError> {
        if !dir.is_dir() {
            return Err(ModelError::ModelNotFound {
                path: dir.to_path_buf(),
            });
        }

        let config = require_file(dir.join(CONFIG_FILE))?;
        let tokenizer = require_file(dir.join(TOKENIZER_FILE))?;

        let safetensors = dir.join(SAFETENSORS_FILE);
        let pytorch = dir.join(PYTORCH_FILE);
        let (weights, weights_format) = if safetensors.is_file() {
            (safetensors, WeightsFormat::Safetensors)
        } else if pytorch.is_file() {
            (pytorch, WeightsFormat::Pytorch)
        } else {
            return Err(ModelError::ModelNotFound { path: safetensors });
        };

        debug!(dir = %dir.display(), ?weights_format, "Resolved local QA model files");

        Ok(Self {
            config,
            tokenizer,
            weights,
            weights_format,
        })
    }

    fn from_hub(model_id: &str, revision: &str) -> Result<Self, ModelError> {
        let download_err = |reason: String| ModelError::DownloadFailed {
            model_id: model_id.to_string(),
            reason,
        };

        info!(model_id, revision, "Fetching QA model from the hub (cached after first run)");

        let api = ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| download_err(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config = repo
            .get(CONFIG_FILE)
            .map_err(|e| download_err(format!("{CONFIG_FILE}: {e}")))?;
        let tokenizer = repo
            .get(TOKENIZER_FILE)
            .map_err(|e| download_err(format!("{TOKENIZER_FILE}: {e}")))?;

        let (weights, weights_format) = match repo.get(SAFETENSORS_FILE) {
            Ok(path) => (path, WeightsFormat::Safetensors),
            Err(e) => {
                debug!(error = %e, "No safetensors weights on the hub, trying PyTorch weights");
                let path = repo
                    .get(PYTORCH_FILE)
                    .map_err(|e| download_err(format!("{PYTORCH_FILE}: {e}")))?;
                (path, WeightsFormat::Pytorch)
            }
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
            weights_format,
        })
    }
}

fn require_file(path: PathBuf) -> Result<PathBuf, ModelError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ModelError::ModelNotFound { path })
    }
}

/// Loads `tokenizer.json` with truncation to `max_len` and padding disabled.
///
/// Truncation uses the tokenizer's longest-first strategy, so a long
/// paragraph is shortened before the question is.
pub fn load_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer, ModelError> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| ModelError::ModelLoadFailed {
        reason: format!("Failed to load tokenizer from {}: {}", path.display(), e),
    })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| ModelError::InvalidConfig {
            reason: format!("Failed to configure truncation: {}", e),
        })?
        .with_padding(None);

    Ok(tokenizer)
}
