use candle_core::{DType, Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::extraction::{ExtractionError, SpanDecoder};

use super::bert::BertForQuestionAnswering;
use super::config::ModelConfig;
use super::device::select_device;
use super::error::ModelError;
use super::files::{ModelFiles, load_tokenizer};
use super::types::{SpanLogits, TokenSequence};
use super::QaEngine;

/// BERT SQuAD model plus its WordPiece tokenizer.
pub struct BertQaEngine {
    device: Device,
    config: ModelConfig,
    model: BertForQuestionAnswering,
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for BertQaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertQaEngine")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .finish()
    }
}

impl BertQaEngine {
    /// Resolves (and if needed downloads) the model files, then loads them.
    ///
    /// This is slow: the large SQuAD checkpoint is over a gigabyte.
    pub fn load(config: ModelConfig) -> Result<Self, ModelError> {
        if let Err(reason) = config.validate() {
            return Err(ModelError::InvalidConfig { reason });
        }

        let files = ModelFiles::resolve(&config)?;
        Self::load_files(config, &files)
    }

    /// Loads from already-resolved files.
    pub fn load_files(config: ModelConfig, files: &ModelFiles) -> Result<Self, ModelError> {
        let device = select_device()?;
        debug!(?device, "Selected compute device for QA model");

        info!(
            model = %config.describe(),
            weights = %files.weights.display(),
            max_seq_len = config.max_seq_len,
            "Loading QA model"
        );

        let model = BertForQuestionAnswering::load(files, &device).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load BERT QA model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer(&files.tokenizer, config.max_seq_len)?;

        info!(model = %config.describe(), "QA model loaded successfully");

        Ok(Self {
            device,
            config,
            model,
            tokenizer,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn row_tensor(&self, values: &[u32]) -> Result<Tensor, ModelError> {
        Ok(Tensor::new(values, &self.device)?.unsqueeze(0)?)
    }
}

impl SpanDecoder for BertQaEngine {
    fn decode_span(&self, ids: &[u32]) -> Result<String, ExtractionError> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| ExtractionError::DecodeFailed {
                reason: e.to_string(),
            })
    }
}

impl QaEngine for BertQaEngine {
    fn encode(&self, question: &str, context: &str) -> Result<TokenSequence, ModelError> {
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| ModelError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        if !encoding.get_overflowing().is_empty() {
            debug!(
                max_seq_len = self.config.max_seq_len,
                "Input truncated to the model's maximum length"
            );
        }

        TokenSequence::from_encoding(&encoding)
    }

    fn infer(&self, tokens: &TokenSequence) -> Result<SpanLogits, ModelError> {
        debug!(seq_len = tokens.len(), "Running QA inference");

        let input_ids = self.row_tensor(tokens.ids())?;
        let type_ids = self.row_tensor(tokens.type_ids())?;
        let attention_mask = self.row_tensor(tokens.attention_mask())?;

        let (start, end) = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| ModelError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let start = start.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?;
        let end = end.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?;

        Ok(SpanLogits::new(start, end))
    }
}
