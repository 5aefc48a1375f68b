//! Tokenizer/model adapter around the pretrained SQuAD checkpoint.
//!
//! - [`BertQaEngine`] runs the real model with `candle` and `tokenizers`.
//! - [`StubQaEngine`] (tests / `mock` feature) needs no model files.
//!
//! Both implement [`QaEngine`], the seam the pipeline and server are written
//! against.

/// BERT encoder with the span-prediction head.
pub mod bert;
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod engine;
mod error;
/// Model-file resolution (local directory or hub) and tokenizer loading.
pub mod files;
#[cfg(any(test, feature = "mock"))]
pub mod stub;
mod types;


pub use config::{ModelConfig, ModelSource};
pub use engine::BertQaEngine;
pub use error::ModelError;
pub use types::{SpanLogits, TokenSequence};

#[cfg(any(test, feature = "mock"))]
pub use stub::StubQaEngine;

use crate::extraction::SpanDecoder;

/// Encode → infer → decode capability of an extractive QA model.
///
/// Decoding comes from [`SpanDecoder`] and must strip special tokens.
pub trait QaEngine: SpanDecoder + Send + Sync {
    /// Encodes `question` as the first segment and `context` as the second,
    /// truncating to the engine's maximum sequence length.
    fn encode(&self, question: &str, context: &str) -> Result<TokenSequence, ModelError>;

    /// Scores every position of `tokens` as a span start and a span end.
    fn infer(&self, tokens: &TokenSequence) -> Result<SpanLogits, ModelError>;

    /// `true` for engines that do not run a real model.
    fn is_stub(&self) -> bool {
        false
    }
}
