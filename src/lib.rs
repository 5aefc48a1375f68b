//! Extractive question answering over a user-supplied paragraph.
//!
//! A pretrained BERT SQuAD checkpoint scores every token of the encoded
//! `(question, paragraph)` pair as a possible answer start and end; the
//! extractor takes the two argmaxes and decodes the span between them.
//!
//! # Modules
//!
//! - [`extraction`] - argmax span selection, decoding, validity checks (pure)
//! - [`model`] - [`QaEngine`] seam, [`BertQaEngine`] (candle + tokenizers)
//! - [`pipeline`] - [`AnswerRequest`] → [`AnswerOutcome`], [`SharedEngine`]
//! - [`config`] - `EXTRACTQA_*` environment configuration
//! - [`constants`] - model id, limits, user-facing messages
//!
//! ## Test/Mock Support
//! [`StubQaEngine`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod extraction;
pub mod model;
pub mod pipeline;

pub use config::{Config, ConfigError};
pub use constants::{MAX_SEQ_LEN, MODEL_ID, NO_ANSWER_MARKER, STATUS_HEADER};
pub use extraction::{
    AnswerSpan, Extraction, ExtractionError, NoAnswerReason, SpanDecoder, argmax, extract_answer,
    select_span,
};
pub use model::{
    BertQaEngine, ModelConfig, ModelError, ModelSource, QaEngine, SpanLogits, TokenSequence,
};
pub use pipeline::{AnswerOutcome, AnswerRequest, QaError, SharedEngine, answer};

#[cfg(any(test, feature = "mock"))]
pub use model::StubQaEngine;
