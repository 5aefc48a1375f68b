use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::model::ModelError;

/// Failures of the model side of the pipeline.
///
/// Blank inputs and unusable spans are not errors; they are
/// [`AnswerOutcome`](super::AnswerOutcome) variants.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("blocking task failed: {reason}")]
    TaskFailed { reason: String },
}
