//! Question → answer pipeline.
//!
//! [`answer`] runs one validate → encode → infer → extract chain
//! synchronously. [`SharedEngine`] owns the process-wide engine and runs the
//! same chain from async code.

pub mod error;
pub mod shared;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::QaError;
pub use shared::SharedEngine;
pub use types::{AnswerOutcome, AnswerRequest};

use tracing::{debug, info};

use crate::extraction::{Extraction, extract_answer};
use crate::model::QaEngine;

/// Answers `request` with `engine`.
///
/// Missing inputs short-circuit before encoding. Model failures propagate.
pub fn answer<E: QaEngine + ?Sized>(
    engine: &E,
    request: &AnswerRequest,
) -> Result<AnswerOutcome, QaError> {
    if let Some(outcome) = request.missing_input() {
        return Ok(outcome);
    }

    let tokens = engine.encode(&request.question, &request.context)?;
    let logits = engine.infer(&tokens)?;

    debug!(
        seq_len = tokens.len(),
        question_len = request.question.len(),
        context_len = request.context.len(),
        "Inference complete"
    );

    let outcome = match extract_answer(&logits.start, &logits.end, tokens.ids(), engine)? {
        Extraction::Answer { text, span } => AnswerOutcome::Answered { answer: text, span },
        Extraction::NoValidAnswer { reason } => {
            debug!(?reason, "No valid answer span");
            AnswerOutcome::NoValidAnswer
        }
    };

    info!(status = outcome.status(), "Question answered");
    Ok(outcome)
}
