//! Answer extraction from start/end logits.
//!
//! Selection is greedy: the start and end positions are the independent
//! argmaxes of their score vectors. There is no span search, no length limit
//! and no confidence threshold. A span whose end precedes its start, or that
//! decodes to nothing but whitespace or the `[CLS]` placeholder, is reported
//! as [`Extraction::NoValidAnswer`].

pub mod error;
pub mod types;


pub use error::ExtractionError;
pub use types::{AnswerSpan, Extraction, NoAnswerReason};

use tracing::debug;

use crate::constants::NO_ANSWER_MARKER;

/// Turns a slice of token ids back into text.
///
/// Implementations strip model-internal marker tokens (`[CLS]`, `[SEP]`, `[PAD]`).
pub trait SpanDecoder {
    fn decode_span(&self, ids: &[u32]) -> Result<String, ExtractionError>;
}

/// Index of the maximum score, first occurrence on ties.
///
/// NaN never replaces the running best. Returns `None` for an empty slice.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best_idx = 0;
    let mut best = *first;

    for (offset, &score) in rest.iter().enumerate() {
        if score > best || (best.is_nan() && !score.is_nan()) {
            best = score;
            best_idx = offset + 1;
        }
    }

    Some(best_idx)
}

/// Picks the start and end argmaxes; `Err` carries the inverted pair.
pub fn select_span(
    start_scores: &[f32],
    end_scores: &[f32],
) -> Result<Result<AnswerSpan, NoAnswerReason>, ExtractionError> {
    check_lengths(start_scores.len(), end_scores.len(), start_scores.len())?;

    let (Some(start), Some(end)) = (argmax(start_scores), argmax(end_scores)) else {
        return Err(ExtractionError::InvalidInput {
            reason: "score vectors are empty".to_string(),
        });
    };

    Ok(AnswerSpan::new(start, end, start_scores.len())
        .ok_or(NoAnswerReason::InvertedSpan { start, end }))
}

/// Selects the best span and decodes it to answer text.
///
/// All three slices must have the same non-zero length.
pub fn extract_answer<D: SpanDecoder + ?Sized>(
    start_scores: &[f32],
    end_scores: &[f32],
    ids: &[u32],
    decoder: &D,
) -> Result<Extraction, ExtractionError> {
    check_lengths(start_scores.len(), end_scores.len(), ids.len())?;

    let span = match select_span(start_scores, end_scores)? {
        Ok(span) => span,
        Err(reason) => {
            debug!(?reason, "End position precedes start position");
            return Ok(Extraction::NoValidAnswer { reason });
        }
    };

    let decoded = decoder.decode_span(span.slice(ids))?;
    let text = decoded.trim();

    debug!(
        start = span.start(),
        end = span.end(),
        tokens = span.token_count(),
        answer_len = text.len(),
        "Selected answer span"
    );

    if text.is_empty() {
        return Ok(Extraction::NoValidAnswer {
            reason: NoAnswerReason::EmptyText,
        });
    }
    if text == NO_ANSWER_MARKER {
        return Ok(Extraction::NoValidAnswer {
            reason: NoAnswerReason::MarkerOnly,
        });
    }

    Ok(Extraction::Answer {
        text: text.to_string(),
        span,
    })
}

fn check_lengths(start: usize, end: usize, ids: usize) -> Result<(), ExtractionError> {
    if start == 0 {
        return Err(ExtractionError::InvalidInput {
            reason: "score vectors are empty".to_string(),
        });
    }
    if start != end || start != ids {
        return Err(ExtractionError::InvalidInput {
            reason: format!(
                "length mismatch: start_scores={}, end_scores={}, tokens={}",
                start, end, ids
            ),
        });
    }
    Ok(())
}
