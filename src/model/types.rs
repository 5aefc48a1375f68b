use tokenizers::Encoding;

use super::error::ModelError;

/// Encoded `(question, context)` pair ready for the encoder.
///
/// All four vectors have the same length; `special_tokens_mask` is `1` at
/// `[CLS]`/`[SEP]`/`[PAD]` positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    ids: Vec<u32>,
    type_ids: Vec<u32>,
    attention_mask: Vec<u32>,
    special_tokens_mask: Vec<u32>,
}

impl TokenSequence {
    /// Builds a sequence from parallel vectors, rejecting ragged or empty input.
    pub fn from_parts(
        ids: Vec<u32>,
        type_ids: Vec<u32>,
        attention_mask: Vec<u32>,
        special_tokens_mask: Vec<u32>,
    ) -> Result<Self, ModelError> {
        let len = ids.len();
        if len == 0 {
            return Err(ModelError::TokenizationFailed {
                reason: "encoding produced no tokens".to_string(),
            });
        }
        if type_ids.len() != len || attention_mask.len() != len || special_tokens_mask.len() != len
        {
            return Err(ModelError::TokenizationFailed {
                reason: format!(
                    "ragged encoding: ids={}, type_ids={}, attention_mask={}, special_tokens_mask={}",
                    len,
                    type_ids.len(),
                    attention_mask.len(),
                    special_tokens_mask.len()
                ),
            });
        }

        Ok(Self {
            ids,
            type_ids,
            attention_mask,
            special_tokens_mask,
        })
    }

    pub fn from_encoding(encoding: &Encoding) -> Result<Self, ModelError> {
        Self::from_parts(
            encoding.get_ids().to_vec(),
            encoding.get_type_ids().to_vec(),
            encoding.get_attention_mask().to_vec(),
            encoding.get_special_tokens_mask().to_vec(),
        )
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn type_ids(&self) -> &[u32] {
        &self.type_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn special_tokens_mask(&self) -> &[u32] {
        &self.special_tokens_mask
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false`; construction rejects empty encodings.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Start- and end-position scores for one encoded sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLogits {
    pub start: Vec<f32>,
    pub end: Vec<f32>,
}

impl SpanLogits {
    pub fn new(start: Vec<f32>, end: Vec<f32>) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }
}
