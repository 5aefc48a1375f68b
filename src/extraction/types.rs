use serde::Serialize;

/// Inclusive token span with `start <= end < len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerSpan {
    start: usize,
    end: usize,
}

impl AnswerSpan {
    /// Returns `None` if the span is inverted or does not fit in `len` tokens.
    pub fn new(start: usize, end: usize, len: usize) -> Option<Self> {
        (start <= end && end < len).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of tokens covered (never zero).
    pub fn token_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Slices `ids` to the tokens covered by this span.
    pub fn slice<'a>(&self, ids: &'a [u32]) -> &'a [u32] {
        &ids[self.start..=self.end]
    }
}

/// Why a span did not produce a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoAnswerReason {
    /// The end argmax precedes the start argmax.
    InvertedSpan { start: usize, end: usize },
    /// The span decoded to whitespace only (e.g. special tokens stripped).
    EmptyText,
    /// The span decoded to the `[CLS]` placeholder.
    MarkerOnly,
}

/// Result of running the extractor over one set of logits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Answer { text: String, span: AnswerSpan },
    NoValidAnswer { reason: NoAnswerReason },
}

impl Extraction {
    pub fn is_answer(&self) -> bool {
        matches!(self, Extraction::Answer { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Answer { text, .. } => Some(text),
            Extraction::NoValidAnswer { .. } => None,
        }
    }

    pub fn span(&self) -> Option<AnswerSpan> {
        match self {
            Extraction::Answer { span, .. } => Some(*span),
            Extraction::NoValidAnswer { .. } => None,
        }
    }
}
