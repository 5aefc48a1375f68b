//! Model-free [`QaEngine`] for tests and the `mock` feature.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::constants::MAX_SEQ_LEN;
use crate::extraction::{ExtractionError, SpanDecoder};

use super::error::ModelError;
use super::types::{SpanLogits, TokenSequence};
use super::QaEngine;

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const CLS_ID: u32 = 2;
pub const SEP_ID: u32 = 3;

const SPECIAL_TOKENS: [&str; 4] = ["[PAD]", "[UNK]", "[CLS]", "[SEP]"];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "during", "before",
    "after", "and", "but", "or", "if", "when", "where", "why", "how", "what", "which", "who",
    "whom", "this", "that", "these", "those", "it", "its",
];

#[derive(Debug)]
struct Vocab {
    words: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocab {
    fn new() -> Self {
        let words: Vec<String> = SPECIAL_TOKENS.iter().map(|t| t.to_string()).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(id, w)| (w.clone(), id as u32))
            .collect();
        Self { words, index }
    }
}

/// Whitespace tokenizer with an interning vocabulary and lexical span scoring.
///
/// Words are lowercased (the real checkpoint is uncased). Unless scripted logits
/// are set, the predicted span is the longest run of context words that are
/// neither stop words nor question words; with no such run both scores peak at
/// `[CLS]`.
#[derive(Debug)]
pub struct StubQaEngine {
    vocab: RwLock<Vocab>,
    max_seq_len: usize,
    scripted: Option<SpanLogits>,
    encode_calls: AtomicUsize,
    infer_calls: AtomicUsize,
}

impl Default for StubQaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StubQaEngine {
    pub fn new() -> Self {
        Self {
            vocab: RwLock::new(Vocab::new()),
            max_seq_len: MAX_SEQ_LEN,
            scripted: None,
            encode_calls: AtomicUsize::new(0),
            infer_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len.max(3);
        self
    }

    /// Returns these logits from every [`QaEngine::infer`] call.
    pub fn with_scripted_logits(mut self, logits: SpanLogits) -> Self {
        self.scripted = Some(logits);
        self
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::Relaxed)
    }

    pub fn infer_calls(&self) -> usize {
        self.infer_calls.load(Ordering::Relaxed)
    }

    fn intern(&self, word: &str) -> u32 {
        if let Some(&id) = self.vocab.read().index.get(word) {
            return id;
        }
        let mut vocab = self.vocab.write();
        if let Some(&id) = vocab.index.get(word) {
            return id;
        }
        let id = vocab.words.len() as u32;
        vocab.words.push(word.to_string());
        vocab.index.insert(word.to_string(), id);
        id
    }

    fn word(&self, id: u32) -> Option<String> {
        self.vocab.read().words.get(id as usize).cloned()
    }

    fn lexical_logits(&self, tokens: &TokenSequence) -> SpanLogits {
        let len = tokens.len();
        let mut start = vec![0.0; len];
        let mut end = vec![0.0; len];

        let normalized: Vec<String> = tokens
            .ids()
            .iter()
            .map(|id| self.word(*id).map(|w| normalize(&w)).unwrap_or_default())
            .collect();

        let question_words: HashSet<&str> = tokens
            .type_ids()
            .iter()
            .zip(tokens.special_tokens_mask())
            .zip(&normalized)
            .filter(|((type_id, special), _)| **type_id == 0 && **special == 0)
            .map(|(_, word)| word.as_str())
            .collect();

        let is_content = |pos: usize| {
            let word = normalized[pos].as_str();
            tokens.type_ids()[pos] == 1
                && tokens.special_tokens_mask()[pos] == 0
                && !word.is_empty()
                && !STOP_WORDS.contains(&word)
                && !question_words.contains(word)
        };

        let mut best: Option<(usize, usize)> = None;
        let mut run_start: Option<usize> = None;
        for pos in 0..=len {
            let content = pos < len && is_content(pos);
            match (content, run_start) {
                (true, None) => run_start = Some(pos),
                (false, Some(s)) => {
                    let longer = best.is_none_or(|(bs, be)| pos - 1 - s > be - bs);
                    if longer {
                        best = Some((s, pos - 1));
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        match best {
            Some((s, e)) => {
                start[s] = 1.0;
                end[e] = 1.0;
            }
            None => {
                start[0] = 1.0;
                end[0] = 1.0;
            }
        }

        SpanLogits::new(start, end)
    }
}

fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

impl SpanDecoder for StubQaEngine {
    fn decode_span(&self, ids: &[u32]) -> Result<String, ExtractionError> {
        let mut words = Vec::with_capacity(ids.len());
        for &id in ids {
            if matches!(id, PAD_ID | CLS_ID | SEP_ID) {
                continue;
            }
            let word = self.word(id).ok_or_else(|| ExtractionError::DecodeFailed {
                reason: format!("unknown token id {id}"),
            })?;
            words.push(word);
        }
        Ok(words.join(" "))
    }
}

impl QaEngine for StubQaEngine {
    fn encode(&self, question: &str, context: &str) -> Result<TokenSequence, ModelError> {
        self.encode_calls.fetch_add(1, Ordering::Relaxed);

        let mut question: Vec<u32> = question
            .split_whitespace()
            .map(|w| self.intern(&w.to_lowercase()))
            .collect();
        let mut context: Vec<u32> = context
            .split_whitespace()
            .map(|w| self.intern(&w.to_lowercase()))
            .collect();

        // The paragraph is truncated first; the question only when it alone
        // overflows.
        question.truncate(self.max_seq_len - 3);
        let budget = self.max_seq_len - 3 - question.len();
        context.truncate(budget);

        let mut ids = Vec::with_capacity(question.len() + context.len() + 3);
        let mut type_ids = Vec::with_capacity(ids.capacity());
        let mut special = Vec::with_capacity(ids.capacity());

        let mut push = |id: u32, type_id: u32, is_special: bool| {
            ids.push(id);
            type_ids.push(type_id);
            special.push(u32::from(is_special));
        };

        push(CLS_ID, 0, true);
        question.iter().for_each(|&id| push(id, 0, false));
        push(SEP_ID, 0, true);
        context.iter().for_each(|&id| push(id, 1, false));
        push(SEP_ID, 1, true);

        let attention_mask = vec![1; ids.len()];
        TokenSequence::from_parts(ids, type_ids, attention_mask, special)
    }

    fn infer(&self, tokens: &TokenSequence) -> Result<SpanLogits, ModelError> {
        self.infer_calls.fetch_add(1, Ordering::Relaxed);

        match &self.scripted {
            Some(logits) => Ok(logits.clone()),
            None => Ok(self.lexical_logits(tokens)),
        }
    }

    fn is_stub(&self) -> bool {
        true
    }
}
