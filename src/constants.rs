//! Cross-cutting, shared constants.
//!
//! The model identifier is a fixed external reference: the extractor's marker
//! handling and the tokenizer's special tokens both assume a BERT WordPiece
//! vocabulary, so swapping in an arbitrary hub model is not supported.

/// Pretrained SQuAD checkpoint fetched from the Hugging Face hub.
pub const MODEL_ID: &str = "bert-large-uncased-whole-word-masking-finetuned-squad";

/// Hub revision used when downloading [`MODEL_ID`].
pub const MODEL_REVISION: &str = "main";

/// Maximum number of positions the BERT encoder supports.
pub const MAX_SEQ_LEN: usize = 512;

/// Placeholder text left over when the model points at the classification token.
///
/// This model family signals "no answer" by predicting the `[CLS]` position.
pub const NO_ANSWER_MARKER: &str = "[CLS]";

/// Warning shown when the paragraph field is empty.
pub const MSG_CONTEXT_MISSING: &str = "Please enter a paragraph.";

/// Warning shown when the question field is empty.
pub const MSG_QUESTION_MISSING: &str = "Please enter a question.";

/// Error shown when extraction yields no usable span.
pub const MSG_NO_VALID_ANSWER: &str = "Unable to find a valid answer. Try rephrasing the question!";

/// Response header carrying the outcome of a request.
pub const STATUS_HEADER: &str = "x-extractqa-status";
