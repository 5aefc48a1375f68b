use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("invalid extractor input: {reason}")]
    InvalidInput { reason: String },

    #[error("failed to decode answer span: {reason}")]
    DecodeFailed { reason: String },
}
