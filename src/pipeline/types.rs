use serde::{Deserialize, Serialize};

use crate::constants::{MSG_CONTEXT_MISSING, MSG_NO_VALID_ANSWER, MSG_QUESTION_MISSING};
use crate::extraction::AnswerSpan;

/// One submission from the form: a paragraph and a question about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub question: String,
}

impl AnswerRequest {
    pub fn new(context: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            question: question.into(),
        }
    }

    /// The outcome to report without running the model, if any input is blank.
    ///
    /// The paragraph is checked before the question.
    pub fn missing_input(&self) -> Option<AnswerOutcome> {
        if self.context.trim().is_empty() {
            Some(AnswerOutcome::ContextMissing)
        } else if self.question.trim().is_empty() {
            Some(AnswerOutcome::QuestionMissing)
        } else {
            None
        }
    }
}

/// What the user sees after pressing "Get Answer".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Answered { answer: String, span: AnswerSpan },
    ContextMissing,
    QuestionMissing,
    NoValidAnswer,
}

impl AnswerOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerOutcome::Answered { .. })
    }

    /// Machine-readable status, also sent as the response status header.
    pub fn status(&self) -> &'static str {
        match self {
            AnswerOutcome::Answered { .. } => "answered",
            AnswerOutcome::ContextMissing => "context_missing",
            AnswerOutcome::QuestionMissing => "question_missing",
            AnswerOutcome::NoValidAnswer => "no_answer",
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            AnswerOutcome::Answered { answer, .. } => format!("✅ {answer}"),
            AnswerOutcome::ContextMissing => MSG_CONTEXT_MISSING.to_string(),
            AnswerOutcome::QuestionMissing => MSG_QUESTION_MISSING.to_string(),
            AnswerOutcome::NoValidAnswer => MSG_NO_VALID_ANSWER.to_string(),
        }
    }
}
