use super::*;
use crate::model::{ModelError, SpanLogits, StubQaEngine};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const EIFFEL_CONTEXT: &str = "The Eiffel Tower is located in Paris, France.";
const EIFFEL_QUESTION: &str = "Where is the Eiffel Tower located?";

fn eiffel_request() -> AnswerRequest {
    AnswerRequest::new(EIFFEL_CONTEXT, EIFFEL_QUESTION)
}

/// `[CLS] q q q q q q [SEP] c c c c c c c c [SEP]` for the Eiffel request.
const EIFFEL_SEQ_LEN: usize = 17;

fn scripted(start_idx: usize, end_idx: usize) -> StubQaEngine {
    let mut start = vec![0.0; EIFFEL_SEQ_LEN];
    let mut end = vec![0.0; EIFFEL_SEQ_LEN];
    start[start_idx] = 3.0;
    end[end_idx] = 3.0;
    StubQaEngine::new().with_scripted_logits(SpanLogits::new(start, end))
}

#[test]
fn test_empty_context_skips_engine() {
    let engine = StubQaEngine::new();

    for context in ["", "   ", "\n\t"] {
        let outcome = answer(&engine, &AnswerRequest::new(context, "anything")).unwrap();
        assert_eq!(outcome, AnswerOutcome::ContextMissing);
    }

    assert_eq!(engine.encode_calls(), 0);
    assert_eq!(engine.infer_calls(), 0);
}

#[test]
fn test_empty_question_skips_engine() {
    let engine = StubQaEngine::new();

    let outcome = answer(&engine, &AnswerRequest::new(EIFFEL_CONTEXT, "  ")).unwrap();

    assert_eq!(outcome, AnswerOutcome::QuestionMissing);
    assert_eq!(engine.encode_calls(), 0);
}

#[test]
fn test_context_checked_before_question() {
    let request = AnswerRequest::new(" ", "");
    assert_eq!(request.missing_input(), Some(AnswerOutcome::ContextMissing));
}

#[test]
fn test_eiffel_tower_answer() {
    let engine = StubQaEngine::new();

    let outcome = answer(&engine, &eiffel_request()).unwrap();

    let AnswerOutcome::Answered { answer, span } = outcome else {
        panic!("expected an answer, got {outcome:?}");
    };
    assert!(!answer.is_empty());
    assert!(answer.to_lowercase().contains("paris"));
    assert!(EIFFEL_CONTEXT.to_lowercase().contains(&answer.to_lowercase()));
    assert!(span.start() <= span.end());
    assert_eq!(engine.encode_calls(), 1);
    assert_eq!(engine.infer_calls(), 1);
}

#[test]
fn test_inverted_span_is_no_valid_answer() {
    let engine = scripted(14, 13);

    let outcome = answer(&engine, &eiffel_request()).unwrap();

    assert_eq!(outcome, AnswerOutcome::NoValidAnswer);
}

#[test]
fn test_sentinel_position_is_no_valid_answer() {
    let engine = scripted(0, 0);

    let outcome = answer(&engine, &eiffel_request()).unwrap();

    assert_eq!(outcome, AnswerOutcome::NoValidAnswer);
}

#[test]
fn test_scripted_span_decodes_context_words() {
    let engine = scripted(14, 15);

    let outcome = answer(&engine, &eiffel_request()).unwrap();

    assert_eq!(
        outcome,
        AnswerOutcome::Answered {
            answer: "paris, france.".to_string(),
            span: crate::extraction::AnswerSpan::new(14, 15, EIFFEL_SEQ_LEN).unwrap(),
        }
    );
}

#[test]
fn test_logit_length_mismatch_is_error() {
    let engine =
        StubQaEngine::new().with_scripted_logits(SpanLogits::new(vec![1.0; 3], vec![1.0; 3]));

    let err = answer(&engine, &eiffel_request()).unwrap_err();

    assert!(matches!(err, QaError::Extraction(_)));
}

#[test]
fn test_answer_is_idempotent() {
    let engine = StubQaEngine::new();

    let first = answer(&engine, &eiffel_request()).unwrap();
    let second = answer(&engine, &eiffel_request()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_outcome_messages() {
    let answered = AnswerOutcome::Answered {
        answer: "Paris".to_string(),
        span: crate::extraction::AnswerSpan::new(3, 3, 5).unwrap(),
    };
    assert_eq!(answered.message(), "✅ Paris");
    assert_eq!(answered.status(), "answered");
    assert!(answered.is_answered());

    assert_eq!(
        AnswerOutcome::ContextMissing.message(),
        "Please enter a paragraph."
    );
    assert_eq!(
        AnswerOutcome::QuestionMissing.message(),
        "Please enter a question."
    );
    assert!(
        AnswerOutcome::NoValidAnswer
            .message()
            .contains("Try rephrasing the question")
    );
    assert_eq!(AnswerOutcome::NoValidAnswer.status(), "no_answer");
}

#[test]
fn test_outcome_json_shape() {
    let answered = AnswerOutcome::Answered {
        answer: "Paris".to_string(),
        span: crate::extraction::AnswerSpan::new(3, 4, 6).unwrap(),
    };

    let json = serde_json::to_value(&answered).unwrap();
    assert_eq!(json["status"], "answered");
    assert_eq!(json["answer"], "Paris");
    assert_eq!(json["span"]["start"], 3);
    assert_eq!(json["span"]["end"], 4);

    let json = serde_json::to_value(AnswerOutcome::QuestionMissing).unwrap();
    assert_eq!(json, serde_json::json!({"status": "question_missing"}));
}

#[test]
fn test_request_deserializes_missing_fields_as_empty() {
    let request: AnswerRequest = serde_json::from_str(r#"{"question": "why?"}"#).unwrap();
    assert_eq!(request.context, "");
    assert_eq!(request.missing_input(), Some(AnswerOutcome::ContextMissing));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_engine_loads_once_under_concurrency() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let shared = Arc::new(SharedEngine::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        Ok(StubQaEngine::new())
    }));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move { shared.get().await.map(|_| ()) })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(shared.is_loaded());
}

#[tokio::test]
async fn test_shared_engine_returns_same_instance() {
    let shared = SharedEngine::new(|| Ok(StubQaEngine::new()));

    let a = shared.get().await.unwrap();
    let b = shared.get().await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_shared_engine_load_failure_propagates() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let shared: SharedEngine<StubQaEngine> = SharedEngine::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(ModelError::ModelLoadFailed {
            reason: "weights missing".to_string(),
        })
    });

    let err = shared.answer(eiffel_request()).await.unwrap_err();
    assert!(matches!(
        err,
        QaError::Model(ModelError::ModelLoadFailed { .. })
    ));
    assert!(!shared.is_loaded());

    assert!(shared.get().await.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shared_engine_missing_input_does_not_load() {
    let shared = SharedEngine::new(|| Ok(StubQaEngine::new()));

    let outcome = shared
        .answer(AnswerRequest::new("", EIFFEL_QUESTION))
        .await
        .unwrap();

    assert_eq!(outcome, AnswerOutcome::ContextMissing);
    assert!(!shared.is_loaded());
    assert!(shared.loaded().is_none());
}

#[tokio::test]
async fn test_shared_engine_answers_lazily() {
    let shared = SharedEngine::new(|| Ok(StubQaEngine::new()));
    assert!(!shared.is_loaded());

    let outcome = shared.answer(eiffel_request()).await.unwrap();

    assert!(outcome.is_answered());
    assert!(shared.is_loaded());
    assert_eq!(shared.loaded().map(|e| e.infer_calls()), Some(1));
}

#[tokio::test]
async fn test_preloaded_engine() {
    let shared = SharedEngine::preloaded(StubQaEngine::new());

    assert!(shared.is_loaded());
    let outcome = shared.answer(eiffel_request()).await.unwrap();
    assert!(outcome.is_answered());
}
