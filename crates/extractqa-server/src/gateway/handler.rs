use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{error, instrument};

use extractqa::constants::STATUS_HEADER;
use extractqa::model::QaEngine;
use extractqa::pipeline::{AnswerOutcome, AnswerRequest};

use super::error::GatewayError;
use super::page::{Notice, render_page};
use super::state::HandlerState;

fn status_headers(tag: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(tag));
    headers
}

/// Empty form.
#[instrument]
pub async fn index_handler() -> Html<String> {
    Html(render_page(&AnswerRequest::default(), None))
}

/// Form submission; the page is re-rendered with the submitted values.
#[instrument(skip(state, request))]
pub async fn submit_form_handler<E>(
    State(state): State<HandlerState<E>>,
    Form(request): Form<AnswerRequest>,
) -> Response
where
    E: QaEngine + 'static,
{
    match state.engine.answer(request.clone()).await {
        Ok(outcome) => {
            let page = render_page(&request, Some(&Notice::from(&outcome)));
            (StatusCode::OK, status_headers(outcome.status()), Html(page)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Answering form submission failed");
            let err = GatewayError::from(e);
            let notice = Notice::Error(format!("❌ {err}"));
            let page = render_page(&request, Some(&notice));
            (
                err.status_code(),
                status_headers(err.status_tag()),
                Html(page),
            )
                .into_response()
        }
    }
}

/// JSON endpoint. All four outcomes are 200; only engine failures are errors.
#[instrument(skip(state, body))]
pub async fn answer_handler<E>(
    State(state): State<HandlerState<E>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    E: QaEngine + 'static,
{
    let Json(body) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let request: AnswerRequest = serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

    let outcome: AnswerOutcome = state.engine.answer(request).await.map_err(|e| {
        error!(error = %e, "Answering request failed");
        GatewayError::from(e)
    })?;

    Ok((StatusCode::OK, status_headers(outcome.status()), Json(outcome)).into_response())
}
