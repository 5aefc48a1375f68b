use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use extractqa::constants::STATUS_HEADER;
use extractqa::model::ModelError;
use extractqa::pipeline::QaError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

impl From<QaError> for GatewayError {
    fn from(err: QaError) -> Self {
        match &err {
            QaError::Model(
                ModelError::ModelNotFound { .. }
                | ModelError::ModelLoadFailed { .. }
                | ModelError::DownloadFailed { .. }
                | ModelError::InvalidConfig { .. },
            ) => GatewayError::ModelUnavailable(err.to_string()),
            _ => GatewayError::InferenceFailed(err.to_string()),
        }
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InferenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value for the status header.
    pub fn status_tag(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::ModelUnavailable(_) => "model_unavailable",
            GatewayError::InferenceFailed(_) => "inference_error",
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(self.status_tag()));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
