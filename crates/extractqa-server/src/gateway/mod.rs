//! HTTP gateway (Axum) serving the question answering form and JSON API.
//!
//! This module is primarily used by the `extractqa` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod page;
pub mod state;


use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{answer_handler, index_handler, submit_form_handler};
pub use state::HandlerState;

use extractqa::constants::STATUS_HEADER;
use extractqa::model::QaEngine;

pub fn create_router_with_state<E>(state: HandlerState<E>) -> Router
where
    E: QaEngine + 'static,
{
    Router::new()
        .route("/", get(index_handler).post(submit_form_handler::<E>))
        .route("/v1/answer", post(answer_handler::<E>))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `/healthz` URL for a server bound to `bind`.
///
/// A wildcard bind address is reached through loopback of the same family.
pub fn health_check_url(bind: SocketAddr) -> String {
    let ip = match bind.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}/healthz", SocketAddr::new(ip, bind.port()))
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub model: &'static str,
    /// `stub` or `real`; absent while loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready once the engine has loaded; never starts a load itself.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E>(State(state): State<HandlerState<E>>) -> Response
where
    E: QaEngine + 'static,
{
    let (status_code, body) = match state.engine.loaded() {
        Some(engine) => (
            StatusCode::OK,
            ReadyResponse {
                status: "ok",
                model: "ready",
                mode: Some(if engine.is_stub() { "stub" } else { "real" }),
            },
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            ReadyResponse {
                status: "pending",
                model: "loading",
                mode: None,
            },
        ),
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(body.status));

    (status_code, headers, Json(body)).into_response()
}
