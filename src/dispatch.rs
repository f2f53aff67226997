//! Hand-off point for backend (non-redirect) routes.
//!
//! Proxying to backends lives outside this crate. Embedders plug their
//! proxy in through [`BackendDispatcher`]; the stock binary uses
//! [`UnconfiguredBackends`], which answers `502 Bad Gateway`.

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[async_trait]
pub trait BackendDispatcher: Send + Sync {
    async fn dispatch(&self, backend_id: &str, request: Request) -> Response;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredBackends;

#[async_trait]
impl BackendDispatcher for UnconfiguredBackends {
    async fn dispatch(&self, backend_id: &str, request: Request) -> Response {
        tracing::warn!(
            backend = backend_id,
            path = %request.uri().path(),
            "backend route matched but no dispatcher is configured"
        );
        StatusCode::BAD_GATEWAY.into_response()
    }
}
