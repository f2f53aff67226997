//! Admin API served on its own listener.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | POST | `/reload` | `205 Reset Content`, or `500` if the reload failed |
//! | GET | `/healthcheck` | `200 OK` with body `OK` |
//! | GET | `/stats` | `200` with route count and checksum as JSON |
//!
//! Any other verb on these paths gets `405` with an `Allow` header naming
//! the supported one. Any other path gets `404`.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::routing::RouteStats;
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub routes: RouteStats,
    pub requests: RequestStats,
    pub reloads: ReloadStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestStats {
    pub redirects: u64,
    pub dispatched: u64,
    pub not_found: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadStats {
    pub state: String,
    pub succeeded: u64,
    pub failed: u64,
    pub source: String,
    pub loaded_ago_seconds: u64,
    pub uptime_seconds: u64,
}

/// Build the admin router. Every route accepts any verb so the handlers
/// can answer unsupported ones with an exact `Allow` header.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reload", any(reload_handler))
        .route("/healthcheck", any(healthcheck_handler))
        .route("/stats", any(stats_handler))
        .fallback(|| async { StatusCode::NOT_FOUND })
}

fn method_not_allowed(allow: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow.as_str().to_string())],
    )
        .into_response()
}

async fn reload_handler(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method != Method::POST {
        return method_not_allowed(Method::POST);
    }

    match state.reload().await {
        Ok(_) => StatusCode::RESET_CONTENT.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("reload failed: {e}\n"),
        )
            .into_response(),
    }
}

async fn healthcheck_handler(method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed(Method::GET);
    }
    "OK".into_response()
}

async fn stats_handler(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed(Method::GET);
    }

    let snapshot = state.core.current();
    Json(StatsResponse {
        routes: snapshot.table.stats().clone(),
        requests: RequestStats {
            redirects: state.stats.redirects.load(Ordering::Relaxed),
            dispatched: state.stats.dispatched.load(Ordering::Relaxed),
            not_found: state.stats.not_found.load(Ordering::Relaxed),
        },
        reloads: ReloadStats {
            state: state.core.reload_state().as_str().to_string(),
            succeeded: state.core.reloads_succeeded(),
            failed: state.core.reloads_failed(),
            source: snapshot.source.to_string(),
            loaded_ago_seconds: snapshot.loaded_at.elapsed().as_secs(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        },
    })
    .into_response()
}
