//! Public routing surface.
//!
//! [`route_handler`] is the Axum fallback for every request on the routing
//! listener. It resolves the path against the active route table and
//! answers with a redirect, hands the request to the backend dispatcher,
//! or returns `404 Not Found`.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::path::normalize;
use crate::routing::{redirect, RouteAction};
use crate::server::AppState;

pub async fn route_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    // Hold the snapshot for the whole request; a concurrent reload cannot
    // change what this request sees.
    let snapshot = state.core.current();
    let uri = request.uri().clone();
    let path = normalize(uri.path());

    let Some(matched) = snapshot.table.lookup(&path) else {
        state.stats.not_found.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            correlation_id = %correlation_id,
            method = %request.method(),
            path = %path,
            "no route matched"
        );
        return StatusCode::NOT_FOUND.into_response();
    };

    match matched.route.action {
        RouteAction::Redirect(ref redirect) => {
            let location = redirect::location(
                matched.route.route_type,
                redirect,
                matched.remainder,
                uri.query(),
            );
            let status = redirect.status();
            let (cache_control, expires) = redirect::cache_headers(chrono::Utc::now());

            state.stats.redirects.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                path = %path,
                route = %matched.route.incoming_path,
                status = status.as_u16(),
                location = %location,
                "redirect"
            );

            Response::builder()
                .status(status)
                .header(header::LOCATION, &location)
                .header(header::CACHE_CONTROL, cache_control)
                .header(header::EXPIRES, expires)
                .header("x-correlation-id", &correlation_id)
                .body(Body::empty())
                .unwrap_or_else(|e| {
                    tracing::error!(
                        correlation_id = %correlation_id,
                        location = %location,
                        error = %e,
                        "failed to build redirect response"
                    );
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                })
        }
        RouteAction::Backend { ref backend_id } => {
            state.stats.dispatched.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                correlation_id = %correlation_id,
                path = %path,
                backend = %backend_id,
                "dispatching to backend"
            );
            state.dispatcher.dispatch(backend_id, request).await
        }
    }
}
