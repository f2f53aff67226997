//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the router core,
//! route source, backend dispatcher, and request counters),
//! [`build_router`] for the public routing listener, [`build_admin_router`]
//! for the admin listener, and [`shutdown_signal`] for SIGTERM / Ctrl+C
//! handling. Both listeners are facades over the same [`RouterCore`].

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::dispatch::{BackendDispatcher, UnconfiguredBackends};
use crate::error::SignpostError;
use crate::handler::route_handler;
use crate::routing::{ReloadOutcome, RouterCore};
use crate::store::SourceResolver;

pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct Stats {
    pub redirects: AtomicU64,
    pub dispatched: AtomicU64,
    pub not_found: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            redirects: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
        }
    }
}

pub struct AppState {
    pub core: RouterCore,
    pub resolver: SourceResolver,
    pub dispatcher: Box<dyn BackendDispatcher>,
    pub reload_timeout: Duration,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    /// State with an empty route table; call [`AppState::reload`] to load routes.
    #[must_use]
    pub fn new(resolver: SourceResolver) -> Self {
        Self {
            core: RouterCore::default(),
            resolver,
            dispatcher: Box::new(UnconfiguredBackends),
            reload_timeout: DEFAULT_RELOAD_TIMEOUT,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }

    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Box<dyn BackendDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    #[must_use]
    pub fn with_reload_timeout(mut self, timeout: Duration) -> Self {
        self.reload_timeout = timeout;
        self
    }

    pub async fn reload(&self) -> Result<ReloadOutcome, SignpostError> {
        self.core.reload(&self.resolver, self.reload_timeout).await
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(route_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub fn build_admin_router(state: Arc<AppState>) -> Router {
    admin::admin_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
