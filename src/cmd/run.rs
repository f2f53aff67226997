//! `signpost run`: start the router.
//!
//! Resolves the route store, performs the initial load, then serves the
//! routing and admin listeners side by side with graceful shutdown. An
//! optional background loop polls the store and reloads on change.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::error::SignpostError;
use crate::logging;
use crate::server::{self, AppState};
use crate::store::sources;
use crate::store::{RouteSource, SourceResolver};

pub async fn execute(args: RunArgs) -> Result<(), SignpostError> {
    logging::init(
        &args.log_level,
        logging::resolve_format(args.pretty, args.json),
    );

    let resolver = resolve_route_sources(&args).await?;
    let state = Arc::new(
        AppState::new(resolver).with_reload_timeout(Duration::from_millis(args.reload_timeout)),
    );

    // Refuse to start on an unusable store rather than serve an empty table.
    let initial = state.reload().await?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let admin_addr: SocketAddr = format!("{}:{}", args.host, args.admin_port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr).await?;

    tracing::info!(
        addr = %addr,
        admin_addr = %admin_addr,
        routes = initial.stats.count,
        checksum = %initial.stats.checksum,
        source = state.resolver.primary_name(),
        namespace = %args.namespace,
        "signpost started"
    );

    // Both listeners and the poll loop stop on the same signal.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let poll_handle = (args.poll_interval > 0).then(|| {
        let poll_state = state.clone();
        let poll_shutdown = shutdown_rx.clone();
        let interval = Duration::from_secs(args.poll_interval);
        tokio::spawn(async move {
            route_poll_loop(poll_state, interval, poll_shutdown).await;
        })
    });

    let router = server::build_router(state.clone());
    let admin_router = server::build_admin_router(state);

    tokio::spawn(async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let public = axum::serve(listener, router)
        .with_graceful_shutdown(wait_for(shutdown_rx.clone()))
        .into_future();
    let admin = axum::serve(admin_listener, admin_router)
        .with_graceful_shutdown(wait_for(shutdown_rx))
        .into_future();

    let (public_result, admin_result) = tokio::join!(public, admin);
    public_result?;
    admin_result?;

    if let Some(handle) = poll_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "route poll task failed");
        }
    }

    tracing::info!("signpost stopped");
    Ok(())
}

async fn wait_for(mut shutdown: tokio::sync::watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

async fn resolve_route_sources(args: &RunArgs) -> Result<SourceResolver, SignpostError> {
    #[allow(unused_mut)]
    let mut primary: Option<Box<dyn RouteSource>> = None;

    // Database stores in priority order
    #[cfg(feature = "redis")]
    if primary.is_none() {
        if let Some(ref url) = args.redis_url {
            let source = sources::redis_source::RedisSource::new(url, &args.namespace).await?;
            primary = Some(Box::new(source));
        }
    }

    #[cfg(feature = "postgres")]
    if primary.is_none() {
        if let Some(ref url) = args.postgres_url {
            let source = sources::postgres::PostgresSource::new(url, &args.namespace).await?;
            primary = Some(Box::new(source));
        }
    }

    #[cfg(feature = "sqlite")]
    if primary.is_none() {
        if let Some(ref path) = args.sqlite_path {
            let source = sources::sqlite::SqliteSource::new(path, &args.namespace).await?;
            primary = Some(Box::new(source));
        }
    }

    let file_source = resolve_file_source(args.config.as_deref()).await?;

    match (primary, file_source) {
        // Database is primary, file is fallback
        (Some(db), file) => Ok(SourceResolver::new(db, file)),
        (None, Some(file)) => Ok(SourceResolver::new(file, None)),
        (None, None) => Err(SignpostError::NoRouteSource {
            hint: "Provide --config <file> or a database store flag.\n  \
                   Or create ./signpost.yaml in the working directory."
                .into(),
        }),
    }
}

async fn resolve_file_source(
    explicit: Option<&std::path::Path>,
) -> Result<Option<Box<dyn RouteSource>>, SignpostError> {
    if let Some(path) = explicit {
        return create_file_source(path).map(Some);
    }

    let candidates = [
        "signpost.yaml",
        "signpost.yml",
        "signpost.json",
        "signpost.toml",
    ];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected route file");
            return create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}

/// Pick a file-backed source from the file extension.
pub fn create_file_source(path: &std::path::Path) -> Result<Box<dyn RouteSource>, SignpostError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(SignpostError::UnsupportedFormat(other.to_string())),
    }
}

/// Reload whenever the route store reports a version other than the one
/// currently published. The probe follows the same primary/fallback order
/// as a load.
pub async fn route_poll_loop(
    state: Arc<AppState>,
    every: Duration,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await; // Skip first immediate tick

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("route poll loop shutting down");
                return;
            }
        }

        let changed = match state.core.current().version {
            Some(ref version) => state.resolver.has_changed(version).await,
            None => Ok(true),
        };

        match changed {
            Ok(true) => {
                tracing::info!("route store change detected, reloading");
                // Failures are logged by the router core; the current table stays.
                let _ = state.reload().await;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "route change check failed");
            }
        }
    }
}
