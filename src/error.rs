//! Unified error types for Signpost.
//!
//! Defines [`SignpostError`] (the main crate error enum) and
//! [`ValidationError`] for route snapshot validation failures. Both use
//! `thiserror`-style `Display` output. Error messages include contextual
//! hints to guide the operator toward a fix.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub route: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  route {}: {}: {}", self.route, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignpostError {
    #[error("No route source found.\n\n  {hint}")]
    NoRouteSource { hint: String },

    #[error("Route file not found: {}", path.display())]
    RouteFileNotFound { path: PathBuf },

    #[error("Route snapshot parse error in {path}:\n  {source}")]
    SnapshotParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Route snapshot rejected:\n{}", format_errors(.errors))]
    SnapshotValidation { errors: Vec<ValidationError> },

    #[error("Invalid redirect target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Route store '{source_name}' is unavailable: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("Reload timed out after {}ms", .0.as_millis())]
    ReloadTimeout(Duration),

    #[error("Unsupported route file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Admin request to {endpoint} failed with status {status}")]
    AdminRequestFailed {
        endpoint: String,
        status: hyper::StatusCode,
    },

    #[error("Database error ({backend}): {source}")]
    #[cfg(any(feature = "redis", feature = "postgres", feature = "sqlite"))]
    Database {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
