//! Concrete [`RouteSource`](super::RouteSource) implementations.
//!
//! Provides file-based sources (YAML, JSON, TOML) gated by feature flags,
//! an in-process [`memory::MemorySource`], database backends (`SQLite`,
//! `PostgreSQL`, Redis), and the [`parse_routes_str`] helper for
//! format-specific deserialization.

pub mod file_source;
pub mod memory;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

#[cfg(feature = "redis")]
pub mod redis_source;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub mod sql;

use sha2::{Digest, Sha256};

use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::SnapshotVersion;

/// Parse a route file body based on its file extension.
pub fn parse_routes_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<RouteSet, SignpostError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| SignpostError::SnapshotParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| SignpostError::SnapshotParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| SignpostError::SnapshotParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(SignpostError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Version a route set by hashing its canonical JSON form.
///
/// Used by stores that do not hand back a single raw document (row-based
/// databases, the in-memory source).
#[must_use]
pub fn version_of(set: &RouteSet) -> SnapshotVersion {
    // Serializing plain strings, bools and unit enums cannot fail.
    let json = serde_json::to_vec(set).unwrap_or_default();
    SnapshotVersion::Hash(sha256_hex(&json))
}

/// Deserialize a JSON route set and compute its SHA-256 version hash.
///
/// Shared by the document-style database sources.
pub fn parse_json_hash(
    json: &str,
    source_label: &str,
) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
    let set: RouteSet = serde_json::from_str(json).map_err(|e| SignpostError::SnapshotParse {
        path: source_label.to_string(),
        source: Box::new(e),
    })?;

    let hash = sha256_hex(json.as_bytes());
    Ok((set, SnapshotVersion::Hash(hash)))
}
