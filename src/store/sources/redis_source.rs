//! Redis-backed route source with SHA256 change detection.
//!
//! [`RedisSource`] implements [`RouteSource`] by reading the route set as
//! a JSON document stored under `signpost:{namespace}:routes`. It reads the
//! value via a multiplexed Tokio connection and hashes the raw JSON for
//! version tracking.

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use super::{parse_json_hash, sha256_hex};
use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::{RouteSource, SnapshotVersion};

pub struct RedisSource {
    connection: Mutex<redis::aio::MultiplexedConnection>,
    key: String,
}

impl RedisSource {
    pub async fn new(url: &str, namespace: &str) -> Result<Self, SignpostError> {
        let client = redis::Client::open(url).map_err(|e| SignpostError::Database {
            backend: "redis",
            source: Box::new(e),
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| SignpostError::Database {
                backend: "redis",
                source: Box::new(e),
            })?;

        Ok(Self {
            connection: Mutex::new(connection),
            key: format!("signpost:{namespace}:routes"),
        })
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn read_content(&self) -> Result<String, SignpostError> {
        let mut conn = self.connection.lock().await;

        let value: Option<String> =
            conn.get(&self.key)
                .await
                .map_err(|e| SignpostError::Database {
                    backend: "redis",
                    source: Box::new(e),
                })?;

        value.ok_or_else(|| SignpostError::SourceUnavailable {
            source_name: "redis",
            reason: format!("key '{}' not found", self.key),
        })
    }
}

#[async_trait]
impl RouteSource for RedisSource {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
        let content = self.read_content().await?;
        parse_json_hash(&content, &self.key)
    }

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        let content = self.read_content().await?;
        Ok(*current != SnapshotVersion::Hash(sha256_hex(content.as_bytes())))
    }
}
