//! SQLite-backed [`RouteSource`] implementation.
//!
//! Reads one row per route from the `signpost_routes` table of a local
//! `SQLite` database, filtered by namespace. The table is auto-created on
//! first connection. Change detection hashes the loaded route set.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use super::sql::{rows_to_set, RouteRow, CREATE_TABLE, SELECT_COLUMNS};
use super::version_of;
use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::{RouteSource, SnapshotVersion};

pub struct SqliteSource {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteSource {
    pub async fn new(path: &Path, namespace: &str) -> Result<Self, SignpostError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool =
            SqlitePool::connect_with(options)
                .await
                .map_err(|e| SignpostError::Database {
                    backend: "sqlite",
                    source: Box::new(e),
                })?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| SignpostError::Database {
                backend: "sqlite",
                source: Box::new(e),
            })?;

        Ok(Self {
            pool,
            namespace: namespace.to_string(),
        })
    }

    async fn fetch_routes(&self) -> Result<RouteSet, SignpostError> {
        let rows: Vec<RouteRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE namespace = ? ORDER BY incoming_path, route_type"
        ))
        .bind(&self.namespace)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SignpostError::Database {
            backend: "sqlite",
            source: Box::new(e),
        })?;

        rows_to_set(rows, &format!("sqlite::{}", self.namespace))
    }
}

#[async_trait]
impl RouteSource for SqliteSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
        let set = self.fetch_routes().await?;
        let version = version_of(&set);
        Ok((set, version))
    }

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        let set = self.fetch_routes().await?;
        Ok(*current != version_of(&set))
    }
}
