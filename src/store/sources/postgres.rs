//! PostgreSQL-backed [`RouteSource`] implementation.
//!
//! Reads one row per route from the `signpost_routes` table, filtered by
//! namespace. The table is auto-created on first connection. Change
//! detection hashes the loaded route set.

use async_trait::async_trait;
use sqlx::PgPool;

use super::sql::{rows_to_set, RouteRow, CREATE_TABLE, SELECT_COLUMNS};
use super::version_of;
use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::{RouteSource, SnapshotVersion};

pub struct PostgresSource {
    pool: PgPool,
    namespace: String,
}

impl PostgresSource {
    pub async fn new(url: &str, namespace: &str) -> Result<Self, SignpostError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| SignpostError::Database {
                backend: "postgres",
                source: Box::new(e),
            })?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| SignpostError::Database {
                backend: "postgres",
                source: Box::new(e),
            })?;

        Ok(Self {
            pool,
            namespace: namespace.to_string(),
        })
    }

    async fn fetch_routes(&self) -> Result<RouteSet, SignpostError> {
        let rows: Vec<RouteRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE namespace = $1 ORDER BY incoming_path, route_type"
        ))
        .bind(&self.namespace)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SignpostError::Database {
            backend: "postgres",
            source: Box::new(e),
        })?;

        rows_to_set(rows, &format!("postgres::{}", self.namespace))
    }
}

#[async_trait]
impl RouteSource for PostgresSource {
    fn name(&self) -> &'static str {
        "postgres"
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
