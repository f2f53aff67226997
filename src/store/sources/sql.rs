//! Row mapping shared by the SQL route sources.
//!
//! Both `SQLite` and `PostgreSQL` keep one row per route in a
//! `signpost_routes` table partitioned by namespace. Enum columns hold the
//! same lowercase strings as the file formats (`exact`, `prefix`, ...).

use serde::de::DeserializeOwned;

use crate::error::SignpostError;
use crate::store::model::{RouteRecord, RouteSet};

pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS signpost_routes (\
        namespace TEXT NOT NULL, \
        incoming_path TEXT NOT NULL, \
        route_type TEXT NOT NULL DEFAULT 'exact', \
        handler TEXT NOT NULL DEFAULT 'redirect', \
        redirect_to TEXT, \
        redirect_type TEXT NOT NULL DEFAULT 'permanent', \
        preserve_query BOOLEAN NOT NULL DEFAULT FALSE, \
        ignore_extra_path BOOLEAN NOT NULL DEFAULT FALSE, \
        backend_id TEXT, \
        PRIMARY KEY (namespace, incoming_path, route_type)\
    )";

pub const SELECT_COLUMNS: &str = "SELECT incoming_path, route_type, handler, redirect_to, \
        redirect_type, preserve_query, ignore_extra_path, backend_id \
        FROM signpost_routes";

/// `(incoming_path, route_type, handler, redirect_to, redirect_type,
/// preserve_query, ignore_extra_path, backend_id)`
pub type RouteRow = (
    String,
    String,
    String,
    Option<String>,
    String,
    bool,
    bool,
    Option<String>,
);

fn parse_enum<T: DeserializeOwned>(value: &str, column: &str, label: &str) -> Result<T, SignpostError> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|e| {
        SignpostError::SnapshotParse {
            path: format!("{label} column {column}"),
            source: Box::new(e),
        }
    })
}

pub fn rows_to_set(rows: Vec<RouteRow>, label: &str) -> Result<RouteSet, SignpostError> {
    let routes = rows
        .into_iter()
        .map(
            |(
                incoming_path,
                route_type,
                handler,
                redirect_to,
                redirect_type,
                preserve_query,
                ignore_extra_path,
                backend_id,
            )| {
                Ok(RouteRecord {
                    incoming_path,
                    route_type: parse_enum(&route_type, "route_type", label)?,
                    handler: parse_enum(&handler, "handler", label)?,
                    redirect_to,
                    redirect_type: parse_enum(&redirect_type, "redirect_type", label)?,
                    preserve_query,
                    ignore_extra_path,
                    backend_id,
                })
            },
        )
        .collect::<Result<Vec<_>, SignpostError>>()?;

    Ok(RouteSet::new(routes))
}
