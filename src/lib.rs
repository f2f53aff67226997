//! Signpost is an HTTP edge router with hot-reloadable redirect routes.
//!
//! It matches every incoming request path against a route table loaded
//! from a route store, answering with a cacheable `301`/`302` redirect or
//! handing the request to a backend dispatcher. Route tables are
//! immutable snapshots; a reload builds a new one off to the side and
//! publishes it atomically, so in-flight requests never see a partial
//! table and a failed reload leaves the previous one serving.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, reload,
//!   stats, health).
//! - [`store`] -- Route data model, validation, and the
//!   [`RouteSource`](store::RouteSource) trait with its file, memory and
//!   database implementations.
//! - [`routing`] -- Path normalization, the prefix trie, compiled route
//!   tables, redirect construction, and the [`RouterCore`](routing::RouterCore)
//!   that owns the active snapshot.
//! - [`handler`] -- The public routing handler.
//! - [`dispatch`] -- The [`BackendDispatcher`](dispatch::BackendDispatcher)
//!   seam for non-redirect routes.
//! - [`admin`] -- Admin API: reload, healthcheck, stats.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`server`] -- Axum server setup, shared application state, and graceful
//!   shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML route file support _(enabled by default)_ |
//! | `json` | JSON route file support |
//! | `toml` | TOML route file support |
//! | `redis` | Redis route store |
//! | `postgres` | PostgreSQL route store |
//! | `sqlite` | SQLite route store |
//! | `file-backends` | All file format backends |
//! | `db-backends` | All database backends |
//! | `full` | All features |

// Public functions are consumed by the binary and integration tests only.
#![allow(clippy::missing_errors_doc)]

pub mod admin;
pub mod cli;
pub mod cmd;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod logging;
pub mod routing;
pub mod server;
pub mod store;
