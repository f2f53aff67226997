//! Route matching, redirect synthesis, and the hot-swappable route table.
//!
//! - [`path`] -- raw path normalization and segment iteration.
//! - [`trie`] -- segment trie for longest-prefix lookup.
//! - [`target`] -- redirect target parsing, done once per table build.
//! - [`route`] -- compiled routes.
//! - [`table`] -- the immutable [`RouteTable`] and its checksum.
//! - [`redirect`] -- `Location` and cache header construction.
//! - [`router`] -- [`RouterCore`], the atomically published table and reloads.

pub mod path;
pub mod redirect;
pub mod route;
pub mod router;
pub mod table;
pub mod target;
pub mod trie;

pub use router::{ReloadOutcome, ReloadState, RouterCore, Snapshot};
pub use route::{Redirect, Route, RouteAction};
pub use table::{RouteMatch, RouteStats, RouteTable};
