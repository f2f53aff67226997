//! Immutable route table and the builder that produces it.
//!
//! [`RouteTable::build`] turns a [`RouteSet`] snapshot into a fully
//! indexed table: exact routes in a hash map, prefix routes in a
//! [`PrefixTrie`]. A table is never modified after it is built; a reload
//! builds a new one and swaps it in.
//!
//! Build policy: one invalid record rejects the whole snapshot. A partially
//! valid table is never produced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use super::path::normalize;
use super::route::Route;
use super::trie::PrefixTrie;
use crate::error::SignpostError;
use crate::store::model::{RouteSet, RouteType};
use crate::store::validation::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    pub count: usize,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Part of the (normalized) request path beyond the matched prefix.
    /// Always empty for exact matches.
    pub remainder: &'a str,
}

#[derive(Debug, Default)]
pub struct RouteTable {
    exact: HashMap<String, Route>,
    prefix: PrefixTrie<Route>,
    stats: RouteStats,
}

impl Default for RouteStats {
    fn default() -> Self {
        checksum_stats(std::iter::empty())
    }
}

impl RouteTable {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(set: &RouteSet) -> Result<Self, SignpostError> {
        if let Err(errors) = validate(set) {
            return Err(SignpostError::SnapshotValidation { errors });
        }

        let mut exact = HashMap::new();
        let mut prefix = PrefixTrie::new();

        for record in &set.routes {
            let route = Route::compile(record)?;
            let key = normalize(&record.incoming_path).into_owned();
            match record.route_type {
                RouteType::Exact => {
                    exact.insert(key, route);
                }
                RouteType::Prefix => {
                    prefix.insert(&key, route);
                }
            }
        }

        let stats = checksum_stats(exact.values().chain(prefix.values()));

        Ok(Self {
            exact,
            prefix,
            stats,
        })
    }

    /// Resolve a normalized request path.
    ///
    /// Exact routes always win over prefix routes; among prefix routes
    /// the longest one matching at a segment boundary wins.
    #[must_use]
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        if let Some(route) = self.exact.get(path) {
            return Some(RouteMatch {
                route,
                remainder: "",
            });
        }

        self.prefix
            .longest_match(path)
            .map(|(route, matched)| RouteMatch {
                route,
                remainder: &path[matched..],
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.prefix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn stats(&self) -> &RouteStats {
        &self.stats
    }
}

fn checksum_stats<'a>(routes: impl Iterator<Item = &'a Route>) -> RouteStats {
    let mut keys: Vec<String> = routes.map(Route::checksum_key).collect();
    keys.sort_unstable();

    let mut hasher = Sha1::new();
    for key in &keys {
        hasher.update(key.as_bytes());
    }

    RouteStats {
        count: keys.len(),
        checksum: format!("{:x}", hasher.finalize()),
    }
}
