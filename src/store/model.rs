//! Serde data structures for route snapshots.
//!
//! A [`RouteSet`] is the full set of [`RouteRecord`]s returned by a
//! backing store. Every store (file, database, in-memory) produces the
//! same shape, so the routing core never sees where a snapshot came from.
//! All types use `deny_unknown_fields` for strict parsing.

use serde::{Deserialize, Serialize};

const fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSet {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl RouteSet {
    #[must_use]
    pub const fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn redirect_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|r| r.handler == Handler::Redirect)
            .count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    #[default]
    Exact,
    Prefix,
}

impl RouteType {
    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::Prefix)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Handler {
    #[default]
    Redirect,
    Backend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectType {
    #[default]
    Permanent,
    Temporary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRecord {
    pub incoming_path: String,

    #[serde(default)]
    pub route_type: RouteType,

    #[serde(default)]
    pub handler: Handler,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,

    #[serde(default)]
    pub redirect_type: RedirectType,

    /// Append the source query string to the target (exact routes only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub preserve_query: bool,

    /// Drop the path remainder and query string (prefix routes only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore_extra_path: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,
}

impl RouteRecord {
    /// A permanent redirect with default options.
    #[must_use]
    pub fn redirect(incoming_path: &str, route_type: RouteType, redirect_to: &str) -> Self {
        Self {
            incoming_path: incoming_path.into(),
            route_type,
            handler: Handler::Redirect,
            redirect_to: Some(redirect_to.into()),
            redirect_type: RedirectType::Permanent,
            preserve_query: false,
            ignore_extra_path: false,
            backend_id: None,
        }
    }

    #[must_use]
    pub fn backend(incoming_path: &str, route_type: RouteType, backend_id: &str) -> Self {
        Self {
            incoming_path: incoming_path.into(),
            route_type,
            handler: Handler::Backend,
            redirect_to: None,
            redirect_type: RedirectType::Permanent,
            preserve_query: false,
            ignore_extra_path: false,
            backend_id: Some(backend_id.into()),
        }
    }

    #[must_use]
    pub fn temporary(mut self) -> Self {
        self.redirect_type = RedirectType::Temporary;
        self
    }

    #[must_use]
    pub fn preserving_query(mut self) -> Self {
        self.preserve_query = true;
        self
    }

    #[must_use]
    pub fn ignoring_extra_path(mut self) -> Self {
        self.ignore_extra_path = true;
        self
    }
}
