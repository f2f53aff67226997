//! Compiled, immutable routes held by a [`RouteTable`](super::RouteTable).

use axum::http::StatusCode;

use super::target::Target;
use crate::error::SignpostError;
use crate::store::model::{Handler, RedirectType, RouteRecord, RouteType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path exactly as registered in the store.
    pub incoming_path: String,
    pub route_type: RouteType,
    pub action: RouteAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Redirect(Redirect),
    Backend { backend_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: Target,
    pub redirect_type: RedirectType,
    pub preserve_query: bool,
    pub ignore_extra_path: bool,
}

impl Redirect {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.redirect_type {
            RedirectType::Permanent => StatusCode::MOVED_PERMANENTLY,
            RedirectType::Temporary => StatusCode::FOUND,
        }
    }
}

impl Route {
    /// Compile a validated record, parsing its redirect target once.
    pub fn compile(record: &RouteRecord) -> Result<Self, SignpostError> {
        let action = match record.handler {
            Handler::Redirect => {
                let raw = record.redirect_to.as_deref().unwrap_or_default();
                RouteAction::Redirect(Redirect {
                    target: Target::parse(raw)?,
                    redirect_type: record.redirect_type,
                    preserve_query: record.preserve_query,
                    ignore_extra_path: record.ignore_extra_path,
                })
            }
            Handler::Backend => RouteAction::Backend {
                backend_id: record.backend_id.clone().unwrap_or_default(),
            },
        };

        Ok(Self {
            incoming_path: record.incoming_path.clone(),
            route_type: record.route_type,
            action,
        })
    }

    /// Identity string fed to the route-set checksum: `<path>(<is_prefix>)`.
    #[must_use]
    pub fn checksum_key(&self) -> String {
        format!("{}({})", self.incoming_path, self.route_type.is_prefix())
    }
}
