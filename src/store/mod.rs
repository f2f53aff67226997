//! Route stores: where route snapshots come from.
//!
//! Defines the [`RouteSource`] trait for pluggable backing stores, the
//! [`SourceResolver`] for primary/fallback source resolution, and the
//! [`SnapshotVersion`] enum for change detection. Submodules provide the
//! data model, validation logic, and concrete source implementations.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::SignpostError;
use model::RouteSet;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotVersion {
    Hash(String),
}

impl SnapshotVersion {
    /// First eight characters of the version, for logs and status output.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
        }
    }
}

// async_trait is required here because RouteSource is used as Box<dyn RouteSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait RouteSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch the complete current route set.
    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError>;

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError>;
}

pub struct SourceResolver {
    primary: Box<dyn RouteSource>,
    fallback: Option<Box<dyn RouteSource>>,
}

impl SourceResolver {
    #[must_use]
    pub fn new(primary: Box<dyn RouteSource>, fallback: Option<Box<dyn RouteSource>>) -> Self {
        Self { primary, fallback }
    }

    /// Load from the primary source, falling back to the secondary one if
    /// the primary fails. Returns the snapshot and the name of the source
    /// that produced it.
    pub async fn load_with_fallback(
        &self,
    ) -> Result<(RouteSet, SnapshotVersion, &'static str), SignpostError> {
        match self.primary.load().await {
            Ok((set, version)) => Ok((set, version, self.primary.name())),
            Err(primary_err) => {
                if let Some(ref fallback) = self.fallback {
                    tracing::warn!(
                        primary = self.primary.name(),
                        fallback = fallback.name(),
                        error = %primary_err,
                        "primary route source failed, using fallback"
                    );
                    let (set, version) = fallback.load().await?;
                    Ok((set, version, fallback.name()))
                } else {
                    Err(primary_err)
                }
            }
        }
    }

    /// Probe for a change the same way [`SourceResolver::load_with_fallback`]
    /// loads: ask the primary, and ask the fallback only if the primary
    /// cannot answer. A snapshot served from the fallback therefore still
    /// tracks edits to the fallback while the primary is down, and reports
    /// a change once the primary is reachable again.
    pub async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        match self.primary.has_changed(current).await {
            Ok(changed) => Ok(changed),
            Err(primary_err) => match self.fallback {
                Some(ref fallback) => {
                    tracing::debug!(
                        primary = self.primary.name(),
                        fallback = fallback.name(),
                        error = %primary_err,
                        "primary change check failed, probing fallback"
                    );
                    fallback.has_changed(current).await
                }
                None => Err(primary_err),
            },
        }
    }

    #[must_use]
    pub fn primary_name(&self) -> &'static str {
        self.primary.name()
    }
}
