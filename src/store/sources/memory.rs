//! In-process route source.
//!
//! [`MemorySource`] holds a route set in memory. Embedders push new
//! snapshots with [`MemorySource::replace`] and then trigger a reload;
//! [`MemorySource::set_available`] simulates an unreachable store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::version_of;
use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::{RouteSource, SnapshotVersion};

pub struct MemorySource {
    routes: RwLock<RouteSet>,
    available: AtomicBool,
}

impl MemorySource {
    #[must_use]
    pub fn new(routes: RouteSet) -> Self {
        Self {
            routes: RwLock::new(routes),
            available: AtomicBool::new(true),
        }
    }

    pub async fn replace(&self, routes: RouteSet) {
        *self.routes.write().await = routes;
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), SignpostError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SignpostError::SourceUnavailable {
                source_name: "memory",
                reason: "store marked unavailable".into(),
            })
        }
    }
}

#[async_trait]
impl RouteSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
        self.check_available()?;
        let set = self.routes.read().await.clone();
        let version = version_of(&set);
        Ok((set, version))
    }

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        self.check_available()?;
        Ok(version_of(&*self.routes.read().await) != *current)
    }
}

// Shared handles let a caller keep replacing routes after handing the
// source to a resolver.
#[async_trait]
impl RouteSource for std::sync::Arc<MemorySource> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
        (**self).load().await
    }

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        (**self).has_changed(current).await
    }
}
