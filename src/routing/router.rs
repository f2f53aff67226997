//! The router core: the live route table and the reload protocol.
//!
//! [`RouterCore`] owns the only shared mutable state in the router, a
//! single [`ArcSwap`] pointing at the active [`Snapshot`]. Request handling
//! loads the pointer without locking; a reload builds a complete new table
//! off to the side and publishes it with one atomic swap. Readers that
//! loaded the old snapshot keep using it until they finish.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

use super::table::{RouteStats, RouteTable};
use crate::error::SignpostError;
use crate::store::{SnapshotVersion, SourceResolver};

/// An immutable, published route table plus where it came from.
#[derive(Debug)]
pub struct Snapshot {
    pub table: RouteTable,
    pub version: Option<SnapshotVersion>,
    pub source: &'static str,
    pub loaded_at: Instant,
}

impl Snapshot {
    #[must_use]
    pub fn new(table: RouteTable, version: Option<SnapshotVersion>, source: &'static str) -> Self {
        Self {
            table,
            version,
            source,
            loaded_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(RouteTable::empty(), None, "none")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Loading,
    Failed,
}

impl ReloadState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub stats: RouteStats,
    /// Whether the published route set differs from the one it replaced.
    pub changed: bool,
}

#[derive(Debug)]
pub struct RouterCore {
    current: ArcSwap<Snapshot>,
    in_flight: AtomicUsize,
    last_failed: AtomicBool,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl Default for RouterCore {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}

/// Decrements the in-flight reload count however the reload ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RouterCore {
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            in_flight: AtomicUsize::new(0),
            last_failed: AtomicBool::new(false),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// The active snapshot. Cheap; never blocks on a reload.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the active snapshot in one atomic step, returning the old one.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.current.swap(Arc::new(snapshot))
    }

    #[must_use]
    pub fn stats(&self) -> RouteStats {
        self.current.load().table.stats().clone()
    }

    /// Fetch a fresh snapshot, build a table from it, and publish it.
    ///
    /// Nothing request handling needs is held while the store is queried.
    /// On any failure the previously active table stays in place.
    /// Overlapping reloads each build independently; the last to publish wins.
    pub async fn reload(
        &self,
        resolver: &SourceResolver,
        timeout: Duration,
    ) -> Result<ReloadOutcome, SignpostError> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);
        let started = Instant::now();

        match Self::build(resolver, timeout).await {
            Ok(snapshot) => {
                let stats = snapshot.table.stats().clone();
                let version = snapshot.version.clone();
                let source = snapshot.source;
                let previous = self.publish(snapshot);
                let changed = previous.table.stats().checksum != stats.checksum;

                self.last_failed.store(false, Ordering::SeqCst);
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    source,
                    routes = stats.count,
                    checksum = %stats.checksum,
                    version = version.as_ref().map_or("none", SnapshotVersion::short),
                    changed,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "route table reloaded"
                );
                Ok(ReloadOutcome { stats, changed })
            }
            Err(e) => {
                self.last_failed.store(true, Ordering::SeqCst);
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    error = %e,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "route reload failed, keeping current table"
                );
                Err(e)
            }
        }
    }

    async fn build(resolver: &SourceResolver, timeout: Duration) -> Result<Snapshot, SignpostError> {
        let (set, version, source) = tokio::time::timeout(timeout, resolver.load_with_fallback())
            .await
            .map_err(|_| SignpostError::ReloadTimeout(timeout))??;
        let table = RouteTable::build(&set)?;
        Ok(Snapshot::new(table, Some(version), source))
    }

    #[must_use]
    pub fn reload_state(&self) -> ReloadState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            ReloadState::Loading
        } else if self.last_failed.load(Ordering::SeqCst) {
            ReloadState::Failed
        } else {
            ReloadState::Idle
        }
    }

    #[must_use]
    pub fn reloads_succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn reloads_failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::model::{RouteRecord, RouteSet, RouteType};
    use crate::store::sources::memory::MemorySource;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn routes(paths: &[&str]) -> RouteSet {
        RouteSet::new(
            paths
                .iter()
                .map(|p| RouteRecord::redirect(p, RouteType::Prefix, "/target"))
                .collect(),
        )
    }

    fn resolver(source: Arc<MemorySource>) -> SourceResolver {
        SourceResolver::new(Box::new(source), None)
    }

    #[tokio::test]
    async fn successful_reload_publishes_new_table() {
        let source = Arc::new(MemorySource::new(routes(&["/a", "/b"])));
        let core = RouterCore::default();
        assert_eq!(core.stats().count, 0);

        let outcome = core.reload(&resolver(source), TIMEOUT).await.unwrap();
        assert_eq!(outcome.stats.count, 2);
        assert!(outcome.changed);
        assert_eq!(core.stats().count, 2);
        assert_eq!(core.current().source, "memory");
        assert_eq!(core.reload_state(), ReloadState::Idle);
        assert_eq!(core.reloads_succeeded(), 1);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_table() {
        let source = Arc::new(MemorySource::new(routes(&["/a"])));
        let core = RouterCore::default();
        let resolver = resolver(Arc::clone(&source));
        core.reload(&resolver, TIMEOUT).await.unwrap();
        let before = core.stats();

        source.set_available(false);
        source.replace(routes(&["/x", "/y", "/z"])).await;
        assert!(core.reload(&resolver, TIMEOUT).await.is_err());
        assert_eq!(core.stats(), before);
        assert_eq!(core.reload_state(), ReloadState::Failed);
        assert_eq!(core.reloads_failed(), 1);

        source.set_available(true);
        core.reload(&resolver, TIMEOUT).await.unwrap();
        assert_eq!(core.stats().count, 3);
        assert_eq!(core.reload_state(), ReloadState::Idle);
    }

    #[tokio::test]
    async fn invalid_snapshot_keeps_previous_table() {
        let source = Arc::new(MemorySource::new(routes(&["/a"])));
        let core = RouterCore::default();
        let resolver = resolver(Arc::clone(&source));
        core.reload(&resolver, TIMEOUT).await.unwrap();

        source
            .replace(RouteSet::new(vec![
                RouteRecord::redirect("/ok", RouteType::Exact, "/fine"),
                RouteRecord::redirect("no-slash", RouteType::Exact, "/fine"),
            ]))
            .await;
        let err = core.reload(&resolver, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, SignpostError::SnapshotValidation { .. }));
        assert_eq!(core.stats().count, 1);
    }

    /// Signals when a load starts, then takes longer than any reload timeout.
    struct StalledSource {
        started: Arc<tokio::sync::Notify>,
    }

    #[async_trait::async_trait]
    impl crate::store::RouteSource for StalledSource {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
            self.started.notify_one();
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok((routes(&["/late"]), SnapshotVersion::Hash("late".into())))
        }

        async fn has_changed(&self, _current: &SnapshotVersion) -> Result<bool, SignpostError> {
            Ok(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_times_out_and_keeps_previous_table() {
        let core = Arc::new(RouterCore::default());
        let initial = resolver(Arc::new(MemorySource::new(routes(&["/a"]))));
        core.reload(&initial, TIMEOUT).await.unwrap();
        let before = core.stats();

        let started = Arc::new(tokio::sync::Notify::new());
        let stalled = SourceResolver::new(
            Box::new(StalledSource {
                started: Arc::clone(&started),
            }),
            None,
        );

        let reload = tokio::spawn({
            let core = Arc::clone(&core);
            async move { core.reload(&stalled, Duration::from_secs(1)).await }
        });

        started.notified().await;
        assert_eq!(core.reload_state(), ReloadState::Loading);
        assert_eq!(core.stats(), before);

        let err = reload.await.unwrap().unwrap_err();
        assert!(matches!(err, SignpostError::ReloadTimeout(t) if t == Duration::from_secs(1)));
        assert_eq!(core.stats(), before);
        assert_eq!(core.reload_state(), ReloadState::Failed);
        assert_eq!(core.reloads_failed(), 1);
    }

    #[tokio::test]
    async fn unchanged_reload_reports_no_change() {
        let source = Arc::new(MemorySource::new(routes(&["/a"])));
        let core = RouterCore::default();
        let resolver = resolver(source);
        core.reload(&resolver, TIMEOUT).await.unwrap();
        let outcome = core.reload(&resolver, TIMEOUT).await.unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn superseded_snapshot_stays_readable() {
        let source = Arc::new(MemorySource::new(routes(&["/old"])));
        let core = RouterCore::default();
        let resolver = resolver(Arc::clone(&source));
        core.reload(&resolver, TIMEOUT).await.unwrap();

        let held = core.current();
        source.replace(routes(&["/new"])).await;
        core.reload(&resolver, TIMEOUT).await.unwrap();

        assert!(held.table.lookup("/old/x").is_some());
        assert!(held.table.lookup("/new").is_none());
        assert!(core.current().table.lookup("/new").is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_see_whole_tables_during_reloads() {
        let old = routes(&["/a", "/b"]);
        let new = routes(&["/c", "/d", "/e"]);
        let old_stats = RouteTable::build(&old).unwrap().stats().clone();
        let new_stats = RouteTable::build(&new).unwrap().stats().clone();

        let source = Arc::new(MemorySource::new(old.clone()));
        let core = Arc::new(RouterCore::default());
        let resolver = Arc::new(resolver(Arc::clone(&source)));
        core.reload(&resolver, TIMEOUT).await.unwrap();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let core = Arc::clone(&core);
                let (old_stats, new_stats) = (old_stats.clone(), new_stats.clone());
                tokio::spawn(async move {
                    for _ in 0..2_000 {
                        let snap = core.current();
                        let stats = snap.table.stats();
                        let is_old = *stats == old_stats;
                        assert!(is_old || *stats == new_stats);
                        // Lookups must agree with the stats of the same snapshot.
                        assert_eq!(snap.table.lookup("/a/x").is_some(), is_old);
                        assert_eq!(snap.table.lookup("/e").is_some(), !is_old);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let next = if i % 2 == 0 { new.clone() } else { old.clone() };
            source.replace(next).await;
            core.reload(&resolver, TIMEOUT).await.unwrap();
            tokio::task::yield_now().await;
        }

        for r in readers {
            r.await.unwrap();
        }
    }
}
