use crate::metrics_defs::{CACHE_REFRESH_DURATION, CACHE_REFRESH_FAILED, CACHE_SPONSORS};
use crate::source::{SourceError, SponsorSource, fetch_all};
use crate::types::Sponsor;
use parking_lot::RwLock;
use shared::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("could not fetch sponsors: {0}")]
    Fetch(#[from] SourceError),
}

/// Immutable view of the sponsor list as of one successful fetch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    sponsors: Vec<Sponsor>,
}

impl Snapshot {
    pub fn new(sponsors: Vec<Sponsor>) -> Self {
        Snapshot { sponsors }
    }

    /// Sponsor at a positional index. Indices are only meaningful within
    /// one snapshot; a refresh may shift every entry.
    pub fn get(&self, index: usize) -> Option<&Sponsor> {
        self.sponsors.get(index)
    }

    pub fn len(&self) -> usize {
        self.sponsors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sponsors.is_empty()
    }

    pub fn sponsors(&self) -> &[Sponsor] {
        &self.sponsors
    }
}

/// Sponsor list cache refreshed lazily from a [`SponsorSource`].
///
/// Callers prime the cache with [`SponsorCache::ensure_fresh`], which
/// refetches the whole list once the TTL has elapsed. The returned snapshot
/// is an `Arc`, so readers are never affected by a concurrent refresh.
pub struct SponsorCache {
    source: Arc<dyn SponsorSource>,
    ttl: Duration,
    data: RwLock<Arc<Snapshot>>,
    // Held for the whole check/fetch/swap sequence. Guards the time of the
    // last successful fetch, None until the first one.
    update_lock: Mutex<Option<Instant>>,
    // Used by the readiness probe. Set once the first fetch has succeeded.
    ready: AtomicBool,
}

impl SponsorCache {
    pub fn new(source: Arc<dyn SponsorSource>, ttl: Duration) -> Self {
        SponsorCache {
            source,
            ttl,
            data: RwLock::new(Arc::new(Snapshot::default())),
            update_lock: Mutex::new(None),
            ready: AtomicBool::new(false),
        }
    }

    /// Refreshes the cache if it is older than the TTL and returns the
    /// snapshot callers should read from.
    ///
    /// On failure the previous snapshot and fetch time are left untouched,
    /// so the next call tries again.
    pub async fn ensure_fresh(&self) -> Result<Arc<Snapshot>, CacheError> {
        let mut fetched_at = self.update_lock.lock().await;

        if let Some(at) = *fetched_at
            && at.elapsed() <= self.ttl
        {
            return Ok(self.snapshot());
        }

        tracing::info!("Cache miss, fetching sponsors");
        let start = Instant::now();
        let result = fetch_all(self.source.as_ref()).await;
        histogram!(CACHE_REFRESH_DURATION).record(start.elapsed().as_secs_f64());

        let sponsors = result.inspect_err(|err| {
            counter!(CACHE_REFRESH_FAILED).increment(1);
            tracing::error!(error = %err, "Error fetching sponsors");
        })?;

        let snapshot = Arc::new(Snapshot::new(sponsors));
        *self.data.write() = snapshot.clone();
        *fetched_at = Some(Instant::now());
        self.ready.store(true, Ordering::Relaxed);

        gauge!(CACHE_SPONSORS).set(snapshot.len() as f64);
        tracing::info!(sponsors = snapshot.len(), "Sponsor cache refreshed");

        Ok(snapshot)
    }

    /// The current snapshot, without checking its age.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.data.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
