//! TTL cache in front of a rate source.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use ratetrack_common::RateTable;
use tracing::debug;

use crate::error::FxResult;
use crate::provider::RateSource;

/// Cached table entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    table: RateTable,
    stored_at: Instant,
}

impl CacheEntry {
    fn new(table: RateTable) -> Self {
        Self {
            table,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Configuration for the rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long a fetched table is served without re-fetching.
    pub ttl: Duration,
    /// How often the background sweep evicts an expired table.
    pub sweep_interval: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(600),
        }
    }
}

/// Holds the last successfully fetched rate table for a bounded time.
///
/// A fresh entry is served without touching the source. A miss (no entry,
/// or entry past TTL) triggers one fetch per caller; concurrent misses may
/// each fetch and the last table to arrive wins the slot. No lock is held
/// across the fetch await, so readers never observe a partial table. An
/// expired entry is never served: source failure on a miss propagates.
pub struct RateCache {
    source: Arc<dyn RateSource>,
    entry: RwLock<Option<CacheEntry>>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a cache with the default TTL and sweep period.
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_config(source, RateCacheConfig::default())
    }

    /// Create a cache with custom configuration.
    pub fn with_config(source: Arc<dyn RateSource>, config: RateCacheConfig) -> Self {
        Self {
            source,
            entry: RwLock::new(None),
            config,
        }
    }

    /// Return the cached table, fetching from the source when the cache is
    /// empty or expired.
    pub async fn get_rates(&self) -> FxResult<RateTable> {
        if let Some(table) = self.fresh() {
            debug!("Serving rate table from cache");
            return Ok(table);
        }

        debug!(source = self.source.name(), "Cache miss, fetching rate table");
        let table = self.source.fetch_rates().await?;
        *self.entry.write() = Some(CacheEntry::new(table.clone()));
        Ok(table)
    }

    /// Drop the entry once it has outlived its TTL.
    pub fn evict_expired(&self) {
        let mut guard = self.entry.write();
        if guard.as_ref().is_some_and(|e| !e.is_fresh(self.config.ttl)) {
            *guard = None;
            debug!("Evicted expired rate table");
        }
    }

    /// Forget any cached table.
    pub fn clear(&self) {
        *self.entry.write() = None;
    }

    /// Whether a table is currently held, fresh or not.
    pub fn is_warm(&self) -> bool {
        self.entry.read().is_some()
    }

    /// Spawn the background sweep that evicts an expired table on a fixed
    /// period, independent of read traffic.
    pub fn spawn_sweeper(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.sweep_interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.evict_expired();
            }
        })
    }

    fn fresh(&self) -> Option<RateTable> {
        let guard = self.entry.read();
        guard
            .as_ref()
            .filter(|e| e.is_fresh(self.config.ttl))
            .map(|e| e.table.clone())
    }
}
