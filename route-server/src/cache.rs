//! Caching layer for the bike-share station directory.
//!
//! The directory (station ids, names, positions and service state) changes
//! on the scale of days, so it is fetched once per TTL. Live occupancy is
//! never cached: every planning request sees its own fresh snapshot.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::sources::publibike::StationDto;

/// Cached directory: the overview list of every station.
pub type DirectoryEntry = Arc<Vec<StationDto>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries (one per upstream base URL).
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 16,
        }
    }
}

impl CacheConfig {
    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Station directory cache, keyed by upstream base URL.
#[derive(Clone)]
pub struct StationDirectoryCache {
    directories: MokaCache<String, DirectoryEntry>,
}

impl StationDirectoryCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let directories = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { directories }
    }

    /// Get a cached directory.
    pub async fn get(&self, base_url: &str) -> Option<DirectoryEntry> {
        self.directories.get(base_url).await
    }

    /// Insert a directory into the cache.
    pub async fn insert(&self, base_url: impl Into<String>, entry: DirectoryEntry) {
        self.directories.insert(base_url.into(), entry).await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.directories.invalidate_all();
    }
}

impl std::fmt::Debug for StationDirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationDirectoryCache")
            .field("entries", &self.directories.entry_count())
            .finish()
    }
}
