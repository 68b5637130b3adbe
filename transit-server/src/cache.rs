//! Caching layer for path queries.
//!
//! The schedule is immutable once loaded, so a path result only goes stale
//! when the process reloads data. Entries still carry a TTL to bound memory
//! for long-running servers that see many distinct station pairs.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, trace};

use crate::planner::{AdjacencyIndex, Path, PathError, PathFinder};
use crate::schedule::ScheduleIndex;

/// Cache key for path queries: (start station, end station).
type PathKey = (String, String);

/// Cached path result. Failures are cached too; they are just as stable.
pub type PathEntry = Arc<Result<Path, PathError>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache of path query results.
pub struct PathCache {
    paths: MokaCache<PathKey, PathEntry>,
}

impl PathCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { paths }
    }

    /// Get a cached result.
    pub async fn get(&self, start: &str, end: &str) -> Option<PathEntry> {
        self.paths.get(&(start.to_string(), end.to_string())).await
    }

    /// Insert a result into the cache.
    pub async fn insert(&self, start: &str, end: &str, entry: PathEntry) {
        self.paths
            .insert((start.to_string(), end.to_string()), entry)
            .await;
    }

    /// Approximate number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.paths.entry_count()
    }
}

/// Path search over a precomputed adjacency index, with cached results.
pub struct CachedPathFinder {
    schedule: Arc<ScheduleIndex>,
    adjacency: Arc<AdjacencyIndex>,
    cache: PathCache,
}

impl CachedPathFinder {
    /// Create a cached path finder.
    pub fn new(
        schedule: Arc<ScheduleIndex>,
        adjacency: Arc<AdjacencyIndex>,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            schedule,
            adjacency,
            cache: PathCache::new(cache_config),
        }
    }

    /// Find a path, using the cache if available.
    pub async fn find_path(&self, start: &str, end: &str) -> PathEntry {
        if let Some(cached) = self.cache.get(start, end).await {
            trace!(start, end, "Path cache hit");
            return cached;
        }

        let finder = PathFinder::new(&self.schedule, self.adjacency.as_ref());
        let entry = Arc::new(finder.find_path(start, end));
        self.cache.insert(start, end, entry.clone()).await;
        debug!(
            start,
            end,
            found = entry.is_ok(),
            cached = self.cache.entry_count(),
            "Path cache miss"
        );
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::test_support::schedule_from_trips;

    fn finder() -> CachedPathFinder {
        let schedule = schedule_from_trips(&[
            ("T1", "30", &["A", "B", "C"]),
            ("T2", "30", &["B", "D"]),
        ]);
        let adjacency = AdjacencyIndex::build(&schedule);
        CachedPathFinder::new(
            Arc::new(schedule),
            Arc::new(adjacency),
            &CacheConfig::default(),
        )
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn caches_results() {
        let finder = finder();

        let first = finder.find_path("A", "D").await;
        let second = finder.find_path("A", "D").await;

        assert!(Arc::ptr_eq(&first, &second));
        let path = first.as_ref().as_ref().unwrap();
        assert_eq!(path.station_names(), vec!["A", "B", "D"]);
    }

    #[tokio::test]
    async fn caches_failures() {
        let finder = finder();

        let first = finder.find_path("D", "A").await;
        let second = finder.find_path("D", "A").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(*first, Err(PathError::NoPathFound { .. })));
    }

    #[tokio::test]
    async fn direction_is_part_of_key() {
        let finder = finder();
        let forward = finder.find_path("A", "B").await;
        let backward = finder.find_path("B", "A").await;
        assert!(forward.is_ok());
        assert!(backward.is_err());
    }

    #[tokio::test]
    async fn cache_creation() {
        let cache = PathCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
        assert!(cache.get("A", "B").await.is_none());
    }
}
