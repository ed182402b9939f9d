//! Cached file-name listing.
//!
//! Entries expire after a TTL and are dropped by every mutating store call.
//! Each invalidation bumps a generation counter; a listing read before the
//! latest invalidation is refused by [`FileNameCache::put`].

use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct CacheState {
    generation: u64,
    entry: Option<(Instant, Vec<String>)>,
}

pub struct FileNameCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl FileNameCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cached listing, if present and younger than the TTL.
    pub async fn get(&self) -> Option<Vec<String>> {
        let guard = self.state.lock().await;
        guard
            .entry
            .as_ref()
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, names)| names.clone())
    }

    /// Current generation. Take it before reading the listing from the
    /// database and hand it back to [`FileNameCache::put`].
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    /// Store `names` read at `generation`.
    ///
    /// # Returns
    /// `false` if a write invalidated the cache since, in which case the
    /// listing is not stored.
    pub async fn put(&self, generation: u64, names: Vec<String>) -> bool {
        let mut guard = self.state.lock().await;
        if guard.generation != generation {
            debug!("Discarding file name listing from generation {generation}");
            return false;
        }
        guard.entry = Some((Instant::now(), names));
        true
    }

    pub async fn invalidate(&self) {
        let mut guard = self.state.lock().await;
        guard.generation = guard.generation.wrapping_add(1);
        if guard.entry.take().is_some() {
            debug!("File name cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = FileNameCache::new(Duration::from_secs(60));
        assert_eq!(cache.get().await, None);

        let generation = cache.generation().await;
        assert!(cache.put(generation, vec!["ward1.txt".to_string()]).await);
        assert_eq!(cache.get().await, Some(vec!["ward1.txt".to_string()]));

        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_hits() {
        let cache = FileNameCache::new(Duration::ZERO);
        let generation = cache.generation().await;
        cache.put(generation, vec!["ward1.txt".to_string()]).await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_listing_read_before_invalidation_is_refused() {
        let cache = FileNameCache::new(Duration::from_secs(60));
        let generation = cache.generation().await;

        // A write lands between the database read and the put
        cache.invalidate().await;
        assert!(!cache.put(generation, vec!["deleted.txt".to_string()]).await);
        assert_eq!(cache.get().await, None);

        let generation = cache.generation().await;
        assert!(cache.put(generation, vec!["ward2.txt".to_string()]).await);
        assert_eq!(cache.get().await, Some(vec!["ward2.txt".to_string()]));
    }
}
