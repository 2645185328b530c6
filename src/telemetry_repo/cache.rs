// Time-bounded cache for static host info

use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// Cached value plus its expiry. Valid iff a value is present and `now < expires_at`.
struct CacheEntry<T> {
    value: Option<Arc<T>>,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn fresh(&self, now: Instant) -> Option<Arc<T>> {
        match &self.value {
            Some(v) if now < self.expires_at => Some(v.clone()),
            _ => None,
        }
    }
}

/// Lazily refreshed single-value cache with double-checked locking.
///
/// Readers take the shared lock; a refresh takes the exclusive lock and re-checks
/// freshness first, so concurrent callers on a stale entry trigger one refresh and all
/// observe its result. A failed refresh leaves the previous entry untouched.
pub struct TtlCache<T> {
    entry: RwLock<CacheEntry<T>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(CacheEntry {
                value: None,
                expires_at: Instant::now(),
            }),
            ttl,
        }
    }

    /// Current value if still fresh; never refreshes.
    pub async fn get(&self) -> Option<Arc<T>> {
        self.entry.read().await.fresh(Instant::now())
    }

    /// Returns the fresh cached value, or runs `refresh` and stores its result.
    ///
    /// Expired data is never returned on error.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(v) = self.get().await {
            return Ok(v);
        }

        let mut entry = self.entry.write().await;
        // Another caller may have refreshed while we waited for the write lock.
        if let Some(v) = entry.fresh(Instant::now()) {
            return Ok(v);
        }

        let value = Arc::new(refresh().await?);
        *entry = CacheEntry {
            value: Some(value.clone()),
            expires_at: Instant::now() + self.ttl,
        };
        Ok(value)
    }
}
