//! Cache layer that orchestrates caching logic with backend fetching.

use chrono::{Duration, Utc};
use color_eyre::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::CacheStorage;
use super::traits::{CacheResult, Cacheable, QueryKey};

/// Cache layer that memoizes backend responses by request signature.
///
/// There is no in-flight de-duplication: two concurrent misses for the same
/// key both invoke their loader, and the later one wins the entry.
///
/// A load that was started before any invalidation returns its value but
/// does not store it, so a response fetched ahead of a write never
/// repopulates the entries that write invalidated.
pub struct CacheLayer<S: CacheStorage> {
  storage: Arc<S>,
  /// Bumped by every invalidation
  epoch: Arc<AtomicU64>,
  /// How long before cached data is considered stale. `None` keeps entries
  /// until they are invalidated.
  stale_time: Option<Duration>,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
      epoch: Arc::new(AtomicU64::new(0)),
      stale_time: None,
    }
  }

  /// Set the stale time for cached data.
  pub fn with_stale_time(mut self, stale_time: Option<Duration>) -> Self {
    self.stale_time = stale_time;
    self
  }

  /// Check if cached data is stale based on cached_at timestamp.
  fn is_stale(&self, cached_at: chrono::DateTime<Utc>) -> bool {
    match self.stale_time {
      Some(stale_time) => Utc::now() - cached_at > stale_time,
      None => false,
    }
  }

  /// Store `value` unless an invalidation ran since `epoch` was read.
  fn store_if_current<K: QueryKey, T: Cacheable>(
    &self,
    epoch: u64,
    key: &K,
    cache_key: &str,
    value: &T,
  ) -> Result<()> {
    if self.epoch.load(Ordering::SeqCst) != epoch {
      debug!(key = %cache_key, "invalidated while loading, not storing");
      return Ok(());
    }
    self.storage.store(cache_key, &key.description(), value)
  }

  /// Fetch a value with a cache-first strategy.
  ///
  /// 1. Fresh entry: return it without calling `loader`
  /// 2. Missing or stale: call `loader`
  /// 3. `Some` from the loader is stored; `None` is returned but not stored
  /// 4. Loader failure with a stale entry present serves the stale entry
  /// 5. Nothing is stored if the cache was invalidated while `loader` ran
  pub async fn fetch<K, T, F, Fut>(&self, key: &K, loader: F) -> Result<CacheResult<Option<T>>>
  where
    K: QueryKey,
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
  {
    let cache_key = key.cache_key();
    let epoch = self.epoch.load(Ordering::SeqCst);

    if let Some(cached) = self.storage.get::<T>(&cache_key)? {
      if !self.is_stale(cached.cached_at) {
        debug!(key = %cache_key, "cache hit");
        return Ok(CacheResult::from_cache(
          Some(cached.value),
          cached.cached_at,
          false,
        ));
      }

      debug!(key = %cache_key, "cache entry stale, refetching");
      match loader().await {
        Ok(Some(value)) => {
          self.store_if_current(epoch, key, &cache_key, &value)?;
          Ok(CacheResult::from_network(Some(value)))
        }
        Ok(None) => Ok(CacheResult::from_cache(
          Some(cached.value),
          cached.cached_at,
          true,
        )),
        Err(e) => {
          warn!(key = %cache_key, error = %e, "fetch failed, serving stale cache");
          Ok(CacheResult::offline(Some(cached.value), cached.cached_at))
        }
      }
    } else {
      debug!(key = %cache_key, "cache miss");
      let value = loader().await?;
      if let Some(value) = &value {
        self.store_if_current(epoch, key, &cache_key, value)?;
      }
      Ok(CacheResult::from_network(value))
    }
  }

  /// Remove every entry whose key starts with `prefix`.
  pub fn invalidate(&self, prefix: &str) -> Result<usize> {
    self.epoch.fetch_add(1, Ordering::SeqCst);
    let removed = self.storage.remove_prefix(prefix)?;
    debug!(prefix, removed, "cache invalidated");
    Ok(removed)
  }

  /// Remove every entry.
  pub fn invalidate_all(&self) -> Result<usize> {
    self.invalidate("")
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      epoch: Arc::clone(&self.epoch),
      stale_time: self.stale_time,
    }
  }
}
