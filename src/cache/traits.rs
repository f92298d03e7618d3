//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Values that can be held by a cache storage backend.
///
/// Storage keeps values as JSON, so anything serde can round-trip qualifies.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {}

impl<T> Cacheable for T where T: Clone + Send + Sync + Serialize + DeserializeOwned {}

/// A request signature: identifies one cache entry.
pub trait QueryKey {
  /// Resource kind the request targets (e.g. "employees").
  fn resource(&self) -> &'static str;

  /// Stable, human-readable key of the form `<resource>:<params>`.
  ///
  /// Keys of the same resource share the `<resource>:` prefix, which is what
  /// prefix invalidation matches on.
  fn cache_key(&self) -> String;

  /// Description for logs.
  fn description(&self) -> String;
}

/// Prefix matching every key of a resource.
pub fn resource_prefix(resource: &str) -> String {
  format!("{}:", resource)
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>, is_stale: bool) -> Self {
    Self {
      data,
      source: if is_stale {
        CacheSource::CacheStale
      } else {
        CacheSource::CacheFresh
      },
      cached_at: Some(cached_at),
    }
  }

  /// Create a new cache result for offline mode.
  pub fn offline(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from the backend
  Network,
  /// Data from cache, still considered fresh
  CacheFresh,
  /// Data from cache past its stale time; the backend had nothing newer
  CacheStale,
  /// Backend failed, serving cached data
  Offline,
}
