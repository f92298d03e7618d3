//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::Cacheable;

/// A single cached value.
#[derive(Debug, Clone)]
pub struct CachedEntry<T> {
  /// The cached value
  pub value: T,
  /// When the value was cached
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Get the entry stored under `key`.
  fn get<T: Cacheable>(&self, key: &str) -> Result<Option<CachedEntry<T>>>;

  /// Store a value under `key`, replacing any previous entry.
  fn store<T: Cacheable>(&self, key: &str, description: &str, value: &T) -> Result<()>;

  /// Remove every entry whose key starts with `prefix`. Returns how many were removed.
  fn remove_prefix(&self, prefix: &str) -> Result<usize>;

  /// Number of live entries.
  fn len(&self) -> Result<usize>;
}

#[derive(Debug, Clone)]
struct StoredEntry {
  data: serde_json::Value,
  description: String,
  cached_at: DateTime<Utc>,
}

/// Process-local cache storage. Nothing outlives the session.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn get<T: Cacheable>(&self, key: &str) -> Result<Option<CachedEntry<T>>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    match entries.get(key) {
      Some(stored) => {
        let value: T = serde_json::from_value(stored.data.clone())
          .map_err(|e| eyre!("Failed to deserialize cached {}: {}", stored.description, e))?;
        Ok(Some(CachedEntry {
          value,
          cached_at: stored.cached_at,
        }))
      }
      None => Ok(None),
    }
  }

  fn store<T: Cacheable>(&self, key: &str, description: &str, value: &T) -> Result<()> {
    let data =
      serde_json::to_value(value).map_err(|e| eyre!("Failed to serialize {}: {}", description, e))?;

    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    entries.insert(
      key.to_string(),
      StoredEntry {
        data,
        description: description.to_string(),
        cached_at: Utc::now(),
      },
    );

    Ok(())
  }

  fn remove_prefix(&self, prefix: &str) -> Result<usize> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let before = entries.len();
    entries.retain(|key, _| !key.starts_with(prefix));
    Ok(before - entries.len())
  }

  fn len(&self) -> Result<usize> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(entries.len())
  }
}
