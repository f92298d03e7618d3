//! Cached backend client that wraps a Backend with transparent caching.

use chrono::Duration;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{resource_prefix, CacheLayer, MemoryStorage, QueryKey};
use crate::config::{BackendConfig, Config};

use super::cache::{BackendQueryKey, PAGINATED_TRANSACTIONS, TRANSACTIONS_BY_EMPLOYEE};
use super::client::Backend;
use super::fixture::FixtureBackend;
use super::http::HttpBackend;
use super::types::{Employee, PaginatedResponse, Transaction};

/// Backend client with transparent caching support.
///
/// Reads go through the shared request cache; writes go straight to the
/// backend and invalidate the resources they affect.
#[derive(Clone)]
pub struct CachedBackend {
  inner: Arc<dyn Backend>,
  cache: CacheLayer<MemoryStorage>,
}

impl CachedBackend {
  pub fn new(inner: Arc<dyn Backend>) -> Self {
    Self {
      inner,
      cache: CacheLayer::new(MemoryStorage::new()),
    }
  }

  /// Build the configured backend behind a fresh cache.
  pub fn from_config(config: &Config) -> Result<Self> {
    let inner: Arc<dyn Backend> = match &config.backend {
      BackendConfig::Fixture {
        data,
        latency_ms,
        page_size,
      } => Arc::new(FixtureBackend::load(
        data.as_deref(),
        std::time::Duration::from_millis(*latency_ms),
        *page_size,
      )?),
      BackendConfig::Http { url, timeout_secs } => Arc::new(HttpBackend::new(
        url,
        std::time::Duration::from_secs(*timeout_secs),
      )?),
    };

    let stale_time = config
      .cache
      .stale_secs
      .map(|secs| Duration::seconds(secs as i64));

    Ok(Self {
      inner,
      cache: CacheLayer::new(MemoryStorage::new()).with_stale_time(stale_time),
    })
  }

  pub fn label(&self) -> String {
    self.inner.label()
  }

  /// Get the employee directory with caching.
  pub async fn employees(&self) -> Result<Option<Vec<Employee>>> {
    let query_key = BackendQueryKey::Employees;

    let result = self
      .cache
      .fetch(&query_key, || {
        let inner = Arc::clone(&self.inner);
        async move { inner.employees().await }
      })
      .await?;

    debug!(resource = query_key.resource(), source = ?result.source, "fetched");
    Ok(result.data)
  }

  /// Get one page of the global feed with caching.
  pub async fn paginated_transactions(
    &self,
    page: u32,
  ) -> Result<Option<PaginatedResponse<Vec<Transaction>>>> {
    let query_key = BackendQueryKey::PaginatedTransactions { page };

    let result = self
      .cache
      .fetch(&query_key, || {
        let inner = Arc::clone(&self.inner);
        async move { inner.paginated_transactions(page).await }
      })
      .await?;

    debug!(resource = query_key.resource(), page, source = ?result.source, "fetched");
    Ok(result.data)
  }

  /// Get every transaction of one employee with caching.
  pub async fn transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Option<Vec<Transaction>>> {
    let query_key = BackendQueryKey::TransactionsByEmployee {
      employee_id: employee_id.to_string(),
    };

    let result = self
      .cache
      .fetch(&query_key, || {
        let inner = Arc::clone(&self.inner);
        let employee_id = employee_id.to_string();
        async move { inner.transactions_by_employee(&employee_id).await }
      })
      .await?;

    debug!(resource = query_key.resource(), employee_id, source = ?result.source, "fetched");
    Ok(result.data)
  }

  /// Record an approval on the backend (not cached - write operation).
  ///
  /// Cached transaction lists may now disagree with the server, so both
  /// transaction resources are dropped from the cache.
  pub async fn set_transaction_approval(&self, transaction_id: &str, value: bool) -> Result<()> {
    self
      .inner
      .set_transaction_approval(transaction_id, value)
      .await?;

    self
      .cache
      .invalidate(&resource_prefix(PAGINATED_TRANSACTIONS))?;
    self
      .cache
      .invalidate(&resource_prefix(TRANSACTIONS_BY_EMPLOYEE))?;
    Ok(())
  }

  /// Drop every cached response.
  pub fn invalidate_all(&self) -> Result<usize> {
    self.cache.invalidate_all()
  }
}
