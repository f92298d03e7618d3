use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::api_types::{into_transactions, ApiFixture};
use super::client::Backend;
use super::types::{Employee, PaginatedResponse, Transaction};

/// Data set bundled with the binary, used when no fixture file is configured
const BUNDLED_FIXTURE: &str = include_str!("../../demos/fixture.json");

/// In-memory backend serving a fixed data set with simulated latency.
///
/// Approval writes mutate the in-memory data, so refetches observe them.
pub struct FixtureBackend {
  data: Mutex<ApiFixture>,
  latency: Duration,
  page_size: usize,
  label: String,
}

impl FixtureBackend {
  /// Load the fixture at `path`, or the bundled one when `path` is `None`.
  pub fn load(path: Option<&Path>, latency: Duration, page_size: usize) -> Result<Self> {
    match path {
      Some(path) => {
        let contents = std::fs::read_to_string(path)
          .map_err(|e| eyre!("Failed to read fixture {}: {}", path.display(), e))?;
        let mut backend = Self::from_json(&contents, latency, page_size)
          .map_err(|e| eyre!("Failed to load fixture {}: {}", path.display(), e))?;
        backend.label = format!("fixture {}", path.display());
        Ok(backend)
      }
      None => Self::from_json(BUNDLED_FIXTURE, latency, page_size),
    }
  }

  pub fn from_json(json: &str, latency: Duration, page_size: usize) -> Result<Self> {
    let data: ApiFixture =
      serde_json::from_str(json).map_err(|e| eyre!("Failed to parse fixture: {}", e))?;

    Ok(Self {
      data: Mutex::new(data),
      latency,
      page_size: page_size.max(1),
      label: "fixture".to_string(),
    })
  }

  async fn delay(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }

  fn snapshot(&self) -> Result<ApiFixture> {
    let data = self
      .data
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(data.clone())
  }
}

#[async_trait]
impl Backend for FixtureBackend {
  fn label(&self) -> String {
    self.label.clone()
  }

  async fn employees(&self) -> Result<Option<Vec<Employee>>> {
    self.delay().await;
    let data = self.snapshot()?;
    Ok(Some(data.employees.into_iter().map(Employee::from).collect()))
  }

  async fn paginated_transactions(
    &self,
    page: u32,
  ) -> Result<Option<PaginatedResponse<Vec<Transaction>>>> {
    self.delay().await;
    let data = self.snapshot()?;

    let total = data.transactions.len();
    let start = page as usize * self.page_size;
    if start > total {
      return Ok(None);
    }
    let end = (start + self.page_size).min(total);

    let next_page = if end < total { Some(page + 1) } else { None };
    let page_data = data
      .transactions
      .into_iter()
      .skip(start)
      .take(end - start)
      .collect();

    Ok(Some(PaginatedResponse {
      data: into_transactions(page_data)?,
      next_page,
    }))
  }

  async fn transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Option<Vec<Transaction>>> {
    self.delay().await;
    if employee_id.is_empty() {
      return Err(eyre!("Employee id cannot be empty"));
    }

    let data = self.snapshot()?;
    let transactions = data
      .transactions
      .into_iter()
      .filter(|t| t.employee.id == employee_id)
      .collect();

    Ok(Some(into_transactions(transactions)?))
  }

  async fn set_transaction_approval(&self, transaction_id: &str, value: bool) -> Result<()> {
    self.delay().await;
    let mut data = self
      .data
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let transaction = data
      .transactions
      .iter_mut()
      .find(|t| t.id == transaction_id)
      .ok_or_else(|| eyre!("Invalid transaction id {}", transaction_id))?;
    transaction.approved = value;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bundled() -> FixtureBackend {
    FixtureBackend::load(None, Duration::ZERO, 5).unwrap()
  }

  #[tokio::test]
  async fn test_bundled_fixture_loads() {
    let backend = bundled();
    let employees = backend.employees().await.unwrap().unwrap();
    assert!(!employees.is_empty());
    assert!(employees.iter().all(|e| !e.is_empty()));
  }

  #[tokio::test]
  async fn test_pages_cover_all_transactions_in_order() {
    let backend = bundled();
    let total = backend.snapshot().unwrap().transactions.len();

    let mut ids = Vec::new();
    let mut cursor = Some(0);
    while let Some(page) = cursor {
      let response = backend.paginated_transactions(page).await.unwrap().unwrap();
      assert!(response.data.len() <= 5);
      ids.extend(response.data.into_iter().map(|t| t.id));
      cursor = response.next_page;
    }

    let expected: Vec<String> = backend
      .snapshot()
      .unwrap()
      .transactions
      .into_iter()
      .map(|t| t.id)
      .collect();
    assert_eq!(ids.len(), total);
    assert_eq!(ids, expected);
  }

  #[tokio::test]
  async fn test_page_past_end_is_not_available() {
    let backend = bundled();
    assert!(backend.paginated_transactions(1000).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_transactions_by_employee() {
    let backend = bundled();
    let employee = backend.employees().await.unwrap().unwrap().remove(0);

    let transactions = backend
      .transactions_by_employee(&employee.id)
      .await
      .unwrap()
      .unwrap();
    assert!(!transactions.is_empty());
    assert!(transactions.iter().all(|t| t.employee.id == employee.id));

    assert!(backend.transactions_by_employee("").await.is_err());
  }

  #[tokio::test]
  async fn test_set_transaction_approval() {
    let backend = bundled();
    let first = backend.paginated_transactions(0).await.unwrap().unwrap().data[0].clone();

    backend
      .set_transaction_approval(&first.id, !first.approved)
      .await
      .unwrap();

    let reloaded = backend.paginated_transactions(0).await.unwrap().unwrap().data[0].clone();
    assert_eq!(reloaded.approved, !first.approved);

    assert!(backend
      .set_transaction_approval("no-such-id", true)
      .await
      .is_err());
  }

  #[tokio::test]
  async fn test_exact_multiple_of_page_size() {
    let json = r#"{
      "employees": [{ "id": "e1", "firstName": "A", "lastName": "B" }],
      "transactions": [
        { "id": "t1", "amount": 1, "employee": { "id": "e1", "firstName": "A", "lastName": "B" }, "merchant": "M", "date": "2022-01-01", "approved": false },
        { "id": "t2", "amount": 2, "employee": { "id": "e1", "firstName": "A", "lastName": "B" }, "merchant": "M", "date": "2022-01-02", "approved": true }
      ]
    }"#;
    let backend = FixtureBackend::from_json(json, Duration::ZERO, 2).unwrap();

    let page = backend.paginated_transactions(0).await.unwrap().unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.next_page, None);
  }

  #[test]
  fn test_missing_fixture_file_is_error() {
    let result = FixtureBackend::load(
      Some(Path::new("/nonexistent/fixture.json")),
      Duration::ZERO,
      5,
    );
    assert!(result.is_err());
  }
}
