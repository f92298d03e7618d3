use async_trait::async_trait;
use color_eyre::Result;

use super::types::{Employee, PaginatedResponse, Transaction};

/// The transaction backend.
///
/// Every read may be slow. `Ok(None)` means the backend has no data for this
/// exact request right now; that is not an error. Failures are `Err`.
#[async_trait]
pub trait Backend: Send + Sync {
  /// Short label for the header (e.g. host name or "fixture")
  fn label(&self) -> String;

  /// The full employee list
  async fn employees(&self) -> Result<Option<Vec<Employee>>>;

  /// One page of the global transaction feed
  async fn paginated_transactions(
    &self,
    page: u32,
  ) -> Result<Option<PaginatedResponse<Vec<Transaction>>>>;

  /// Every transaction of one employee
  async fn transactions_by_employee(&self, employee_id: &str)
    -> Result<Option<Vec<Transaction>>>;

  /// Record an approval decision on the server (write operation)
  async fn set_transaction_approval(&self, transaction_id: &str, value: bool) -> Result<()>;
}
