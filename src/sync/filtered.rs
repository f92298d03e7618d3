use tracing::{debug, warn};

use crate::backend::types::Transaction;

use super::feed::{FetchOutcome, Generation, Ticket};
use super::plan::FetchStep;

/// Transactions of a single employee, fetched in one response.
#[derive(Debug, Default)]
pub struct FilteredFeed {
  employee_id: Option<String>,
  transactions: Option<Vec<Transaction>>,
  loading: bool,
  error: Option<String>,
  generation: Generation,
}

impl FilteredFeed {
  #[cfg(test)]
  pub fn employee_id(&self) -> Option<&str> {
    self.employee_id.as_deref()
  }

  pub fn transactions(&self) -> Option<&[Transaction]> {
    self.transactions.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Issue a fetch for one employee. The response replaces whatever was loaded.
  pub fn load_for_employee(&mut self, employee_id: &str) -> FetchStep {
    self.employee_id = Some(employee_id.to_string());
    self.loading = true;
    FetchStep::EmployeeTransactions {
      ticket: self.generation.ticket(),
      employee_id: employee_id.to_string(),
    }
  }

  /// Apply a resolved fetch. Returns `false` if the result was stale and dropped.
  pub fn apply(&mut self, ticket: Ticket, outcome: FetchOutcome<Vec<Transaction>>) -> bool {
    if !self.generation.is_current(ticket) {
      debug!("dropping stale filtered result");
      return false;
    }

    self.loading = false;
    match outcome {
      FetchOutcome::Ready(transactions) => {
        self.transactions = Some(transactions);
        self.error = None;
      }
      FetchOutcome::NotAvailable => {
        debug!(employee_id = ?self.employee_id, "filtered transactions not available");
      }
      FetchOutcome::Failed(message) => {
        warn!(employee_id = ?self.employee_id, error = %message, "failed to load employee transactions");
        self.error = Some(message);
      }
    }
    true
  }

  pub fn invalidate(&mut self) {
    self.employee_id = None;
    self.transactions = None;
    self.loading = false;
    self.error = None;
    self.generation.bump();
  }
}
