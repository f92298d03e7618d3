use tracing::{debug, warn};

use crate::backend::types::Employee;

use super::feed::{FetchOutcome, Generation, Ticket};
use super::plan::FetchStep;

/// The employee list, fetched once and kept for the session.
///
/// `None` means "not loaded yet", never "no employees".
#[derive(Debug, Default)]
pub struct EmployeeDirectory {
  employees: Option<Vec<Employee>>,
  loading: bool,
  error: Option<String>,
  generation: Generation,
}

impl EmployeeDirectory {
  pub fn data(&self) -> Option<&[Employee]> {
    self.employees.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Issue a fetch of the whole directory.
  pub fn fetch_all(&mut self) -> FetchStep {
    self.loading = true;
    FetchStep::Employees {
      ticket: self.generation.ticket(),
    }
  }

  /// Apply a resolved fetch. Returns `false` if the result was stale and dropped.
  pub fn apply(&mut self, ticket: Ticket, outcome: FetchOutcome<Vec<Employee>>) -> bool {
    if !self.generation.is_current(ticket) {
      debug!("dropping stale employee directory result");
      return false;
    }

    self.loading = false;
    match outcome {
      FetchOutcome::Ready(employees) => {
        // The "no filter" sentinel is ours; a backend row with an empty id would be ambiguous
        self.employees = Some(employees.into_iter().filter(|e| !e.is_empty()).collect());
        self.error = None;
      }
      FetchOutcome::NotAvailable => {
        debug!("employee directory not available yet");
      }
      FetchOutcome::Failed(message) => {
        warn!(error = %message, "failed to load employees");
        self.error = Some(message);
      }
    }
    true
  }

  /// Forget the list; the next `fetch_all` starts from scratch.
  pub fn invalidate(&mut self) {
    self.employees = None;
    self.loading = false;
    self.error = None;
    self.generation.bump();
  }
}
