//! Request signatures for backend calls.

use crate::cache::QueryKey;

pub const EMPLOYEES: &str = "employees";
pub const PAGINATED_TRANSACTIONS: &str = "paginatedTransactions";
pub const TRANSACTIONS_BY_EMPLOYEE: &str = "transactionsByEmployee";

/// Query key types for backend calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendQueryKey {
  /// The employee directory
  Employees,
  /// One page of the global feed
  PaginatedTransactions { page: u32 },
  /// All transactions of one employee
  TransactionsByEmployee { employee_id: String },
}

impl QueryKey for BackendQueryKey {
  fn resource(&self) -> &'static str {
    match self {
      Self::Employees => EMPLOYEES,
      Self::PaginatedTransactions { .. } => PAGINATED_TRANSACTIONS,
      Self::TransactionsByEmployee { .. } => TRANSACTIONS_BY_EMPLOYEE,
    }
  }

  fn cache_key(&self) -> String {
    match self {
      Self::Employees => format!("{}:", EMPLOYEES),
      Self::PaginatedTransactions { page } => format!("{}:page={}", PAGINATED_TRANSACTIONS, page),
      Self::TransactionsByEmployee { employee_id } => {
        format!("{}:employeeId={}", TRANSACTIONS_BY_EMPLOYEE, employee_id)
      }
    }
  }

  fn description(&self) -> String {
    match self {
      Self::Employees => "all employees".to_string(),
      Self::PaginatedTransactions { page } => format!("transactions page {}", page),
      Self::TransactionsByEmployee { employee_id } => {
        format!("transactions for employee {}", employee_id)
      }
    }
  }
}
