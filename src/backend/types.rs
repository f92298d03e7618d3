use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee as listed in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl Employee {
  /// The "no filter" entry shown at the top of the employee picker.
  /// Its empty id never occurs in fetched data.
  pub fn empty() -> Self {
    Self {
      id: String::new(),
      first_name: "All".to_string(),
      last_name: "Employees".to_string(),
    }
  }

  /// Whether this is the "no filter" entry
  pub fn is_empty(&self) -> bool {
    self.id.is_empty()
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single transaction. `approved` is the last-known server value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
  pub id: String,
  pub amount: Decimal,
  pub employee: Employee,
  pub merchant: String,
  pub date: NaiveDate,
  pub approved: bool,
}

/// One page of a paginated resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
  pub data: T,
  /// Cursor of the following page; `None` once the last page is reached
  pub next_page: Option<u32>,
}
