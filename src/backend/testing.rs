//! Scripted in-memory backend for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use color_eyre::{eyre::eyre, Result};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::client::Backend;
use super::types::{Employee, PaginatedResponse, Transaction};

pub fn employee(id: &str) -> Employee {
  Employee {
    id: id.to_string(),
    first_name: format!("First-{}", id),
    last_name: format!("Last-{}", id),
  }
}

pub fn transaction(id: &str, employee_id: &str, approved: bool) -> Transaction {
  Transaction {
    id: id.to_string(),
    amount: Decimal::new(1250, 2),
    employee: employee(employee_id),
    merchant: format!("Merchant {}", id),
    date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
    approved,
  }
}

/// A page of unapproved transactions owned by employee "e1"
pub fn page(ids: &[&str], next_page: Option<u32>) -> PaginatedResponse<Vec<Transaction>> {
  PaginatedResponse {
    data: ids.iter().map(|id| transaction(id, "e1", false)).collect(),
    next_page,
  }
}

/// Backend answering from scripted responses and recording every call.
///
/// Anything not scripted answers `Ok(None)`.
#[derive(Default)]
pub struct ScriptedBackend {
  employees: Mutex<Option<Vec<Employee>>>,
  pages: Mutex<HashMap<u32, PaginatedResponse<Vec<Transaction>>>>,
  by_employee: Mutex<HashMap<String, Vec<Transaction>>>,
  failing: Mutex<HashSet<String>>,
  fail_approvals: bool,
  /// Delay before an approval write with the given value lands
  approval_delays: HashMap<bool, Duration>,
  /// Last approval value written per transaction
  approvals: Mutex<HashMap<String, bool>>,
  calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_employees(self, employees: Vec<Employee>) -> Self {
    *self.employees.lock().unwrap() = Some(employees);
    self
  }

  pub fn with_page(self, page: u32, response: PaginatedResponse<Vec<Transaction>>) -> Self {
    self.pages.lock().unwrap().insert(page, response);
    self
  }

  pub fn with_employee_transactions(self, employee_id: &str, transactions: Vec<Transaction>) -> Self {
    self
      .by_employee
      .lock()
      .unwrap()
      .insert(employee_id.to_string(), transactions);
    self
  }

  /// Make the call with this signature (e.g. "paginatedTransactions:1") fail.
  pub fn failing(self, call: &str) -> Self {
    self.failing.lock().unwrap().insert(call.to_string());
    self
  }

  pub fn failing_approvals(mut self) -> Self {
    self.fail_approvals = true;
    self
  }

  /// Delay every approval write of `value` by `delay`.
  pub fn with_approval_delay(mut self, value: bool, delay: Duration) -> Self {
    self.approval_delays.insert(value, delay);
    self
  }

  /// The approval value the backend currently holds for a transaction.
  pub fn approval(&self, transaction_id: &str) -> Option<bool> {
    self.approvals.lock().unwrap().get(transaction_id).copied()
  }

  /// Replace the response for a page after construction.
  pub fn set_page(&self, page: u32, response: PaginatedResponse<Vec<Transaction>>) {
    self.pages.lock().unwrap().insert(page, response);
  }

  /// Number of recorded calls whose signature starts with `prefix`.
  pub fn call_count(&self, prefix: &str) -> usize {
    self
      .calls
      .lock()
      .unwrap()
      .iter()
      .filter(|call| call.starts_with(prefix))
      .count()
  }

  /// Every recorded call, in order.
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: String) -> Result<()> {
    self.calls.lock().unwrap().push(call.clone());
    if self.failing.lock().unwrap().contains(&call) {
      return Err(eyre!("scripted failure for {}", call));
    }
    Ok(())
  }
}

#[async_trait]
impl Backend for ScriptedBackend {
  fn label(&self) -> String {
    "scripted".to_string()
  }

  async fn employees(&self) -> Result<Option<Vec<Employee>>> {
    self.record("employees".to_string())?;
    Ok(self.employees.lock().unwrap().clone())
  }

  async fn paginated_transactions(
    &self,
    page: u32,
  ) -> Result<Option<PaginatedResponse<Vec<Transaction>>>> {
    self.record(format!("paginatedTransactions:{}", page))?;
    Ok(self.pages.lock().unwrap().get(&page).cloned())
  }

  async fn transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Option<Vec<Transaction>>> {
    self.record(format!("transactionsByEmployee:{}", employee_id))?;
    Ok(self.by_employee.lock().unwrap().get(employee_id).cloned())
  }

  async fn set_transaction_approval(&self, transaction_id: &str, value: bool) -> Result<()> {
    if let Some(delay) = self.approval_delays.get(&value) {
      tokio::time::sleep(*delay).await;
    }
    self.record(format!("setTransactionApproval:{}:{}", transaction_id, value))?;
    if self.fail_approvals {
      return Err(eyre!("scripted approval failure"));
    }
    self
      .approvals
      .lock()
      .unwrap()
      .insert(transaction_id.to_string(), value);
    Ok(())
  }
}
