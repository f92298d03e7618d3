//! Serde-deserializable types matching the backend's JSON responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use chrono::NaiveDate;
use color_eyre::{eyre::eyre, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Employee, PaginatedResponse, Transaction};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmployee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl From<ApiEmployee> for Employee {
  fn from(api: ApiEmployee) -> Self {
    Self {
      id: api.id,
      first_name: api.first_name,
      last_name: api.last_name,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTransaction {
  pub id: String,
  pub amount: Decimal,
  pub employee: ApiEmployee,
  pub merchant: String,
  /// Calendar date, `YYYY-MM-DD`
  pub date: String,
  pub approved: bool,
}

impl ApiTransaction {
  pub fn into_domain(self) -> Result<Transaction> {
    let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
      .map_err(|e| eyre!("Invalid date '{}' on transaction {}: {}", self.date, self.id, e))?;

    Ok(Transaction {
      id: self.id,
      amount: self.amount,
      employee: self.employee.into(),
      merchant: self.merchant,
      date,
      approved: self.approved,
    })
  }
}

/// Convert a list of wire transactions, failing on the first malformed one.
pub fn into_transactions(transactions: Vec<ApiTransaction>) -> Result<Vec<Transaction>> {
  transactions
    .into_iter()
    .map(ApiTransaction::into_domain)
    .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPaginatedTransactions {
  pub data: Vec<ApiTransaction>,
  pub next_page: Option<u32>,
}

impl ApiPaginatedTransactions {
  pub fn into_domain(self) -> Result<PaginatedResponse<Vec<Transaction>>> {
    Ok(PaginatedResponse {
      data: into_transactions(self.data)?,
      next_page: self.next_page,
    })
  }
}

/// Body of `setTransactionApproval`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSetApproval<'a> {
  pub transaction_id: &'a str,
  pub value: bool,
}

/// Data set served by the fixture backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiFixture {
  pub employees: Vec<ApiEmployee>,
  pub transactions: Vec<ApiTransaction>,
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE: &str = r#"{
    "data": [
      {
        "id": "t1",
        "amount": 120,
        "employee": { "id": "e1", "firstName": "James", "lastName": "Smith" },
        "merchant": "Social Media Ads Inc",
        "date": "2022-01-01",
        "approved": false
      }
    ],
    "nextPage": 1
  }"#;

  #[test]
  fn test_parse_paginated_response() {
    let page: ApiPaginatedTransactions = serde_json::from_str(PAGE).unwrap();
    let page = page.into_domain().unwrap();

    assert_eq!(page.next_page, Some(1));
    assert_eq!(page.data.len(), 1);
    let transaction = &page.data[0];
    assert_eq!(transaction.employee.id, "e1");
    assert_eq!(transaction.employee.full_name(), "James Smith");
    assert_eq!(transaction.amount, Decimal::from(120));
    assert_eq!(
      transaction.date,
      NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    );
  }

  #[test]
  fn test_null_next_page() {
    let page: ApiPaginatedTransactions =
      serde_json::from_str(r#"{ "data": [], "nextPage": null }"#).unwrap();
    assert_eq!(page.next_page, None);
  }

  #[test]
  fn test_invalid_date_is_error() {
    let mut page: ApiPaginatedTransactions = serde_json::from_str(PAGE).unwrap();
    page.data[0].date = "01/01/2022".to_string();
    assert!(page.into_domain().is_err());
  }

  #[test]
  fn test_set_approval_body() {
    let body = serde_json::to_value(ApiSetApproval {
      transaction_id: "t1",
      value: true,
    })
    .unwrap();
    assert_eq!(
      body,
      serde_json::json!({ "transactionId": "t1", "value": true })
    );
  }
}
