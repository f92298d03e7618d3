use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{
  into_transactions, ApiEmployee, ApiPaginatedTransactions, ApiSetApproval, ApiTransaction,
};
use super::cache::{EMPLOYEES, PAGINATED_TRANSACTIONS, TRANSACTIONS_BY_EMPLOYEE};
use super::client::Backend;
use super::types::{Employee, PaginatedResponse, Transaction};

const SET_TRANSACTION_APPROVAL: &str = "setTransactionApproval";

/// Backend reached over HTTP/JSON
#[derive(Clone)]
pub struct HttpBackend {
  client: reqwest::Client,
  base: Url,
}

impl HttpBackend {
  pub fn new(url: &str, timeout: Duration) -> Result<Self> {
    let mut base = Url::parse(url).map_err(|e| eyre!("Invalid backend url '{}': {}", url, e))?;

    // Url::join replaces the last path segment unless the base ends with '/'
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base })
  }

  fn endpoint(&self, resource: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = self
      .base
      .join(resource)
      .map_err(|e| eyre!("Failed to build url for {}: {}", resource, e))?;

    if !query.is_empty() {
      url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
  }

  /// GET a JSON resource. 404, 204 and a literal `null` body all mean "no data".
  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
    debug!(%url, "GET");

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    match response.status() {
      StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
      status if !status.is_success() => {
        return Err(eyre!("{} returned {}", url, status));
      }
      _ => {}
    }

    response
      .json::<Option<T>>()
      .await
      .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
  }
}

#[async_trait]
impl Backend for HttpBackend {
  fn label(&self) -> String {
    match (self.base.host_str(), self.base.port()) {
      (Some(host), Some(port)) => format!("{}:{}", host, port),
      (Some(host), None) => host.to_string(),
      _ => self.base.to_string(),
    }
  }

  async fn employees(&self) -> Result<Option<Vec<Employee>>> {
    let url = self.endpoint(EMPLOYEES, &[])?;
    let employees: Option<Vec<ApiEmployee>> = self.get_json(url).await?;
    Ok(employees.map(|list| list.into_iter().map(Employee::from).collect()))
  }

  async fn paginated_transactions(
    &self,
    page: u32,
  ) -> Result<Option<PaginatedResponse<Vec<Transaction>>>> {
    let page = page.to_string();
    let url = self.endpoint(PAGINATED_TRANSACTIONS, &[("page", &page)])?;
    let response: Option<ApiPaginatedTransactions> = self.get_json(url).await?;
    response.map(ApiPaginatedTransactions::into_domain).transpose()
  }

  async fn transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Option<Vec<Transaction>>> {
    let url = self.endpoint(TRANSACTIONS_BY_EMPLOYEE, &[("employeeId", employee_id)])?;
    let transactions: Option<Vec<ApiTransaction>> = self.get_json(url).await?;
    transactions.map(into_transactions).transpose()
  }

  async fn set_transaction_approval(&self, transaction_id: &str, value: bool) -> Result<()> {
    let url = self.endpoint(SET_TRANSACTION_APPROVAL, &[])?;
    debug!(%url, transaction_id, value, "POST");

    let response = self
      .client
      .post(url.clone())
      .json(&ApiSetApproval {
        transaction_id,
        value,
      })
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    if !response.status().is_success() {
      return Err(eyre!(
        "Failed to set approval for transaction {}: {} returned {}",
        transaction_id,
        url,
        response.status()
      ));
    }

    Ok(())
  }
}
