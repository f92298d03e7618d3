//! Fetch plans: the backend requests a transition issues, in order.

use futures::stream::{self, Stream, StreamExt};

use crate::backend::cached_client::CachedBackend;
use crate::backend::types::{Employee, PaginatedResponse, Transaction};

use super::feed::{FetchOutcome, Ticket};

/// One backend request issued by a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStep {
  Employees { ticket: Ticket },
  Page { ticket: Ticket, cursor: u32 },
  EmployeeTransactions { ticket: Ticket, employee_id: String },
}

/// The resolved counterpart of a [`FetchStep`], routed back to its feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
  Employees {
    ticket: Ticket,
    outcome: FetchOutcome<Vec<Employee>>,
  },
  Page {
    ticket: Ticket,
    outcome: FetchOutcome<PaginatedResponse<Vec<Transaction>>>,
  },
  EmployeeTransactions {
    ticket: Ticket,
    outcome: FetchOutcome<Vec<Transaction>>,
  },
}

impl FetchStep {
  /// Issue the request and wait for it to resolve.
  pub async fn run(self, backend: &CachedBackend) -> FetchResult {
    match self {
      FetchStep::Employees { ticket } => FetchResult::Employees {
        ticket,
        outcome: backend.employees().await.into(),
      },
      FetchStep::Page { ticket, cursor } => FetchResult::Page {
        ticket,
        outcome: backend.paginated_transactions(cursor).await.into(),
      },
      FetchStep::EmployeeTransactions {
        ticket,
        employee_id,
      } => FetchResult::EmployeeTransactions {
        ticket,
        outcome: backend.transactions_by_employee(&employee_id).await.into(),
      },
    }
  }
}

/// Ordered requests of one transition.
///
/// Steps run strictly one after another: a step is issued only once the
/// previous one has resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPlan {
  steps: Vec<FetchStep>,
}

impl FetchPlan {
  pub fn push(&mut self, step: FetchStep) {
    self.steps.push(step);
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn steps(&self) -> &[FetchStep] {
    &self.steps
  }

  /// Results in step order. A step is only issued once the stream is polled
  /// past the previous result.
  pub fn into_stream(self, backend: &CachedBackend) -> impl Stream<Item = FetchResult> + '_ {
    stream::iter(self.steps).then(move |step| step.run(backend))
  }

  /// Run every step in order, handing each result to `on_result` as soon as
  /// it resolves.
  pub async fn run<F>(self, backend: &CachedBackend, mut on_result: F)
  where
    F: FnMut(FetchResult),
  {
    let results = self.into_stream(backend);
    futures::pin_mut!(results);
    while let Some(result) = results.next().await {
      on_result(result);
    }
  }
}

impl From<Option<FetchStep>> for FetchPlan {
  fn from(step: Option<FetchStep>) -> Self {
    Self {
      steps: step.into_iter().collect(),
    }
  }
}

impl From<FetchStep> for FetchPlan {
  fn from(step: FetchStep) -> Self {
    Self { steps: vec![step] }
  }
}
