//! Pieces shared by every feed: generation tickets and fetch outcomes.

use color_eyre::Result;

/// Stamp captured when a fetch is issued.
///
/// A feed only applies a result whose ticket matches its current generation,
/// so results issued before an invalidation are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
  generation: u64,
}

/// Per-feed generation counter, bumped on every invalidation.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
  pub fn ticket(&self) -> Ticket {
    Ticket { generation: self.0 }
  }

  pub fn bump(&mut self) {
    self.0 += 1;
  }

  pub fn is_current(&self, ticket: Ticket) -> bool {
    ticket.generation == self.0
  }
}

/// Outcome of a single backend fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
  /// The backend returned data
  Ready(T),
  /// The backend has nothing for this request right now; a benign no-op
  NotAvailable,
  /// The backend failed; surfaced to the user as a recoverable error
  Failed(String),
}

impl<T> From<Result<Option<T>>> for FetchOutcome<T> {
  fn from(result: Result<Option<T>>) -> Self {
    match result {
      Ok(Some(data)) => FetchOutcome::Ready(data),
      Ok(None) => FetchOutcome::NotAvailable,
      Err(e) => FetchOutcome::Failed(e.to_string()),
    }
  }
}
