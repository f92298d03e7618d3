use std::collections::HashSet;
use tracing::{debug, warn};

use crate::backend::types::{PaginatedResponse, Transaction};

use super::feed::{FetchOutcome, Generation, Ticket};
use super::plan::FetchStep;

/// Pages accumulated so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
  /// Transactions in first-seen order, each id at most once
  pub accumulated: Vec<Transaction>,
  /// Cursor of the next page; `None` once the feed is exhausted
  pub next_cursor: Option<u32>,
}

/// The global transaction feed, loaded page by page.
#[derive(Debug, Default)]
pub struct PaginatedFeed {
  state: Option<PaginationState>,
  loading: bool,
  error: Option<String>,
  generation: Generation,
}

impl PaginatedFeed {
  #[cfg(test)]
  pub fn state(&self) -> Option<&PaginationState> {
    self.state.as_ref()
  }

  pub fn transactions(&self) -> Option<&[Transaction]> {
    self.state.as_ref().map(|s| s.accumulated.as_slice())
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Whether a loaded feed reports further pages.
  pub fn has_more(&self) -> bool {
    self
      .state
      .as_ref()
      .map(|s| s.next_cursor.is_some())
      .unwrap_or(false)
  }

  /// Issue a fetch of the next page.
  ///
  /// Returns `None` (and changes nothing) when the feed is exhausted or a
  /// page is already in flight.
  pub fn load_next_page(&mut self) -> Option<FetchStep> {
    if self.loading {
      debug!("page already loading, ignoring load request");
      return None;
    }

    let cursor = match &self.state {
      None => 0,
      Some(state) => state.next_cursor?,
    };

    self.loading = true;
    Some(FetchStep::Page {
      ticket: self.generation.ticket(),
      cursor,
    })
  }

  /// Apply a resolved page. Returns `false` if the result was stale and dropped.
  pub fn apply(
    &mut self,
    ticket: Ticket,
    outcome: FetchOutcome<PaginatedResponse<Vec<Transaction>>>,
  ) -> bool {
    if !self.generation.is_current(ticket) {
      debug!("dropping stale page result");
      return false;
    }

    self.loading = false;
    match outcome {
      FetchOutcome::Ready(page) => {
        self.error = None;
        let state = self.state.get_or_insert_with(PaginationState::default);

        let mut seen: HashSet<String> = state.accumulated.iter().map(|t| t.id.clone()).collect();
        for transaction in page.data {
          if seen.insert(transaction.id.clone()) {
            state.accumulated.push(transaction);
          } else {
            warn!(id = %transaction.id, "duplicate transaction in later page, keeping first");
          }
        }
        state.next_cursor = page.next_page;
      }
      FetchOutcome::NotAvailable => {
        debug!("page not available, keeping current state");
      }
      FetchOutcome::Failed(message) => {
        warn!(error = %message, "failed to load transactions page");
        self.error = Some(message);
      }
    }
    true
  }

  /// Back to the empty initial state; in-flight pages become stale.
  pub fn invalidate(&mut self) {
    self.state = None;
    self.loading = false;
    self.error = None;
    self.generation.bump();
  }
}
