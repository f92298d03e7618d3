//! Local approval edits layered over whichever feed is active.

use std::collections::HashMap;

use crate::backend::types::Transaction;

/// Approval values chosen locally, keyed by transaction id.
///
/// Entries are only ever inserted or overwritten; they outlive mode switches
/// and refetches.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  entries: HashMap<String, bool>,
}

impl Overrides {
  pub fn record(&mut self, transaction_id: &str, approved: bool) {
    self.entries.insert(transaction_id.to_string(), approved);
  }

  pub fn get(&self, transaction_id: &str) -> Option<bool> {
    self.entries.get(transaction_id).copied()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

/// The list to render: the active feed, in order, with overrides applied.
pub fn merge(active: Option<&[Transaction]>, overrides: &Overrides) -> Vec<Transaction> {
  active
    .unwrap_or(&[])
    .iter()
    .map(|transaction| Transaction {
      approved: overrides
        .get(&transaction.id)
        .unwrap_or(transaction.approved),
      ..transaction.clone()
    })
    .collect()
}
