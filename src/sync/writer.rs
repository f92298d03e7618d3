//! Ordered persistence of approval edits.

use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::cached_client::CachedBackend;

/// Outcome of one persisted approval edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
  pub transaction_id: String,
  pub approved: bool,
  pub result: Result<(), String>,
}

struct ApprovalWrite {
  transaction_id: String,
  approved: bool,
}

/// Sends approval edits to the backend one at a time, in submission order.
///
/// A single task drains the queue, so the last edit of a transaction is
/// always the last write the backend receives for it.
#[derive(Clone)]
pub struct ApprovalWriter {
  tx: mpsc::UnboundedSender<ApprovalWrite>,
}

impl ApprovalWriter {
  /// Spawn the writer task. `on_result` runs after every write.
  pub fn spawn<F>(backend: CachedBackend, mut on_result: F) -> Self
  where
    F: FnMut(WriteResult) + Send + 'static,
  {
    let (tx, mut rx) = mpsc::unbounded_channel::<ApprovalWrite>();

    tokio::spawn(async move {
      while let Some(write) = rx.recv().await {
        let result = backend
          .set_transaction_approval(&write.transaction_id, write.approved)
          .await
          .map_err(|e| e.to_string());
        on_result(WriteResult {
          transaction_id: write.transaction_id,
          approved: write.approved,
          result,
        });
      }
      debug!("approval writer stopped");
    });

    Self { tx }
  }

  /// Queue a write. Returns `false` if the writer task is gone.
  pub fn submit(&self, transaction_id: &str, approved: bool) -> bool {
    self
      .tx
      .send(ApprovalWrite {
        transaction_id: transaction_id.to_string(),
        approved,
      })
      .is_ok()
  }
}
