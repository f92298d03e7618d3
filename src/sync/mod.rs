//! Client-side data synchronization: the employee directory, both transaction
//! feeds, the approval overlay, the coordinator that switches between them and
//! the ordered approval writer.

pub mod coordinator;
pub mod directory;
pub mod feed;
pub mod filtered;
pub mod overlay;
pub mod paginated;
pub mod plan;
pub mod writer;

pub use coordinator::{Snapshot, ViewCoordinator, ViewMode};
pub use plan::{FetchPlan, FetchResult};
pub use writer::{ApprovalWriter, WriteResult};
