//! Request cache for backend responses.
//!
//! This module provides a backend-agnostic caching mechanism that:
//! - Memoizes responses by request signature, one entry per signature
//! - Never caches "no data available" responses
//! - Supports invalidation by signature prefix (e.g. every page of a feed)
//! - Optionally serves stale entries when the backend fails

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::MemoryStorage;
pub use traits::{resource_prefix, QueryKey};
