//! In-memory adapters for tests and local deterministic flows.
//!
//! Both adapters are thread-safe and support fault injection so board
//! reconciliation paths can be exercised without a remote store.

mod realtime;
mod source;

pub use realtime::InMemoryDealInsertFeed;
pub use source::{InMemoryBoardSource, StalledCall};
