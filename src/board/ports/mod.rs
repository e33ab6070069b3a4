//! Port contracts for the pipeline board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod realtime;
pub mod source;

pub use realtime::{
    DealInsertEvent, DealInsertFeed, DealInsertSubscription, RealtimeError, RealtimeResult,
};
pub use source::{BoardDataSource, BoardSourceError, BoardSourceResult};
