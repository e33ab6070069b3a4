//! Chameleon: pipeline board core for a small-business CRM.
//!
//! This crate keeps a kanban view of deals grouped by pipeline stage in sync
//! with a remote store. It handles drag-and-drop moves with immediate
//! feedback, closing and reopening deals, realtime reloads when deals are
//! inserted elsewhere, and ordering between overlapping reloads and writes.
//!
//! # Architecture
//!
//! Chameleon follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the data store and realtime feed
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`board`]: Stages, deals, drag handling and the board service
//! - [`telemetry`]: Tracing subscriber installation

pub mod board;
pub mod telemetry;
