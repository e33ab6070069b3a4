//! Kanban board over a sales pipeline.
//!
//! Deals sit in stage columns and are moved by drag and drop, closed as won
//! or lost, and reopened. Moves are shown immediately and written to the
//! remote store afterwards; reloads replace the working copy wholesale and
//! only the most recent one applies. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
mod config;
pub mod domain;
pub mod ports;
pub mod services;

pub use config::{BoardConfig, BoardConfigError};
