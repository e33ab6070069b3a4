//! Adapter implementations for the board ports.

pub mod memory;
