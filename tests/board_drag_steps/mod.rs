//! Step definitions for pipeline board drag scenarios.

pub mod when;
