//! Application services driving the pipeline board.
//!
//! [`PipelineBoard`] owns the working copy and exposes the drag, lifecycle
//! and reload operations; [`MountedBoard`] ties it to a realtime feed.

mod board;
mod drag;
mod error;
mod lifecycle;
mod loader;
mod notices;
mod realtime;
mod synchronizer;

pub use board::{BoardStatus, PipelineBoard, ReloadOutcome};
pub use drag::{DropOutcome, GestureOutcome};
pub use error::{BoardError, BoardResult, CommitFailure, LoadFailure, WriteIntent};
pub use loader::BoardLoader;
pub use notices::BoardNotice;
pub(crate) use notices::NoticeBus;
pub use realtime::{MountedBoard, RealtimeListener};
pub use synchronizer::PersistenceSynchronizer;
