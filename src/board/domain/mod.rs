//! Domain model for the pipeline board.
//!
//! Stages, deals and the enriched working copy the board renders, plus the
//! pure parts of drag handling: drop-target geometry, drag sessions and
//! input normalisation. Nothing here performs I/O.

mod contact;
mod deal;
mod drag;
mod error;
mod geometry;
mod ids;
mod input;
mod snapshot;
mod stage;
mod status;
mod store;
mod template;

pub use contact::ContactSummary;
pub use deal::{Deal, NewDeal, PersistedDealData};
pub use drag::{DragPhase, DragSession, DropTarget};
pub use error::{BoardDomainError, ParseDealStatusError};
pub use geometry::{BoardLayout, Droppable, Point, Rect, closest_center};
pub use ids::{BoardScope, ContactId, DealId, PipelineId, StageId, UserId};
pub use input::{
    ActivationConstraints, DragGesture, PointerKind, PointerSample, PointerTracker,
};
pub use snapshot::{BoardSnapshot, DealCard};
pub use stage::{Stage, StageDraft, StageRegistry};
pub use status::DealStatus;
pub use store::{ColumnSummary, DealStore};
pub use template::{BusinessType, default_stages};
