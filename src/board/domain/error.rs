//! Error types for board domain validation and parsing.

use super::{DealId, DealStatus, StageId};
use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The deal title is empty after trimming.
    #[error("deal title must not be empty")]
    EmptyDealTitle,

    /// The stage name is empty after trimming.
    #[error("stage name must not be empty")]
    EmptyStageName,

    /// The stage color is not a `#rrggbb` hex value.
    #[error("invalid stage color '{0}', expected #rrggbb")]
    InvalidStageColor(String),

    /// Two stages in the same pipeline share an ordinal.
    #[error("duplicate stage ordinal {0} in pipeline")]
    DuplicateStageOrdinal(u32),

    /// The requested deal is not present on the board.
    #[error("deal {0} is not on the board")]
    UnknownDeal(DealId),

    /// The requested stage is not part of the loaded pipeline.
    #[error("stage {0} is not part of the pipeline")]
    UnknownStage(StageId),

    /// The lifecycle transition is not permitted.
    #[error("invalid status transition for deal {deal_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Deal being transitioned.
        deal_id: DealId,
        /// Current status.
        from: DealStatus,
        /// Requested status.
        to: DealStatus,
    },

    /// A status change for the deal is still awaiting the store's answer.
    #[error("a status change for deal {deal_id} to {pending} is still in flight")]
    StatusChangeInFlight {
        /// Deal being transitioned.
        deal_id: DealId,
        /// Status the in-flight write requested.
        pending: DealStatus,
    },

    /// A drag was started while another drag is in progress.
    #[error("a drag of deal {0} is already in progress")]
    DragInProgress(DealId),

    /// A drag operation was issued with no drag in progress.
    #[error("no drag is in progress")]
    NoActiveDrag,

    /// Deals without a stage are not shown on the board and cannot be dragged.
    #[error("deal {0} has no stage and cannot be dragged")]
    UnassignedDeal(DealId),
}

/// Error returned while parsing a deal status from row data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deal status: {0}")]
pub struct ParseDealStatusError(pub String);
