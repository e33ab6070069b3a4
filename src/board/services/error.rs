//! Service-level errors for board operations.

use crate::board::{
    domain::{BoardDomainError, DealId, DealStatus, StageId},
    ports::BoardSourceError,
};
use thiserror::Error;

/// A bulk load could not produce a snapshot.
#[derive(Debug, Clone, Error)]
pub enum LoadFailure {
    /// A query failed.
    #[error("board query failed: {0}")]
    Source(#[from] BoardSourceError),
    /// The loaded rows violate a board invariant.
    #[error("loaded rows are inconsistent: {0}")]
    Inconsistent(#[from] BoardDomainError),
}

/// A single remote write was rejected.
#[derive(Debug, Clone, Error)]
#[error("{intent} was rejected: {source}")]
pub struct CommitFailure {
    /// What the write tried to do.
    pub intent: WriteIntent,
    /// Why the store refused it.
    #[source]
    pub source: BoardSourceError,
}

/// A single field update issued by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteIntent {
    /// Move a deal to a stage.
    Stage {
        /// Deal to move.
        deal_id: DealId,
        /// Destination stage.
        stage_id: StageId,
    },
    /// Change a deal's lifecycle status.
    Status {
        /// Deal to update.
        deal_id: DealId,
        /// New status.
        status: DealStatus,
    },
}

impl WriteIntent {
    /// Returns the deal the write targets.
    #[must_use]
    pub const fn deal_id(self) -> DealId {
        match self {
            Self::Stage { deal_id, .. } | Self::Status { deal_id, .. } => deal_id,
        }
    }
}

impl std::fmt::Display for WriteIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stage { deal_id, stage_id } => {
                write!(f, "move of deal {deal_id} to stage {stage_id}")
            }
            Self::Status { deal_id, status } => {
                write!(f, "status change of deal {deal_id} to {status}")
            }
        }
    }
}

/// Errors surfaced by the board service.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// A load or refetch failed.
    #[error(transparent)]
    Load(#[from] LoadFailure),
    /// A lifecycle write was rejected.
    #[error(transparent)]
    Commit(#[from] CommitFailure),
    /// A create operation failed.
    #[error(transparent)]
    Source(#[from] BoardSourceError),
    /// The pipeline already has stages.
    #[error("pipeline already has {0} stages")]
    PipelineAlreadyProvisioned(usize),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;
