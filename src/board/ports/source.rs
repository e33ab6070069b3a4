//! Data-access port for the rows the board reads and writes.

use crate::board::domain::{
    ContactSummary, Deal, DealId, DealStatus, PipelineId, Stage, StageDraft, StageId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for data-access operations.
pub type BoardSourceResult<T> = Result<T, BoardSourceError>;

/// Row-store contract consumed by the board.
///
/// Every write method performs exactly one remote write and never retries.
#[async_trait]
pub trait BoardDataSource: Send + Sync {
    /// Loads the stages of a pipeline ordered by ordinal.
    async fn load_stages(&self, pipeline_id: PipelineId) -> BoardSourceResult<Vec<Stage>>;

    /// Loads a user's deals with linked contact display fields joined.
    async fn load_deals(&self, user_id: UserId) -> BoardSourceResult<Vec<Deal>>;

    /// Loads the contact name index for a user.
    async fn load_contacts(&self, user_id: UserId) -> BoardSourceResult<Vec<ContactSummary>>;

    /// Moves a deal to a stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSourceError::DealNotFound`] when the deal does not
    /// exist or [`BoardSourceError::Rejected`] when the store refuses the
    /// write.
    async fn update_deal_stage(&self, deal_id: DealId, stage_id: StageId)
    -> BoardSourceResult<()>;

    /// Sets a deal's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSourceError::DealNotFound`] when the deal does not
    /// exist or [`BoardSourceError::Rejected`] when the store refuses the
    /// write.
    async fn update_deal_status(&self, deal_id: DealId, status: DealStatus)
    -> BoardSourceResult<()>;

    /// Inserts a deal and returns the stored row.
    async fn create_deal(&self, deal: &Deal) -> BoardSourceResult<Deal>;

    /// Inserts stages into a pipeline and returns the stored rows.
    async fn create_stages(
        &self,
        pipeline_id: PipelineId,
        stages: &[StageDraft],
    ) -> BoardSourceResult<Vec<Stage>>;
}

/// Errors returned by data-access implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardSourceError {
    /// The deal does not exist remotely.
    #[error("deal not found: {0}")]
    DealNotFound(DealId),

    /// The store refused the write (constraint or policy violation).
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardSourceError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
