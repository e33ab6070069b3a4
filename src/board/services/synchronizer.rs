//! Boundary turning board intents into single remote writes.

use super::{CommitFailure, WriteIntent};
use crate::board::ports::BoardDataSource;
use std::sync::Arc;
use tracing::{info, warn};

/// Issues exactly one remote write per intent and reports the result.
///
/// No retries are attempted; callers reconcile failures.
#[derive(Debug)]
pub struct PersistenceSynchronizer<S>
where
    S: BoardDataSource,
{
    source: Arc<S>,
}

impl<S> PersistenceSynchronizer<S>
where
    S: BoardDataSource,
{
    /// Creates a synchronizer writing through `source`.
    #[must_use]
    pub const fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Performs the write and waits for the store's answer.
    ///
    /// # Errors
    ///
    /// Returns [`CommitFailure`] carrying the intent when the store rejects
    /// the write.
    pub async fn commit(&self, intent: WriteIntent) -> Result<(), CommitFailure> {
        let result = match intent {
            WriteIntent::Stage { deal_id, stage_id } => {
                self.source.update_deal_stage(deal_id, stage_id).await
            }
            WriteIntent::Status { deal_id, status } => {
                self.source.update_deal_status(deal_id, status).await
            }
        };
        match result {
            Ok(()) => {
                info!(%intent, "write committed");
                Ok(())
            }
            Err(source) => {
                warn!(%intent, error = %source, "write rejected");
                Err(CommitFailure { intent, source })
            }
        }
    }
}
