//! Bulk loading of stages, deals and contacts into a snapshot.

use super::LoadFailure;
use crate::board::{
    domain::{BoardScope, BoardSnapshot},
    ports::BoardDataSource,
};
use std::sync::Arc;
use tracing::debug;

/// Loads everything the board renders in one pass.
#[derive(Debug)]
pub struct BoardLoader<S>
where
    S: BoardDataSource,
{
    source: Arc<S>,
    scope: BoardScope,
}

impl<S> BoardLoader<S>
where
    S: BoardDataSource,
{
    /// Creates a loader for one user's pipeline.
    #[must_use]
    pub const fn new(source: Arc<S>, scope: BoardScope) -> Self {
        Self { source, scope }
    }

    /// Runs the three queries concurrently and joins their rows.
    ///
    /// Either every query succeeds and a complete snapshot is returned, or
    /// nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`LoadFailure::Source`] when any query fails and
    /// [`LoadFailure::Inconsistent`] when the stages violate ordinal
    /// uniqueness.
    pub async fn load(&self) -> Result<BoardSnapshot, LoadFailure> {
        let (stages, deals, contacts) = tokio::try_join!(
            self.source.load_stages(self.scope.pipeline_id()),
            self.source.load_deals(self.scope.user_id()),
            self.source.load_contacts(self.scope.user_id()),
        )?;
        debug!(
            stages = stages.len(),
            deals = deals.len(),
            contacts = contacts.len(),
            "board rows loaded"
        );
        Ok(BoardSnapshot::enrich(stages, deals, contacts)?)
    }
}
