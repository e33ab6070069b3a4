//! Closing deals as won or lost and reopening them.

use super::{BoardNotice, BoardResult, PipelineBoard, WriteIntent};
use crate::board::{
    domain::{BoardDomainError, Deal, DealId, DealStatus},
    ports::BoardDataSource,
};
use mockable::Clock;
use tracing::{info, instrument, warn};

impl<S, C> PipelineBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    /// Moves a deal between `active` and `won`/`lost`.
    ///
    /// The status is written first and only applied to the board once the
    /// store accepts it. The deal keeps its stage either way.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownDeal`] for deals not on the board,
    /// [`BoardDomainError::InvalidStatusTransition`] for anything other than
    /// closing an active deal or reopening a closed one,
    /// [`BoardDomainError::StatusChangeInFlight`] while an earlier status
    /// write for the same deal is unanswered, and
    /// [`super::BoardError::Commit`] when the store rejects the write. The
    /// board is unchanged on error.
    #[instrument(skip(self))]
    pub async fn set_deal_status(&self, deal_id: DealId, status: DealStatus) -> BoardResult<Deal> {
        let generation = {
            let mut state = self.write_state();
            if let Some(&pending) = state.pending_status.get(&deal_id) {
                return Err(BoardDomainError::StatusChangeInFlight { deal_id, pending }.into());
            }
            let current = state
                .store
                .card(deal_id)
                .ok_or(BoardDomainError::UnknownDeal(deal_id))?
                .deal()
                .status();
            if !current.can_transition_to(status) {
                return Err(BoardDomainError::InvalidStatusTransition {
                    deal_id,
                    from: current,
                    to: status,
                }
                .into());
            }
            state.pending_writes += 1;
            state.pending_status.insert(deal_id, status);
            state.generation
        };

        let result = self
            .synchronizer
            .commit(WriteIntent::Status { deal_id, status })
            .await;

        let superseded = {
            let mut state = self.write_state();
            state.pending_writes = state.pending_writes.saturating_sub(1);
            state.pending_status.remove(&deal_id);
            let superseded = state.generation != generation;
            if result.is_ok() && !superseded {
                state.store.set_status(deal_id, status)?;
            }
            superseded
        };

        if let Err(failure) = result {
            self.publish(BoardNotice::StatusRejected {
                deal_id,
                requested: status,
                reason: failure.source.to_string(),
                at: self.clock.utc(),
            });
            return Err(failure.into());
        }

        info!(%deal_id, %status, "deal status changed");
        if superseded {
            self.converge_after_superseded_write().await;
        }
        self.publish(BoardNotice::StatusChanged {
            deal_id,
            status,
            at: self.clock.utc(),
        });
        self.card(deal_id)
            .map(|card| card.deal().clone())
            .ok_or_else(|| {
                warn!(%deal_id, "deal left the board after its status changed");
                BoardDomainError::UnknownDeal(deal_id).into()
            })
    }
}
