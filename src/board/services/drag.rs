//! Drag-and-drop between stage columns.

use super::{
    BoardNotice, BoardResult, PipelineBoard, WriteIntent, board::BoardState,
};
use crate::board::{
    domain::{
        BoardDomainError, BoardLayout, DealId, DragGesture, DragPhase, DragSession, DropTarget,
        StageId,
    },
    ports::BoardDataSource,
};
use mockable::Clock;
use tracing::{debug, info, instrument, warn};

/// How a drop or a direct stage change ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The store accepted the move.
    Committed {
        /// Moved deal.
        deal_id: DealId,
        /// Stage the deal now belongs to.
        stage_id: StageId,
    },
    /// The deal stayed in its stage; nothing was written.
    Unchanged {
        /// Dropped deal.
        deal_id: DealId,
        /// Stage the deal stayed in.
        stage_id: StageId,
    },
    /// The store rejected the move and the card went back.
    Reverted {
        /// Dropped deal.
        deal_id: DealId,
        /// Stage the drop tried to assign.
        attempted: StageId,
        /// Stage shown after reconciliation.
        restored: Option<StageId>,
        /// Rejection reported by the store.
        reason: String,
    },
}

/// Effect of a normalised gesture on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// A drag began.
    Started(DragSession),
    /// The pointer moved; carries the candidate stage under it, if any.
    Hovering(Option<StageId>),
    /// The drag ended with a drop.
    Dropped(DropOutcome),
    /// The drag was abandoned and the card restored to this stage.
    Cancelled(StageId),
    /// A card was tapped; the renderer should open its details.
    Opened(DealId),
    /// The gesture had no effect.
    Ignored,
}

impl<S, C> PipelineBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    /// Starts dragging a deal from its current stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DragInProgress`] when another drag is
    /// active, [`BoardDomainError::UnknownDeal`] when the deal is not on the
    /// board and [`BoardDomainError::UnassignedDeal`] when it has no column.
    #[instrument(skip(self))]
    pub fn start_drag(&self, deal_id: DealId) -> BoardResult<DragSession> {
        let mut state = self.write_state();
        if let Some(active) = state.drag.session() {
            return Err(BoardDomainError::DragInProgress(active.deal_id()).into());
        }
        let card = state
            .store
            .card(deal_id)
            .ok_or(BoardDomainError::UnknownDeal(deal_id))?;
        let origin = card
            .deal()
            .stage_id()
            .filter(|stage_id| state.store.stages().contains(*stage_id))
            .ok_or(BoardDomainError::UnassignedDeal(deal_id))?;
        let session = DragSession::new(deal_id, origin, self.clock.utc());
        state.drag = DragPhase::Dragging(session.clone());
        debug!(%origin, "drag started");
        Ok(session)
    }

    /// Moves the dragged deal under the stage resolved from `target`.
    ///
    /// Returns the candidate stage, or `None` when the target is not on the
    /// board, in which case nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoActiveDrag`] when nothing is dragged.
    pub fn update_drag_target(&self, target: DropTarget) -> BoardResult<Option<StageId>> {
        let mut state = self.write_state();
        let BoardState { store, drag, .. } = &mut *state;
        let DragPhase::Dragging(session) = drag else {
            return Err(BoardDomainError::NoActiveDrag.into());
        };
        let Some(stage_id) = target.resolve_stage(store) else {
            return Ok(None);
        };
        if store.move_deal(session.deal_id(), stage_id)? {
            debug!(deal_id = %session.deal_id(), %stage_id, "drag retargeted");
        }
        session.retarget(stage_id);
        Ok(Some(stage_id))
    }

    /// Ends the drag and persists the final stage.
    ///
    /// The destination is the stage resolved from `target`, falling back to
    /// the last speculative stage when the drop landed on no target. A drop
    /// onto the origin writes nothing. A rejected write restores the deal's
    /// confirmed stage and reloads.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoActiveDrag`] when nothing is dragged.
    /// Store rejections are reported as [`DropOutcome::Reverted`].
    #[instrument(skip(self))]
    pub async fn commit_drag(&self, target: Option<DropTarget>) -> BoardResult<DropOutcome> {
        let (deal_id, destination, generation) = {
            let mut state = self.write_state();
            let session = state.drag.take().ok_or(BoardDomainError::NoActiveDrag)?;
            let deal_id = session.deal_id();
            let store = &mut state.store;
            let destination = target
                .and_then(|dropped_on| dropped_on.resolve_stage(store))
                .or_else(|| {
                    store
                        .card(deal_id)
                        .and_then(|card| card.deal().stage_id())
                        .filter(|stage_id| store.stages().contains(*stage_id))
                })
                .unwrap_or_else(|| session.candidate());
            store.move_deal(deal_id, destination)?;
            if destination == session.origin() {
                debug!(%deal_id, "dropped on origin; nothing to write");
                return Ok(DropOutcome::Unchanged {
                    deal_id,
                    stage_id: destination,
                });
            }
            state.pending_writes += 1;
            (deal_id, destination, state.generation)
        };

        self.persist_stage(deal_id, destination, generation).await
    }

    /// Moves a deal to another stage without dragging it.
    ///
    /// The card moves at once and the write follows the same path as a drop:
    /// an accepted write confirms the stage, a rejected one restores the
    /// confirmed stage and reloads. Moving a deal to the stage it is shown
    /// under writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownDeal`] or
    /// [`BoardDomainError::UnknownStage`] when either side is not on the
    /// board, and [`BoardDomainError::DragInProgress`] while the deal is
    /// being dragged. Store rejections are reported as
    /// [`DropOutcome::Reverted`].
    #[instrument(skip(self))]
    pub async fn move_deal_to_stage(
        &self,
        deal_id: DealId,
        stage_id: StageId,
    ) -> BoardResult<DropOutcome> {
        let generation = {
            let mut state = self.write_state();
            if state
                .drag
                .session()
                .is_some_and(|session| session.deal_id() == deal_id)
            {
                return Err(BoardDomainError::DragInProgress(deal_id).into());
            }
            if !state.store.move_deal(deal_id, stage_id)? {
                debug!(%deal_id, %stage_id, "deal already in stage; nothing to write");
                return Ok(DropOutcome::Unchanged { deal_id, stage_id });
            }
            state.pending_writes += 1;
            state.generation
        };

        self.persist_stage(deal_id, stage_id, generation).await
    }

    async fn persist_stage(
        &self,
        deal_id: DealId,
        destination: StageId,
        generation: u64,
    ) -> BoardResult<DropOutcome> {
        let result = self
            .synchronizer
            .commit(WriteIntent::Stage {
                deal_id,
                stage_id: destination,
            })
            .await;

        let superseded = {
            let mut state = self.write_state();
            state.pending_writes = state.pending_writes.saturating_sub(1);
            let superseded = state.generation != generation;
            let dragged_again = state
                .drag
                .session()
                .is_some_and(|session| session.deal_id() == deal_id);
            if result.is_ok() && !superseded {
                state.store.confirm_stage(deal_id, destination);
            }
            if result.is_err() && !superseded && !dragged_again {
                if let Err(err) = state.store.revert_to_confirmed(deal_id) {
                    debug!(%deal_id, error = %err, "rejected deal already gone");
                }
            }
            superseded
        };

        match result {
            Ok(()) => {
                info!(%deal_id, stage_id = %destination, "stage change committed");
                if superseded {
                    self.converge_after_superseded_write().await;
                }
                Ok(DropOutcome::Committed {
                    deal_id,
                    stage_id: destination,
                })
            }
            Err(failure) => {
                warn!(%deal_id, error = %failure, "stage change rejected; restoring confirmed stage");
                let reason = failure.source.to_string();
                self.publish(BoardNotice::MoveRejected {
                    deal_id,
                    attempted: destination,
                    reason: reason.clone(),
                    at: self.clock.utc(),
                });
                if let Err(err) = self.refetch().await {
                    warn!(error = %err, "reload after rejected stage change failed");
                }
                let restored = self.card(deal_id).and_then(|card| card.deal().stage_id());
                Ok(DropOutcome::Reverted {
                    deal_id,
                    attempted: destination,
                    restored,
                    reason,
                })
            }
        }
    }

    /// Abandons the drag and puts the deal back in its origin stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoActiveDrag`] when nothing is dragged.
    pub fn cancel_drag(&self) -> BoardResult<StageId> {
        let mut state = self.write_state();
        let session = state.drag.take().ok_or(BoardDomainError::NoActiveDrag)?;
        state.store.move_deal(session.deal_id(), session.origin())?;
        debug!(deal_id = %session.deal_id(), "drag cancelled");
        Ok(session.origin())
    }

    /// Applies a device-independent gesture using the rendered layout.
    ///
    /// Releasing outside the board cancels; releasing inside commits to the
    /// target under the pointer.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the drag operation the gesture maps to.
    pub async fn handle_gesture(
        &self,
        gesture: DragGesture,
        layout: &BoardLayout,
    ) -> BoardResult<GestureOutcome> {
        let dragging = self.read_state().drag.session().is_some();
        match gesture {
            DragGesture::Start { deal_id, .. } => {
                self.start_drag(deal_id).map(GestureOutcome::Started)
            }
            DragGesture::Move { position } if dragging => layout.target_at(position).map_or(
                Ok(GestureOutcome::Hovering(None)),
                |target| self.update_drag_target(target).map(GestureOutcome::Hovering),
            ),
            DragGesture::End { position } if dragging => {
                if layout.contains(position) {
                    self.commit_drag(layout.target_at(position))
                        .await
                        .map(GestureOutcome::Dropped)
                } else {
                    self.cancel_drag().map(GestureOutcome::Cancelled)
                }
            }
            DragGesture::Cancel if dragging => self.cancel_drag().map(GestureOutcome::Cancelled),
            DragGesture::Tap { deal_id } if !dragging && self.card(deal_id).is_some() => {
                Ok(GestureOutcome::Opened(deal_id))
            }
            DragGesture::Move { .. }
            | DragGesture::End { .. }
            | DragGesture::Cancel
            | DragGesture::Tap { .. } => Ok(GestureOutcome::Ignored),
        }
    }
}
