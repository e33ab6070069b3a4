//! Drag session state and drop-target resolution.

use super::{DealId, DealStore, StageId};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Something a dragged card can be dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A stage column.
    Column(StageId),
    /// Another card; the drop lands in that card's stage.
    Card(DealId),
}

impl DropTarget {
    pub(super) fn tie_break_key(self) -> (u8, Uuid) {
        match self {
            Self::Card(deal_id) => (0, deal_id.into_inner()),
            Self::Column(stage_id) => (1, stage_id.into_inner()),
        }
    }

    /// Resolves the stage a drop here would assign.
    ///
    /// A column resolves to itself; a card resolves to its current
    /// in-memory stage. Targets outside the loaded pipeline resolve to
    /// `None`.
    #[must_use]
    pub fn resolve_stage(self, store: &DealStore) -> Option<StageId> {
        let stage_id = match self {
            Self::Column(stage_id) => Some(stage_id),
            Self::Card(deal_id) => store.card(deal_id).and_then(|card| card.deal().stage_id()),
        }?;
        store.stages().contains(stage_id).then_some(stage_id)
    }
}

/// A drag in progress.
///
/// The origin is where the card returns on cancellation; the candidate is
/// the stage the card is currently shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    deal_id: DealId,
    origin: StageId,
    candidate: StageId,
    started_at: DateTime<Utc>,
}

impl DragSession {
    /// Starts a session for a deal sitting in `origin`.
    #[must_use]
    pub const fn new(deal_id: DealId, origin: StageId, started_at: DateTime<Utc>) -> Self {
        Self {
            deal_id,
            origin,
            candidate: origin,
            started_at,
        }
    }

    /// Returns the dragged deal.
    #[must_use]
    pub const fn deal_id(&self) -> DealId {
        self.deal_id
    }

    /// Returns the stage the deal was picked up from.
    #[must_use]
    pub const fn origin(&self) -> StageId {
        self.origin
    }

    /// Returns the latest candidate stage.
    #[must_use]
    pub const fn candidate(&self) -> StageId {
        self.candidate
    }

    /// Returns when the drag activated.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Records a new candidate stage.
    pub const fn retarget(&mut self, stage_id: StageId) {
        self.candidate = stage_id;
    }

    /// Moves the origin after a reload showed the deal elsewhere.
    pub const fn rebase_origin(&mut self, stage_id: StageId) {
        self.origin = stage_id;
    }
}

/// Board-wide drag state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No card is being dragged.
    #[default]
    Idle,
    /// A card is being dragged.
    Dragging(DragSession),
}

impl DragPhase {
    /// Returns the active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    /// Ends the active session and returns it.
    pub fn take(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }
}
