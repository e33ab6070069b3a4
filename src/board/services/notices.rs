//! User-facing notices published by the board.

use crate::board::domain::{DealId, DealStatus, StageId};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::trace;

/// Something the renderer should tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardNotice {
    /// A drop was rejected by the store and the card snapped back.
    MoveRejected {
        /// Deal that was dropped.
        deal_id: DealId,
        /// Stage the drop tried to assign.
        attempted: StageId,
        /// Store-provided reason.
        reason: String,
        /// When the rejection was observed.
        at: DateTime<Utc>,
    },
    /// A deal was closed or reopened.
    StatusChanged {
        /// Updated deal.
        deal_id: DealId,
        /// New status.
        status: DealStatus,
        /// When the change was confirmed.
        at: DateTime<Utc>,
    },
    /// A status change was rejected by the store.
    StatusRejected {
        /// Deal that kept its status.
        deal_id: DealId,
        /// Requested status.
        requested: DealStatus,
        /// Store-provided reason.
        reason: String,
        /// When the rejection was observed.
        at: DateTime<Utc>,
    },
    /// A reload removed the deal being dragged.
    DragAbandoned {
        /// Deal that vanished.
        deal_id: DealId,
        /// When the reload applied.
        at: DateTime<Utc>,
    },
    /// A load could not complete.
    LoadFailed {
        /// Failure description.
        reason: String,
        /// When the failure was observed.
        at: DateTime<Utc>,
    },
    /// Live updates stopped; the board is only refreshed on demand.
    RealtimeDegraded {
        /// Failure description.
        reason: String,
        /// When the subscription was lost.
        at: DateTime<Utc>,
    },
}

/// Fan-out of notices to any number of renderers.
#[derive(Debug, Clone)]
pub(crate) struct NoticeBus {
    sender: broadcast::Sender<BoardNotice>,
}

impl NoticeBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<BoardNotice> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&self, notice: BoardNotice) {
        // No receivers is fine; notices are advisory.
        if let Err(err) = self.sender.send(notice) {
            trace!(notice = ?err.0, "notice dropped without subscribers");
        }
    }
}
