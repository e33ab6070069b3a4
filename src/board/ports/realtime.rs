//! Realtime port delivering deal insert notifications.

use crate::board::domain::{DealId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Result type for realtime subscription operations.
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// A deal row was inserted remotely.
///
/// The payload is deliberately minimal: the inserting actor may be an
/// untrusted public form, so listeners reload rather than patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealInsertEvent {
    /// Inserted deal.
    pub deal_id: DealId,
    /// Owner of the inserted deal.
    pub user_id: UserId,
}

/// Contract for subscribing to deal inserts.
#[async_trait]
pub trait DealInsertFeed: Send + Sync {
    /// Opens a subscription for inserts owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Unavailable`] when the channel cannot be
    /// opened.
    async fn subscribe(&self, user_id: UserId) -> RealtimeResult<DealInsertSubscription>;
}

/// Live subscription to deal inserts.
///
/// Dropping the subscription unsubscribes.
pub struct DealInsertSubscription {
    events: mpsc::Receiver<DealInsertEvent>,
    on_unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl DealInsertSubscription {
    /// Wraps a channel receiver and the hook that releases the remote channel.
    #[must_use]
    pub fn new(
        events: mpsc::Receiver<DealInsertEvent>,
        on_unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            on_unsubscribe: Some(Box::new(on_unsubscribe)),
        }
    }

    /// Waits for the next insert. Returns `None` once the channel closed.
    pub async fn next_event(&mut self) -> Option<DealInsertEvent> {
        self.events.recv().await
    }

    /// Releases the remote channel.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_unsubscribe.take() {
            hook();
        }
    }
}

impl Drop for DealInsertSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for DealInsertSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DealInsertSubscription")
            .field("active", &self.on_unsubscribe.is_some())
            .finish_non_exhaustive()
    }
}

/// Errors returned by realtime adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RealtimeError {
    /// The realtime channel could not be opened.
    #[error("realtime channel unavailable: {0}")]
    Unavailable(String),
}
