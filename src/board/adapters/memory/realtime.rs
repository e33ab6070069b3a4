//! In-memory deal insert feed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use crate::board::{
    domain::UserId,
    ports::{
        DealInsertEvent, DealInsertFeed, DealInsertSubscription, RealtimeError, RealtimeResult,
    },
};

const CHANNEL_CAPACITY: usize = 32;

/// Broadcasts published inserts to matching subscribers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDealInsertFeed {
    state: Arc<RwLock<FeedState>>,
}

#[derive(Debug, Default)]
struct FeedState {
    next_id: u64,
    subscribers: HashMap<u64, (UserId, mpsc::Sender<DealInsertEvent>)>,
    refuse_subscriptions: bool,
}

fn poisoned(err: impl ToString) -> RealtimeError {
    RealtimeError::Unavailable(err.to_string())
}

impl InMemoryDealInsertFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent subscription attempts fail.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Unavailable`] when lock acquisition fails.
    pub fn refuse_subscriptions(&self, refuse: bool) -> RealtimeResult<()> {
        self.state.write().map_err(poisoned)?.refuse_subscriptions = refuse;
        Ok(())
    }

    /// Delivers an insert to every subscriber of the owning user.
    ///
    /// Returns how many subscribers received the event.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Unavailable`] when lock acquisition fails.
    pub fn publish(&self, event: DealInsertEvent) -> RealtimeResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .subscribers
            .values()
            .filter(|(user_id, _)| *user_id == event.user_id)
            .filter(|(_, sender)| sender.try_send(event).is_ok())
            .count())
    }

    /// Drops every live channel, as a server-side disconnect would.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Unavailable`] when lock acquisition fails.
    pub fn disconnect_all(&self) -> RealtimeResult<()> {
        self.state.write().map_err(poisoned)?.subscribers.clear();
        Ok(())
    }

    /// Returns the number of live subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Unavailable`] when lock acquisition fails.
    pub fn subscriber_count(&self) -> RealtimeResult<usize> {
        Ok(self.state.read().map_err(poisoned)?.subscribers.len())
    }
}

#[async_trait]
impl DealInsertFeed for InMemoryDealInsertFeed {
    async fn subscribe(&self, user_id: UserId) -> RealtimeResult<DealInsertSubscription> {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let id = {
            let mut state = self.state.write().map_err(poisoned)?;
            if state.refuse_subscriptions {
                return Err(RealtimeError::Unavailable(
                    "subscriptions refused".to_owned(),
                ));
            }
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.insert(id, (user_id, sender));
            id
        };

        let state = Arc::clone(&self.state);
        Ok(DealInsertSubscription::new(receiver, move || {
            if let Ok(mut guard) = state.write() {
                guard.subscribers.remove(&id);
            }
        }))
    }
}
