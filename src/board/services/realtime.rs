//! Mounting a board with live insert notifications.

use super::{BoardNotice, PipelineBoard};
use crate::board::{
    ports::{BoardDataSource, DealInsertFeed, DealInsertSubscription},
};
use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Background task reloading the board on every insert for its user.
#[derive(Debug)]
pub struct RealtimeListener {
    task: Option<JoinHandle<()>>,
}

impl RealtimeListener {
    /// Spawns the listener on the current runtime.
    #[must_use]
    pub fn spawn<S, C>(
        board: Arc<PipelineBoard<S, C>>,
        mut subscription: DealInsertSubscription,
    ) -> Self
    where
        S: BoardDataSource + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let user_id = board.scope().user_id();
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.next_event().await {
                if event.user_id != user_id {
                    debug!(deal_id = %event.deal_id, "ignoring insert for another user");
                    continue;
                }
                debug!(deal_id = %event.deal_id, "deal inserted remotely; reloading");
                if let Err(err) = board.refetch().await {
                    warn!(error = %err, "reload after remote insert failed");
                }
            }
            warn!("realtime channel closed; live updates stopped");
            board.publish(BoardNotice::RealtimeDegraded {
                reason: "subscription closed".to_owned(),
                at: board.clock.utc(),
            });
        });
        Self { task: Some(task) }
    }

    /// Returns `true` while the listener task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the task and waits until its subscription is released.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Some(err) = task.await.err().filter(|err| !err.is_cancelled()) {
                warn!(error = %err, "realtime listener ended abnormally");
            }
        }
    }
}

impl Drop for RealtimeListener {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// A loaded board with its realtime listener attached.
#[derive(Debug)]
pub struct MountedBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    board: Arc<PipelineBoard<S, C>>,
    listener: Option<RealtimeListener>,
}

impl<S, C> MountedBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    /// Returns the mounted board.
    #[must_use]
    pub const fn board(&self) -> &Arc<PipelineBoard<S, C>> {
        &self.board
    }

    /// Returns `true` when inserts still trigger reloads.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.listener.as_ref().is_some_and(RealtimeListener::is_running)
    }

    /// Stops live updates. Writes already in flight still complete.
    pub async fn unmount(self) {
        if let Some(listener) = self.listener {
            listener.shutdown().await;
        }
        debug!(user_id = %self.board.scope().user_id(), "board unmounted");
    }
}

impl<S, C> PipelineBoard<S, C>
where
    S: BoardDataSource + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Loads the board and starts listening for inserted deals.
    ///
    /// A failed initial load leaves the board in [`super::BoardStatus::Failed`]
    /// and can be retried with [`Self::refetch`]. A failed subscription
    /// leaves the board working without live updates.
    pub async fn mount<F>(self: Arc<Self>, feed: &F) -> MountedBoard<S, C>
    where
        F: DealInsertFeed + ?Sized,
    {
        if let Err(err) = self.refetch().await {
            warn!(error = %err, "initial board load failed");
        }
        let listener = match feed.subscribe(self.scope().user_id()).await {
            Ok(subscription) => Some(RealtimeListener::spawn(Arc::clone(&self), subscription)),
            Err(err) => {
                warn!(error = %err, "realtime subscription failed; continuing without live updates");
                self.publish(BoardNotice::RealtimeDegraded {
                    reason: err.to_string(),
                    at: self.clock.utc(),
                });
                None
            }
        };
        info!(live = listener.is_some(), "board mounted");
        MountedBoard {
            board: self,
            listener,
        }
    }
}
