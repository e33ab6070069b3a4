//! In-memory row store implementing [`BoardDataSource`].

use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::oneshot;

use crate::board::{
    domain::{
        ContactSummary, Deal, DealId, DealStatus, PersistedDealData, PipelineId, Stage,
        StageDraft, StageId, UserId,
    },
    ports::{BoardDataSource, BoardSourceError, BoardSourceResult},
};

/// Releases a stalled call when sent to or dropped.
#[derive(Debug)]
pub struct StalledCall(oneshot::Sender<()>);

impl StalledCall {
    /// Lets the stalled call complete.
    pub fn release(self) {
        // The receiver is gone only when the call was abandoned.
        let _released = self.0.send(());
    }
}

/// Thread-safe in-memory row store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardSource {
    state: Arc<RwLock<InMemorySourceState>>,
}

#[derive(Debug, Default)]
struct InMemorySourceState {
    stages: Vec<Stage>,
    deals: Vec<Deal>,
    contacts: Vec<(UserId, ContactSummary)>,
    stage_updates: Vec<(DealId, StageId)>,
    status_updates: Vec<(DealId, DealStatus)>,
    deal_loads: usize,
    load_failures: VecDeque<BoardSourceError>,
    stage_update_failures: VecDeque<BoardSourceError>,
    status_update_failures: VecDeque<BoardSourceError>,
    stalled_deal_loads: VecDeque<(Vec<Deal>, oneshot::Receiver<()>)>,
    stalled_writes: VecDeque<oneshot::Receiver<()>>,
}

fn poisoned(err: impl ToString) -> BoardSourceError {
    BoardSourceError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryBoardSource {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardSourceResult<RwLockReadGuard<'_, InMemorySourceState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> BoardSourceResult<RwLockWriteGuard<'_, InMemorySourceState>> {
        self.state.write().map_err(poisoned)
    }

    /// Seeds a stage row.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn insert_stage(&self, stage: Stage) -> BoardSourceResult<()> {
        self.write()?.stages.push(stage);
        Ok(())
    }

    /// Seeds a deal row, as an external actor would.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn insert_deal(&self, deal: Deal) -> BoardSourceResult<()> {
        self.write()?.deals.push(deal);
        Ok(())
    }

    /// Deletes a deal row, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn remove_deal(&self, deal_id: DealId) -> BoardSourceResult<Option<Deal>> {
        let mut state = self.write()?;
        let position = state.deals.iter().position(|deal| deal.id() == deal_id);
        Ok(position.map(|index| state.deals.remove(index)))
    }

    /// Seeds a contact owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn insert_contact(&self, user_id: UserId, contact: ContactSummary) -> BoardSourceResult<()> {
        self.write()?.contacts.push((user_id, contact));
        Ok(())
    }

    /// Returns the stored row for a deal.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn deal(&self, deal_id: DealId) -> BoardSourceResult<Option<Deal>> {
        Ok(self.read()?.deals.iter().find(|deal| deal.id() == deal_id).cloned())
    }

    /// Returns every stage write received, in order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn stage_updates(&self) -> BoardSourceResult<Vec<(DealId, StageId)>> {
        Ok(self.read()?.stage_updates.clone())
    }

    /// Returns every status write received, in order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn status_updates(&self) -> BoardSourceResult<Vec<(DealId, DealStatus)>> {
        Ok(self.read()?.status_updates.clone())
    }

    /// Returns how many deal loads have started.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn deal_load_count(&self) -> BoardSourceResult<usize> {
        Ok(self.read()?.deal_loads)
    }

    /// Makes the next load fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_next_load(&self, error: BoardSourceError) -> BoardSourceResult<()> {
        self.write()?.load_failures.push_back(error);
        Ok(())
    }

    /// Makes the next stage write fail with `error` without applying it.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_next_stage_update(&self, error: BoardSourceError) -> BoardSourceResult<()> {
        self.write()?.stage_update_failures.push_back(error);
        Ok(())
    }

    /// Makes the next status write fail with `error` without applying it.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_next_status_update(&self, error: BoardSourceError) -> BoardSourceResult<()> {
        self.write()?.status_update_failures.push_back(error);
        Ok(())
    }

    /// Stalls the next deal load. It returns the rows stored *now*, once
    /// released.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn stall_next_deal_load(&self) -> BoardSourceResult<StalledCall> {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.write()?;
        let rows = state.deals.clone();
        state.stalled_deal_loads.push_back((rows, receiver));
        Ok(StalledCall(sender))
    }

    /// Stalls the next stage or status write until released.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn stall_next_write(&self) -> BoardSourceResult<StalledCall> {
        let (sender, receiver) = oneshot::channel();
        self.write()?.stalled_writes.push_back(receiver);
        Ok(StalledCall(sender))
    }

    fn take_load_failure(&self) -> BoardSourceResult<()> {
        match self.write()?.load_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn wait_if_stalled(&self) -> BoardSourceResult<()> {
        let stalled = { self.write()?.stalled_writes.pop_front() };
        if let Some(receiver) = stalled {
            // A dropped sender releases the call as well.
            let _released = receiver.await;
        }
        Ok(())
    }

    fn with_deal(
        &self,
        deal_id: DealId,
        mutate: impl FnOnce(&mut Deal),
    ) -> BoardSourceResult<()> {
        let mut state = self.write()?;
        let deal = state
            .deals
            .iter_mut()
            .find(|deal| deal.id() == deal_id)
            .ok_or(BoardSourceError::DealNotFound(deal_id))?;
        mutate(deal);
        Ok(())
    }
}

#[async_trait]
impl BoardDataSource for InMemoryBoardSource {
    async fn load_stages(&self, pipeline_id: PipelineId) -> BoardSourceResult<Vec<Stage>> {
        self.take_load_failure()?;
        let mut stages: Vec<Stage> = self
            .read()?
            .stages
            .iter()
            .filter(|stage| stage.pipeline_id() == pipeline_id)
            .cloned()
            .collect();
        stages.sort_by_key(Stage::ordinal);
        Ok(stages)
    }

    async fn load_deals(&self, user_id: UserId) -> BoardSourceResult<Vec<Deal>> {
        let stalled = {
            let mut state = self.write()?;
            state.deal_loads += 1;
            state.stalled_deal_loads.pop_front()
        };
        let rows = if let Some((rows, receiver)) = stalled {
            let _released = receiver.await;
            rows
        } else {
            self.read()?.deals.clone()
        };

        let contacts: Vec<ContactSummary> = self
            .read()?
            .contacts
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, contact)| contact.clone())
            .collect();

        Ok(rows
            .into_iter()
            .filter(|deal| deal.user_id() == user_id)
            .map(|deal| join_contact(deal, &contacts))
            .collect())
    }

    async fn load_contacts(&self, user_id: UserId) -> BoardSourceResult<Vec<ContactSummary>> {
        Ok(self
            .read()?
            .contacts
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, contact)| contact.clone())
            .collect())
    }

    async fn update_deal_stage(
        &self,
        deal_id: DealId,
        stage_id: StageId,
    ) -> BoardSourceResult<()> {
        self.wait_if_stalled().await?;
        let failure = {
            let mut state = self.write()?;
            state.stage_updates.push((deal_id, stage_id));
            state.stage_update_failures.pop_front()
        };
        if let Some(error) = failure {
            return Err(error);
        }
        self.with_deal(deal_id, |deal| {
            deal.assign_stage(Some(stage_id));
            deal.touch(&DefaultClock);
        })
    }

    async fn update_deal_status(
        &self,
        deal_id: DealId,
        status: DealStatus,
    ) -> BoardSourceResult<()> {
        self.wait_if_stalled().await?;
        let failure = {
            let mut state = self.write()?;
            state.status_updates.push((deal_id, status));
            state.status_update_failures.pop_front()
        };
        if let Some(error) = failure {
            return Err(error);
        }
        self.with_deal(deal_id, |deal| {
            deal.assign_status(status);
            deal.touch(&DefaultClock);
        })
    }

    async fn create_deal(&self, deal: &Deal) -> BoardSourceResult<Deal> {
        let mut state = self.write()?;
        if state.deals.iter().any(|existing| existing.id() == deal.id()) {
            return Err(BoardSourceError::Rejected(format!(
                "duplicate deal identifier: {}",
                deal.id()
            )));
        }
        state.deals.push(deal.clone());
        Ok(deal.clone())
    }

    async fn create_stages(
        &self,
        pipeline_id: PipelineId,
        stages: &[StageDraft],
    ) -> BoardSourceResult<Vec<Stage>> {
        let mut state = self.write()?;
        let created: Vec<Stage> = stages
            .iter()
            .map(|draft| {
                Stage::from_persisted(
                    StageId::new(),
                    pipeline_id,
                    draft.name(),
                    draft.color(),
                    draft.ordinal(),
                )
            })
            .collect();
        state.stages.extend(created.iter().cloned());
        Ok(created)
    }
}

/// Attaches contact display fields the way a relational join would.
fn join_contact(deal: Deal, contacts: &[ContactSummary]) -> Deal {
    let joined = deal
        .contact_id()
        .and_then(|id| contacts.iter().find(|contact| contact.id() == id))
        .cloned();
    Deal::from_persisted(PersistedDealData {
        id: deal.id(),
        user_id: deal.user_id(),
        title: deal.title().to_owned(),
        value: deal.value(),
        stage_id: deal.stage_id(),
        status: deal.status(),
        due_date: deal.due_date(),
        contact_id: deal.contact_id(),
        contact: joined,
        created_at: deal.created_at(),
        updated_at: deal.updated_at(),
    })
}
