//! The pipeline board facade: working copy, reload ordering and queries.

use super::{
    BoardError, BoardLoader, BoardNotice, BoardResult, NoticeBus, PersistenceSynchronizer,
};
use crate::board::{
    BoardConfig,
    domain::{
        BoardDomainError, BoardScope, BoardSnapshot, BusinessType, ColumnSummary, Deal, DealCard,
        DealId, DealStatus, DealStore, DragPhase, DragSession, NewDeal, PointerTracker, Stage,
        StageId, default_stages,
    },
    ports::BoardDataSource,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// What the board currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoardStatus {
    /// Nothing has been applied yet.
    #[default]
    Loading,
    /// The latest load applied and the pipeline has stages.
    Ready,
    /// The latest load applied but the pipeline has no stages.
    NoPipeline,
    /// The latest load failed. Previously applied rows are kept.
    Failed(String),
}

/// Result of a reload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The snapshot replaced the working copy.
    Applied,
    /// A newer reload started first; this result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
pub(super) struct BoardState {
    pub(super) store: DealStore,
    pub(super) drag: DragPhase,
    /// Bumped whenever a reload starts.
    pub(super) generation: u64,
    pub(super) status: BoardStatus,
    pub(super) pending_writes: usize,
    /// Status writes awaiting an answer, by deal.
    pub(super) pending_status: HashMap<DealId, DealStatus>,
}

impl BoardState {
    /// Installs a snapshot, keeping an active drag alive.
    ///
    /// Returns the dragged deal when the snapshot no longer contains it.
    fn apply(&mut self, snapshot: BoardSnapshot) -> Option<DealId> {
        self.store.replace(snapshot);
        self.status = if self.store.stages().is_empty() {
            BoardStatus::NoPipeline
        } else {
            BoardStatus::Ready
        };

        let Self { store, drag, .. } = self;
        let DragPhase::Dragging(session) = drag else {
            return None;
        };
        let deal_id = session.deal_id();
        let fresh = store
            .card(deal_id)
            .and_then(|card| card.deal().stage_id())
            .filter(|stage_id| store.stages().contains(*stage_id));
        let Some(fresh) = fresh else {
            *drag = DragPhase::Idle;
            return Some(deal_id);
        };
        session.rebase_origin(fresh);
        if store.move_deal(deal_id, session.candidate()).is_err() {
            session.retarget(fresh);
        }
        None
    }
}

/// Kanban view over one user's pipeline.
///
/// The board owns the in-memory working copy. Every mutation runs under a
/// single lock which is never held across an await; reload results only
/// apply when no newer reload started in the meantime.
pub struct PipelineBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    pub(super) scope: BoardScope,
    pub(super) source: Arc<S>,
    pub(super) clock: Arc<C>,
    pub(super) config: BoardConfig,
    pub(super) loader: BoardLoader<S>,
    pub(super) synchronizer: PersistenceSynchronizer<S>,
    pub(super) notices: NoticeBus,
    state: RwLock<BoardState>,
}

impl<S, C> PipelineBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    /// Creates an empty board. Call [`Self::refetch`] or mount it to load.
    #[must_use]
    pub fn new(scope: BoardScope, source: Arc<S>, clock: Arc<C>, config: BoardConfig) -> Self {
        Self {
            scope,
            loader: BoardLoader::new(Arc::clone(&source), scope),
            synchronizer: PersistenceSynchronizer::new(Arc::clone(&source)),
            notices: NoticeBus::new(config.notice_capacity),
            source,
            clock,
            config,
            state: RwLock::new(BoardState::default()),
        }
    }

    pub(super) fn read_state(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn write_state(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn publish(&self, notice: BoardNotice) {
        self.notices.publish(notice);
    }

    /// Returns the user and pipeline this board shows.
    #[must_use]
    pub const fn scope(&self) -> BoardScope {
        self.scope
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns an input tracker using the configured activation thresholds.
    #[must_use]
    pub fn pointer_tracker(&self) -> PointerTracker {
        PointerTracker::new(self.config.activation())
    }

    /// Reloads stages, deals and contacts and replaces the working copy.
    ///
    /// Reloads may overlap; only the most recently started one applies.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Load`] when the latest reload fails. The
    /// previous working copy is kept and the status becomes
    /// [`BoardStatus::Failed`].
    #[instrument(skip(self), fields(user_id = %self.scope.user_id()))]
    pub async fn refetch(&self) -> BoardResult<ReloadOutcome> {
        let generation = {
            let mut state = self.write_state();
            state.generation += 1;
            state.generation
        };
        debug!(generation, "reload started");

        let loaded = self.loader.load().await;

        let mut state = self.write_state();
        if state.generation != generation {
            debug!(generation, latest = state.generation, "stale reload discarded");
            return Ok(ReloadOutcome::Superseded);
        }
        match loaded {
            Ok(snapshot) => {
                let abandoned = state.apply(snapshot);
                let cards = state.store.cards().len();
                drop(state);
                info!(generation, cards, "board reloaded");
                if let Some(deal_id) = abandoned {
                    warn!(%deal_id, "dragged deal disappeared; drag ended");
                    self.publish(BoardNotice::DragAbandoned {
                        deal_id,
                        at: self.clock.utc(),
                    });
                }
                Ok(ReloadOutcome::Applied)
            }
            Err(failure) => {
                state.status = BoardStatus::Failed(failure.to_string());
                drop(state);
                warn!(generation, error = %failure, "board reload failed");
                self.publish(BoardNotice::LoadFailed {
                    reason: failure.to_string(),
                    at: self.clock.utc(),
                });
                Err(failure.into())
            }
        }
    }

    /// Returns the current display status.
    #[must_use]
    pub fn status(&self) -> BoardStatus {
        self.read_state().status.clone()
    }

    /// Returns the pipeline's stages ordered by ordinal.
    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        self.read_state().store.stages().stages().to_vec()
    }

    /// Returns the cards currently shown under a stage.
    #[must_use]
    pub fn deals_by_stage(&self, stage_id: StageId) -> Vec<DealCard> {
        self.read_state()
            .store
            .deals_by_stage(stage_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns a deal's card as currently shown.
    #[must_use]
    pub fn card(&self, deal_id: DealId) -> Option<DealCard> {
        self.read_state().store.card(deal_id).cloned()
    }

    /// Returns per-column headers.
    #[must_use]
    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.read_state().store.column_summaries()
    }

    /// Returns up to `limit` deals with a due date, soonest first.
    #[must_use]
    pub fn upcoming_deals(&self, limit: usize) -> Vec<DealCard> {
        self.read_state()
            .store
            .upcoming(limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns the active drag, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<DragSession> {
        self.read_state().drag.session().cloned()
    }

    /// Returns how many remote writes are awaiting an answer.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.read_state().pending_writes
    }

    /// Subscribes to user-facing notices.
    #[must_use]
    pub fn subscribe_notices(&self) -> broadcast::Receiver<BoardNotice> {
        self.notices.subscribe()
    }

    /// Creates a deal, defaulting to the pipeline's first stage, and reloads.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the requested stage is not on the
    /// board, [`BoardError::Source`] when the store rejects the insert and
    /// [`BoardError::Load`] when the follow-up reload fails.
    #[instrument(skip(self, request), fields(title = request.title()))]
    pub async fn create_deal(&self, request: NewDeal) -> BoardResult<Deal> {
        let target = {
            let state = self.read_state();
            let stages = state.store.stages();
            match request.stage_id() {
                Some(stage_id) if !stages.contains(stage_id) => {
                    return Err(BoardDomainError::UnknownStage(stage_id).into());
                }
                Some(stage_id) => Some(stage_id),
                None => stages.first().map(Stage::id),
            }
        };
        let mut placed = request;
        if let Some(stage_id) = target {
            placed = placed.in_stage(stage_id);
        }
        let deal = Deal::new(self.scope.user_id(), placed, &*self.clock);
        let created = self.source.create_deal(&deal).await?;
        info!(deal_id = %created.id(), "deal created");
        self.refetch().await?;
        Ok(created)
    }

    /// Seeds an empty pipeline with the default stages for a business type.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PipelineAlreadyProvisioned`] when stages exist,
    /// [`BoardError::Source`] when the store rejects the insert and
    /// [`BoardError::Load`] when the follow-up reload fails.
    #[instrument(skip(self), fields(pipeline_id = %self.scope.pipeline_id()))]
    pub async fn provision_default_stages(
        &self,
        business_type: BusinessType,
    ) -> BoardResult<Vec<Stage>> {
        let existing = self.read_state().store.stages().stages().len();
        if existing > 0 {
            return Err(BoardError::PipelineAlreadyProvisioned(existing));
        }
        let drafts = default_stages(business_type);
        let created = self
            .source
            .create_stages(self.scope.pipeline_id(), &drafts)
            .await?;
        info!(stages = created.len(), %business_type, "pipeline provisioned");
        self.refetch().await?;
        Ok(created)
    }

    /// Runs a confirmed-success path that raced a newer reload.
    ///
    /// The newer reload may predate the write, so one more reload converges
    /// the working copy.
    pub(super) async fn converge_after_superseded_write(&self) {
        if !self.config.follow_up_reload {
            return;
        }
        debug!("write outlived its reload generation; reloading");
        if let Err(err) = self.refetch().await {
            warn!(error = %err, "follow-up reload failed");
        }
    }
}

impl<S, C> std::fmt::Debug for PipelineBoard<S, C>
where
    S: BoardDataSource,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBoard")
            .field("scope", &self.scope)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
