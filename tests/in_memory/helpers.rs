//! Shared test helpers for in-memory board integration tests.

use chameleon::board::{
    BoardConfig,
    adapters::memory::InMemoryBoardSource,
    domain::{BoardScope, Deal, DealId, NewDeal, PipelineId, Stage, StageId, UserId},
    services::PipelineBoard,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::{sync::Arc, time::Duration};

/// Board type exercised by the integration tests.
pub type TestBoard = PipelineBoard<InMemoryBoardSource, DefaultClock>;

/// A seeded `New` / `In progress` / `Done` pipeline with an unloaded board.
pub struct Seeded {
    pub source: Arc<InMemoryBoardSource>,
    pub board: Arc<TestBoard>,
    pub scope: BoardScope,
    pub new: StageId,
    pub in_progress: StageId,
    pub done: StageId,
}

impl Seeded {
    /// Stores an active deal in `stage_id` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the source rejects the row.
    pub fn deal(&self, title: &str, stage_id: StageId) -> eyre::Result<DealId> {
        let request = NewDeal::new(title)?.in_stage(stage_id);
        let deal = Deal::new(self.scope.user_id(), request, &DefaultClock);
        let deal_id = deal.id();
        self.source.insert_deal(deal)?;
        Ok(deal_id)
    }

    /// Returns the stage a deal is shown under.
    #[must_use]
    pub fn shown_stage(&self, deal_id: DealId) -> Option<StageId> {
        self.board
            .card(deal_id)
            .and_then(|card| card.deal().stage_id())
    }

    /// Returns the stage stored remotely for a deal.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    pub fn stored_stage(&self, deal_id: DealId) -> eyre::Result<Option<StageId>> {
        Ok(self
            .source
            .deal(deal_id)?
            .and_then(|deal| deal.stage_id()))
    }
}

/// Builds a board over an empty pipeline.
#[must_use]
pub fn empty_pipeline(config: BoardConfig) -> (Arc<InMemoryBoardSource>, Arc<TestBoard>) {
    let source = Arc::new(InMemoryBoardSource::new());
    let scope = BoardScope::new(UserId::new(), PipelineId::new());
    let board = Arc::new(PipelineBoard::new(
        scope,
        Arc::clone(&source),
        Arc::new(DefaultClock),
        config,
    ));
    (source, board)
}

/// Provides a seeded three-stage pipeline.
#[fixture]
pub fn seeded() -> Seeded {
    let source = Arc::new(InMemoryBoardSource::new());
    let scope = BoardScope::new(UserId::new(), PipelineId::new());
    let stages = [
        ("New", "#3b82f6", 0),
        ("In progress", "#f59e0b", 1),
        ("Done", "#22c55e", 2),
    ]
    .map(|(name, color, ordinal)| {
        Stage::from_persisted(StageId::new(), scope.pipeline_id(), name, color, ordinal)
    });
    let [new, in_progress, done] = stages.each_ref().map(Stage::id);
    for stage in stages {
        source.insert_stage(stage).expect("seed stage");
    }
    let board = Arc::new(PipelineBoard::new(
        scope,
        Arc::clone(&source),
        Arc::new(DefaultClock),
        BoardConfig::default(),
    ));
    Seeded {
        source,
        board,
        scope,
        new,
        in_progress,
        done,
    }
}

/// Waits until `condition` holds, yielding to other tasks in between.
///
/// # Errors
///
/// Returns an error if the condition does not hold within five seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> eyre::Result<()> {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .map_err(|_| eyre::eyre!("condition not reached in time"))
}

/// Waits until the source has served at least `count` deal loads.
///
/// # Errors
///
/// Returns an error if the loads do not happen within five seconds.
pub async fn wait_for_deal_loads(source: &InMemoryBoardSource, count: usize) -> eyre::Result<()> {
    eventually(|| source.deal_load_count().is_ok_and(|loads| loads >= count)).await
}
