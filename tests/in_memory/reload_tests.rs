//! Reload ordering tests against the in-memory source.

use super::helpers::{Seeded, empty_pipeline, seeded, wait_for_deal_loads};
use chameleon::board::{
    BoardConfig,
    domain::{BusinessType, DropTarget},
    ports::{BoardDataSource, BoardSourceError},
    services::{BoardError, BoardNotice, BoardStatus, ReloadOutcome},
};
use eyre::ensure;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_load_shows_ordered_columns(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Patio", seeded.in_progress)?;

    ensure!(seeded.board.status() == BoardStatus::Loading);
    ensure!(seeded.board.refetch().await? == ReloadOutcome::Applied);

    let names: Vec<String> = seeded
        .board
        .stages()
        .iter()
        .map(|stage| stage.name().to_owned())
        .collect();
    ensure!(names == ["New", "In progress", "Done"]);
    ensure!(seeded.board.status() == BoardStatus::Ready);
    let card = seeded
        .board
        .card(deal_id)
        .ok_or_else(|| eyre::eyre!("card missing"))?;
    ensure!(card.stage_color() == Some("#f59e0b"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_reload_is_discarded(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Patio", seeded.new)?;
    let stall = seeded.source.stall_next_deal_load()?;
    let board = Arc::clone(&seeded.board);
    let older = tokio::spawn(async move { board.refetch().await });
    wait_for_deal_loads(&seeded.source, 1).await?;

    seeded.source.update_deal_stage(deal_id, seeded.done).await?;
    ensure!(seeded.board.refetch().await? == ReloadOutcome::Applied);
    stall.release();

    ensure!(older.await?? == ReloadOutcome::Superseded);
    ensure!(
        seeded.shown_stage(deal_id) == Some(seeded.done),
        "the older snapshot must not overwrite the newer one"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_reload_keeps_rows_and_reports(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Patio", seeded.new)?;
    seeded.board.refetch().await?;
    let mut notices = seeded.board.subscribe_notices();
    seeded
        .source
        .fail_next_load(BoardSourceError::Unavailable("network down".to_owned()))?;

    let result = seeded.board.refetch().await;

    ensure!(matches!(result, Err(BoardError::Load(_))));
    ensure!(matches!(seeded.board.status(), BoardStatus::Failed(_)));
    ensure!(seeded.board.card(deal_id).is_some());
    ensure!(matches!(notices.try_recv()?, BoardNotice::LoadFailed { .. }));

    seeded.board.refetch().await?;
    ensure!(seeded.board.status() == BoardStatus::Ready);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_pipeline_can_be_provisioned() -> eyre::Result<()> {
    let (_source, board) = empty_pipeline(BoardConfig::default());

    board.refetch().await?;
    ensure!(board.status() == BoardStatus::NoPipeline);

    let created = board
        .provision_default_stages(BusinessType::from_profile(Some("service")))
        .await?;

    ensure!(created.len() == 4);
    ensure!(board.status() == BoardStatus::Ready);
    ensure!(board.stages().len() == 4);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_deals_appear_in_the_first_column(seeded: Seeded) -> eyre::Result<()> {
    seeded.board.refetch().await?;

    let created = seeded
        .board
        .create_deal(chameleon::board::domain::NewDeal::new("Walk-in enquiry")?.with_value(5_000))
        .await?;

    let column = seeded.board.deals_by_stage(seeded.new);
    ensure!(column.len() == 1);
    ensure!(column.iter().any(|card| card.deal().id() == created.id()));
    let summaries = seeded.board.column_summaries();
    ensure!(summaries.first().is_some_and(|column| column.total_value == 5_000));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_keeps_an_active_drag(seeded: Seeded) -> eyre::Result<()> {
    let dragged = seeded.deal("Patio", seeded.new)?;
    seeded.board.refetch().await?;
    seeded.board.start_drag(dragged)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.done))?;

    let inserted = seeded.deal("Inbound lead", seeded.new)?;
    seeded.board.refetch().await?;

    ensure!(seeded.board.card(inserted).is_some());
    ensure!(seeded.shown_stage(dragged) == Some(seeded.done));
    let session = seeded
        .board
        .active_drag()
        .ok_or_else(|| eyre::eyre!("drag should survive the reload"))?;
    ensure!(session.origin() == seeded.new && session.candidate() == seeded.done);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_without_the_dragged_deal_ends_the_drag(seeded: Seeded) -> eyre::Result<()> {
    let dragged = seeded.deal("Patio", seeded.new)?;
    seeded.board.refetch().await?;
    let mut notices = seeded.board.subscribe_notices();
    seeded.board.start_drag(dragged)?;

    seeded.source.remove_deal(dragged)?;
    seeded.board.refetch().await?;

    ensure!(seeded.board.active_drag().is_none());
    ensure!(matches!(
        notices.try_recv()?,
        BoardNotice::DragAbandoned { deal_id, .. } if deal_id == dragged
    ));
    Ok(())
}
