//! Realtime listener tests against the in-memory feed.

use super::helpers::{Seeded, eventually, seeded, wait_for_deal_loads};
use chameleon::board::{
    adapters::memory::InMemoryDealInsertFeed,
    domain::{DropTarget, UserId},
    ports::DealInsertEvent,
    services::{BoardNotice, BoardStatus},
};
use eyre::ensure;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn feed() -> InMemoryDealInsertFeed {
    InMemoryDealInsertFeed::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mount_loads_and_reloads_on_insert(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    let mounted = Arc::clone(&seeded.board).mount(&feed).await;
    ensure!(mounted.is_live());
    ensure!(seeded.board.status() == BoardStatus::Ready);

    let inserted = seeded.deal("Web form lead", seeded.new)?;
    let delivered = feed.publish(DealInsertEvent {
        deal_id: inserted,
        user_id: seeded.scope.user_id(),
    })?;
    ensure!(delivered == 1);

    eventually(|| seeded.board.card(inserted).is_some()).await?;
    mounted.unmount().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inserts_for_other_users_are_not_delivered(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    let mounted = Arc::clone(&seeded.board).mount(&feed).await;
    let loads = seeded.source.deal_load_count()?;

    let delivered = feed.publish(DealInsertEvent {
        deal_id: chameleon::board::domain::DealId::new(),
        user_id: UserId::new(),
    })?;

    ensure!(delivered == 0);
    ensure!(seeded.source.deal_load_count()? == loads);
    mounted.unmount().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_subscription_degrades_quietly(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    feed.refuse_subscriptions(true)?;
    let mut notices = seeded.board.subscribe_notices();

    let mounted = Arc::clone(&seeded.board).mount(&feed).await;

    ensure!(!mounted.is_live());
    ensure!(seeded.board.status() == BoardStatus::Ready);
    ensure!(matches!(
        notices.try_recv()?,
        BoardNotice::RealtimeDegraded { .. }
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unmount_releases_the_subscription(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    let mounted = Arc::clone(&seeded.board).mount(&feed).await;
    ensure!(feed.subscriber_count()? == 1);

    mounted.unmount().await;

    ensure!(feed.subscriber_count()? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_disconnect_stops_live_updates(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    let mut notices = seeded.board.subscribe_notices();
    let mounted = Arc::clone(&seeded.board).mount(&feed).await;

    feed.disconnect_all()?;

    eventually(|| !mounted.is_live()).await?;
    ensure!(matches!(
        notices.try_recv()?,
        BoardNotice::RealtimeDegraded { .. }
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_during_drag_keeps_the_drag(
    seeded: Seeded,
    feed: InMemoryDealInsertFeed,
) -> eyre::Result<()> {
    let dragged = seeded.deal("Patio", seeded.new)?;
    let mounted = Arc::clone(&seeded.board).mount(&feed).await;
    let loads = seeded.source.deal_load_count()?;
    seeded.board.start_drag(dragged)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.in_progress))?;

    let inserted = seeded.deal("Web form lead", seeded.new)?;
    feed.publish(DealInsertEvent {
        deal_id: inserted,
        user_id: seeded.scope.user_id(),
    })?;
    wait_for_deal_loads(&seeded.source, loads + 1).await?;
    eventually(|| seeded.board.card(inserted).is_some()).await?;

    ensure!(seeded.shown_stage(dragged) == Some(seeded.in_progress));
    let outcome = seeded
        .board
        .commit_drag(Some(DropTarget::Column(seeded.in_progress)))
        .await?;
    ensure!(matches!(
        outcome,
        chameleon::board::services::DropOutcome::Committed { .. }
    ));
    ensure!(seeded.stored_stage(dragged)? == Some(seeded.in_progress));
    mounted.unmount().await;
    Ok(())
}
