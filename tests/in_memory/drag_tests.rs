//! Drag-and-drop tests against the in-memory source.

use super::helpers::{Seeded, seeded};
use chameleon::board::{
    domain::{BoardDomainError, BoardLayout, DragGesture, DropTarget, Point, Rect},
    ports::BoardSourceError,
    services::{BoardError, BoardNotice, DropOutcome, GestureOutcome},
};
use eyre::{bail, ensure};
use rstest::rstest;
use std::sync::Arc;

/// Three 100px columns side by side inside a 300x400 board.
fn layout(seeded: &Seeded) -> BoardLayout {
    BoardLayout::new(Rect::new(0, 0, 300, 400))
        .with_column(seeded.new, Rect::new(0, 0, 100, 400))
        .with_column(seeded.in_progress, Rect::new(100, 0, 100, 400))
        .with_column(seeded.done, Rect::new(200, 0, 100, 400))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hovering_moves_the_card_before_anything_is_written(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;

    seeded.board.start_drag(deal_id)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.in_progress))?;

    ensure!(seeded.shown_stage(deal_id) == Some(seeded.in_progress));
    ensure!(seeded.stored_stage(deal_id)? == Some(seeded.new));
    ensure!(seeded.source.stage_updates()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_drop_is_persisted(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;

    seeded.board.start_drag(deal_id)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.in_progress))?;
    let outcome = seeded
        .board
        .commit_drag(Some(DropTarget::Column(seeded.in_progress)))
        .await?;

    ensure!(matches!(outcome, DropOutcome::Committed { .. }));
    ensure!(seeded.source.stage_updates()? == vec![(deal_id, seeded.in_progress)]);
    ensure!(seeded.stored_stage(deal_id)? == Some(seeded.in_progress));
    ensure!(seeded.board.deals_by_stage(seeded.new).is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_drop_snaps_back_and_notifies(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    let mut notices = seeded.board.subscribe_notices();
    seeded
        .source
        .fail_next_stage_update(BoardSourceError::Rejected("permission denied".to_owned()))?;

    seeded.board.start_drag(deal_id)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.in_progress))?;
    let outcome = seeded
        .board
        .commit_drag(Some(DropTarget::Column(seeded.in_progress)))
        .await?;

    let DropOutcome::Reverted {
        attempted,
        restored,
        ..
    } = outcome
    else {
        bail!("expected a reverted drop, got {outcome:?}");
    };
    ensure!(attempted == seeded.in_progress);
    ensure!(restored == Some(seeded.new));
    ensure!(seeded.shown_stage(deal_id) == Some(seeded.new));
    ensure!(seeded.board.active_drag().is_none());
    let notice = notices.try_recv()?;
    ensure!(
        matches!(notice, BoardNotice::MoveRejected { deal_id: id, ref reason, .. }
            if id == deal_id && reason.contains("permission denied")),
        "unexpected notice {notice:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn write_outliving_a_reload_converges(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    let stall = seeded.source.stall_next_write()?;

    seeded.board.start_drag(deal_id)?;
    let board = Arc::clone(&seeded.board);
    let done = seeded.done;
    let commit =
        tokio::spawn(async move { board.commit_drag(Some(DropTarget::Column(done))).await });
    super::helpers::eventually(|| seeded.board.pending_writes() == 1).await?;

    seeded.board.refetch().await?;
    ensure!(
        seeded.shown_stage(deal_id) == Some(seeded.new),
        "a reload predating the write shows the stored stage"
    );
    let loads_before = seeded.source.deal_load_count()?;
    stall.release();

    let outcome = commit.await??;
    ensure!(matches!(outcome, DropOutcome::Committed { .. }));
    ensure!(seeded.source.deal_load_count()? == loads_before + 1);
    ensure!(seeded.shown_stage(deal_id) == Some(seeded.done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gestures_drive_a_full_drag(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    let layout = layout(&seeded);

    let started = seeded
        .board
        .handle_gesture(
            DragGesture::Start {
                deal_id,
                position: Point::new(50, 40),
            },
            &layout,
        )
        .await?;
    ensure!(matches!(started, GestureOutcome::Started(_)));

    let hovering = seeded
        .board
        .handle_gesture(
            DragGesture::Move {
                position: Point::new(250, 200),
            },
            &layout,
        )
        .await?;
    ensure!(hovering == GestureOutcome::Hovering(Some(seeded.done)));

    let dropped = seeded
        .board
        .handle_gesture(
            DragGesture::End {
                position: Point::new(250, 200),
            },
            &layout,
        )
        .await?;
    ensure!(matches!(
        dropped,
        GestureOutcome::Dropped(DropOutcome::Committed { stage_id, .. }) if stage_id == seeded.done
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn releasing_outside_the_board_cancels(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    let layout = layout(&seeded);

    seeded.board.start_drag(deal_id)?;
    seeded
        .board
        .update_drag_target(DropTarget::Column(seeded.done))?;
    let outcome = seeded
        .board
        .handle_gesture(
            DragGesture::End {
                position: Point::new(500, 500),
            },
            &layout,
        )
        .await?;

    ensure!(outcome == GestureOutcome::Cancelled(seeded.new));
    ensure!(seeded.shown_stage(deal_id) == Some(seeded.new));
    ensure!(seeded.source.stage_updates()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn taps_open_cards_without_dragging(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;

    let outcome = seeded
        .board
        .handle_gesture(DragGesture::Tap { deal_id }, &layout(&seeded))
        .await?;

    ensure!(outcome == GestureOutcome::Opened(deal_id));
    ensure!(seeded.board.active_drag().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stage_picked_outside_a_drag_is_persisted(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;

    let outcome = seeded
        .board
        .move_deal_to_stage(deal_id, seeded.done)
        .await?;

    ensure!(
        outcome
            == DropOutcome::Committed {
                deal_id,
                stage_id: seeded.done
            }
    );
    ensure!(seeded.source.stage_updates()? == vec![(deal_id, seeded.done)]);
    ensure!(seeded.shown_stage(deal_id) == Some(seeded.done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stage_picked_outside_a_drag_snaps_back_when_rejected(
    seeded: Seeded,
) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    let mut notices = seeded.board.subscribe_notices();
    seeded
        .source
        .fail_next_stage_update(BoardSourceError::Rejected("permission denied".to_owned()))?;

    let outcome = seeded
        .board
        .move_deal_to_stage(deal_id, seeded.in_progress)
        .await?;

    ensure!(
        matches!(outcome, DropOutcome::Reverted { restored, .. } if restored == Some(seeded.new)),
        "unexpected outcome {outcome:?}"
    );
    ensure!(seeded.shown_stage(deal_id) == Some(seeded.new));
    ensure!(seeded.board.pending_writes() == 0);
    ensure!(matches!(
        notices.try_recv()?,
        BoardNotice::MoveRejected { .. }
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn picking_the_current_stage_writes_nothing(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.in_progress)?;
    seeded.board.refetch().await?;

    let outcome = seeded
        .board
        .move_deal_to_stage(deal_id, seeded.in_progress)
        .await?;

    ensure!(matches!(outcome, DropOutcome::Unchanged { .. }));
    ensure!(seeded.source.stage_updates()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dragged_deals_cannot_be_moved_directly(seeded: Seeded) -> eyre::Result<()> {
    let deal_id = seeded.deal("Roof repair", seeded.new)?;
    seeded.board.refetch().await?;
    seeded.board.start_drag(deal_id)?;

    let result = seeded
        .board
        .move_deal_to_stage(deal_id, seeded.done)
        .await;

    ensure!(matches!(
        result,
        Err(BoardError::Domain(BoardDomainError::DragInProgress(_)))
    ));
    ensure!(seeded.source.stage_updates()?.is_empty());
    ensure!(seeded.board.active_drag().is_some());
    Ok(())
}
