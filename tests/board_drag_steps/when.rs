//! When steps for pipeline board BDD scenarios.

use super::world::{BoardWorld, run_async, wait_until};
use chameleon::board::{
    domain::{Deal, DealStatus, DropTarget, NewDeal},
    ports::DealInsertEvent,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::when;

#[when(r#"the deal "{title}" is dragged over "{stage}""#)]
fn deal_dragged_over(world: &mut BoardWorld, title: String, stage: String) -> Result<(), eyre::Report> {
    let deal_id = world.deal(&title)?;
    let stage_id = world.stage(&stage)?;
    if world.board.active_drag().is_none() {
        world.board.start_drag(deal_id).wrap_err("start drag")?;
    }
    world
        .board
        .update_drag_target(DropTarget::Column(stage_id))
        .wrap_err("retarget drag")?;
    Ok(())
}

#[when(r#"the drag is released over "{stage}""#)]
fn drag_released(world: &mut BoardWorld, stage: String) -> Result<(), eyre::Report> {
    let stage_id = world.stage(&stage)?;
    let outcome = run_async(world.board.commit_drag(Some(DropTarget::Column(stage_id))))
        .wrap_err("commit drag")?;
    world.last_drop = Some(outcome);
    Ok(())
}

#[when(r#"the deal "{title}" is marked "{status}""#)]
fn deal_marked(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let deal_id = world.deal(&title)?;
    let requested = DealStatus::try_from(status.as_str())?;
    world.last_status_change = Some(run_async(world.board.set_deal_status(deal_id, requested)));
    Ok(())
}

#[when(r#"a new deal "{title}" arrives remotely in stage "{stage}""#)]
fn deal_arrives_remotely(
    world: &mut BoardWorld,
    title: String,
    stage: String,
) -> Result<(), eyre::Report> {
    let request = NewDeal::new(title.clone())?.in_stage(world.stage(&stage)?);
    let deal = Deal::new(world.scope.user_id(), request, &DefaultClock);
    let deal_id = deal.id();
    world.source.insert_deal(deal).wrap_err("insert remote deal")?;
    world.deals.insert(title, deal_id);
    world.feed.publish(DealInsertEvent {
        deal_id,
        user_id: world.scope.user_id(),
    })?;
    let board = &world.board;
    wait_until(|| board.card(deal_id).is_some()).wrap_err("wait for realtime reload")
}
