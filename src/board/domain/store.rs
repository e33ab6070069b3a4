//! The in-memory working copy of the board.

use super::{
    BoardDomainError, BoardSnapshot, DealCard, DealId, DealStatus, StageId, StageRegistry,
};
use std::collections::HashMap;

/// Per-column totals shown in column headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    /// Stage identifier.
    pub stage_id: StageId,
    /// Stage display name.
    pub name: String,
    /// Stage color.
    pub color: String,
    /// Number of deals in the column.
    pub deal_count: usize,
    /// Sum of deal values in minor units; deals without a value count as 0.
    pub total_value: i64,
    /// Whether this is the pipeline's terminal stage.
    pub is_terminal: bool,
}

/// Single source of truth for what the board renders.
///
/// Holds the stage registry and enriched deals from the latest load, plus
/// the stage each deal had in that load so speculative moves can be undone.
#[derive(Debug, Clone, Default)]
pub struct DealStore {
    stages: StageRegistry,
    cards: Vec<DealCard>,
    confirmed_stages: HashMap<DealId, Option<StageId>>,
}

impl DealStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole working copy with a freshly loaded snapshot.
    pub fn replace(&mut self, snapshot: BoardSnapshot) {
        let (stages, cards) = snapshot.into_parts();
        self.confirmed_stages = cards
            .iter()
            .map(|card| (card.deal().id(), card.deal().stage_id()))
            .collect();
        self.stages = stages;
        self.cards = cards;
    }

    /// Returns the stage registry.
    #[must_use]
    pub const fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    /// Returns every card in load order.
    #[must_use]
    pub fn cards(&self) -> &[DealCard] {
        &self.cards
    }

    /// Returns the card for a deal.
    #[must_use]
    pub fn card(&self, deal_id: DealId) -> Option<&DealCard> {
        self.cards.iter().find(|card| card.deal().id() == deal_id)
    }

    /// Returns the stage a deal had in the latest load.
    #[must_use]
    pub fn confirmed_stage(&self, deal_id: DealId) -> Option<StageId> {
        self.confirmed_stages.get(&deal_id).copied().flatten()
    }

    /// Returns the cards shown under a stage.
    ///
    /// Stages outside the loaded pipeline never show any cards.
    #[must_use]
    pub fn deals_by_stage(&self, stage_id: StageId) -> Vec<&DealCard> {
        if !self.stages.contains(stage_id) {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|card| card.deal().stage_id() == Some(stage_id))
            .collect()
    }

    /// Speculatively places a deal in a stage.
    ///
    /// Returns `true` when the deal's stage changed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownDeal`] or
    /// [`BoardDomainError::UnknownStage`] when either side is not on the board.
    pub fn move_deal(&mut self, deal_id: DealId, stage_id: StageId) -> Result<bool, BoardDomainError> {
        let color = self
            .stages
            .get(stage_id)
            .map(|stage| stage.color().to_owned())
            .ok_or(BoardDomainError::UnknownStage(stage_id))?;
        let card = self.card_mut(deal_id)?;
        if card.deal().stage_id() == Some(stage_id) {
            return Ok(false);
        }
        card.deal_mut().assign_stage(Some(stage_id));
        card.set_stage_color(Some(color));
        Ok(true)
    }

    /// Restores a deal to the stage it had in the latest load.
    ///
    /// Returns the restored stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownDeal`] when the deal is not on the
    /// board.
    pub fn revert_to_confirmed(&mut self, deal_id: DealId) -> Result<Option<StageId>, BoardDomainError> {
        let confirmed = self.confirmed_stage(deal_id);
        let color = confirmed
            .and_then(|id| self.stages.get(id))
            .map(|stage| stage.color().to_owned());
        let card = self.card_mut(deal_id)?;
        card.deal_mut().assign_stage(confirmed);
        card.set_stage_color(color);
        Ok(confirmed)
    }

    /// Records a stage the remote store accepted for a deal.
    pub fn confirm_stage(&mut self, deal_id: DealId, stage_id: StageId) {
        if let Some(confirmed) = self.confirmed_stages.get_mut(&deal_id) {
            *confirmed = Some(stage_id);
        }
    }

    /// Sets a deal's lifecycle status without touching its stage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownDeal`] when the deal is not on the
    /// board.
    pub fn set_status(&mut self, deal_id: DealId, status: DealStatus) -> Result<(), BoardDomainError> {
        self.card_mut(deal_id)?.deal_mut().assign_status(status);
        Ok(())
    }

    /// Returns per-stage totals in stage order.
    #[must_use]
    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.stages
            .stages()
            .iter()
            .map(|stage| {
                let column = self.deals_by_stage(stage.id());
                let total_value = column
                    .iter()
                    .filter_map(|card| card.deal().value())
                    .fold(0_i64, i64::saturating_add);
                ColumnSummary {
                    stage_id: stage.id(),
                    name: stage.name().to_owned(),
                    color: stage.color().to_owned(),
                    deal_count: column.len(),
                    total_value,
                    is_terminal: self.stages.is_terminal(stage.id()),
                }
            })
            .collect()
    }

    /// Returns up to `limit` deals with a due date, soonest first.
    #[must_use]
    pub fn upcoming(&self, limit: usize) -> Vec<&DealCard> {
        let mut dated: Vec<&DealCard> = self
            .cards
            .iter()
            .filter(|card| card.deal().due_date().is_some())
            .collect();
        dated.sort_by_key(|card| (card.deal().due_date(), card.deal().id()));
        dated.truncate(limit);
        dated
    }

    fn card_mut(&mut self, deal_id: DealId) -> Result<&mut DealCard, BoardDomainError> {
        self.cards
            .iter_mut()
            .find(|card| card.deal().id() == deal_id)
            .ok_or(BoardDomainError::UnknownDeal(deal_id))
    }
}
