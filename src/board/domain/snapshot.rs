//! Enriched board snapshots produced by a load.

use super::{BoardDomainError, ContactId, ContactSummary, Deal, Stage, StageRegistry};
use std::collections::HashMap;

/// A deal enriched with the display fields the board renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealCard {
    deal: Deal,
    contact_name: Option<String>,
    contact_phone: Option<String>,
    stage_color: Option<String>,
}

impl DealCard {
    /// Returns the underlying deal.
    #[must_use]
    pub const fn deal(&self) -> &Deal {
        &self.deal
    }

    /// Returns the linked contact's display name.
    #[must_use]
    pub fn contact_name(&self) -> Option<&str> {
        self.contact_name.as_deref()
    }

    /// Returns the linked contact's phone number.
    #[must_use]
    pub fn contact_phone(&self) -> Option<&str> {
        self.contact_phone.as_deref()
    }

    /// Returns the color of the stage the card currently sits in.
    #[must_use]
    pub fn stage_color(&self) -> Option<&str> {
        self.stage_color.as_deref()
    }

    pub(crate) const fn deal_mut(&mut self) -> &mut Deal {
        &mut self.deal
    }

    pub(crate) fn set_stage_color(&mut self, color: Option<String>) {
        self.stage_color = color;
    }
}

/// Stages and enriched deals from one complete load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    stages: StageRegistry,
    cards: Vec<DealCard>,
}

impl BoardSnapshot {
    /// Joins loaded rows into a snapshot.
    ///
    /// Contact display fields come from the contact index, falling back to
    /// fields joined onto the deal row. Each card carries the color of its
    /// stage when that stage belongs to the loaded pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateStageOrdinal`] when the stage rows
    /// violate ordinal uniqueness.
    pub fn enrich(
        stages: Vec<Stage>,
        deals: Vec<Deal>,
        contacts: Vec<ContactSummary>,
    ) -> Result<Self, BoardDomainError> {
        let registry = StageRegistry::new(stages)?;
        let contact_index: HashMap<ContactId, ContactSummary> = contacts
            .into_iter()
            .map(|contact| (contact.id(), contact))
            .collect();

        let cards = deals
            .into_iter()
            .map(|deal| {
                let indexed = deal.contact_id().and_then(|id| contact_index.get(&id));
                let joined = deal.contact();
                let contact_name = indexed
                    .or(joined)
                    .map(|contact| contact.name().to_owned());
                let contact_phone = indexed
                    .and_then(ContactSummary::phone)
                    .or_else(|| joined.and_then(ContactSummary::phone))
                    .map(str::to_owned);
                let stage_color = deal
                    .stage_id()
                    .and_then(|id| registry.get(id))
                    .map(|stage| stage.color().to_owned());
                DealCard {
                    deal,
                    contact_name,
                    contact_phone,
                    stage_color,
                }
            })
            .collect();

        Ok(Self {
            stages: registry,
            cards,
        })
    }

    /// Returns the stage registry.
    #[must_use]
    pub const fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    /// Returns the enriched deals in load order.
    #[must_use]
    pub fn cards(&self) -> &[DealCard] {
        &self.cards
    }

    pub(crate) fn into_parts(self) -> (StageRegistry, Vec<DealCard>) {
        (self.stages, self.cards)
    }
}
