//! Deal records and creation requests.

use super::{BoardDomainError, ContactId, ContactSummary, DealId, DealStatus, StageId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A deal as stored remotely.
///
/// `value` is expressed in minor currency units. A deal without a stage is
/// not shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    id: DealId,
    user_id: UserId,
    title: String,
    value: Option<i64>,
    stage_id: Option<StageId>,
    status: DealStatus,
    due_date: Option<NaiveDate>,
    contact_id: Option<ContactId>,
    contact: Option<ContactSummary>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a loaded deal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDealData {
    /// Deal identifier.
    pub id: DealId,
    /// Owning user.
    pub user_id: UserId,
    /// Deal title.
    pub title: String,
    /// Monetary value in minor units.
    pub value: Option<i64>,
    /// Current stage, if assigned.
    pub stage_id: Option<StageId>,
    /// Lifecycle status.
    pub status: DealStatus,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Linked contact, if any.
    pub contact_id: Option<ContactId>,
    /// Contact fields joined onto the row, if the store returned them.
    pub contact: Option<ContactSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Creates a new active deal from a validated request.
    #[must_use]
    pub fn new(user_id: UserId, request: NewDeal, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DealId::new(),
            user_id,
            title: request.title,
            value: request.value,
            stage_id: request.stage_id,
            status: DealStatus::Active,
            due_date: request.due_date,
            contact_id: request.contact_id,
            contact: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a deal from a loaded row.
    #[must_use]
    pub fn from_persisted(data: PersistedDealData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            title: data.title,
            value: data.value,
            stage_id: data.stage_id,
            status: data.status,
            due_date: data.due_date,
            contact_id: data.contact_id,
            contact: data.contact,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the deal identifier.
    #[must_use]
    pub const fn id(&self) -> DealId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the monetary value in minor units.
    #[must_use]
    pub const fn value(&self) -> Option<i64> {
        self.value
    }

    /// Returns the current stage, if assigned.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> DealStatus {
        self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the linked contact identifier.
    #[must_use]
    pub const fn contact_id(&self) -> Option<ContactId> {
        self.contact_id
    }

    /// Returns contact fields joined onto the row.
    #[must_use]
    pub const fn contact(&self) -> Option<&ContactSummary> {
        self.contact.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) const fn assign_stage(&mut self, stage_id: Option<StageId>) {
        self.stage_id = stage_id;
    }

    pub(crate) const fn assign_status(&mut self, status: DealStatus) {
        self.status = status;
    }

    pub(crate) fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Validated request for creating a deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeal {
    title: String,
    value: Option<i64>,
    stage_id: Option<StageId>,
    contact_id: Option<ContactId>,
    due_date: Option<NaiveDate>,
}

impl NewDeal {
    /// Creates a request with a required title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyDealTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyDealTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            value: None,
            stage_id: None,
            contact_id: None,
            due_date: None,
        })
    }

    /// Sets the monetary value in minor units.
    #[must_use]
    pub const fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// Places the deal in a stage.
    #[must_use]
    pub const fn in_stage(mut self, stage_id: StageId) -> Self {
        self.stage_id = Some(stage_id);
        self
    }

    /// Links a contact.
    #[must_use]
    pub const fn for_contact(mut self, contact_id: ContactId) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the requested stage.
    #[must_use]
    pub const fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }
}
