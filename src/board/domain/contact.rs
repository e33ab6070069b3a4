//! Contact display fields consumed by the board.

use super::ContactId;
use serde::{Deserialize, Serialize};

/// Display-only view of an externally owned contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSummary {
    id: ContactId,
    name: String,
    phone: Option<String>,
}

impl ContactSummary {
    /// Creates a contact summary.
    #[must_use]
    pub fn new(id: ContactId, name: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone,
        }
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phone number, if recorded.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
