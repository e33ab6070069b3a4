//! Built-in pipeline templates keyed by business type.

use super::StageDraft;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business type chosen during onboarding; selects the default stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    /// Appointment-style service work.
    Service,
    /// Quoted project work.
    Project,
    /// Classic sales funnel.
    Sales,
    /// Anything else.
    Other,
}

impl BusinessType {
    /// Parses a stored business type, falling back to [`BusinessType::Other`]
    /// for missing or unrecognised values.
    #[must_use]
    pub fn from_profile(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Other;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "service" => Self::Service,
            "project" => Self::Project,
            "sales" => Self::Sales,
            _ => Self::Other,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Project => "project",
            Self::Sales => "sales",
            Self::Other => "other",
        }
    }

    const fn template(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Service => &[
                ("Booked", "#6366f1"),
                ("In progress", "#f59e0b"),
                ("Completed", "#10b981"),
                ("Paid", "#22c55e"),
            ],
            Self::Project | Self::Other => &[
                ("New lead", "#94a3b8"),
                ("Quote", "#6366f1"),
                ("In progress", "#f59e0b"),
                ("Review", "#8b5cf6"),
                ("Completed", "#22c55e"),
            ],
            Self::Sales => &[
                ("New lead", "#94a3b8"),
                ("Contacted", "#6366f1"),
                ("Qualified", "#8b5cf6"),
                ("Negotiation", "#f59e0b"),
                ("Closed won", "#22c55e"),
                ("Lost", "#ef4444"),
            ],
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the default stages for a business type, ordinals starting at 0.
#[must_use]
pub fn default_stages(business_type: BusinessType) -> Vec<StageDraft> {
    business_type
        .template()
        .iter()
        .zip(0_u32..)
        .map(|(&(name, color), ordinal)| StageDraft::from_template(name, color, ordinal))
        .collect()
}
