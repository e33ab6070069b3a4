//! Deal lifecycle status.

use super::ParseDealStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a deal, orthogonal to its stage.
///
/// `Active` may move to either `Won` or `Lost`; both terminal states may only
/// return to `Active`. There is no direct `Won`/`Lost` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    /// The deal is being worked.
    #[default]
    Active,
    /// The deal closed successfully.
    Won,
    /// The deal was lost.
    Lost,
}

impl DealStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Won | Self::Lost) | (Self::Won | Self::Lost, Self::Active)
        )
    }

    /// Returns whether the status closes the deal.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DealStatus {
    type Error = ParseDealStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(ParseDealStatusError(value.to_owned())),
        }
    }
}
