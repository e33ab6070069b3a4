//! Board configuration.

use crate::board::domain::ActivationConstraints;
use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

/// Tunables for drag activation, notices and reconciliation.
///
/// # Examples
///
/// ```
/// use chameleon::board::BoardConfig;
///
/// let config = BoardConfig::default();
/// assert_eq!(config.pointer_activation_distance, 8);
///
/// let parsed = BoardConfig::from_json_str(r#"{"touch_activation_delay_ms": 150}"#)
///     .expect("valid config");
/// assert_eq!(parsed.touch_activation_delay_ms, 150);
/// assert_eq!(parsed.touch_tolerance, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Pixels a mouse or pen must travel before a drag starts.
    pub pointer_activation_distance: u32,
    /// Milliseconds a touch must be held before a drag starts.
    pub touch_activation_delay_ms: u32,
    /// Pixels a held touch may wander before the gesture counts as a scroll.
    pub touch_tolerance: u32,
    /// Notices buffered per subscriber before the oldest are dropped.
    pub notice_capacity: usize,
    /// Whether a write confirmed after a newer reload started triggers
    /// another reload.
    pub follow_up_reload: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            pointer_activation_distance: 8,
            touch_activation_delay_ms: 250,
            touch_tolerance: 5,
            notice_capacity: 64,
            follow_up_reload: true,
        }
    }
}

/// Error returned when a configuration document cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid board configuration: {0}")]
pub struct BoardConfigError(#[from] serde_json::Error);

impl BoardConfig {
    /// Configuration tuned for touch-first devices.
    #[must_use]
    pub fn mobile() -> Self {
        Self {
            touch_activation_delay_ms: 200,
            touch_tolerance: 8,
            ..Self::default()
        }
    }

    /// Configuration tuned for mouse-first devices.
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            pointer_activation_distance: 5,
            ..Self::default()
        }
    }

    /// Parses a JSON document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError`] for malformed JSON or unknown keys.
    pub fn from_json_str(document: &str) -> Result<Self, BoardConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Returns the drag activation thresholds.
    #[must_use]
    pub fn activation(&self) -> ActivationConstraints {
        ActivationConstraints {
            pointer_distance: self.pointer_activation_distance,
            touch_delay: TimeDelta::milliseconds(i64::from(self.touch_activation_delay_ms)),
            touch_tolerance: self.touch_tolerance,
        }
    }
}
