//! Identifier newtypes for board records.
//!
//! Stage, deal, contact, pipeline and user identifiers all wrap UUIDs so the
//! board can never confuse a stage reference with a deal reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a pipeline stage (a board column).
    StageId
);

uuid_identifier!(
    /// Identifier of a deal (a board card).
    DealId
);

uuid_identifier!(
    /// Identifier of an externally owned contact record.
    ContactId
);

uuid_identifier!(
    /// Identifier of a pipeline owning an ordered set of stages.
    PipelineId
);

uuid_identifier!(
    /// Identifier of the user whose deals populate the board.
    UserId
);

/// Scope used when loading and subscribing to board data.
///
/// Stages are loaded per pipeline; deals and contacts are loaded per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardScope {
    user_id: UserId,
    pipeline_id: PipelineId,
}

impl BoardScope {
    /// Creates a scope for one user's pipeline.
    #[must_use]
    pub const fn new(user_id: UserId, pipeline_id: PipelineId) -> Self {
        Self {
            user_id,
            pipeline_id,
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        self.user_id
    }

    /// Returns the pipeline whose stages form the board columns.
    #[must_use]
    pub const fn pipeline_id(self) -> PipelineId {
        self.pipeline_id
    }
}
