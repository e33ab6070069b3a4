//! Pipeline stages and the ordered stage registry.

use super::{BoardDomainError, PipelineId, StageId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One column of the pipeline board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    pipeline_id: PipelineId,
    name: String,
    color: String,
    ordinal: u32,
}

impl Stage {
    /// Reconstructs a stage from a loaded row.
    #[must_use]
    pub fn from_persisted(
        id: StageId,
        pipeline_id: PipelineId,
        name: impl Into<String>,
        color: impl Into<String>,
        ordinal: u32,
    ) -> Self {
        Self {
            id,
            pipeline_id,
            name: name.into(),
            color: color.into(),
            ordinal,
        }
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> StageId {
        self.id
    }

    /// Returns the owning pipeline.
    #[must_use]
    pub const fn pipeline_id(&self) -> PipelineId {
        self.pipeline_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the ordinal position within the pipeline.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

/// Validated stage definition used when provisioning a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDraft {
    name: String,
    color: String,
    ordinal: u32,
}

impl StageDraft {
    /// Creates a validated stage definition.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyStageName`] for blank names and
    /// [`BoardDomainError::InvalidStageColor`] when the color is not `#rrggbb`.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        ordinal: u32,
    ) -> Result<Self, BoardDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyStageName);
        }

        let raw_color = color.into();
        if !is_hex_color(&raw_color) {
            return Err(BoardDomainError::InvalidStageColor(raw_color));
        }

        Ok(Self {
            name: trimmed.to_owned(),
            color: raw_color.to_ascii_lowercase(),
            ordinal,
        })
    }

    /// Builds a definition from a built-in template row.
    pub(super) fn from_template(name: &str, color: &str, ordinal: u32) -> Self {
        Self {
            name: name.to_owned(),
            color: color.to_owned(),
            ordinal,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the ordinal position.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Ordered list of the stages of one pipeline.
///
/// Stages are kept sorted by ordinal. The last stage is the pipeline's
/// terminal ("review") stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    /// Builds a registry from loaded stages.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateStageOrdinal`] when two stages
    /// share an ordinal.
    pub fn new(mut stages: Vec<Stage>) -> Result<Self, BoardDomainError> {
        let mut seen = HashSet::with_capacity(stages.len());
        for stage in &stages {
            if !seen.insert(stage.ordinal) {
                return Err(BoardDomainError::DuplicateStageOrdinal(stage.ordinal));
            }
        }
        stages.sort_by_key(Stage::ordinal);
        Ok(Self { stages })
    }

    /// Returns the stages in ordinal order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns whether no stages are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage with the given identifier.
    #[must_use]
    pub fn get(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == id)
    }

    /// Returns whether the stage belongs to this pipeline.
    #[must_use]
    pub fn contains(&self, id: StageId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the first stage, where new leads land.
    #[must_use]
    pub fn first(&self) -> Option<&Stage> {
        self.stages.first()
    }

    /// Returns the terminal stage.
    #[must_use]
    pub fn terminal(&self) -> Option<&Stage> {
        self.stages.last()
    }

    /// Returns whether `id` is the terminal stage.
    #[must_use]
    pub fn is_terminal(&self, id: StageId) -> bool {
        self.terminal().is_some_and(|stage| stage.id == id)
    }
}
