//! Attribute compatibility rules
//!
//! Each rule inspects the unit through the editor, decides whether it has
//! anything to do, and reports what it did as a [`RuleOutcome`].

mod dead_channels;
mod lightmap_alias;
mod mid_tex_coord;
mod overlay;
mod texture_matrix;

pub use dead_channels::{dead_channels, DeadChannels};
pub use lightmap_alias::LightmapAlias;
pub use mid_tex_coord::MidTexCoordAlias;
pub use overlay::{overlay_plan, OverlayPassthrough};
pub use texture_matrix::{texture_matrix_plan, TextureMatrix};

use glcompat_edit::TreeEditor;
use serde::Serialize;

use crate::AttributeParameters;

/// A rewrite rule applied to one translation unit
pub trait AttributeRule<E: TreeEditor> {
    /// Name of this rule (for logging and reports)
    fn name(&self) -> &'static str;

    /// Run the rule against the unit
    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error>;
}

/// What a rule did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The rule changed `edits` tree sites (renamed, replaced, injected or removed)
    Applied { edits: usize },
    /// The rule had nothing to do
    Skipped(SkipReason),
}

impl RuleOutcome {
    /// Outcome of a rule whose only subject may be absent
    pub fn from_edits(edits: usize) -> Self {
        if edits == 0 {
            RuleOutcome::Skipped(SkipReason::NoOccurrences)
        } else {
            RuleOutcome::Applied { edits }
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied { .. })
    }

    pub fn edits(&self) -> usize {
        match self {
            RuleOutcome::Applied { edits } => *edits,
            RuleOutcome::Skipped(_) => 0,
        }
    }
}

/// Why a rule did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The stage is not one the rewrite patches
    UnsupportedStage,
    LightmapDisabled,
    OverlayDisabled,
    /// No coordinate channel is disabled
    AllChannelsEnabled,
    NotVertexStage,
    /// The identifiers the rule rewrites do not occur
    NoOccurrences,
    /// The name the rule would introduce is already taken
    AlreadyDeclared,
}

impl std::fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleOutcome::Applied { edits } => write!(f, "applied ({} edits)", edits),
            RuleOutcome::Skipped(reason) => write!(f, "skipped: {}", reason.describe()),
        }
    }
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::UnsupportedStage => "stage is not patched",
            SkipReason::LightmapDisabled => "lightmap input disabled",
            SkipReason::OverlayDisabled => "overlay input disabled",
            SkipReason::AllChannelsEnabled => "all coordinate channels enabled",
            SkipReason::NotVertexStage => "not a vertex shader",
            SkipReason::NoOccurrences => "no occurrences",
            SkipReason::AlreadyDeclared => "name already declared",
        }
    }
}

/// The rules in the order they run
pub fn rules<E: TreeEditor>() -> Vec<Box<dyn AttributeRule<E>>> {
    vec![
        Box::new(LightmapAlias),
        Box::new(DeadChannels),
        Box::new(TextureMatrix),
        Box::new(OverlayPassthrough),
        Box::new(MidTexCoordAlias),
    ]
}
