//! Comparison configuration.
//!
//! All precision/recall tuning knobs live here as named fields with
//! documented defaults, injected into the pipeline explicitly so tests
//! can run deterministic configurations. No ambient global state.

use serde::{Deserialize, Serialize};

/// Default floor below which a weak assignment demotes to added/removed.
pub const DEFAULT_MIN_MATCH_SCORE: f32 = 0.58;

/// Default similarity above which a matched pair counts as unchanged.
pub const DEFAULT_NO_CHANGE_THRESHOLD: f32 = 0.95;

/// Default confidence floor for suppressing structural/minor findings.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.35;

/// Weight of the sequence-alignment ratio within the lexical score.
pub const SEQUENCE_WEIGHT: f32 = 0.55;

/// Weight of token-set Jaccard within the lexical score.
pub const JACCARD_WEIGHT: f32 = 0.45;

/// Weight of the semantic score in the blend, when semantic is present.
pub const SEMANTIC_WEIGHT: f32 = 0.75;

/// Weight of the lexical score in the blend, when semantic is present.
pub const LEXICAL_WEIGHT: f32 = 0.25;

/// Tuning knobs for the comparison pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Whether to attempt semantic scoring at all.
    pub enable_embeddings: bool,
    /// Assignments scoring below this are rejected as matches and
    /// demoted to an added/removed pair each.
    pub min_match_score: f32,
    /// Matched pairs at or above this similarity classify as no-change.
    pub no_change_threshold: f32,
    /// Modified/structural and modified/minor records below this
    /// confidence are suppressed from the output.
    pub confidence_floor: f32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            enable_embeddings: false,
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
            no_change_threshold: DEFAULT_NO_CHANGE_THRESHOLD,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
        }
    }
}
