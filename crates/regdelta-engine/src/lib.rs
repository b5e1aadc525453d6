//! Cross-version section matching and change classification.
//!
//! The pipeline runs strictly scorer → matcher → classifier (with its
//! numeric/applicability gates) → validation; each stage consumes the
//! previous stage's output and produces new records. The whole engine
//! is pure, synchronous, and infallible: the worst outcome is an empty
//! or lexical-only result, never an error surfacing to the caller.

pub mod classify;
pub mod gates;
pub mod matcher;
pub mod score;
pub mod validate;

use tracing::debug;

use regdelta_core::{ChangeRecord, CompareConfig, Section, SemanticBackend};

pub use classify::classify;
pub use matcher::match_sections;
pub use score::Scorer;
pub use validate::validate;

/// Compare two revisions of a sectioned document.
///
/// `backend` supplies optional semantic similarity; pass `None` (or a
/// backend that fails) for lexical-only scoring.
pub fn compare(
    old: &[Section],
    new: &[Section],
    config: &CompareConfig,
    backend: Option<Box<dyn SemanticBackend>>,
) -> Vec<ChangeRecord> {
    let mut scorer = Scorer::new(backend);

    let pairs = matcher::match_sections(old, new, &mut scorer, config);
    debug!(pairs = pairs.len(), "matching complete");

    let records: Vec<ChangeRecord> = pairs
        .into_iter()
        .map(|pair| classify::classify(pair, config))
        .collect();
    debug!(records = records.len(), "classification complete");

    validate::validate(records, old, new, config)
}
