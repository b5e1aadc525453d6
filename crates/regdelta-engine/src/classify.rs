//! Change classification.
//!
//! Added/removed pairs map directly to their change type. Matched pairs
//! at or above the no-change threshold are internal no-change records;
//! the rest are modified, with the subtype decided by an explicit
//! ordered rule table. The table order is a design invariant: numeric
//! limit changes outrank applicability language, which outranks
//! operational wording, with structural and minor as defaults — a pair
//! exhibiting both a numeric delta and an applicability difference is
//! always reported as numeric.

use regdelta_core::{
    ChangeRecord, ChangeSubtype, ChangeType, CompareConfig, MatchKind, MatchPair, NumericDelta,
};

use crate::gates;
use crate::score::normalize;

/// Inputs available to subtype rules for a matched pair.
struct RuleCtx<'a> {
    pair: &'a MatchPair,
    old_text: &'a str,
    new_text: &'a str,
    deltas: &'a [NumericDelta],
}

/// Subtype rules in priority order. Evaluated top to bottom; the first
/// rule whose predicate fires decides the subtype. The minor rule is
/// the unconditional residual.
const RULES: &[(ChangeSubtype, fn(&RuleCtx) -> bool)] = &[
    (ChangeSubtype::Numeric, numeric_rule),
    (ChangeSubtype::Applicability, applicability_rule),
    (ChangeSubtype::Operational, operational_rule),
    (ChangeSubtype::Structural, structural_rule),
    (ChangeSubtype::Minor, minor_rule),
];

/// Derive one change record from a match pair. Never fails; every
/// record field is fully populated.
pub fn classify(pair: MatchPair, config: &CompareConfig) -> ChangeRecord {
    match pair.kind {
        MatchKind::Added => terminal(pair, ChangeType::Added),
        MatchKind::Removed => terminal(pair, ChangeType::Removed),
        MatchKind::Matched => classify_matched(pair, config),
    }
}

fn terminal(pair: MatchPair, change_type: ChangeType) -> ChangeRecord {
    ChangeRecord {
        pair,
        change_type,
        subtype: ChangeSubtype::None,
        numeric_deltas: Vec::new(),
        confidence: 1.0,
    }
}

fn classify_matched(pair: MatchPair, config: &CompareConfig) -> ChangeRecord {
    let score = pair.score;

    if score >= config.no_change_threshold {
        let span = (1.0 - config.no_change_threshold).max(f32::EPSILON);
        let confidence = ((score - config.no_change_threshold) / span).clamp(0.0, 1.0);
        return ChangeRecord {
            pair,
            change_type: ChangeType::NoChange,
            subtype: ChangeSubtype::None,
            numeric_deltas: Vec::new(),
            confidence,
        };
    }

    // Both sides are present for a matched pair.
    let old_text = pair.old.as_ref().map(|s| s.comparison_text()).unwrap_or("");
    let new_text = pair.new.as_ref().map(|s| s.comparison_text()).unwrap_or("");
    let deltas = gates::numeric_deltas(old_text, new_text);

    let ctx = RuleCtx {
        pair: &pair,
        old_text,
        new_text,
        deltas: &deltas,
    };

    let subtype = RULES
        .iter()
        .find(|(_, predicate)| predicate(&ctx))
        .map(|(subtype, _)| *subtype)
        .unwrap_or(ChangeSubtype::Minor);

    let confidence = modified_confidence(score, config);

    ChangeRecord {
        pair,
        change_type: ChangeType::Modified,
        subtype,
        numeric_deltas: deltas,
        confidence,
    }
}

/// Confidence is the score's distance from the nearer boundary of the
/// modified band [min_match_score, no_change_threshold], normalized to
/// [0, 1] — mid-band pairs are the most confidently "really modified".
fn modified_confidence(score: f32, config: &CompareConfig) -> f32 {
    let band = (config.no_change_threshold - config.min_match_score).max(f32::EPSILON);
    let distance = (score - config.min_match_score).min(config.no_change_threshold - score);
    (distance / (band / 2.0)).clamp(0.0, 1.0)
}

// ── Subtype rules ──

/// At least one extracted delta with genuinely differing values
/// (unit-normalized; reformatted-equal values never fire this).
fn numeric_rule(ctx: &RuleCtx) -> bool {
    !ctx.deltas.is_empty()
}

/// The modal/eligibility term profile of the meaning blocks differs.
fn applicability_rule(ctx: &RuleCtx) -> bool {
    gates::applicability_profile(ctx.old_text) != gates::applicability_profile(ctx.new_text)
}

/// The procedural/operational verb profile differs.
fn operational_rule(ctx: &RuleCtx) -> bool {
    gates::operational_profile(ctx.old_text) != gates::operational_profile(ctx.new_text)
}

/// Only heading/numbering/whitespace differs: the bodies (or meaning
/// excerpts) normalize to the same text.
fn structural_rule(ctx: &RuleCtx) -> bool {
    let (Some(old), Some(new)) = (&ctx.pair.old, &ctx.pair.new) else {
        return false;
    };
    normalize(&old.body) == normalize(&new.body)
        || normalize(ctx.old_text) == normalize(ctx.new_text)
}

fn minor_rule(_ctx: &RuleCtx) -> bool {
    true
}
