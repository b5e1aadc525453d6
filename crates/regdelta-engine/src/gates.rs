//! Numeric and applicability gates.
//!
//! The numeric gate extracts quantity tokens (value + optional unit)
//! from both texts, normalizes units, pairs tokens positionally within
//! each unit group, and keeps only pairs whose values actually differ.
//! Reformatted-but-equal values ("5" vs "5.0", "10 km" vs "10km")
//! produce no delta; that is the primary defense against formatting
//! noise.
//!
//! The applicability gate compares the presence sets of a controlled
//! modal/eligibility vocabulary across the two meaning blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use regdelta_core::NumericDelta;

use crate::score::normalize;

static NUMERIC_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d+(?::\d{2})?(?:\.\d+)*)\s*(hours?|hrs?|minutes?|mins?|days?|months?|years?|kms?|kgs?|landings?|sectors?|percent|%)?",
    )
    .unwrap()
});

/// Modal-verb and eligibility-scope vocabulary. A change in which of
/// these appear in a section's meaning block signals an applicability
/// change.
pub const APPLICABILITY_TERMS: &[&str] = &[
    "shall",
    "must",
    "may",
    "required",
    "prohibited",
    "exempt",
    "applicable",
    "applicability",
    "all operators",
    "scheduled",
    "non-scheduled",
    "general aviation",
    "private",
    "except",
    "only",
];

/// Words that mark a dotted number as a structural cross-reference
/// ("as described in para 2.1") rather than a quantity. Renumbered
/// references must never escalate to a numeric finding.
const REFERENCE_WORDS: &[&str] = &[
    "para", "section", "subsection", "clause", "chapter", "annex", "appendix", "table", "part",
    "item", "rule", "fig",
];

/// How far back (in bytes) to look for a reference word before a token.
const REFERENCE_WINDOW: usize = 24;

/// Procedural/operational verb vocabulary for the operational rule.
pub const OPERATIONAL_TERMS: &[&str] = &[
    "submit",
    "maintain",
    "record",
    "report",
    "notify",
    "inspect",
    "ensure",
    "conduct",
    "obtain",
    "monitor",
    "file",
    "approve",
    "not exceed",
];

/// A quantity extracted from text, after unit normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    pub value: f64,
    pub unit: Option<String>,
}

/// Scan text for numeric tokens with optional units, in order of
/// occurrence. Unparseable values are skipped, never raised.
pub fn extract_numeric_tokens(text: &str) -> Vec<NumericToken> {
    let mut tokens = Vec::new();

    for caps in NUMERIC_TOKEN_RE.captures_iter(text) {
        let raw = &caps[1];
        let unit_raw = caps.get(2).map(|m| m.as_str());

        if is_cross_reference(text, caps.get(1).map_or(0, |m| m.start()), raw, unit_raw) {
            continue;
        }

        let Some((value, implied_unit)) = parse_value(raw) else {
            continue;
        };

        let unit = unit_raw
            .map(canonical_unit)
            .or(implied_unit.map(str::to_string));

        tokens.push(NumericToken { value, unit });
    }

    tokens
}

/// A unit-less dotted number preceded by a reference word within a
/// short window is a section/paragraph pointer, not a quantity.
fn is_cross_reference(text: &str, start: usize, raw: &str, unit: Option<&str>) -> bool {
    if unit.is_some() || !raw.contains('.') {
        return false;
    }

    let mut window_start = start.saturating_sub(REFERENCE_WINDOW);
    while !text.is_char_boundary(window_start) {
        window_start -= 1;
    }
    let window = text[window_start..start].to_lowercase();
    REFERENCE_WORDS.iter().any(|word| window.contains(word))
}

/// Parse a raw numeric string. `hh:mm` clock spans become decimal hours
/// with an implied "hours" unit.
fn parse_value(raw: &str) -> Option<(f64, Option<&'static str>)> {
    if let Some((h, m)) = raw.split_once(':') {
        let hours: f64 = h.parse().ok()?;
        let minutes: f64 = m.parse().ok()?;
        if minutes >= 60.0 {
            return None;
        }
        return Some((hours + minutes / 60.0, Some("hours")));
    }
    raw.parse().ok().map(|v| (v, None))
}

/// Collapse unit aliases to one canonical spelling.
fn canonical_unit(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "hour" | "hours" | "hr" | "hrs" => "hours",
        "minute" | "minutes" | "min" | "mins" => "minutes",
        "day" | "days" => "days",
        "month" | "months" => "months",
        "year" | "years" => "years",
        "km" | "kms" => "km",
        "kg" | "kgs" => "kg",
        "landing" | "landings" => "landings",
        "sector" | "sectors" => "sectors",
        "%" | "percent" => "percent",
        other => return other.to_string(),
    }
    .to_string()
}

/// Pair numeric tokens from both texts by unit group, positionally
/// within each group, and return the pairs whose values differ.
///
/// Tokens left without a counterpart (group length mismatch) are
/// ambiguous and skipped. Order follows occurrence in the new text.
pub fn numeric_deltas(old_text: &str, new_text: &str) -> Vec<NumericDelta> {
    let old_tokens = extract_numeric_tokens(old_text);
    let new_tokens = extract_numeric_tokens(new_text);

    let old_groups = group_by_unit(&old_tokens);
    let new_groups = group_by_unit(&new_tokens);

    let mut deltas = Vec::new();
    for (unit, new_values) in &new_groups {
        let Some((_, old_values)) = old_groups.iter().find(|(u, _)| u == unit) else {
            continue;
        };
        for (old_value, new_value) in old_values.iter().zip(new_values) {
            if old_value != new_value {
                deltas.push(NumericDelta {
                    old_value: *old_value,
                    new_value: *new_value,
                    unit: unit.clone(),
                });
            }
        }
    }

    deltas
}

/// Group token values by canonical unit, preserving first-seen order.
fn group_by_unit(tokens: &[NumericToken]) -> Vec<(Option<String>, Vec<f64>)> {
    let mut groups: Vec<(Option<String>, Vec<f64>)> = Vec::new();
    for token in tokens {
        match groups.iter_mut().find(|(unit, _)| *unit == token.unit) {
            Some((_, values)) => values.push(token.value),
            None => groups.push((token.unit.clone(), vec![token.value])),
        }
    }
    groups
}

/// Which applicability-vocabulary terms appear in the text.
pub fn applicability_profile(text: &str) -> Vec<&'static str> {
    term_profile(text, APPLICABILITY_TERMS)
}

/// Which operational-vocabulary terms appear in the text.
pub fn operational_profile(text: &str) -> Vec<&'static str> {
    term_profile(text, OPERATIONAL_TERMS)
}

fn term_profile(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    let norm = normalize(text);
    vocabulary
        .iter()
        .filter(|term| norm.contains(*term))
        .copied()
        .collect()
}
