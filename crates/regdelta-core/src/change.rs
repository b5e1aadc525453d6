//! Match pairs and classified change records.
//!
//! `MatchPair` is produced once by the matcher; `ChangeRecord` is derived
//! once per pair by the classifier and may be dropped (never mutated)
//! by the validation layer. Constructors enforce the pair invariant:
//! at most one side absent, and only for `Added`/`Removed`.

use serde::{Deserialize, Serialize};

use crate::section::Section;

/// Kind of correspondence found by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Matched,
    Added,
    Removed,
}

/// A correspondence (or non-correspondence) between an old and new section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub old: Option<Section>,
    pub new: Option<Section>,
    /// Blended similarity of the assignment; 0.0 for added/removed pairs.
    pub score: f32,
    pub kind: MatchKind,
}

impl MatchPair {
    pub fn matched(old: Section, new: Section, score: f32) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
            score,
            kind: MatchKind::Matched,
        }
    }

    pub fn added(new: Section) -> Self {
        Self {
            old: None,
            new: Some(new),
            score: 0.0,
            kind: MatchKind::Added,
        }
    }

    pub fn removed(old: Section) -> Self {
        Self {
            old: Some(old),
            new: None,
            score: 0.0,
            kind: MatchKind::Removed,
        }
    }
}

/// Coarse change classification exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    /// Internal state only — always suppressed by validation.
    NoChange,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Removed => "REMOVED",
            Self::Modified => "MODIFIED",
            Self::NoChange => "NO_CHANGE",
        }
    }
}

/// Fine-grained classification of a `Modified` change.
///
/// Declaration order is the priority order: a pair exhibiting both a
/// numeric delta and an applicability-language difference reports as
/// `Numeric`, because numeric/limit changes carry the highest
/// compliance risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeSubtype {
    Numeric,
    Applicability,
    Operational,
    Structural,
    Minor,
    None,
}

impl ChangeSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Applicability => "APPLICABILITY",
            Self::Operational => "OPERATIONAL",
            Self::Structural => "STRUCTURAL",
            Self::Minor => "MINOR",
            Self::None => "NONE",
        }
    }
}

/// A paired numeric value change, after unit normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericDelta {
    pub old_value: f64,
    pub new_value: f64,
    /// Canonical unit spelling ("hours", "km", ...), or `None` for bare numbers.
    pub unit: Option<String>,
}

/// A classified change, ready for summary generation and rendering.
///
/// Every field a downstream renderer depends on is always populated;
/// records are never partially constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub pair: MatchPair,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub subtype: ChangeSubtype,
    /// Ordered by occurrence in the new text; empty for added/removed.
    pub numeric_deltas: Vec<NumericDelta>,
    /// Distance of the score from the governing threshold, in [0, 1].
    pub confidence: f32,
}

impl ChangeRecord {
    /// Identifier of the old-side section, if present.
    pub fn old_identifier(&self) -> Option<&str> {
        self.pair.old.as_ref().map(|s| s.identifier.as_str())
    }

    /// Identifier of the new-side section, if present.
    pub fn new_identifier(&self) -> Option<&str> {
        self.pair.new.as_ref().map(|s| s.identifier.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str) -> Section {
        Section::new(id, "Heading", "Body text.", "")
    }

    #[test]
    fn matched_pair_has_both_sides() {
        let p = MatchPair::matched(section("1"), section("2"), 0.9);
        assert!(p.old.is_some() && p.new.is_some());
        assert_eq!(p.kind, MatchKind::Matched);
    }

    #[test]
    fn added_pair_has_only_new_side() {
        let p = MatchPair::added(section("2"));
        assert!(p.old.is_none());
        assert!(p.new.is_some());
        assert_eq!(p.kind, MatchKind::Added);
        assert_eq!(p.score, 0.0);
    }

    #[test]
    fn removed_pair_has_only_old_side() {
        let p = MatchPair::removed(section("1"));
        assert!(p.old.is_some());
        assert!(p.new.is_none());
        assert_eq!(p.kind, MatchKind::Removed);
    }

    #[test]
    fn change_type_wire_names() {
        assert_eq!(
            serde_json::to_value(ChangeType::NoChange).unwrap(),
            serde_json::json!("NO_CHANGE")
        );
        assert_eq!(
            serde_json::to_value(ChangeSubtype::Applicability).unwrap(),
            serde_json::json!("APPLICABILITY")
        );
        assert_eq!(ChangeType::Modified.as_str(), "MODIFIED");
    }

    #[test]
    fn record_identifiers() {
        let record = ChangeRecord {
            pair: MatchPair::removed(section("4.2")),
            change_type: ChangeType::Removed,
            subtype: ChangeSubtype::None,
            numeric_deltas: vec![],
            confidence: 1.0,
        };
        assert_eq!(record.old_identifier(), Some("4.2"));
        assert_eq!(record.new_identifier(), None);
    }
}
