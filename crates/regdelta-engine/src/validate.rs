//! Dedup and validation: the over-detection control.
//!
//! Drops duplicate findings and internal no-change records, suppresses
//! low-confidence structural/minor findings, and orders the survivors
//! by new-document position with removed records interleaved where
//! their old neighbourhood sits in the new document. Added, removed,
//! numeric, applicability, and operational records are always kept —
//! suppressing those would defeat the compliance-review purpose.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use regdelta_core::{
    ChangeRecord, ChangeSubtype, ChangeType, CompareConfig, Section, normalize_identifier,
};

/// Filter and order classified records. Records are dropped, never
/// mutated. `old` and `new` are the original section lists, used only
/// to recover document order.
pub fn validate(
    records: Vec<ChangeRecord>,
    old: &[Section],
    new: &[Section],
    config: &CompareConfig,
) -> Vec<ChangeRecord> {
    let total = records.len();

    let new_positions: HashMap<&str, usize> = new
        .iter()
        .enumerate()
        .map(|(i, s)| (s.identifier.as_str(), i))
        .collect();
    let old_positions: HashMap<&str, usize> = old
        .iter()
        .enumerate()
        .map(|(i, s)| (s.identifier.as_str(), i))
        .collect();

    // Anchoring must see every match, including pairs the suppression
    // pass below drops (no-change, low-confidence): a removed section's
    // nearest old neighbour may well be an unchanged one.
    let matched_old = matched_positions(&records, &old_positions, &new_positions);

    let mut seen: HashSet<(String, String, ChangeSubtype)> = HashSet::new();
    let mut kept: Vec<ChangeRecord> = Vec::with_capacity(records.len());

    for record in records {
        // Internal classification state only, never surfaced.
        if record.change_type == ChangeType::NoChange {
            continue;
        }

        // Structural/minor findings are the highest false-positive-risk
        // categories; everything else is preserved regardless of
        // confidence.
        if record.change_type == ChangeType::Modified
            && matches!(record.subtype, ChangeSubtype::Structural | ChangeSubtype::Minor)
            && record.confidence < config.confidence_floor
        {
            continue;
        }

        let key = (
            record.old_identifier().unwrap_or("").to_string(),
            record.new_identifier().unwrap_or("").to_string(),
            record.subtype,
        );
        if !seen.insert(key) {
            continue;
        }

        kept.push(record);
    }

    debug!(total, kept = kept.len(), "validation complete");

    kept.sort_by_key(|record| order_key(record, &new_positions, &old_positions, &matched_old));
    kept
}

/// Position within the interleaved output ordering.
///
/// Matched/added records sit at their new-document index. A removed
/// record sits just after the new-side position of its nearest matched
/// old neighbour (just before, when the nearest neighbour follows it).
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    new_position: usize,
    // 0 = removed anchored before, 1 = the position itself, 2 = removed
    // anchored after.
    phase: u8,
    tiebreak: String,
}

/// old index → new index, for every matched record.
fn matched_positions(
    records: &[ChangeRecord],
    old_positions: &HashMap<&str, usize>,
    new_positions: &HashMap<&str, usize>,
) -> HashMap<usize, usize> {
    records
        .iter()
        .filter_map(|r| match (r.old_identifier(), r.new_identifier()) {
            (Some(o), Some(n)) => {
                let old_idx = old_positions.get(o)?;
                let new_idx = new_positions.get(n)?;
                Some((*old_idx, *new_idx))
            }
            _ => None,
        })
        .collect()
}

fn order_key(
    record: &ChangeRecord,
    new_positions: &HashMap<&str, usize>,
    old_positions: &HashMap<&str, usize>,
    matched_old: &HashMap<usize, usize>,
) -> OrderKey {
    if let Some(id) = record.new_identifier() {
        return OrderKey {
            new_position: new_positions.get(id).copied().unwrap_or(usize::MAX),
            phase: 1,
            tiebreak: normalize_identifier(id),
        };
    }

    // Removed record: anchor to the nearest matched old neighbour.
    let old_id = record.old_identifier().unwrap_or("");
    let tiebreak = normalize_identifier(old_id);
    let Some(&old_idx) = old_positions.get(old_id) else {
        return OrderKey {
            new_position: usize::MAX,
            phase: 2,
            tiebreak,
        };
    };

    for distance in 1..=old_positions.len() {
        if old_idx >= distance
            && let Some(&new_idx) = matched_old.get(&(old_idx - distance))
        {
            return OrderKey {
                new_position: new_idx,
                phase: 2,
                tiebreak,
            };
        }
        if let Some(&new_idx) = matched_old.get(&(old_idx + distance)) {
            return OrderKey {
                new_position: new_idx,
                phase: 0,
                tiebreak,
            };
        }
    }

    // No matched neighbour at all (e.g. the new document is empty):
    // fall back to old-document order at the front.
    OrderKey {
        new_position: 0,
        phase: 0,
        tiebreak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regdelta_core::{MatchPair, Section};

    fn section(id: &str, body: &str) -> Section {
        Section::new(id, format!("Heading {id}"), body, "")
    }

    fn record(
        old: Option<&Section>,
        new: Option<&Section>,
        change_type: ChangeType,
        subtype: ChangeSubtype,
        confidence: f32,
    ) -> ChangeRecord {
        let pair = match (old, new) {
            (Some(o), Some(n)) => MatchPair::matched(o.clone(), n.clone(), 0.8),
            (Some(o), None) => MatchPair::removed(o.clone()),
            (None, Some(n)) => MatchPair::added(n.clone()),
            (None, None) => unreachable!(),
        };
        ChangeRecord {
            pair,
            change_type,
            subtype,
            numeric_deltas: vec![],
            confidence,
        }
    }

    #[test]
    fn no_change_records_are_suppressed() {
        let old = [section("1", "text")];
        let new = [section("1", "text")];
        let records = vec![record(
            Some(&old[0]),
            Some(&new[0]),
            ChangeType::NoChange,
            ChangeSubtype::None,
            0.9,
        )];
        let out = validate(records, &old, &new, &CompareConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn exact_duplicates_collapse() {
        let old = [section("1", "text")];
        let new = [section("2", "text changed")];
        let one = record(
            Some(&old[0]),
            Some(&new[0]),
            ChangeType::Modified,
            ChangeSubtype::Operational,
            0.8,
        );
        let out = validate(
            vec![one.clone(), one.clone()],
            &old,
            &new,
            &CompareConfig::default(),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn low_confidence_minor_is_suppressed() {
        let old = [section("1", "a"), section("2", "b")];
        let new = [section("1", "a2"), section("2", "b2")];
        let records = vec![
            record(
                Some(&old[0]),
                Some(&new[0]),
                ChangeType::Modified,
                ChangeSubtype::Minor,
                0.1,
            ),
            record(
                Some(&old[1]),
                Some(&new[1]),
                ChangeType::Modified,
                ChangeSubtype::Structural,
                0.2,
            ),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn low_confidence_numeric_and_terminal_records_survive() {
        let old = [section("1", "a"), section("2", "b")];
        let new = [section("1", "a2")];
        let records = vec![
            record(
                Some(&old[0]),
                Some(&new[0]),
                ChangeType::Modified,
                ChangeSubtype::Numeric,
                0.05,
            ),
            record(
                Some(&old[1]),
                None,
                ChangeType::Removed,
                ChangeSubtype::None,
                0.05,
            ),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn output_follows_new_document_order() {
        let old = [section("1", "a"), section("2", "b"), section("3", "c")];
        let new = [section("10", "a2"), section("11", "b2"), section("12", "c2")];
        // Records deliberately out of order.
        let records = vec![
            record(Some(&old[2]), Some(&new[2]), ChangeType::Modified, ChangeSubtype::Operational, 0.9),
            record(Some(&old[0]), Some(&new[0]), ChangeType::Modified, ChangeSubtype::Numeric, 0.9),
            record(Some(&old[1]), Some(&new[1]), ChangeType::Modified, ChangeSubtype::Applicability, 0.9),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        let ids: Vec<_> = out.iter().map(|r| r.new_identifier().unwrap().to_string()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);
    }

    #[test]
    fn removed_interleaves_after_preceding_neighbour() {
        let old = [section("1", "a"), section("2", "gone"), section("3", "c")];
        let new = [section("1", "a2"), section("3", "c2")];
        let records = vec![
            record(Some(&old[0]), Some(&new[0]), ChangeType::Modified, ChangeSubtype::Numeric, 0.9),
            record(Some(&old[2]), Some(&new[1]), ChangeType::Modified, ChangeSubtype::Numeric, 0.9),
            record(Some(&old[1]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        let types: Vec<_> = out.iter().map(|r| r.change_type).collect();
        assert_eq!(
            types,
            vec![ChangeType::Modified, ChangeType::Removed, ChangeType::Modified]
        );
    }

    #[test]
    fn removed_anchors_to_suppressed_neighbour() {
        // Old 2 disappears; its nearest old neighbour (1) matched but
        // is unchanged, so that record never reaches the output. The
        // removed record must still anchor right after section 1's new
        // position, not skip ahead to the next surviving match.
        let old = [section("1", "a"), section("2", "gone"), section("3", "c")];
        let new = [section("1", "a"), section("9", "brand new"), section("3", "c2")];
        let records = vec![
            record(
                Some(&old[0]),
                Some(&new[0]),
                ChangeType::NoChange,
                ChangeSubtype::None,
                0.9,
            ),
            record(None, Some(&new[1]), ChangeType::Added, ChangeSubtype::None, 1.0),
            record(
                Some(&old[2]),
                Some(&new[2]),
                ChangeType::Modified,
                ChangeSubtype::Operational,
                0.9,
            ),
            record(Some(&old[1]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        let types: Vec<_> = out.iter().map(|r| r.change_type).collect();
        assert_eq!(
            types,
            vec![ChangeType::Removed, ChangeType::Added, ChangeType::Modified]
        );
    }

    #[test]
    fn all_removed_when_new_is_empty_keeps_old_order() {
        let old = [section("1", "a"), section("2", "b"), section("3", "c")];
        let records = vec![
            record(Some(&old[1]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
            record(Some(&old[2]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
            record(Some(&old[0]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
        ];
        let out = validate(records, &old, &[], &CompareConfig::default());
        let ids: Vec<_> = out.iter().map(|r| r.old_identifier().unwrap().to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn removed_before_following_neighbour_when_first() {
        let old = [section("1", "gone"), section("2", "b")];
        let new = [section("5", "b2")];
        let records = vec![
            record(Some(&old[1]), Some(&new[0]), ChangeType::Modified, ChangeSubtype::Operational, 0.9),
            record(Some(&old[0]), None, ChangeType::Removed, ChangeSubtype::None, 1.0),
        ];
        let out = validate(records, &old, &new, &CompareConfig::default());
        assert_eq!(out[0].change_type, ChangeType::Removed);
        assert_eq!(out[1].change_type, ChangeType::Modified);
    }
}
