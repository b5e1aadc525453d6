//! Human-readable summary strings for change records.
//!
//! Maps `(type, subtype, numeric_deltas)` plus the section texts to a
//! 1-3 sentence factual summary. Pure templating: every record field
//! it depends on is guaranteed populated by the engine.

use regdelta_core::{ChangeRecord, ChangeSubtype, ChangeType, NumericDelta};

const MAX_EXCERPT_WORDS: usize = 30;

/// Topic labels for common regulatory contexts, checked in order.
const CONTEXT_LABELS: &[(&str, &str)] = &[
    ("flight duty", "flight duty period"),
    ("fdp", "flight duty period"),
    ("flight time", "flight time limit"),
    ("standby", "standby requirement"),
    ("rest", "rest requirement"),
    ("medical certificate", "medical certification requirement"),
    ("applicab", "applicability"),
    ("operators", "applicability"),
];

/// Render a concise factual summary of one change record.
pub fn summarize(record: &ChangeRecord) -> String {
    let old_text = record
        .pair
        .old
        .as_ref()
        .map(|s| s.comparison_text())
        .unwrap_or("");
    let new_text = record
        .pair
        .new
        .as_ref()
        .map(|s| s.comparison_text())
        .unwrap_or("");

    let summary = match (record.change_type, record.subtype) {
        (ChangeType::Added, _) => added_summary(new_text),
        (ChangeType::Removed, _) => removed_summary(old_text),
        (_, ChangeSubtype::Numeric) => {
            numeric_summary(&record.numeric_deltas, old_text, new_text)
        }
        (_, ChangeSubtype::Applicability) => applicability_summary(old_text, new_text),
        (_, ChangeSubtype::Structural) => {
            "The provision was renumbered or moved; its text is materially unchanged.".to_string()
        }
        _ => modified_summary(old_text, new_text),
    };

    sentence_case(&summary)
}

fn numeric_summary(deltas: &[NumericDelta], old_text: &str, new_text: &str) -> String {
    let context = context_label(old_text, new_text);

    if deltas.is_empty() {
        return format!("The {context} numeric limits were revised.");
    }

    let changes: Vec<String> = deltas.iter().map(format_delta).collect();
    format!("The {context} has changed: {}.", changes.join("; "))
}

fn format_delta(delta: &NumericDelta) -> String {
    let old = format_value(delta.old_value);
    let new = format_value(delta.new_value);
    match &delta.unit {
        Some(unit) => format!("from {old} {unit} to {new} {unit}"),
        None => format!("from {old} to {new}"),
    }
}

/// Whole values print without a trailing ".0".
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn applicability_summary(old_text: &str, new_text: &str) -> String {
    let old_sent = first_sentence(old_text);
    let new_sent = first_sentence(new_text);

    if !old_sent.is_empty() && !new_sent.is_empty() {
        format!("Applicability has been revised. Earlier: {old_sent} Now: {new_sent}")
    } else {
        "Applicability scope has changed for the operators or operations covered by this rule."
            .to_string()
    }
}

fn added_summary(new_text: &str) -> String {
    let sent = first_sentence(new_text);
    if sent.is_empty() {
        "A new requirement has been added.".to_string()
    } else {
        format!("A new requirement has been added: {sent}")
    }
}

fn removed_summary(old_text: &str) -> String {
    let sent = first_sentence(old_text);
    if sent.is_empty() {
        "An existing requirement has been removed.".to_string()
    } else {
        format!("This requirement has been removed: {sent}")
    }
}

fn modified_summary(old_text: &str, new_text: &str) -> String {
    let context = context_label(old_text, new_text);
    let old_sent = first_sentence(old_text);
    let new_sent = first_sentence(new_text);

    if !old_sent.is_empty() && !new_sent.is_empty() {
        format!("The {context} has been revised. Earlier: {old_sent} Now: {new_sent}")
    } else {
        format!("The {context} has been revised.")
    }
}

fn context_label(old_text: &str, new_text: &str) -> &'static str {
    let combined = format!("{old_text} {new_text}").to_lowercase();
    CONTEXT_LABELS
        .iter()
        .find(|(needle, _)| combined.contains(needle))
        .map(|(_, label)| *label)
        .unwrap_or("operational requirement")
}

/// First sentence, capped at a word budget with an ellipsis.
fn first_sentence(text: &str) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return String::new();
    }

    let end = cleaned
        .char_indices()
        .find(|(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(cleaned.len());
    let sentence = &cleaned[..end];

    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.len() > MAX_EXCERPT_WORDS {
        format!("{}...", words[..MAX_EXCERPT_WORDS].join(" "))
    } else {
        sentence.to_string()
    }
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
