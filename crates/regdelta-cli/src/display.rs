//! Vertical card display for change records.

use regdelta_core::{ChangeRecord, ChangeSubtype, ChangeType};

use crate::summary::summarize;

const MAX_TEXT_CHARS: usize = 240;

/// Print a run header and one card per change record.
pub fn print_report(records: &[ChangeRecord], old_name: &str, new_name: &str) {
    println!("=== regdelta: {old_name} → {new_name} ===");
    println!("{} change(s) detected", records.len());

    for (i, record) in records.iter().enumerate() {
        print_change_card(i + 1, record);
    }
}

/// Print one change as a grouped, human-readable card.
pub fn print_change_card(index: usize, record: &ChangeRecord) {
    println!();
    println!("[{index}] {}{}", record.change_type.as_str(), subtype_suffix(record));

    match (record.old_identifier(), record.new_identifier()) {
        (Some(old), Some(new)) if old != new => {
            println!("  {:<14} {old} → {new}", "section");
        }
        (Some(old), Some(_)) => println!("  {:<14} {old}", "section"),
        (Some(old), None) => println!("  {:<14} {old} (old document)", "section"),
        (None, Some(new)) => println!("  {:<14} {new} (new document)", "section"),
        (None, None) => {}
    }

    if let Some(heading) = heading_of(record) {
        println!("  {:<14} {heading}", "topic");
    }

    println!("  {:<14} {:.2}", "confidence", record.confidence);
    if record.pair.score > 0.0 {
        println!("  {:<14} {:.3}", "similarity", record.pair.score);
    }

    for delta in &record.numeric_deltas {
        let unit = delta.unit.as_deref().unwrap_or("");
        println!(
            "  {:<14} {} → {} {unit}",
            "numeric",
            delta.old_value,
            delta.new_value
        );
    }

    println!("  {:<14} {}", "summary", summarize(record));

    if let Some(old) = &record.pair.old {
        println!("  {:<14} {}", "old text", excerpt(old.comparison_text()));
    }
    if let Some(new) = &record.pair.new {
        println!("  {:<14} {}", "new text", excerpt(new.comparison_text()));
    }
}

fn subtype_suffix(record: &ChangeRecord) -> String {
    if record.change_type == ChangeType::Modified && record.subtype != ChangeSubtype::None {
        format!(" / {}", record.subtype.as_str())
    } else {
        String::new()
    }
}

fn heading_of(record: &ChangeRecord) -> Option<&str> {
    record
        .pair
        .new
        .as_ref()
        .or(record.pair.old.as_ref())
        .map(|s| s.heading.as_str())
        .filter(|h| !h.is_empty())
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_text() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), MAX_TEXT_CHARS);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn excerpt_leaves_short_text_alone() {
        assert_eq!(excerpt("short text"), "short text");
    }
}
