//! Sort key normalisation for section identifiers.
//!
//! Converts section labels as found in regulatory documents (e.g., "3",
//! "3.4.2", "12.1", "6A", synthetic "H4") into lexicographically-sortable
//! strings so a plain string sort recovers document order.
//!
//! # Numbering conventions handled
//!
//! - Dotted decimal: 3, 3.1, 3.1.2, 12.10
//! - Letter suffix (amendment insertion): 6A between 6 and 7
//! - Synthetic heading labels assigned by the parser: H1, H2, ...
//!   (these sort after all numbered sections, in assignment order)

/// Normalise a section identifier into a lexicographically-sortable string.
///
/// Input: label like "3", "3.4.2", "6A", "H4"
/// Output: "003", "003.004.002", "006a", "~004"
///
/// Each dotted segment becomes a zero-padded 3-digit number with any
/// letter suffix appended in lowercase; synthetic "H<n>" labels map to
/// a "~" bucket ('~' sorts after ASCII digits and letters).
pub fn normalize_identifier(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        return "000".to_string();
    }

    // Synthetic unnumbered-heading labels: H1, H2, ...
    if let Some(rest) = s.strip_prefix('H').or_else(|| s.strip_prefix('h'))
        && !rest.is_empty()
        && rest.bytes().all(|b| b.is_ascii_digit())
    {
        let n: u32 = rest.parse().unwrap_or(0);
        return format!("~{n:03}");
    }

    let segments: Vec<String> = s.split('.').map(normalize_segment).collect();
    segments.join(".")
}

/// One dotted segment: leading digits zero-padded, letter suffix lowered.
fn normalize_segment(seg: &str) -> String {
    let seg = seg.trim();
    let digit_end = seg
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(seg.len());

    let base: u32 = if digit_end > 0 {
        seg[..digit_end].parse().unwrap_or(0)
    } else {
        0
    };

    let suffix: String = seg[digit_end..]
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    format!("{base:03}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert a list of identifiers produces strictly ascending sort keys.
    fn assert_sorted_order(inputs: &[&str]) {
        let keys: Vec<String> = inputs.iter().map(|s| normalize_identifier(s)).collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({})",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
            );
        }
    }

    #[test]
    fn plain_numeric_sequence() {
        assert_sorted_order(&["1", "2", "3", "9", "10", "11", "100"]);
    }

    #[test]
    fn dotted_decimal_order() {
        assert_sorted_order(&["3", "3.1", "3.1.2", "3.2", "3.10", "4"]);
    }

    #[test]
    fn letter_suffix_insertion() {
        assert_sorted_order(&["6", "6A", "6B", "7"]);
    }

    #[test]
    fn synthetic_headings_sort_last() {
        assert_sorted_order(&["1", "12.4", "H1", "H2", "H10"]);
    }

    #[test]
    fn exact_values() {
        assert_eq!(normalize_identifier("3"), "003");
        assert_eq!(normalize_identifier("3.4.2"), "003.004.002");
        assert_eq!(normalize_identifier("6A"), "006a");
        assert_eq!(normalize_identifier("H4"), "~004");
    }

    #[test]
    fn empty_string() {
        assert_eq!(normalize_identifier(""), "000");
    }

    #[test]
    fn whitespace_and_case_normalised() {
        assert_eq!(normalize_identifier("  3.1  "), normalize_identifier("3.1"));
        assert_eq!(normalize_identifier("6a"), normalize_identifier("6A"));
        assert_eq!(normalize_identifier("h2"), normalize_identifier("H2"));
    }
}
