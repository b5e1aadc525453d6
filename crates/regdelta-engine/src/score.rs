//! Lexical and blended similarity scoring.
//!
//! The lexical score blends a Ratcliff/Obershelp sequence-alignment
//! ratio with token-set Jaccard similarity over normalized text. An
//! optional semantic backend contributes an embedding cosine score;
//! when it is absent or fails, the blended score equals the lexical
//! score — that equality is the observable form of silent degradation.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use regdelta_core::config::{JACCARD_WEIGHT, LEXICAL_WEIGHT, SEMANTIC_WEIGHT, SEQUENCE_WEIGHT};
use regdelta_core::{SemanticBackend, SimilarityResult};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// Lowercase, trim, and collapse runs of whitespace. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alphanumeric token runs from normalized text (punctuation-insensitive).
pub fn tokenize(text: &str) -> Vec<String> {
    let norm = normalize(text);
    TOKEN_RE
        .find_iter(&norm)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Token-set Jaccard similarity. Both empty → 1.0, one empty → 0.0.
pub fn jaccard(text_a: &str, text_b: &str) -> f32 {
    let a: HashSet<String> = tokenize(text_a).into_iter().collect();
    let b: HashSet<String> = tokenize(text_b).into_iter().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f32 / union as f32
}

/// Ratcliff/Obershelp sequence ratio over normalized text: 2M / (|a| + |b|)
/// where M is the total length of recursively-found longest matching
/// blocks. Arguments are canonically ordered first so the result is
/// exactly symmetric.
pub fn sequence_ratio(text_a: &str, text_b: &str) -> f32 {
    let mut a = normalize(text_a);
    let mut b = normalize(text_b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let matched = matching_total(&a, &b);
    2.0 * matched as f32 / (a.len() + b.len()) as f32
}

/// Total length of matching blocks: longest common substring, then
/// recurse into the unmatched slices on each side of it.
fn matching_total(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (a_start, b_start, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_total(&a[..a_start], &b[..b_start])
        + matching_total(&a[a_start + len..], &b[b_start + len..])
}

/// Longest common substring via a rolling-row DP table.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                row[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut row);
        row.fill(0);
    }

    best
}

/// Weighted lexical similarity in [0, 1]. Symmetric.
pub fn lexical(text_a: &str, text_b: &str) -> f32 {
    let a = normalize(text_a);
    let b = normalize(text_b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    SEQUENCE_WEIGHT * sequence_ratio(&a, &b) + JACCARD_WEIGHT * jaccard(&a, &b)
}

/// Similarity scorer with an optional semantic backend.
///
/// Pure with respect to its inputs: scoring has no side effects and no
/// required caching; the backend is the only external dependency and
/// its absence or failure degrades to lexical-only.
pub struct Scorer {
    backend: Option<Box<dyn SemanticBackend>>,
}

impl Scorer {
    pub fn new(backend: Option<Box<dyn SemanticBackend>>) -> Self {
        Self { backend }
    }

    /// Lexical-only scorer.
    pub fn lexical_only() -> Self {
        Self { backend: None }
    }

    /// Score two text spans.
    pub fn score(&mut self, text_a: &str, text_b: &str) -> SimilarityResult {
        let lexical = lexical(text_a, text_b);

        let semantic = self
            .backend
            .as_mut()
            .and_then(|backend| backend.similarity(text_a, text_b))
            .map(|s| s.clamp(0.0, 1.0));

        let blended = match semantic {
            Some(sem) => SEMANTIC_WEIGHT * sem + LEXICAL_WEIGHT * lexical,
            None => lexical,
        };

        SimilarityResult {
            lexical,
            semantic,
            blended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "  Pilots   MUST hold\ta valid certificate.  ",
            "already normalized text",
            "",
            "Mixed\nCASE  and\t\twhitespace",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input: {s:?}");
        }
    }

    #[test]
    fn lexical_is_symmetric() {
        let pairs = [
            ("flight time shall not exceed 8 hours", "flight time shall not exceed 10 hours"),
            ("rest period requirements", "standby duty obligations"),
            ("", "non-empty"),
            ("short", "a considerably longer span of regulatory text"),
        ];
        for (a, b) in pairs {
            assert_eq!(lexical(a, b), lexical(b, a), "pair: {a:?} / {b:?}");
            assert_eq!(sequence_ratio(a, b), sequence_ratio(b, a));
        }
    }

    #[test]
    fn identical_texts_score_one() {
        let text = "The operator shall maintain records for 24 months.";
        assert!((lexical(text, text) - 1.0).abs() < 1e-6);
        assert!((sequence_ratio(text, text) - 1.0).abs() < 1e-6);
        assert!((jaccard(text, text) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn punctuation_and_case_do_not_matter_for_tokens() {
        assert!((jaccard("Flight-time, limits!", "flight time limits") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_texts_score_near_zero() {
        let score = lexical("alpha bravo charlie", "xxyyzz qqrrss");
        assert!(score < 0.3, "got {score}");
        assert_eq!(jaccard("alpha bravo", "charlie delta"), 0.0);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(lexical("", ""), 1.0);
        assert_eq!(lexical("", "text"), 0.0);
        assert_eq!(jaccard("", ""), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let texts = [
            "Pilots must hold a valid medical certificate for 12 months.",
            "Pilots must hold a valid medical certificate for 24 months.",
            "Applicable to Category A operators.",
            "unrelated words entirely",
        ];
        for a in texts {
            for b in texts {
                let s = lexical(a, b);
                assert!((0.0..=1.0).contains(&s), "lexical({a:?}, {b:?}) = {s}");
            }
        }
    }

    #[test]
    fn similar_sentences_score_high() {
        let a = "Pilots must hold a valid medical certificate for 12 months.";
        let b = "Pilots must hold a valid medical certificate for 24 months.";
        assert!(lexical(a, b) > 0.8);
    }

    struct FixedBackend(Option<f32>);

    impl SemanticBackend for FixedBackend {
        fn similarity(&mut self, _a: &str, _b: &str) -> Option<f32> {
            self.0
        }
    }

    #[test]
    fn no_backend_means_blended_equals_lexical() {
        let mut scorer = Scorer::lexical_only();
        let result = scorer.score("rest period of 10 hours", "rest period of 12 hours");
        assert_eq!(result.semantic, None);
        assert_eq!(result.blended, result.lexical);
    }

    #[test]
    fn failing_backend_degrades_to_lexical() {
        let mut scorer = Scorer::new(Some(Box::new(FixedBackend(None))));
        let result = scorer.score("some text", "other text");
        assert_eq!(result.semantic, None);
        assert_eq!(result.blended, result.lexical);
    }

    #[test]
    fn blend_uses_documented_weights() {
        let mut scorer = Scorer::new(Some(Box::new(FixedBackend(Some(0.9)))));
        let result = scorer.score("alpha bravo", "alpha bravo");
        let expected = SEMANTIC_WEIGHT * 0.9 + LEXICAL_WEIGHT * result.lexical;
        assert_eq!(result.semantic, Some(0.9));
        assert!((result.blended - expected).abs() < 1e-6);
    }

    #[test]
    fn backend_score_is_clipped() {
        let mut scorer = Scorer::new(Some(Box::new(FixedBackend(Some(1.7)))));
        let result = scorer.score("a", "a");
        assert_eq!(result.semantic, Some(1.0));
        assert!(result.blended <= 1.0);
    }
}
