//! Similarity result type and the optional semantic backend seam.

use serde::{Deserialize, Serialize};

/// Bounded similarity between two text spans.
///
/// `semantic` is `None` when no embedding backend is configured or the
/// backend failed — "no opinion", never `0.0` (zero would wrongly claim
/// the texts are completely dissimilar). When semantic is absent,
/// `blended == lexical` holds; tests rely on that invariant to observe
/// silent degradation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Sequence-alignment + token-set blend, in [0, 1].
    pub lexical: f32,
    /// Embedding cosine similarity clipped to [0, 1], when available.
    pub semantic: Option<f32>,
    /// Fixed-weight combination of the two, in [0, 1].
    pub blended: f32,
}

/// A pairwise semantic similarity provider (e.g. sentence embeddings).
///
/// Implementations return `None` on failure or timeout rather than an
/// error: the scorer degrades to lexical-only and the pipeline carries on.
pub trait SemanticBackend {
    /// Similarity of two texts in [0, 1], or `None` for "no opinion".
    fn similarity(&mut self, text_a: &str, text_b: &str) -> Option<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_semantic_serializes_as_null() {
        let result = SimilarityResult {
            lexical: 0.8,
            semantic: None,
            blended: 0.8,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["semantic"].is_null());
    }
}
