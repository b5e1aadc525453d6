//! `SemanticBackend` implementation over the ONNX embedder.

use std::path::Path;

use tracing::warn;

use regdelta_core::SemanticBackend;

use crate::embedder::Embedder;

/// Pairwise semantic similarity via sentence embeddings.
///
/// After the first inference failure the backend stops trying and
/// answers "no opinion" for the rest of the run — the scorer then
/// degrades to lexical-only silently, which keeps a misbehaving
/// runtime from stalling the whole comparison.
pub struct OnnxBackend {
    embedder: Embedder,
    failed: bool,
}

impl OnnxBackend {
    /// Load the backend from a model directory (`model.onnx` +
    /// `tokenizer.json`).
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let embedder = Embedder::load(model_dir)?;
        Ok(Self {
            embedder,
            failed: false,
        })
    }
}

impl SemanticBackend for OnnxBackend {
    fn similarity(&mut self, text_a: &str, text_b: &str) -> Option<f32> {
        if self.failed {
            return None;
        }
        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return None;
        }

        match self.embedder.embed_pair(text_a, text_b) {
            Ok([a, b]) => {
                // Vectors are unit-normalized; dot product is cosine.
                let cosine: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
                Some(cosine.clamp(0.0, 1.0))
            }
            Err(error) => {
                warn!(%error, "embedding inference failed; continuing lexical-only");
                self.failed = true;
                None
            }
        }
    }
}
