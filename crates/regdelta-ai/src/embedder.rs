//! Mean-pooled sentence embeddings via ONNX Runtime.
//!
//! Tuned for sentence-transformers models such as all-MiniLM-L6-v2;
//! the model directory must contain `model.onnx` and `tokenizer.json`.
//! The scorer only ever needs one old/new text pair at a time, so the
//! surface is a single `embed_pair` call.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Encoding, Tokenizer};
use tracing::info;

const FALLBACK_DIM: usize = 384;
const MAX_TOKENS: usize = 256;

/// Sentence embedder producing L2-normalized vectors, so a plain dot
/// product is the cosine similarity.
pub struct Embedder {
    session: Session,
    tokenizer: Tokenizer,
    dim: usize,
}

impl Embedder {
    /// Load from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;
        let dim = output_dim(session.outputs()[0].dtype()).unwrap_or(FALLBACK_DIM);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
        // Pad the pair to a uniform length within the batch.
        tokenizer.with_padding(Some(tokenizers::PaddingParams::default()));

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session,
            tokenizer,
            dim,
        })
    }

    /// Embedding dimensionality (384 for all-MiniLM-L6-v2).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed two texts in one inference pass; returns their
    /// normalized vectors in argument order.
    pub fn embed_pair(&mut self, text_a: &str, text_b: &str) -> anyhow::Result<[Vec<f32>; 2]> {
        let encodings = self
            .tokenizer
            .encode_batch(vec![text_a, text_b], true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        anyhow::ensure!(encodings.len() == 2, "expected two encodings");

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let inputs = ModelInputs::from_encodings(&encodings, seq_len);
        let mask = inputs.attention_mask.clone();

        let shape = [2i64, seq_len as i64];
        let outputs = self.session.run(ort::inputs![
            "input_ids" => Tensor::from_array((shape, inputs.input_ids.into_boxed_slice()))?,
            "attention_mask" => Tensor::from_array((shape, inputs.attention_mask.into_boxed_slice()))?,
            "token_type_ids" => Tensor::from_array((shape, inputs.token_type_ids.into_boxed_slice()))?,
        ])?;

        // Token embeddings come back as [2, seq_len, dim].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] == 2 && dims[2] as usize == self.dim,
            "unexpected output shape {dims:?}, expected [2, {seq_len}, {}]",
            self.dim
        );
        let out_seq_len = dims[1] as usize;

        let first = self.pool(output_data, &mask, 0, seq_len, out_seq_len);
        let second = self.pool(output_data, &mask, 1, seq_len, out_seq_len);
        Ok([first, second])
    }

    /// Attention-masked mean pooling over one batch row, L2-normalized.
    fn pool(
        &self,
        token_embeddings: &[f32],
        attention_mask: &[i64],
        row: usize,
        seq_len: usize,
        out_seq_len: usize,
    ) -> Vec<f32> {
        let mut pooled = vec![0.0f32; self.dim];
        let mut token_count = 0.0f32;

        for j in 0..out_seq_len {
            let mask_val = attention_mask[row * seq_len + j] as f32;
            if mask_val > 0.0 {
                let offset = (row * out_seq_len + j) * self.dim;
                for (d, p) in pooled.iter_mut().enumerate() {
                    *p += token_embeddings[offset + d] * mask_val;
                }
                token_count += mask_val;
            }
        }

        if token_count > 0.0 {
            for p in &mut pooled {
                *p /= token_count;
            }
        }
        normalize(&mut pooled);
        pooled
    }
}

/// Flat [2, seq_len] input tensors for the model.
struct ModelInputs {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl ModelInputs {
    fn from_encodings(encodings: &[Encoding], seq_len: usize) -> Self {
        let total = encodings.len() * seq_len;
        let mut inputs = Self {
            input_ids: vec![0; total],
            attention_mask: vec![0; total],
            token_type_ids: vec![0; total],
        };
        for (i, encoding) in encodings.iter().enumerate() {
            let offset = i * seq_len;
            for (j, &id) in encoding.get_ids().iter().enumerate() {
                inputs.input_ids[offset + j] = id as i64;
            }
            for (j, &m) in encoding.get_attention_mask().iter().enumerate() {
                inputs.attention_mask[offset + j] = m as i64;
            }
            for (j, &t) in encoding.get_type_ids().iter().enumerate() {
                inputs.token_type_ids[offset + j] = t as i64;
            }
        }
        inputs
    }
}

/// L2-normalize in place; zero vectors are left untouched.
pub(crate) fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Embedding dimension from the model's declared output shape.
fn output_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_produces_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }
}
