//! Semantic scoring backend: ONNX Runtime sentence embeddings.
//!
//! Everything here is optional by design — the engine runs lexical-only
//! without it, and any failure inside this crate degrades to "no
//! opinion" rather than an error.

#[cfg(feature = "onnx")]
mod backend;
#[cfg(feature = "onnx")]
mod embedder;

#[cfg(feature = "onnx")]
pub use backend::OnnxBackend;
#[cfg(feature = "onnx")]
pub use embedder::Embedder;
