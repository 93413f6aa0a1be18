//! Embedding layer: ONNX Runtime sentence transformers, remote HTTP
//! endpoints, and a deterministic hashed fallback behind one provider trait.

mod hashing;
mod provider;

pub use hashing::HashingEmbedder;
pub use provider::{EmbedError, EmbeddingProvider};

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::Embedder;

#[cfg(feature = "http")]
mod remote;
#[cfg(feature = "http")]
pub use remote::RemoteEmbedder;
