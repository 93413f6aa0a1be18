//! The embedding provider seam.
//!
//! Catalog indexing and query answering both go through [`EmbeddingProvider`],
//! so the backing model (local ONNX session, remote endpoint, hashed fallback)
//! can change without touching the retrieval pipeline.

use thiserror::Error;

/// Failure modes shared by every embedding provider.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("tokenisation failed: {0}")]
    Tokenize(String),

    #[cfg(feature = "onnx")]
    #[error("model file not found: {0}")]
    ModelFileNotFound(std::path::PathBuf),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),

    #[error("unexpected model output shape: {0}")]
    OutputShape(String),

    #[cfg(feature = "http")]
    #[error("embedding endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("embedding endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// A source of fixed-length text embeddings.
///
/// Implementations must be deterministic for a given text and model version:
/// the catalog is embedded once at startup and queries are scored against
/// those stored vectors for the rest of the process lifetime.
///
/// Methods take `&mut self` because ONNX inference sessions require it.
pub trait EmbeddingProvider {
    /// Embed a single text into a vector of [`Self::dim`](EmbeddingProvider::dim) floats.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embed a batch of texts, one vector per input, in input order.
    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Output dimensionality, constant for the lifetime of the provider.
    fn dim(&self) -> usize;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, EmbedError> {
        (**self).embed(text)
    }

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        (**self).embed_batch(texts)
    }

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
