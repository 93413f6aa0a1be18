//! HTTP embedding endpoint client.
//!
//! Speaks the text-embeddings-inference wire shape: `POST {base}/embed` with
//! `{"inputs": [...]}` returning one vector per input. Requests are blocking
//! with a timeout, so a hung endpoint surfaces as
//! [`EmbedError::Unavailable`] instead of a stuck prompt.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::provider::{EmbedError, EmbeddingProvider};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RemoteEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    dim: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl RemoteEmbedder {
    /// Create a client for an embedding endpoint.
    ///
    /// `dim` is the dimensionality the endpoint's model produces; every
    /// response vector is checked against it.
    pub fn new(base_url: &str, dim: usize) -> Result<Self, EmbedError> {
        Self::with_timeout(base_url, dim, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, dim: usize, timeout: Duration) -> Result<Self, EmbedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(%base_url, dim, "using remote embedding endpoint");
        Ok(Self {
            client,
            base_url,
            dim,
        })
    }

    fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let url = format!("{}/embed", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { inputs: texts })
            .send()
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    EmbedError::Unavailable(e.to_string())
                } else {
                    EmbedError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EmbedError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let vectors: Vec<Vec<f32>> = response.json()?;
        if vectors.len() != texts.len() {
            return Err(EmbedError::OutputShape(format!(
                "asked for {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            if vector.len() != self.dim {
                return Err(EmbedError::DimensionMismatch {
                    expected: self.dim,
                    got: vector.len(),
                });
            }
        }
        Ok(vectors)
    }
}

impl EmbeddingProvider for RemoteEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.request(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::OutputShape("endpoint returned no embeddings".into()))
    }

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.request(texts)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "remote-endpoint"
    }
}
