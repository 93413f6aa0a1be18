//! In-memory embedding index over the violation catalog.
//!
//! Every description is embedded once at startup; queries are scored against
//! the stored vectors with a brute-force cosine scan. Catalogs are a few
//! hundred rows, so no approximate structure is warranted.

use tracing::info;

use trafficlaw_ai::EmbeddingProvider;
use trafficlaw_core::{VehicleCategory, ViolationRecord};

use crate::error::CatalogError;

/// Descriptions are embedded in chunks of this size.
pub const EMBED_BATCH_SIZE: usize = 256;

#[derive(Debug)]
pub struct CatalogIndex {
    records: Vec<ViolationRecord>,
    embeddings: Vec<Vec<f32>>,
    dim: usize,
}

impl CatalogIndex {
    /// Embed every record description and build the index.
    ///
    /// Fails on the first record whose description is empty after trimming,
    /// and on any embedding whose length differs from the provider dimension.
    pub fn build<P: EmbeddingProvider>(
        records: Vec<ViolationRecord>,
        provider: &mut P,
    ) -> Result<Self, CatalogError> {
        let dim = provider.dim();

        for (position, record) in records.iter().enumerate() {
            if record.description.trim().is_empty() {
                return Err(CatalogError::EmptyDescription { position });
            }
        }

        let mut embeddings = Vec::with_capacity(records.len());
        for chunk in records.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = chunk.iter().map(|r| r.description.as_str()).collect();
            embeddings.extend(provider.embed_batch(&texts)?);
        }

        for (position, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dim {
                return Err(CatalogError::DimensionMismatch {
                    position,
                    expected: dim,
                    got: embedding.len(),
                });
            }
        }

        info!(
            count = records.len(),
            dim,
            provider = provider.name(),
            "built catalog index"
        );
        Ok(Self {
            records,
            embeddings,
            dim,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimensionality shared by every stored vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    /// Record at `i`. Panics if `i` did not come from this index.
    pub fn record(&self, i: usize) -> &ViolationRecord {
        &self.records[i]
    }

    /// Stored embedding at `i`. Panics if `i` did not come from this index.
    pub fn embedding(&self, i: usize) -> &[f32] {
        &self.embeddings[i]
    }

    /// Indices of records whose vehicle category equals `category`.
    ///
    /// `None` selects every record: a query naming no recognisable vehicle
    /// searches the whole catalog. Records without a category never match a
    /// detected one.
    pub fn filter_by_category(&self, category: Option<VehicleCategory>) -> Vec<usize> {
        match category {
            None => (0..self.records.len()).collect(),
            Some(cat) => self
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.vehicle_category == Some(cat))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}
