use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog entry {position} has an empty description")]
    EmptyDescription { position: usize },

    #[error("catalog entry {position} embedded to {got} dimensions, expected {expected}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        got: usize,
    },

    #[error("embedding failed: {0}")]
    Embed(#[from] trafficlaw_ai::EmbedError),
}
