use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("embedding failed: {0}")]
    Embed(#[from] trafficlaw_ai::EmbedError),

    #[error("query embedded to {got} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}
