//! Question answering over an indexed violation catalog.

mod engine;
mod error;
mod matcher;

pub use engine::{DEFAULT_MIN_TOKENS, DEFAULT_THRESHOLD, MatchConfig, QueryEngine};
pub use error::QueryError;
pub use matcher::{cosine_similarity, find_best};
