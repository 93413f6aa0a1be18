//! Catalog persistence and the in-memory embedding index.

mod catalog;
mod error;
mod index;

pub use catalog::load_catalog;
pub use error::CatalogError;
pub use index::{CatalogIndex, EMBED_BATCH_SIZE};
