//! Violation catalog file format.
//!
//! The catalog is a single JSON document with every violation listed under
//! the `tat_ca_vi_pham` key. Unknown keys elsewhere in the document are
//! ignored so the file can carry extra metadata.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use trafficlaw_core::ViolationRecord;

use crate::error::CatalogError;

/// Top-level envelope of the catalog document.
#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(rename = "tat_ca_vi_pham")]
    violations: Vec<ViolationRecord>,
}

/// Read and parse a catalog file.
///
/// A record with an unrecognized `loai_phuong_tien` value fails the whole
/// load rather than being silently reclassified.
pub fn load_catalog(path: &Path) -> Result<Vec<ViolationRecord>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&raw)?;
    info!(count = catalog.violations.len(), path = %path.display(), "loaded violation catalog");
    Ok(catalog.violations)
}
