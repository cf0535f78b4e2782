//! Error types for nldt-catalog
//!
//! Catalog-wide problems (malformed documents, missing vocabulary, write
//! failures) abort the run for one domain. Per-item problems never surface
//! here; they are logged and counted as skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog pipeline error type
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Persisted catalog has an unsupported shape or is missing a required field
    #[error("Malformed catalog {}: {reason}", .path.display())]
    MalformedCatalog { path: PathBuf, reason: String },

    /// Domain name not recognised
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Vocabulary configuration has no entry (or an empty one) for a domain
    #[error("No controlled vocabulary configured for domain '{0}'")]
    MissingVocabulary(String),

    /// Writing a catalog, backup or side artifact failed
    #[error("Write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: nldt_common::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// nldt-common error
    #[error("Common error: {0}")]
    Common(#[from] nldt_common::Error),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
