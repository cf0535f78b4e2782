//! Common error types for NLDT

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for NLDT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the NLDT crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// None of the candidate locations for a required file exist
    #[error("{what} not found (looked in: {})", format_candidates(.candidates))]
    NotFound {
        what: String,
        candidates: Vec<PathBuf>,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
