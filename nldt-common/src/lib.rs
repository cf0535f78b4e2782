//! # NLDT Common Library
//!
//! Shared code for the recognition-trainer catalog tools:
//! - Error types
//! - TOML configuration loading and root folder resolution
//! - Ordered candidate-path resolution
//! - Atomic file writes

pub mod config;
pub mod error;
pub mod fs;

pub use error::{Error, Result};
