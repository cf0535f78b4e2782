//! nldt-catalog library interface
//!
//! Catalog maintenance for the vehicle recognition quiz: identity,
//! rule-based classification, reconciliation and safe persistence of the
//! per-domain catalogs and their theory documents.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod sources;

pub use crate::error::{CatalogError, CatalogResult};
pub use crate::models::{CatalogDefaults, Domain, DomainCatalog, ItemRecord, RunReport, Vocabulary, VocabularyConfig};
pub use crate::pipeline::{CatalogPipeline, DomainFailure, DomainInput, PipelinePaths, REPORT_FILE_NAME};
pub use crate::services::{CandidateRecord, CurationOverride, Reconciler};
pub use crate::sources::{CandidateBatch, CandidateCollector, ImageScanner};
