//! Data model: catalogs, vocabularies, reports, theory documents

pub mod catalog;
pub mod document;
pub mod domain;
pub mod report;
pub mod theory;
pub mod vocabulary;

pub use catalog::{CatalogDefaults, DomainCatalog, ItemRecord};
pub use document::{catalog_from_value, load_catalog, parse_catalog};
pub use domain::Domain;
pub use report::{
    ClassifiedEntry, CurationOutcome, DomainOutcome, DomainReport, DomainStatus, DomainSummary,
    InvalidFix, LowConfidenceEntry, RunReport, SkippedEntry,
};
pub use theory::{builtin_skeleton, TheoryDocument, TheorySection};
pub use vocabulary::{Vocabulary, VocabularyConfig, VOCABULARY_FILE_NAME};
