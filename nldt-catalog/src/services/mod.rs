//! Catalog services: identity, classification, merging and safe writes

pub mod backup_guard;
pub mod curation;
pub mod example_attacher;
pub mod identity;
pub mod reconciler;
pub mod rule_engine;
pub mod rule_tables;

pub use backup_guard::{backup_path, guard_write, GuardOutcome, BACKUP_SUFFIX};
pub use curation::{apply_curation, CurationOverride};
pub use example_attacher::attach_examples;
pub use identity::{aliases_for, derive_identifier, display_name_from_identifier, identifier_from_asset};
pub use reconciler::{CandidateRecord, Reconciler, Reconciliation};
pub use rule_engine::{
    classify, AssignmentOutcome, CategoryAssignment, CategoryRuleEngine, Classification, Confidence,
    TextSignals,
};
pub use rule_tables::rule_table;
