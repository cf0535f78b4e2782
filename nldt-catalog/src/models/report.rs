//! Reconciliation report
//!
//! Advisory side artifact written next to the catalogs. Nothing in the
//! pipeline reads it back.

use crate::services::rule_engine::Confidence;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Existing record whose category was not in the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidFix {
    pub identifier: String,
    pub previous: String,
    pub category: String,
    pub confidence: Confidence,
}

/// Record whose missing category was filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEntry {
    pub identifier: String,
    pub category: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowConfidenceEntry {
    pub identifier: String,
    pub category: String,
}

/// Item left out of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Identifier, page URL or file, whatever identifies the item best
    pub item: String,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

/// Result of applying manual curation overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurationOutcome {
    /// Identifiers whose record was modified
    pub applied: Vec<String>,
    /// Override identifiers absent from the catalog
    pub unmatched: Vec<String>,
    /// Overrides whose category is outside the vocabulary
    pub rejected: Vec<SkippedEntry>,
}

/// Per-record outcome of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub added: Vec<String>,
    pub unchanged: Vec<String>,
    pub updated: Vec<String>,
    pub invalid_fixed: Vec<InvalidFix>,
    pub classified: Vec<ClassifiedEntry>,
    pub low_confidence: Vec<LowConfidenceEntry>,
    pub retired: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation: Option<CurationOutcome>,
    /// Set when the catalog was written but its theory document was not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theory_error: Option<String>,
}

impl DomainReport {
    pub fn summary(&self) -> DomainSummary {
        DomainSummary {
            added: self.added.len(),
            unchanged: self.unchanged.len(),
            updated: self.updated.len(),
            invalid_fixed: self.invalid_fixed.len(),
            classified: self.classified.len(),
            low_confidence: self.low_confidence.len(),
            retired: self.retired.len(),
            skipped: self.skipped.len(),
        }
    }

    /// True when a second run would have nothing to do
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.invalid_fixed.is_empty()
            && self.classified.is_empty()
            && self.retired.is_empty()
    }
}

/// Counts only, for logs and quick inspection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub added: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub invalid_fixed: usize,
    pub classified: usize,
    pub low_confidence: usize,
    pub retired: usize,
    pub skipped: usize,
}

impl DomainSummary {
    pub fn display_string(&self) -> String {
        format!(
            "added={} unchanged={} updated={} fixed={} classified={} low_confidence={} retired={} skipped={}",
            self.added,
            self.unchanged,
            self.updated,
            self.invalid_fixed,
            self.classified,
            self.low_confidence,
            self.retired,
            self.skipped
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Ok,
    Failed,
}

/// One domain's entry in the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainOutcome {
    pub status: DomainStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub summary: DomainSummary,
    pub details: DomainReport,
}

impl DomainOutcome {
    pub fn ok(details: DomainReport) -> Self {
        Self {
            status: DomainStatus::Ok,
            error: None,
            summary: details.summary(),
            details,
        }
    }

    /// Failed domain; `details` holds whatever was known before the failure
    pub fn failed(error: impl ToString, details: DomainReport) -> Self {
        Self {
            status: DomainStatus::Failed,
            error: Some(error.to_string()),
            summary: details.summary(),
            details,
        }
    }
}

/// Whole-run report, one entry per processed domain
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub domains: BTreeMap<String, DomainOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            domains: BTreeMap::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.domains.values().any(|d| d.status == DomainStatus::Failed)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
