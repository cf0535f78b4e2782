//! Catalog reconciler
//!
//! Merges a freshly derived candidate set into the persisted catalog:
//! - identifiers in both keep their curated fields unless the candidate
//!   carries a non-empty override
//! - new identifiers are added
//! - identifiers missing from the candidates are retired
//!
//! The merged record set is exactly the candidate identifiers, in candidate
//! order. Re-running with the same candidates changes nothing.

use super::identity::{aliases_for, derive_identifier, display_name_from_identifier, normalize_alias};
use super::rule_engine::{AssignmentOutcome, CategoryRuleEngine, Confidence, TextSignals};
use crate::models::{
    ClassifiedEntry, Domain, DomainCatalog, DomainReport, InvalidFix, ItemRecord, LowConfidenceEntry,
    SkippedEntry, Vocabulary,
};
use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Freshly derived item, before merging
///
/// `display_name` and `category` are overrides: `None` (or blank) means
/// "keep whatever the catalog has".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateRecord {
    #[serde(alias = "asset")]
    pub identifier: String,

    #[serde(default, alias = "answer")]
    pub display_name: Option<String>,

    #[serde(default, alias = "class")]
    pub category: Option<String>,

    #[serde(default, alias = "source_page")]
    pub source_locator: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl CandidateRecord {
    /// Candidate from scraped text; identifier derived from the name
    pub fn scraped(display_name: &str, source_locator: Option<String>) -> Self {
        Self {
            identifier: derive_identifier(display_name),
            display_name: Some(display_name.trim().to_string()),
            source_locator,
            ..Self::default()
        }
    }

    /// Candidate backed by an existing asset; no overrides
    pub fn from_asset(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Candidate that re-asserts an existing record without overriding it
    pub fn from_existing(record: &ItemRecord) -> Self {
        Self {
            identifier: record.identifier.clone(),
            source_locator: record.source_locator.clone(),
            kind: record.kind.clone(),
            tags: record.tags.clone(),
            ..Self::default()
        }
    }
}

/// Merged catalog plus what happened to each record
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub catalog: DomainCatalog,
    pub report: DomainReport,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn merge_aliases(existing: &[String], display_name: &str) -> Vec<String> {
    let mut aliases: Vec<String> = existing
        .iter()
        .map(|a| normalize_alias(a))
        .filter(|a| !a.is_empty())
        .chain(aliases_for(display_name))
        .collect();
    aliases.sort();
    aliases.dedup();
    aliases
}

/// Reconciler for one domain
pub struct Reconciler<'a> {
    engine: CategoryRuleEngine<'a>,
    vocabulary: &'a Vocabulary,
}

impl<'a> Reconciler<'a> {
    pub fn new(domain: Domain, vocabulary: &'a Vocabulary) -> Self {
        Self {
            engine: CategoryRuleEngine::new(domain, vocabulary),
            vocabulary,
        }
    }

    pub fn domain(&self) -> Domain {
        self.engine.domain()
    }

    /// Merge `candidates` into `existing`
    pub fn reconcile(&self, existing: &DomainCatalog, candidates: Vec<CandidateRecord>) -> Reconciliation {
        let domain = self.domain();
        let mut report = DomainReport::default();

        // First record wins, same rule as for candidates
        let mut index: HashMap<&str, &ItemRecord> = HashMap::with_capacity(existing.questions.len());
        for q in &existing.questions {
            match index.entry(q.identifier.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(q);
                }
                Entry::Occupied(_) => {
                    warn!(domain = %domain, identifier = %q.identifier, "Dropping duplicate catalog record");
                    report
                        .skipped
                        .push(SkippedEntry::new(&q.identifier, "duplicate identifier in catalog"));
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        let mut questions = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let identifier = candidate.identifier.trim().to_string();
            if identifier.is_empty() {
                warn!(domain = %domain, "Skipping candidate without identifier");
                report.skipped.push(SkippedEntry::new("<empty>", "missing identifier"));
                continue;
            }
            if !seen.insert(identifier.clone()) {
                warn!(domain = %domain, identifier = %identifier, "Skipping duplicate candidate");
                report.skipped.push(SkippedEntry::new(identifier, "duplicate identifier"));
                continue;
            }

            let category_override = match non_blank(&candidate.category) {
                Some(c) if self.vocabulary.contains(c) => Some(c.to_string()),
                Some(c) => {
                    warn!(
                        domain = %domain,
                        identifier = %identifier,
                        category = c,
                        "Ignoring candidate category outside the vocabulary"
                    );
                    None
                }
                None => None,
            };
            let name_override = non_blank(&candidate.display_name).map(str::to_string);

            let (mut record, is_new, mut changed) = match index.get(identifier.as_str()) {
                Some(prev) => {
                    let mut record = (*prev).clone();
                    let mut changed = false;
                    if let Some(name) = name_override {
                        if name != record.display_name {
                            record.display_name = name;
                            changed = true;
                        }
                    }
                    if let Some(category) = category_override {
                        if category != record.category {
                            record.category = category;
                            changed = true;
                        }
                    }
                    (record, false, changed)
                }
                None => {
                    let display_name = name_override.unwrap_or_else(|| display_name_from_identifier(&identifier));
                    let record = ItemRecord {
                        id: format!("{}_{}", domain.id_prefix(), identifier),
                        identifier: identifier.clone(),
                        category: category_override.unwrap_or_default(),
                        display_name,
                        aliases: Vec::new(),
                        source_locator: None,
                        kind: None,
                        tags: Vec::new(),
                    };
                    (record, true, false)
                }
            };

            if candidate.source_locator.is_some() {
                record.source_locator = candidate.source_locator;
            }
            if candidate.kind.is_some() {
                record.kind = candidate.kind;
            }
            if !candidate.tags.is_empty() {
                record.tags = candidate.tags;
            }
            record.aliases = merge_aliases(&record.aliases, &record.display_name);

            let assignment = self.engine.assign(&record.category, &TextSignals::from_record(&record));
            record.category = assignment.category.clone();
            let reclassified = assignment.outcome != AssignmentOutcome::Kept;

            match &assignment.outcome {
                AssignmentOutcome::Kept => {}
                AssignmentOutcome::Classified => {
                    changed = true;
                    report.classified.push(ClassifiedEntry {
                        identifier: identifier.clone(),
                        category: assignment.category.clone(),
                        confidence: assignment.confidence,
                    });
                }
                AssignmentOutcome::Fixed { previous } => {
                    changed = true;
                    warn!(
                        domain = %domain,
                        identifier = %identifier,
                        previous = %previous,
                        category = %assignment.category,
                        "Replaced category outside the vocabulary"
                    );
                    report.invalid_fixed.push(InvalidFix {
                        identifier: identifier.clone(),
                        previous: previous.clone(),
                        category: assignment.category.clone(),
                        confidence: assignment.confidence,
                    });
                }
            }
            if reclassified && assignment.confidence == Confidence::Low {
                report.low_confidence.push(LowConfidenceEntry {
                    identifier: identifier.clone(),
                    category: assignment.category,
                });
            }

            if is_new {
                debug!(domain = %domain, identifier = %identifier, "Added record");
                report.added.push(identifier);
            } else if changed {
                report.updated.push(identifier);
            } else {
                report.unchanged.push(identifier);
            }

            questions.push(record);
        }

        let mut retired: HashSet<&str> = HashSet::new();
        for q in &existing.questions {
            if !seen.contains(&q.identifier) && retired.insert(q.identifier.as_str()) {
                debug!(domain = %domain, identifier = %q.identifier, "Retired record");
                report.retired.push(q.identifier.clone());
            }
        }

        info!(
            domain = %domain,
            "Reconciled catalog: {}",
            report.summary().display_string()
        );

        Reconciliation {
            catalog: DomainCatalog {
                quiz_length: existing.quiz_length,
                option_count: existing.option_count,
                classes: self.vocabulary.categories().to_vec(),
                questions,
            },
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogDefaults;

    fn sea_vocabulary() -> Vocabulary {
        Vocabulary::new([
            "Submarine",
            "Frigate",
            "Patrol Vessel",
            "Amphibious Ship",
            "Mine Countermeasures Vessel",
            "Support Vessel",
            "Other",
        ])
        .unwrap()
    }

    fn record(identifier: &str, name: &str, category: &str) -> ItemRecord {
        ItemRecord {
            id: format!("mn_{identifier}"),
            identifier: identifier.to_string(),
            category: category.to_string(),
            display_name: name.to_string(),
            aliases: aliases_for(name),
            source_locator: None,
            kind: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_merge_aliases_keeps_old_and_adds_new() {
        let merged = merge_aliases(&["Old  Name".to_string()], "New Name (NN)");
        assert_eq!(merged, vec!["new name", "new name (nn)", "old name"]);
    }

    #[test]
    fn test_candidate_category_outside_vocabulary_is_ignored() {
        let vocab = sea_vocabulary();
        let mut existing = DomainCatalog::empty(CatalogDefaults::default());
        existing.questions.push(record("tromp", "Zr.Ms. Tromp", "Frigate"));

        let candidate = CandidateRecord {
            identifier: "tromp".to_string(),
            category: Some("Destroyer".to_string()),
            ..CandidateRecord::default()
        };
        let result = Reconciler::new(Domain::Marine, &vocab).reconcile(&existing, vec![candidate]);

        assert_eq!(result.catalog.questions[0].category, "Frigate");
        assert_eq!(result.report.unchanged, vec!["tromp"]);
    }

    #[test]
    fn test_new_record_without_name_gets_readable_name() {
        let vocab = sea_vocabulary();
        let existing = DomainCatalog::empty(CatalogDefaults::default());
        let result = Reconciler::new(Domain::Marine, &vocab)
            .reconcile(&existing, vec![CandidateRecord::from_asset("karel-doorman")]);

        let q = &result.catalog.questions[0];
        assert_eq!(q.id, "mn_karel-doorman");
        assert_eq!(q.display_name, "Karel Doorman");
        assert_eq!(q.category, "Support Vessel");
        assert_eq!(q.aliases, vec!["karel doorman"]);
    }

    #[test]
    fn test_duplicates_and_blank_identifiers_skipped() {
        let vocab = sea_vocabulary();
        let existing = DomainCatalog::empty(CatalogDefaults::default());
        let result = Reconciler::new(Domain::Marine, &vocab).reconcile(
            &existing,
            vec![
                CandidateRecord::scraped("Zr.Ms. Holland", None),
                CandidateRecord::from_asset("  "),
                CandidateRecord::scraped("Zr.Ms. Holland", None),
            ],
        );

        assert_eq!(result.catalog.questions.len(), 1);
        assert_eq!(result.report.skipped.len(), 2);
        assert_eq!(result.report.skipped[1].reason, "duplicate identifier");
    }

    #[test]
    fn test_first_catalog_record_wins_over_duplicate() {
        let vocab = sea_vocabulary();
        let mut existing = DomainCatalog::empty(CatalogDefaults::default());
        existing.questions.push(record("tromp", "Curated Tromp", "Frigate"));
        existing.questions.push(record("tromp", "Stale Tromp", "Other"));
        let candidates = existing.questions.iter().map(CandidateRecord::from_existing).collect();

        let result = Reconciler::new(Domain::Marine, &vocab).reconcile(&existing, candidates);

        assert_eq!(result.catalog.questions.len(), 1);
        let q = &result.catalog.questions[0];
        assert_eq!(q.display_name, "Curated Tromp");
        assert_eq!(q.category, "Frigate");
        assert_eq!(result.report.skipped[0].reason, "duplicate identifier in catalog");
        assert!(result.report.retired.is_empty());
    }

    #[test]
    fn test_duplicate_catalog_record_retired_once() {
        let vocab = sea_vocabulary();
        let mut existing = DomainCatalog::empty(CatalogDefaults::default());
        existing.questions.push(record("tromp", "Zr.Ms. Tromp", "Frigate"));
        existing.questions.push(record("tromp", "Zr.Ms. Tromp", "Frigate"));

        let result = Reconciler::new(Domain::Marine, &vocab).reconcile(&existing, Vec::new());

        assert_eq!(result.report.retired, vec!["tromp"]);
    }

    #[test]
    fn test_scraped_candidate_derives_identifier() {
        let c = CandidateRecord::scraped(" Zr.Ms. Karel Doorman ", Some("https://x/y".to_string()));
        assert_eq!(c.identifier, "zr-ms-karel-doorman");
        assert_eq!(c.display_name.as_deref(), Some("Zr.Ms. Karel Doorman"));
    }
}
