//! Manual curation overrides
//!
//! Rows of `(identifier, display name, category)` supplied by a curator.
//! Non-empty fields win over whatever the catalog holds; empty fields leave
//! the record alone. Reading the rows from a spreadsheet happens elsewhere.

use super::identity::aliases_for;
use crate::models::{CurationOutcome, DomainCatalog, SkippedEntry, Vocabulary};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CurationOverride {
    #[serde(alias = "asset")]
    pub identifier: String,

    #[serde(default, alias = "answer")]
    pub display_name: Option<String>,

    #[serde(default, alias = "class")]
    pub category: Option<String>,
}

impl CurationOverride {
    pub fn new(identifier: &str, display_name: &str, category: &str) -> Self {
        let opt = |s: &str| Some(s.to_string()).filter(|s| !s.trim().is_empty());
        Self {
            identifier: identifier.trim().to_string(),
            display_name: opt(display_name),
            category: opt(category),
        }
    }
}

/// Apply overrides in place
///
/// Categories outside the vocabulary are rejected so the catalog invariant
/// holds; the rest of that row still applies.
pub fn apply_curation(
    catalog: &mut DomainCatalog,
    overrides: &[CurationOverride],
    vocabulary: &Vocabulary,
) -> CurationOutcome {
    let mut outcome = CurationOutcome::default();

    for row in overrides {
        let identifier = row.identifier.trim();
        if identifier.is_empty() {
            continue;
        }

        let Some(record) = catalog.questions.iter_mut().find(|q| q.identifier == identifier) else {
            outcome.unmatched.push(identifier.to_string());
            continue;
        };

        let mut changed = false;

        if let Some(name) = row.display_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if name != record.display_name {
                record.display_name = name.to_string();
                let mut aliases = std::mem::take(&mut record.aliases);
                aliases.extend(aliases_for(name));
                aliases.sort();
                aliases.dedup();
                record.aliases = aliases;
                changed = true;
            }
        }

        if let Some(category) = row.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !vocabulary.contains(category) {
                warn!(identifier, category, "Rejecting curated category outside the vocabulary");
                outcome.rejected.push(SkippedEntry::new(
                    identifier,
                    format!("category '{category}' not in vocabulary"),
                ));
            } else if category != record.category {
                record.category = category.to_string();
                changed = true;
            }
        }

        if changed && !outcome.applied.iter().any(|a| a == identifier) {
            outcome.applied.push(identifier.to_string());
        }
    }

    info!(
        applied = outcome.applied.len(),
        unmatched = outcome.unmatched.len(),
        rejected = outcome.rejected.len(),
        "Applied curation overrides"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogDefaults, ItemRecord};

    fn catalog() -> DomainCatalog {
        let mut c = DomainCatalog::empty(CatalogDefaults::default());
        c.questions.push(ItemRecord {
            id: "af_ch-47".to_string(),
            identifier: "ch-47".to_string(),
            category: "Other".to_string(),
            display_name: "Ch 47".to_string(),
            aliases: vec!["ch 47".to_string()],
            source_locator: None,
            kind: None,
            tags: Vec::new(),
        });
        c
    }

    #[test]
    fn test_override_wins_and_refreshes_aliases() {
        let vocab = Vocabulary::new(["Helicopter", "Other"]).unwrap();
        let mut c = catalog();

        let outcome = apply_curation(
            &mut c,
            &[CurationOverride::new("ch-47", "CH-47F Chinook", "Helicopter")],
            &vocab,
        );

        let q = &c.questions[0];
        assert_eq!(q.display_name, "CH-47F Chinook");
        assert_eq!(q.category, "Helicopter");
        assert_eq!(q.aliases, vec!["ch 47", "ch-47f chinook"]);
        assert_eq!(outcome.applied, vec!["ch-47"]);
    }

    #[test]
    fn test_empty_fields_leave_record_alone() {
        let vocab = Vocabulary::new(["Helicopter", "Other"]).unwrap();
        let mut c = catalog();
        let before = c.clone();

        let outcome = apply_curation(&mut c, &[CurationOverride::new("ch-47", "", " ")], &vocab);

        assert_eq!(c, before);
        assert!(outcome.applied.is_empty());
    }

    #[test]
    fn test_unknown_identifier_and_bad_category_reported() {
        let vocab = Vocabulary::new(["Helicopter", "Other"]).unwrap();
        let mut c = catalog();

        let outcome = apply_curation(
            &mut c,
            &[
                CurationOverride::new("nh90", "NH90", "Helicopter"),
                CurationOverride::new("ch-47", "", "Heavy Lift"),
            ],
            &vocab,
        );

        assert_eq!(outcome.unmatched, vec!["nh90"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(c.questions[0].category, "Other");
    }
}
