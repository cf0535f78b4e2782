//! Theory example attacher
//!
//! Fills each theory section's worked example with the first catalog record
//! of that category. Sections are never added or removed; a category with
//! no records gets explicit nulls.

use crate::models::{ItemRecord, TheoryDocument};
use std::collections::HashMap;
use tracing::debug;

/// Attach one example per section, first record of the category wins
pub fn attach_examples(theory: &mut TheoryDocument, records: &[ItemRecord]) {
    let mut first_by_category: HashMap<&str, &ItemRecord> = HashMap::new();
    for record in records {
        first_by_category.entry(record.category.as_str()).or_insert(record);
    }

    for (category, section) in theory.items.iter_mut() {
        match first_by_category.get(category.as_str()) {
            Some(record) => {
                section.example_asset = Some(record.identifier.clone());
                section.example_answer = Some(record.display_name.clone());
            }
            None => {
                debug!(category = %category, "No record for theory section");
                section.example_asset = None;
                section.example_answer = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{builtin_skeleton, Domain};

    fn record(identifier: &str, category: &str, name: &str) -> ItemRecord {
        ItemRecord {
            id: format!("mn_{identifier}"),
            identifier: identifier.to_string(),
            category: category.to_string(),
            display_name: name.to_string(),
            aliases: Vec::new(),
            source_locator: None,
            kind: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_first_record_per_category_wins() {
        let mut theory = builtin_skeleton(Domain::Marine);
        let records = vec![
            record("zr-walrus", "Submarine", "Zr.Ms. Walrus"),
            record("zr-dolfijn", "Submarine", "Zr.Ms. Dolfijn"),
            record("zr-tromp", "Frigate", "Zr.Ms. Tromp"),
        ];

        attach_examples(&mut theory, &records);

        let sub = &theory.items["Submarine"];
        assert_eq!(sub.example_asset.as_deref(), Some("zr-walrus"));
        assert_eq!(sub.example_answer.as_deref(), Some("Zr.Ms. Walrus"));
        assert_eq!(theory.items["Frigate"].example_asset.as_deref(), Some("zr-tromp"));
    }

    #[test]
    fn test_empty_category_serialises_null() {
        let mut theory = builtin_skeleton(Domain::Marine);
        theory.items["Other"].example_asset = Some("stale".to_string());
        let sections = theory.items.len();

        attach_examples(&mut theory, &[record("zr-tromp", "Frigate", "Zr.Ms. Tromp")]);

        assert_eq!(theory.items.len(), sections);
        assert!(theory.items["Other"].example_asset.is_none());

        let json: serde_json::Value = serde_json::from_str(&theory.to_json_pretty().unwrap()).unwrap();
        assert!(json["items"]["Other"]["example_asset"].is_null());
        assert!(json["items"]["Other"]["example_answer"].is_null());
    }

    #[test]
    fn test_records_outside_sections_are_ignored() {
        let mut theory = builtin_skeleton(Domain::Marine);
        let before: Vec<String> = theory.items.keys().cloned().collect();

        attach_examples(&mut theory, &[record("x", "Unlisted", "X")]);

        let after: Vec<String> = theory.items.keys().cloned().collect();
        assert_eq!(before, after);
    }
}
