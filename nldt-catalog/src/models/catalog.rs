//! Canonical catalog model
//!
//! Wire format (per domain file):
//! `{ quizLength, mcqOptions, classes: [..], questions: [{ id, asset, class, answer, aliases, source_page? }] }`

use serde::Serialize;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// Question id; generated once, then preserved verbatim
    pub id: String,

    /// Stable identifier, also the image asset base name
    #[serde(rename = "asset")]
    pub identifier: String,

    /// Category from the domain vocabulary
    #[serde(rename = "class")]
    pub category: String,

    /// Human-readable label
    #[serde(rename = "answer")]
    pub display_name: String,

    /// Lowercase answer variants, sorted
    pub aliases: Vec<String>,

    /// Page the item was scraped from; classification signal only
    #[serde(rename = "source_page", skip_serializing_if = "Option::is_none")]
    pub source_locator: Option<String>,

    /// Free-form platform type carried over from legacy documents
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Role/tag list carried over from legacy documents
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One domain's persisted catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCatalog {
    #[serde(rename = "quizLength")]
    pub quiz_length: u32,

    #[serde(rename = "mcqOptions")]
    pub option_count: u32,

    /// Controlled vocabulary, in display order
    pub classes: Vec<String>,

    pub questions: Vec<ItemRecord>,
}

/// Metadata used for catalogs that do not carry their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogDefaults {
    pub quiz_length: u32,
    pub option_count: u32,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            quiz_length: 10,
            option_count: 6,
        }
    }
}

impl DomainCatalog {
    /// Empty catalog, used when a domain has no file yet
    pub fn empty(defaults: CatalogDefaults) -> Self {
        Self {
            quiz_length: defaults.quiz_length,
            option_count: defaults.option_count,
            classes: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn find(&self, identifier: &str) -> Option<&ItemRecord> {
        self.questions.iter().find(|q| q.identifier == identifier)
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.identifier.as_str()).collect()
    }

    /// Pretty JSON, trailing newline, non-ASCII kept as-is
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}
