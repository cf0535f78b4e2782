//! Controlled vocabularies
//!
//! Loaded from `classification_options.json`, a JSON object mapping each
//! domain key to its ordered list of allowed categories. The last entry of a
//! list is the terminal catch-all.

use crate::error::{CatalogError, CatalogResult};
use crate::models::Domain;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Conventional vocabulary file name
pub const VOCABULARY_FILE_NAME: &str = "classification_options.json";

/// Ordered, closed set of categories for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    categories: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary; blank and repeated entries are dropped
    pub fn new<I, S>(categories: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for c in categories {
            let c = c.into().trim().to_string();
            if !c.is_empty() && !out.contains(&c) {
                out.push(c);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(Self { categories: out })
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Terminal catch-all entry
    pub fn terminal(&self) -> &str {
        // Non-empty by construction
        self.categories.last().map(String::as_str).unwrap_or_default()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// Vocabulary configuration for all domains
#[derive(Debug, Clone, Default)]
pub struct VocabularyConfig {
    domains: HashMap<String, Vec<String>>,
}

impl VocabularyConfig {
    pub fn from_json_str(text: &str) -> CatalogResult<Self> {
        let domains: HashMap<String, Vec<String>> = serde_json::from_str(text)?;
        Ok(Self { domains })
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            domains = config.domains.len(),
            "Loaded controlled vocabularies"
        );
        Ok(config)
    }

    /// Locate and load the vocabulary file
    ///
    /// Fails with a "not found" error when no candidate exists.
    pub fn resolve_and_load(candidates: &[PathBuf]) -> CatalogResult<Self> {
        let path = nldt_common::config::resolve_first_existing("controlled vocabulary", candidates)?;
        Self::load(&path)
    }

    /// Candidate locations in priority order
    pub fn candidates(root: &Path, configured: Option<&Path>) -> Vec<PathBuf> {
        let mut out = Vec::new();
        if let Some(path) = configured {
            out.push(nldt_common::config::under_root(root, path));
        }
        out.push(root.join("data").join(VOCABULARY_FILE_NAME));
        out.push(root.join("app").join("data").join(VOCABULARY_FILE_NAME));
        out
    }

    pub fn insert(&mut self, domain: Domain, categories: Vec<String>) {
        self.domains.insert(domain.as_str().to_string(), categories);
    }

    pub fn for_domain(&self, domain: Domain) -> CatalogResult<Vocabulary> {
        self.domains
            .get(domain.as_str())
            .and_then(|c| Vocabulary::new(c.iter().cloned()))
            .ok_or_else(|| CatalogError::MissingVocabulary(domain.as_str().to_string()))
    }
}
