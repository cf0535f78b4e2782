//! Category rule engine
//!
//! One engine, parameterised by a per-domain [`RuleTable`]. Signals are
//! normalised into one blob per precedence tier:
//!
//! 1. primary name/type plus role/tag list → primary rules, `high`
//! 2. source locator → locator rules, tier declared per rule
//!
//! The first matching rule wins. No match in either tier yields the domain
//! fallback with `low` confidence. Classification is a pure function of the
//! signals and the static tables.

use super::identity::normalize_alias;
use super::rule_tables::rule_table;
use crate::models::{Domain, ItemRecord, Vocabulary};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Self-reported certainty of a classification
///
/// Used for auditing only; never gates whether a category is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (category, keyword bag, tier) entry
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub confidence: Confidence,
}

impl KeywordRule {
    fn first_match(&self, blob: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|k| blob.contains(k))
    }
}

/// Ordered rules for one domain
#[derive(Debug)]
pub struct RuleTable {
    pub primary: &'static [KeywordRule],
    pub locator: &'static [KeywordRule],
    pub fallback: &'static str,
}

/// Text sources for one item, highest precedence first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSignals {
    /// Name and/or type field
    pub primary: String,
    /// Role/tag list
    pub tags: Vec<String>,
    /// Origin page; lowest priority
    pub source_locator: Option<String>,
}

impl TextSignals {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_source_locator(mut self, locator: impl Into<String>) -> Self {
        self.source_locator = Some(locator.into());
        self
    }

    /// Signals of a catalog record: display name and type, tags, source page
    pub fn from_record(record: &ItemRecord) -> Self {
        let primary = match &record.kind {
            Some(kind) => format!("{} {}", record.display_name, kind),
            None => record.display_name.clone(),
        };
        Self {
            primary,
            tags: record.tags.clone(),
            source_locator: record.source_locator.clone(),
        }
    }

    fn primary_blob(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.tags.len());
        parts.push(self.primary.as_str());
        parts.extend(self.tags.iter().map(String::as_str));
        normalize_alias(&parts.join(" "))
    }

    fn locator_blob(&self) -> String {
        self.source_locator.as_deref().map(normalize_alias).unwrap_or_default()
    }
}

/// Result of running the rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub confidence: Confidence,
    /// Keyword that decided the match, `None` for the fallback
    pub matched_keyword: Option<&'static str>,
}

/// Classify against the domain's static rule table
pub fn classify(domain: Domain, signals: &TextSignals) -> Classification {
    let table = rule_table(domain);

    let primary = signals.primary_blob();
    for rule in table.primary {
        if let Some(keyword) = rule.first_match(&primary) {
            return Classification {
                category: rule.category.to_string(),
                confidence: rule.confidence,
                matched_keyword: Some(keyword),
            };
        }
    }

    let locator = signals.locator_blob();
    if !locator.is_empty() {
        for rule in table.locator {
            if let Some(keyword) = rule.first_match(&locator) {
                return Classification {
                    category: rule.category.to_string(),
                    confidence: rule.confidence,
                    matched_keyword: Some(keyword),
                };
            }
        }
    }

    Classification {
        category: table.fallback.to_string(),
        confidence: Confidence::Low,
        matched_keyword: None,
    }
}

/// How a record's category was settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// Current category is in the vocabulary and was left alone
    Kept,
    /// Category was missing and has been filled in
    Classified,
    /// Category was not in the vocabulary and has been replaced
    Fixed { previous: String },
}

/// Category decision for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub category: String,
    pub confidence: Confidence,
    pub outcome: AssignmentOutcome,
}

/// Rule engine bound to one domain and its configured vocabulary
pub struct CategoryRuleEngine<'a> {
    domain: Domain,
    vocabulary: &'a Vocabulary,
}

impl<'a> CategoryRuleEngine<'a> {
    pub fn new(domain: Domain, vocabulary: &'a Vocabulary) -> Self {
        Self { domain, vocabulary }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Classify, constrained to the vocabulary
    ///
    /// A rule category missing from the configured vocabulary is replaced by
    /// the vocabulary's terminal entry with `low` confidence.
    pub fn classify(&self, signals: &TextSignals) -> Classification {
        let result = classify(self.domain, signals);
        if self.vocabulary.contains(&result.category) {
            return result;
        }

        warn!(
            domain = %self.domain,
            category = %result.category,
            fallback = %self.vocabulary.terminal(),
            "Rule category not in configured vocabulary; using terminal category"
        );
        Classification {
            category: self.vocabulary.terminal().to_string(),
            confidence: Confidence::Low,
            matched_keyword: result.matched_keyword,
        }
    }

    /// Settle a record's category
    ///
    /// A current category that belongs to the vocabulary always wins; only
    /// missing or invalid categories are (re)classified.
    pub fn assign(&self, current: &str, signals: &TextSignals) -> CategoryAssignment {
        let current = current.trim();
        if self.vocabulary.contains(current) {
            return CategoryAssignment {
                category: current.to_string(),
                confidence: Confidence::High,
                outcome: AssignmentOutcome::Kept,
            };
        }

        let result = self.classify(signals);
        debug!(
            domain = %self.domain,
            previous = current,
            category = %result.category,
            confidence = %result.confidence,
            keyword = result.matched_keyword.unwrap_or("-"),
            "Classified record"
        );

        let outcome = if current.is_empty() {
            AssignmentOutcome::Classified
        } else {
            AssignmentOutcome::Fixed {
                previous: current.to_string(),
            }
        };

        CategoryAssignment {
            category: result.category,
            confidence: result.confidence,
            outcome,
        }
    }
}
