//! Per-domain catalog pipeline
//!
//! For each domain: load vocabulary and catalog, reconcile against the
//! domain's candidates, write the catalog behind the backup guard, refresh
//! the theory document. Domains are isolated: a failure in one is recorded
//! in the run report and the others still run.

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    builtin_skeleton, load_catalog, CatalogDefaults, Domain, DomainCatalog, DomainOutcome, DomainReport,
    RunReport, TheoryDocument, VocabularyConfig,
};
use crate::services::{
    apply_curation, attach_examples, guard_write, CandidateRecord, CurationOverride, Reconciler, Reconciliation,
};
use crate::sources::CandidateBatch;
use nldt_common::config::{resolve_first_existing, under_root, TomlConfig};
use nldt_common::fs::write_atomic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Report file written next to the catalogs
pub const REPORT_FILE_NAME: &str = "reconciliation_report.json";

/// Where catalogs, theory documents and the report live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub data_dir: PathBuf,
    pub theory_dir: PathBuf,
    pub report_path: PathBuf,
}

impl PipelinePaths {
    pub fn new(data_dir: impl Into<PathBuf>, theory_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            report_path: data_dir.join(REPORT_FILE_NAME),
            theory_dir: theory_dir.into(),
            data_dir,
        }
    }

    /// Resolve against the root folder
    ///
    /// The data directory must exist; the theory directory is created on
    /// first write.
    pub fn resolve(root: &Path, config: &TomlConfig) -> CatalogResult<Self> {
        let data_candidates = match &config.data_dir {
            Some(dir) => vec![under_root(root, dir)],
            None => vec![root.join("app").join("data"), root.join("data")],
        };
        let data_dir = resolve_first_existing("data directory", &data_candidates)?;
        let theory_dir = match &config.theory_dir {
            Some(dir) => under_root(root, dir),
            None => root.join("app").join("theory"),
        };
        Ok(Self::new(data_dir, theory_dir))
    }

    pub fn catalog_path(&self, domain: Domain) -> PathBuf {
        self.data_dir.join(domain.catalog_file_name())
    }

    pub fn theory_path(&self, domain: Domain) -> PathBuf {
        self.theory_dir.join(format!("{}.json", domain.as_str()))
    }
}

/// A domain that could not be reconciled, with what was known before
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DomainFailure {
    pub error: CatalogError,
    pub partial: DomainReport,
}

/// What to reconcile a domain against
#[derive(Debug, Clone)]
pub enum DomainInput {
    /// Re-assert the catalog's own records; fixes and fills categories
    Reclassify,
    /// Full candidate set from a scrape or image scan
    Candidates(CandidateBatch),
    /// Curator overrides applied on top of the catalog
    Curation(Vec<CurationOverride>),
}

pub struct CatalogPipeline {
    paths: PipelinePaths,
    vocabulary: VocabularyConfig,
    defaults: CatalogDefaults,
}

impl CatalogPipeline {
    pub fn new(paths: PipelinePaths, vocabulary: VocabularyConfig, defaults: CatalogDefaults) -> Self {
        Self {
            paths,
            vocabulary,
            defaults,
        }
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Missing file means a domain without records yet
    fn load_existing(&self, domain: Domain, path: &Path) -> CatalogResult<DomainCatalog> {
        if path.exists() {
            load_catalog(domain, path, self.defaults)
        } else {
            info!(domain = %domain, path = %path.display(), "No catalog yet, starting empty");
            Ok(DomainCatalog::empty(self.defaults))
        }
    }

    /// Reconcile one domain and persist the result
    ///
    /// Every error path returns before the catalog rename, so a failed
    /// domain's catalog is unchanged on disk. The failure still carries what
    /// was known beforehand (the batch's skipped items). A theory document
    /// that cannot be refreshed after the catalog was written is recorded
    /// in the report instead of failing the domain.
    pub fn run_domain(&self, domain: Domain, mut input: DomainInput) -> Result<DomainReport, DomainFailure> {
        let mut collected = DomainReport::default();
        if let DomainInput::Candidates(batch) = &mut input {
            collected.skipped = std::mem::take(&mut batch.skipped);
        }

        let reconciliation = match self.reconcile_and_write(domain, input) {
            Ok(r) => r,
            Err(error) => {
                return Err(DomainFailure {
                    error,
                    partial: collected,
                })
            }
        };

        let mut report = reconciliation.report;
        report.skipped.extend(collected.skipped);

        if let Err(e) = self.refresh_theory(domain, &reconciliation.catalog) {
            warn!(domain = %domain, error = %e, "Catalog written, theory document not refreshed");
            report.theory_error = Some(e.to_string());
        }

        info!(domain = %domain, "Domain complete: {}", report.summary().display_string());
        Ok(report)
    }

    fn reconcile_and_write(&self, domain: Domain, input: DomainInput) -> CatalogResult<Reconciliation> {
        let vocabulary = self.vocabulary.for_domain(domain)?;
        let catalog_path = self.paths.catalog_path(domain);
        let existing = self.load_existing(domain, &catalog_path)?;
        let reconciler = Reconciler::new(domain, &vocabulary);

        let reconciliation = match input {
            DomainInput::Reclassify => {
                let candidates = existing.questions.iter().map(CandidateRecord::from_existing).collect();
                reconciler.reconcile(&existing, candidates)
            }
            DomainInput::Candidates(batch) => reconciler.reconcile(&existing, batch.candidates),
            DomainInput::Curation(overrides) => {
                let mut curated = existing.clone();
                let outcome = apply_curation(&mut curated, &overrides, &vocabulary);
                let candidates = curated.questions.iter().map(CandidateRecord::from_existing).collect();
                let mut result = reconciler.reconcile(&curated, candidates);

                let report = &mut result.report;
                for identifier in &outcome.applied {
                    if let Some(pos) = report.unchanged.iter().position(|u| u == identifier) {
                        report.unchanged.remove(pos);
                        report.updated.push(identifier.clone());
                    }
                }
                report.curation = Some(outcome);
                result
            }
        };

        let json = reconciliation.catalog.to_json_pretty()?;
        let guard = guard_write(&catalog_path, json.as_bytes())?;
        if guard.backup_created {
            info!(domain = %domain, "Created catalog backup");
        }
        Ok(reconciliation)
    }

    /// Reuse the domain's theory document as skeleton, else the built-in one
    fn refresh_theory(&self, domain: Domain, catalog: &DomainCatalog) -> CatalogResult<()> {
        let path = self.paths.theory_path(domain);
        let mut theory = match std::fs::read_to_string(&path) {
            Ok(text) => TheoryDocument::from_json_str(&text).unwrap_or_else(|e| {
                warn!(domain = %domain, path = %path.display(), error = %e, "Unreadable theory document, using built-in skeleton");
                builtin_skeleton(domain)
            }),
            Err(_) => builtin_skeleton(domain),
        };

        attach_examples(&mut theory, &catalog.questions);

        let json = theory.to_json_pretty()?;
        write_atomic(&path, json.as_bytes()).map_err(|source| CatalogError::Write { path, source })
    }

    /// Run every input, then write the run report
    ///
    /// Only a failure to write the report itself is returned as an error.
    pub fn run(&self, inputs: Vec<(Domain, DomainInput)>) -> CatalogResult<RunReport> {
        let mut run = RunReport::new();

        for (domain, input) in inputs {
            let outcome = match self.run_domain(domain, input) {
                Ok(details) => DomainOutcome::ok(details),
                Err(failure) => {
                    error!(domain = %domain, error = %failure.error, "Domain failed, catalog left untouched");
                    DomainOutcome::failed(failure.error, failure.partial)
                }
            };
            run.domains.insert(domain.as_str().to_string(), outcome);
        }

        let json = serde_json::to_string_pretty(&run)?;
        write_atomic(&self.paths.report_path, json.as_bytes()).map_err(|source| CatalogError::Write {
            path: self.paths.report_path.clone(),
            source,
        })?;
        info!(path = %self.paths.report_path.display(), "Wrote reconciliation report");

        Ok(run)
    }
}
