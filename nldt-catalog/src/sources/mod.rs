//! Candidate sources
//!
//! Where candidate records come from before reconciliation: a scrape over
//! item pages, or the set of image assets already on disk. Network access,
//! markup parsing and image processing sit behind traits so the collection
//! loop stays synchronous and testable.

pub mod image_scanner;

pub use image_scanner::ImageScanner;

use crate::models::SkippedEntry;
use crate::services::reconciler::CandidateRecord;
use nldt_common::config::{TomlConfig, DEFAULT_REQUEST_DELAY_MS};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Per-item source failure; always recoverable at the collection level
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Image transform failed: {0}")]
    Transform(String),

    #[error("Image store failed for {identifier}: {reason}")]
    Store { identifier: String, reason: String },

    #[error("Directory not readable {}: {reason}", .path.display())]
    Directory { path: PathBuf, reason: String },
}

/// Retrieves page markup and image bytes
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, SourceError>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

/// What an item page yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub display_name: String,
    pub image_locator: Option<String>,
}

/// Pulls the item name and image locator out of page markup
pub trait ItemExtractor {
    fn extract(&self, markup: &str) -> Option<ExtractedItem>;
}

/// Normalises raw image bytes (e.g. re-encode to RGB JPEG)
pub trait ImageTransform {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, SourceError>;
}

/// Stores a normalised image under its identifier
pub trait ImageSink {
    fn store(&self, identifier: &str, bytes: &[u8]) -> Result<(), SourceError>;
}

/// Leaves bytes untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTransform;

impl ImageTransform for PassthroughTransform {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, SourceError> {
        Ok(bytes.to_vec())
    }
}

/// Writes `<dir>/<identifier>.jpg`
#[derive(Debug, Clone)]
pub struct DirectoryImageSink {
    dir: PathBuf,
}

impl DirectoryImageSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}.jpg"))
    }
}

impl ImageSink for DirectoryImageSink {
    fn store(&self, identifier: &str, bytes: &[u8]) -> Result<(), SourceError> {
        nldt_common::fs::write_atomic(&self.path_for(identifier), bytes).map_err(|e| SourceError::Store {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Candidates from one source plus the items it had to leave out
#[derive(Debug, Clone, Default)]
pub struct CandidateBatch {
    pub candidates: Vec<CandidateRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl CandidateBatch {
    pub fn new(candidates: Vec<CandidateRecord>) -> Self {
        Self {
            candidates,
            skipped: Vec::new(),
        }
    }
}

/// Scrape collection loop over item pages
pub struct CandidateCollector<'a> {
    fetcher: &'a dyn PageFetcher,
    extractor: &'a dyn ItemExtractor,
    transform: &'a dyn ImageTransform,
    sink: &'a dyn ImageSink,
    delay: Duration,
}

impl<'a> CandidateCollector<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        extractor: &'a dyn ItemExtractor,
        transform: &'a dyn ImageTransform,
        sink: &'a dyn ImageSink,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            transform,
            sink,
            delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }

    /// Collector paced by the configured request delay
    pub fn from_config(
        fetcher: &'a dyn PageFetcher,
        extractor: &'a dyn ItemExtractor,
        transform: &'a dyn ImageTransform,
        sink: &'a dyn ImageSink,
        config: &TomlConfig,
    ) -> Self {
        Self::new(fetcher, extractor, transform, sink).with_delay(config.request_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pause between items
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Visit each page once, in order
    ///
    /// A page that cannot be fetched or parsed, or whose image cannot be
    /// fetched, transformed or stored, is skipped; the loop keeps going.
    pub fn collect(&self, page_urls: &[String]) -> CandidateBatch {
        let mut batch = CandidateBatch::default();
        let mut seen = HashSet::new();
        let pages: Vec<&str> = page_urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty() && seen.insert(*u))
            .collect();

        for (index, url) in pages.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }

            match self.collect_one(url) {
                Ok(candidate) => {
                    debug!(url, identifier = %candidate.identifier, "Collected candidate");
                    batch.candidates.push(candidate);
                }
                Err(e) => {
                    warn!(url, error = %e, "Skipping item page");
                    batch.skipped.push(SkippedEntry::new(*url, e.to_string()));
                }
            }
        }

        info!(
            pages = pages.len(),
            collected = batch.candidates.len(),
            skipped = batch.skipped.len(),
            "Candidate collection complete"
        );
        batch
    }

    fn collect_one(&self, url: &str) -> Result<CandidateRecord, SourceError> {
        let markup = self.fetcher.fetch(url)?;
        let item = self.extractor.extract(&markup).ok_or_else(|| SourceError::Fetch {
            url: url.to_string(),
            reason: "no item name on page".to_string(),
        })?;

        let candidate = CandidateRecord::scraped(&item.display_name, Some(url.to_string()));

        match item.image_locator {
            Some(image_url) => {
                let raw = self.fetcher.fetch_bytes(&image_url)?;
                let normalized = self.transform.normalize(&raw)?;
                self.sink.store(&candidate.identifier, &normalized)?;
            }
            None => debug!(url, "Item page has no image"),
        }

        Ok(candidate)
    }
}
