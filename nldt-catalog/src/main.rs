//! nldt-catalog command-line entry point
//!
//! **Usage:**
//! ```bash
//! nldt-catalog [--root <dir>] [--config <file>] [--domain <name>]... <command>
//!
//! nldt-catalog reclassify
//! nldt-catalog sync-images [--images <dir>]
//! nldt-catalog merge --candidates <file.json>
//! nldt-catalog curate --overrides <file.json>
//! ```
//!
//! Candidate and override files are JSON objects keyed by domain name.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nldt_catalog::models::{CatalogDefaults, Domain, VocabularyConfig};
use nldt_catalog::pipeline::{CatalogPipeline, DomainInput, PipelinePaths};
use nldt_catalog::services::{CandidateRecord, CurationOverride};
use nldt_catalog::sources::ImageScanner;
use nldt_common::config::{config_file_candidates, load_or_default, LoggingConfig, RootFolderResolver, TomlConfig};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Catalog maintenance for the vehicle recognition quiz
#[derive(Parser, Debug)]
#[command(name = "nldt-catalog", version)]
struct Args {
    /// Root folder (overrides NLDT_ROOT and the config file)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/nldt.toml, then the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Restrict the run to these domains (default: all)
    #[arg(long = "domain", value_name = "NAME")]
    domains: Vec<Domain>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fix and fill categories of the existing catalogs
    Reclassify,

    /// Make each catalog match its image directory
    SyncImages {
        /// Directory holding one sub-directory per domain (default: <root>/app/images)
        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,
    },

    /// Merge a scraped candidate set
    Merge {
        #[arg(long, value_name = "FILE")]
        candidates: PathBuf,
    },

    /// Apply curator overrides
    Curate {
        #[arg(long, value_name = "FILE")]
        overrides: PathBuf,
    },
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<TomlConfig> {
    match &args.config {
        Some(path) => nldt_common::config::load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            // Root from CLI/env only; the config file may itself name the root
            let bootstrap_root = RootFolderResolver::new(args.root.clone()).resolve(&TomlConfig::default());
            load_or_default(&config_file_candidates(&bootstrap_root)).context("Failed to load config")
        }
    }
}

/// Read a `{ "<domain>": [..] }` file, keeping only the selected domains
fn read_keyed<T: DeserializeOwned>(path: &Path, domains: &[Domain]) -> Result<Vec<(Domain, Vec<T>)>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let keyed: BTreeMap<String, Vec<T>> =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut out = Vec::new();
    for (key, rows) in keyed {
        let domain: Domain = key.parse().with_context(|| format!("In {}", path.display()))?;
        if domains.contains(&domain) {
            out.push((domain, rows));
        }
    }
    Ok(out)
}

fn build_inputs(command: &Command, root: &Path, domains: &[Domain]) -> Result<Vec<(Domain, DomainInput)>> {
    let inputs = match command {
        Command::Reclassify => domains.iter().map(|d| (*d, DomainInput::Reclassify)).collect(),
        Command::SyncImages { images } => {
            let images_root = images.clone().unwrap_or_else(|| root.join("app").join("images"));
            let scanner = ImageScanner::new();
            let mut inputs = Vec::new();
            for domain in domains {
                let dir = images_root.join(domain.as_str());
                match scanner.candidates(&dir) {
                    Ok(batch) => inputs.push((*domain, DomainInput::Candidates(batch))),
                    // An empty candidate set would retire every record
                    Err(e) => warn!(domain = %domain, error = %e, "Skipping domain without image directory"),
                }
            }
            inputs
        }
        Command::Merge { candidates } => read_keyed::<CandidateRecord>(candidates, domains)?
            .into_iter()
            .map(|(d, rows)| (d, DomainInput::Candidates(nldt_catalog::CandidateBatch::new(rows))))
            .collect(),
        Command::Curate { overrides } => read_keyed::<CurationOverride>(overrides, domains)?
            .into_iter()
            .map(|(d, rows)| (d, DomainInput::Curation(rows)))
            .collect(),
    };
    Ok(inputs)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    init_logging(&config.logging)?;

    let root = RootFolderResolver::new(args.root.clone()).resolve(&config);
    info!("Starting nldt-catalog {}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", root.display());

    let vocabulary_candidates = VocabularyConfig::candidates(&root, config.vocabulary_path.as_deref());
    let vocabulary =
        VocabularyConfig::resolve_and_load(&vocabulary_candidates).context("Cannot run without a vocabulary")?;
    let paths = PipelinePaths::resolve(&root, &config).context("Cannot locate catalog directory")?;
    info!("Catalogs: {}", paths.data_dir.display());

    let domains: Vec<Domain> = if args.domains.is_empty() {
        Domain::ALL.to_vec()
    } else {
        args.domains.clone()
    };

    let inputs = build_inputs(&args.command, &root, &domains)?;
    let defaults = CatalogDefaults {
        quiz_length: config.quiz_length,
        option_count: config.mcq_options,
    };
    let pipeline = CatalogPipeline::new(paths, vocabulary, defaults);
    let report = pipeline.run(inputs).context("Failed to write reconciliation report")?;

    for (domain, outcome) in &report.domains {
        match &outcome.error {
            None => info!("{domain}: {}", outcome.summary.display_string()),
            Some(e) => error!("{domain}: failed: {e}"),
        }
    }

    if report.has_failures() {
        let failed = report.domains.values().filter(|d| d.error.is_some()).count();
        bail!("{failed} domain(s) failed, see {}", pipeline.paths().report_path.display());
    }
    Ok(())
}
