//! End-to-end pipeline runs against a temporary data directory

use nldt_catalog::models::{CatalogDefaults, Domain, DomainStatus, SkippedEntry, VocabularyConfig};
use nldt_catalog::CatalogError;
use nldt_catalog::pipeline::{CatalogPipeline, DomainInput, PipelinePaths};
use nldt_catalog::services::{CandidateRecord, CurationOverride};
use nldt_catalog::sources::{CandidateBatch, ImageScanner};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VOCABULARY: &str = r#"{
    "landmacht": ["Combat vehicle", "Infantry / Troop transport", "Support vehicle"],
    "luchtmacht": ["Fighter Aircraft", "Helicopter", "Transport Aircraft", "Trainer Aircraft",
                   "Uncrewed Aerial System (UAS)", "Other"],
    "marine": ["Submarine", "Frigate", "Patrol Vessel", "Amphibious Ship",
               "Mine Countermeasures Vessel", "Support Vessel", "Other"]
}"#;

struct Fixture {
    _root: TempDir,
    paths: PipelinePaths,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let data = root.path().join("app/data");
        fs::create_dir_all(&data).unwrap();
        let paths = PipelinePaths::new(data, root.path().join("app/theory"));
        Self { _root: root, paths }
    }

    fn pipeline(&self) -> CatalogPipeline {
        self.pipeline_with(VocabularyConfig::from_json_str(VOCABULARY).unwrap())
    }

    fn pipeline_with(&self, vocabulary: VocabularyConfig) -> CatalogPipeline {
        CatalogPipeline::new(self.paths.clone(), vocabulary, CatalogDefaults::default())
    }

    fn write_catalog(&self, domain: Domain, value: &Value) {
        fs::write(self.paths.catalog_path(domain), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }
}

fn air_catalog() -> Value {
    json!({
        "quizLength": 12,
        "mcqOptions": 4,
        "classes": ["Fighter Aircraft", "Other"],
        "questions": [
            {"id": "af_f-35", "asset": "f-35", "class": "Fighter Aircraft", "answer": "F-35 Lightning II", "aliases": ["f-35 lightning ii"]},
            {"id": "af_ch-47", "asset": "ch-47", "class": "Bogus", "answer": "CH-47 Chinook", "aliases": []}
        ]
    })
}

#[test]
fn test_reclassify_writes_catalog_backup_theory_and_report() {
    let fx = Fixture::new();
    fx.write_catalog(Domain::Luchtmacht, &air_catalog());

    let report = fx
        .pipeline()
        .run(vec![(Domain::Luchtmacht, DomainInput::Reclassify)])
        .unwrap();

    assert!(!report.has_failures());
    let outcome = &report.domains["luchtmacht"];
    assert_eq!(outcome.summary.invalid_fixed, 1);
    assert_eq!(outcome.summary.unchanged, 1);

    let catalog = fx.read_json(&fx.paths.catalog_path(Domain::Luchtmacht));
    assert_eq!(catalog["quizLength"], 12);
    assert_eq!(catalog["mcqOptions"], 4);
    assert_eq!(catalog["classes"].as_array().unwrap().len(), 6);
    assert_eq!(catalog["questions"][1]["class"], "Helicopter");

    let backup = fx.read_json(&fx.paths.data_dir.join("luchtmacht.json.bak"));
    assert_eq!(backup, air_catalog());

    let theory = fx.read_json(&fx.paths.theory_path(Domain::Luchtmacht));
    assert_eq!(theory["items"]["Helicopter"]["example_asset"], "ch-47");
    assert!(theory["items"]["Other"]["example_asset"].is_null());

    let written = fx.read_json(&fx.paths.report_path);
    assert_eq!(written["domains"]["luchtmacht"]["status"], "ok");
}

#[test]
fn test_backup_created_once() {
    let fx = Fixture::new();
    fx.write_catalog(Domain::Luchtmacht, &air_catalog());
    let pipeline = fx.pipeline();

    pipeline.run_domain(Domain::Luchtmacht, DomainInput::Reclassify).unwrap();
    let first_output = fs::read_to_string(fx.paths.catalog_path(Domain::Luchtmacht)).unwrap();
    let second = pipeline.run_domain(Domain::Luchtmacht, DomainInput::Reclassify).unwrap();

    let backup = fx.read_json(&fx.paths.data_dir.join("luchtmacht.json.bak"));
    assert_eq!(backup, air_catalog());
    assert!(second.is_noop());
    assert_eq!(fs::read_to_string(fx.paths.catalog_path(Domain::Luchtmacht)).unwrap(), first_output);
}

#[test]
fn test_malformed_catalog_untouched_other_domains_still_run() {
    let fx = Fixture::new();
    let broken = r#"{"questions": [], "quizLength": 10}"#;
    fs::write(fx.paths.catalog_path(Domain::Marine), broken).unwrap();
    fx.write_catalog(Domain::Luchtmacht, &air_catalog());

    let report = fx
        .pipeline()
        .run(vec![
            (Domain::Marine, DomainInput::Reclassify),
            (Domain::Luchtmacht, DomainInput::Reclassify),
        ])
        .unwrap();

    assert!(report.has_failures());
    assert_eq!(report.domains["marine"].status, DomainStatus::Failed);
    assert!(report.domains["marine"].error.as_deref().unwrap().contains("mcqOptions"));
    assert_eq!(report.domains["luchtmacht"].status, DomainStatus::Ok);

    assert_eq!(fs::read_to_string(fx.paths.catalog_path(Domain::Marine)).unwrap(), broken);
    assert!(!fx.paths.data_dir.join("marine.json.bak").exists());
}

#[test]
fn test_domain_without_vocabulary_fails() {
    let fx = Fixture::new();
    let vocabulary = VocabularyConfig::from_json_str(r#"{"marine": ["Frigate", "Other"]}"#).unwrap();

    let report = fx
        .pipeline_with(vocabulary)
        .run(vec![(Domain::Landmacht, DomainInput::Reclassify)])
        .unwrap();

    assert_eq!(report.domains["landmacht"].status, DomainStatus::Failed);
    assert!(!fx.paths.catalog_path(Domain::Landmacht).exists());
}

#[test]
fn test_legacy_list_normalised_on_write() {
    let fx = Fixture::new();
    fx.write_catalog(
        Domain::Landmacht,
        &json!({"vehicles": [
            {"slug": "leopard-2a6", "name": "Leopard 2A6", "type": "Main battle tank"},
            {"slug": "boxer", "name": "Boxer", "roles": "troop transport, command"}
        ]}),
    );

    fx.pipeline().run_domain(Domain::Landmacht, DomainInput::Reclassify).unwrap();

    let catalog = fx.read_json(&fx.paths.catalog_path(Domain::Landmacht));
    assert_eq!(catalog["quizLength"], 10);
    assert_eq!(catalog["questions"][0]["asset"], "leopard-2a6");
    assert_eq!(catalog["questions"][0]["id"], "lm_leopard-2a6");
    assert_eq!(catalog["questions"][0]["class"], "Combat vehicle");
    assert_eq!(catalog["questions"][1]["class"], "Infantry / Troop transport");
}

#[test]
fn test_image_sync_adds_and_retires() {
    let fx = Fixture::new();
    fx.write_catalog(Domain::Marine, &json!({
        "quizLength": 10, "mcqOptions": 6, "classes": [],
        "questions": [
            {"id": "mn_old-ship", "asset": "old-ship", "class": "Other", "answer": "Old Ship", "aliases": ["old ship"]}
        ]
    }));
    let images = TempDir::new().unwrap();
    fs::write(images.path().join("zr-ms-holland.jpg"), b"x").unwrap();

    let batch = ImageScanner::new().candidates(images.path()).unwrap();
    let details = fx.pipeline().run_domain(Domain::Marine, DomainInput::Candidates(batch)).unwrap();

    assert_eq!(details.added, vec!["zr-ms-holland"]);
    assert_eq!(details.retired, vec!["old-ship"]);
    let catalog = fx.read_json(&fx.paths.catalog_path(Domain::Marine));
    assert_eq!(catalog["questions"][0]["answer"], "Zr Ms Holland");
    assert_eq!(catalog["questions"][0]["class"], "Other");
}

#[test]
fn test_candidate_skips_reported() {
    let fx = Fixture::new();
    let mut batch = CandidateBatch::new(vec![CandidateRecord::scraped("Zr.Ms. Karel Doorman", None)]);
    batch.skipped.push(SkippedEntry::new("https://example.org/p/9", "404"));

    let details = fx.pipeline().run_domain(Domain::Marine, DomainInput::Candidates(batch)).unwrap();

    assert_eq!(details.added, vec!["zr-ms-karel-doorman"]);
    assert_eq!(details.skipped.len(), 1);
}

#[test]
fn test_curation_override_wins() {
    let fx = Fixture::new();
    fx.write_catalog(Domain::Luchtmacht, &air_catalog());

    let details = fx
        .pipeline()
        .run_domain(
            Domain::Luchtmacht,
            DomainInput::Curation(vec![
                CurationOverride::new("f-35", "F-35A Lightning II", ""),
                CurationOverride::new("ch-47", "", "Transport Aircraft"),
                CurationOverride::new("missing", "X", ""),
            ]),
        )
        .unwrap();

    let catalog = fx.read_json(&fx.paths.catalog_path(Domain::Luchtmacht));
    assert_eq!(catalog["questions"][0]["answer"], "F-35A Lightning II");
    assert_eq!(catalog["questions"][1]["class"], "Transport Aircraft");

    let curation = details.curation.unwrap();
    assert_eq!(curation.applied, vec!["f-35", "ch-47"]);
    assert_eq!(curation.unmatched, vec!["missing"]);
    assert!(details.invalid_fixed.is_empty());
    assert!(details.updated.contains(&"f-35".to_string()));
}

#[test]
fn test_existing_theory_document_reused_as_skeleton() {
    let fx = Fixture::new();
    fx.write_catalog(Domain::Luchtmacht, &air_catalog());
    fs::create_dir_all(&fx.paths.theory_dir).unwrap();
    fs::write(
        fx.paths.theory_path(Domain::Luchtmacht),
        json!({
            "title": "Custom",
            "intro": ["Hello"],
            "items": {"Fighter Aircraft": {"bullets": ["Fast"], "why_not": "", "example_asset": null, "example_answer": null}}
        })
        .to_string(),
    )
    .unwrap();

    fx.pipeline().run_domain(Domain::Luchtmacht, DomainInput::Reclassify).unwrap();

    let theory = fx.read_json(&fx.paths.theory_path(Domain::Luchtmacht));
    assert_eq!(theory["title"], "Custom");
    assert_eq!(theory["items"].as_object().unwrap().len(), 1);
    assert_eq!(theory["items"]["Fighter Aircraft"]["example_answer"], "F-35 Lightning II");
}

#[test]
fn test_failed_domain_keeps_batch_skips_in_report() {
    let fx = Fixture::new();
    fs::write(fx.paths.catalog_path(Domain::Marine), r#"{"questions": []}"#).unwrap();
    let mut batch = CandidateBatch::new(vec![CandidateRecord::scraped("Zr.Ms. Tromp", None)]);
    batch.skipped.push(SkippedEntry::new("p/1", "404"));
    batch.skipped.push(SkippedEntry::new("p/2", "no item name on page"));

    let report = fx
        .pipeline()
        .run(vec![(Domain::Marine, DomainInput::Candidates(batch))])
        .unwrap();

    let marine = &report.domains["marine"];
    assert_eq!(marine.status, DomainStatus::Failed);
    assert_eq!(marine.summary.skipped, 2);
    assert_eq!(marine.details.skipped[0].item, "p/1");

    let written = fx.read_json(&fx.paths.report_path);
    assert_eq!(written["domains"]["marine"]["summary"]["skipped"], 2);
}

#[test]
fn test_theory_failure_after_catalog_write_is_not_a_domain_failure() {
    let fx = Fixture::new();
    fs::write(&fx.paths.theory_dir, b"not a directory").unwrap();
    let batch = CandidateBatch::new(vec![CandidateRecord::scraped("Zr.Ms. Tromp fregat", None)]);

    let report = fx
        .pipeline()
        .run(vec![(Domain::Marine, DomainInput::Candidates(batch))])
        .unwrap();

    let marine = &report.domains["marine"];
    assert_eq!(marine.status, DomainStatus::Ok);
    assert_eq!(marine.summary.added, 1);
    assert!(marine.details.theory_error.is_some());

    let catalog = fx.read_json(&fx.paths.catalog_path(Domain::Marine));
    assert_eq!(catalog["questions"][0]["asset"], "zr-ms-tromp-fregat");
}

#[test]
fn test_run_domain_failure_carries_partial_report() {
    let fx = Fixture::new();
    let vocabulary = VocabularyConfig::from_json_str(r#"{"marine": ["Frigate", "Other"]}"#).unwrap();
    let mut batch = CandidateBatch::default();
    batch.skipped.push(SkippedEntry::new("p/9", "timeout"));

    let failure = fx
        .pipeline_with(vocabulary)
        .run_domain(Domain::Landmacht, DomainInput::Candidates(batch))
        .unwrap_err();

    assert!(matches!(failure.error, CatalogError::MissingVocabulary(_)));
    assert_eq!(failure.partial.skipped.len(), 1);
}
