//! Catalog boundary: resolves every supported document shape into a
//! canonical [`DomainCatalog`]
//!
//! Supported shapes:
//! - canonical object with `questions`, `quizLength`, `mcqOptions`
//! - a bare list of records
//! - an object with the list under `items`, `vehicles`, `data`, `records` or `entries`
//! - an object with any other key holding a list of objects
//! - an object with `categories: { bucket: [records] }`
//!
//! Nothing past this module sees the raw shapes.

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogDefaults, Domain, DomainCatalog, ItemRecord};
use crate::services::identity::{display_name_from_identifier, normalize_alias};
use serde_json::{Map, Value};
use std::path::Path;

const LIST_KEYS: [&str; 5] = ["items", "vehicles", "data", "records", "entries"];
/// Canonical records are keyed by `asset` only; `id` is the question id
const CANONICAL_IDENTIFIER_KEYS: [&str; 1] = ["asset"];
const LEGACY_IDENTIFIER_KEYS: [&str; 3] = ["asset", "id", "slug"];
const NAME_KEYS: [&str; 3] = ["answer", "name", "title"];
const CATEGORY_KEYS: [&str; 2] = ["class", "category"];
const KIND_KEYS: [&str; 5] = ["type", "vehicleType", "aircraftType", "shipType", "platformType"];
const TAG_KEYS: [&str; 6] = ["roles", "nato_roles", "natoRoles", "role", "tags", "keywords"];
const SOURCE_KEYS: [&str; 3] = ["source_page", "sourcePage", "url"];

/// Parse a persisted catalog file's text
pub fn parse_catalog(
    domain: Domain,
    path: &Path,
    text: &str,
    defaults: CatalogDefaults,
) -> CatalogResult<DomainCatalog> {
    let value: Value = serde_json::from_str(text).map_err(|e| malformed(path, e.to_string()))?;
    catalog_from_value(domain, path, value, defaults)
}

/// Read and parse a persisted catalog file
pub fn load_catalog(domain: Domain, path: &Path, defaults: CatalogDefaults) -> CatalogResult<DomainCatalog> {
    let text = std::fs::read_to_string(path)?;
    parse_catalog(domain, path, &text, defaults)
}

/// Normalise an already decoded document
pub fn catalog_from_value(
    domain: Domain,
    path: &Path,
    value: Value,
    defaults: CatalogDefaults,
) -> CatalogResult<DomainCatalog> {
    match value {
        Value::Array(list) => legacy_catalog(domain, path, &list, defaults),
        Value::Object(map) if map.contains_key("questions") => canonical_catalog(domain, path, &map),
        Value::Object(map) => {
            for key in LIST_KEYS {
                if let Some(Value::Array(list)) = map.get(key) {
                    return legacy_catalog(domain, path, list, defaults);
                }
            }

            for (_, v) in map.iter() {
                if let Value::Array(list) = v {
                    if matches!(list.first(), Some(Value::Object(_))) {
                        return legacy_catalog(domain, path, list, defaults);
                    }
                }
            }

            if let Some(Value::Object(buckets)) = map.get("categories") {
                let mut questions = Vec::new();
                for (bucket, items) in buckets {
                    let Value::Array(list) = items else {
                        continue;
                    };
                    let mut records =
                        records_from_list(domain, path, list, &LEGACY_IDENTIFIER_KEYS, Some(bucket.as_str()))?;
                    questions.append(&mut records);
                }
                return Ok(DomainCatalog {
                    quiz_length: defaults.quiz_length,
                    option_count: defaults.option_count,
                    classes: Vec::new(),
                    questions,
                });
            }

            Err(malformed(
                path,
                "unsupported shape: expected `questions`, a list, or a list under one of \
                 items/vehicles/data/records/entries/categories"
                    .to_string(),
            ))
        }
        _ => Err(malformed(path, "document is neither an object nor a list".to_string())),
    }
}

fn canonical_catalog(domain: Domain, path: &Path, map: &Map<String, Value>) -> CatalogResult<DomainCatalog> {
    let Some(Value::Array(list)) = map.get("questions") else {
        return Err(malformed(path, "`questions` is not a list".to_string()));
    };

    let quiz_length = required_u32(path, map, "quizLength")?;
    let option_count = required_u32(path, map, "mcqOptions")?;

    let classes = match map.get("classes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(_) => return Err(malformed(path, "`classes` is not a list".to_string())),
        None => Vec::new(),
    };

    Ok(DomainCatalog {
        quiz_length,
        option_count,
        classes,
        questions: records_from_list(domain, path, list, &CANONICAL_IDENTIFIER_KEYS, None)?,
    })
}

fn legacy_catalog(
    domain: Domain,
    path: &Path,
    list: &[Value],
    defaults: CatalogDefaults,
) -> CatalogResult<DomainCatalog> {
    tracing::debug!(path = %path.display(), "Normalising legacy catalog shape");
    Ok(DomainCatalog {
        quiz_length: defaults.quiz_length,
        option_count: defaults.option_count,
        classes: Vec::new(),
        questions: records_from_list(domain, path, list, &LEGACY_IDENTIFIER_KEYS, None)?,
    })
}

fn records_from_list(
    domain: Domain,
    path: &Path,
    list: &[Value],
    identifier_keys: &[&str],
    bucket: Option<&str>,
) -> CatalogResult<Vec<ItemRecord>> {
    list.iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(map) => record_from_map(domain, path, index, map, identifier_keys, bucket),
            _ => Err(malformed(path, format!("record {index} is not an object"))),
        })
        .collect()
}

fn record_from_map(
    domain: Domain,
    path: &Path,
    index: usize,
    map: &Map<String, Value>,
    identifier_keys: &[&str],
    bucket: Option<&str>,
) -> CatalogResult<ItemRecord> {
    let identifier = first_str(map, identifier_keys)
        .ok_or_else(|| malformed(path, format!("record {index} has no identifier")))?;

    let id = match map.get("id").and_then(Value::as_str).map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{}_{}", domain.id_prefix(), identifier),
    };

    let display_name = first_str(map, &NAME_KEYS).unwrap_or_else(|| display_name_from_identifier(&identifier));

    let category = first_str(map, &CATEGORY_KEYS)
        .or_else(|| bucket.map(str::to_string))
        .unwrap_or_default();

    let mut aliases: Vec<String> = match map.get("aliases") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_alias)
            .filter(|a| !a.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    aliases.sort();
    aliases.dedup();

    Ok(ItemRecord {
        id,
        identifier,
        category,
        display_name,
        aliases,
        source_locator: first_str(map, &SOURCE_KEYS),
        kind: first_str(map, &KIND_KEYS),
        tags: first_str_list(map, &TAG_KEYS),
    })
}

/// First key holding a non-blank string, trimmed
fn first_str(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-null key, as a list (comma separated strings are split)
fn first_str_list(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match map.get(*key) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.trim().to_string(),
                        other => other.to_string(),
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            Some(Value::String(s)) => {
                return s
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

fn required_u32(path: &Path, map: &Map<String, Value>, key: &str) -> CatalogResult<u32> {
    map.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| malformed(path, format!("missing or invalid `{key}`")))
}

fn malformed(path: &Path, reason: String) -> CatalogError {
    CatalogError::MalformedCatalog {
        path: path.to_path_buf(),
        reason,
    }
}
