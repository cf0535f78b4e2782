//! The three parallel catalogs

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the land/air/sea catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Landmacht,
    Luchtmacht,
    Marine,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Landmacht, Domain::Luchtmacht, Domain::Marine];

    /// Key used in the vocabulary file, report and theory file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Landmacht => "landmacht",
            Domain::Luchtmacht => "luchtmacht",
            Domain::Marine => "marine",
        }
    }

    /// Catalog file name inside the data directory
    pub fn catalog_file_name(&self) -> &'static str {
        match self {
            Domain::Landmacht => "landmacht.json",
            Domain::Luchtmacht => "luchtmacht.json",
            Domain::Marine => "marine.json",
        }
    }

    /// Prefix of generated question ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Domain::Landmacht => "lm",
            Domain::Luchtmacht => "af",
            Domain::Marine => "mn",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "landmacht" | "land" | "army" => Ok(Domain::Landmacht),
            "luchtmacht" | "air" | "air-force" => Ok(Domain::Luchtmacht),
            "marine" | "sea" | "navy" => Ok(Domain::Marine),
            other => Err(CatalogError::UnknownDomain(other.to_string())),
        }
    }
}
