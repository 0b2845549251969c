//! Part catalog: the immutable code → description reference data.
//!
//! A catalog is built once (from the builtin data or an external file),
//! validated, and then shared read-only by the matcher, the classifier
//! and the report builders.

mod builtin;

pub use builtin::BUILTIN_CATALOG_JSON;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::CatalogError;
use crate::models::order::Category;

/// One catalog line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Part code, unique (case-insensitive) within a catalog.
    pub code: String,
    /// Human readable description.
    pub description: String,
}

impl CatalogEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    /// Category of this entry.
    pub fn category(&self) -> Category {
        classify(&self.code, &self.description)
    }
}

/// Data-quality problem found while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// An entry had a blank code and was skipped.
    EmptyCode { description: String },
    /// A code was declared more than once; the first declaration was kept.
    Duplicate {
        code: String,
        kept: String,
        ignored: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode { description } => {
                write!(f, "skipped entry with empty code ('{}')", description)
            }
            Self::Duplicate {
                code,
                kept,
                ignored,
            } => write!(
                f,
                "duplicate code {}: kept '{}', ignored '{}'",
                code, kept, ignored
            ),
        }
    }
}

/// Immutable part catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Entries keyed by upper-cased code.
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from raw entries, collecting data-quality warnings.
    pub fn from_entries<I>(entries: I) -> Result<(Self, Vec<CatalogWarning>), CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut map: BTreeMap<String, CatalogEntry> = BTreeMap::new();
        let mut warnings = Vec::new();

        for entry in entries {
            let code = entry.code.trim().to_string();
            let description = entry.description.trim().to_string();

            if code.is_empty() {
                warnings.push(CatalogWarning::EmptyCode { description });
                continue;
            }

            let key = code.to_uppercase();
            if let Some(existing) = map.get(&key) {
                warnings.push(CatalogWarning::Duplicate {
                    code,
                    kept: existing.description.clone(),
                    ignored: description,
                });
                continue;
            }

            map.insert(key, CatalogEntry { code, description });
        }

        if map.is_empty() {
            return Err(CatalogError::Empty);
        }

        for warning in &warnings {
            warn!("Catalog: {}", warning);
        }
        debug!("Loaded catalog with {} entries", map.len());

        Ok((Self { entries: map }, warnings))
    }

    /// Parse a JSON array of `{"code", "description"}` objects.
    pub fn from_json_str(json: &str) -> Result<(Self, Vec<CatalogWarning>), CatalogError> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Parse CSV with a `code,description` header row.
    pub fn from_csv_str(data: &str) -> Result<(Self, Vec<CatalogWarning>), CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let entries = reader
            .deserialize::<CatalogEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Self::from_entries(entries)
    }

    /// Load a catalog file, choosing the format from the extension
    /// (`.csv` is CSV, anything else is JSON).
    pub fn from_path(path: &Path) -> crate::Result<(Self, Vec<CatalogWarning>)> {
        let content = std::fs::read_to_string(path)?;
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        let loaded = if is_csv {
            Self::from_csv_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        Ok(loaded)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        builtin::BUILTIN.clone()
    }

    /// Description for a code (case-insensitive).
    pub fn description(&self, code: &str) -> Option<&str> {
        self.get(code).map(|e| e.description.as_str())
    }

    /// Entry for a code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(&code.trim().to_uppercase())
    }

    /// Whether the catalog knows a code.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Category of a known code.
    pub fn category(&self, code: &str) -> Option<Category> {
        self.get(code).map(CatalogEntry::category)
    }

    /// Entries sorted by code.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first_and_warn() {
        let (catalog, warnings) = Catalog::from_entries(vec![
            CatalogEntry::new("B-PG-172", "Stand Bag"),
            CatalogEntry::new("b-pg-172", "Stand Bag (again)"),
            CatalogEntry::new("  ", "Nothing"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.description("B-PG-172"), Some("Stand Bag"));
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], CatalogWarning::Duplicate { .. }));
        assert!(matches!(warnings[1], CatalogWarning::EmptyCode { .. }));
    }

    #[test]
    fn test_empty_catalog_is_error() {
        let result = Catalog::from_entries(Vec::new());
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert!(catalog.contains("gb-doz-xtreme"));
        assert_eq!(catalog.category("GB-DOZ-XTREME"), Some(Category::Balls));
        assert_eq!(catalog.description("NOPE"), None);
    }

    #[test]
    fn test_from_csv() {
        let csv = "code,description\nA-UAC18-FM, PXG Wedge Brush - Chrome\nG4-1,Glove\n";
        let (catalog, warnings) = Catalog::from_csv_str(csv).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.description("A-UAC18-FM"), Some("PXG Wedge Brush - Chrome"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_iter_is_sorted() {
        let catalog = Catalog::builtin();
        let codes: Vec<&str> = catalog.iter().map(|e| e.code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort_by_key(|c| c.to_uppercase());
        assert_eq!(codes, sorted);
    }
}
