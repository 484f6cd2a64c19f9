//! AI candidate cache table.
//!
//! One row per AI run; each cell holds a field's candidates joined by
//! [`CANDIDATE_SEPARATOR`]. A later row for the same file replaces the
//! earlier one on load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::open_for_append;
use crate::ai::{AiCache, AiCandidateSet};
use crate::error::StoreError;

/// Separator between candidates inside one cell.
pub const CANDIDATE_SEPARATOR: &str = " | ";

/// Column order of the AI cache table.
pub const AI_CACHE_HEADER: [&str; 7] = [
    "filename", "date", "provider", "invoice", "total", "taxid", "iban",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CacheRow {
    filename: String,
    date: String,
    provider: String,
    invoice: String,
    total: String,
    taxid: String,
    iban: String,
}

impl CacheRow {
    fn from_set(filename: &str, set: &AiCandidateSet) -> Self {
        let join = |values: &[String]| values.join(CANDIDATE_SEPARATOR);
        Self {
            filename: filename.to_string(),
            date: join(&set.date),
            provider: join(&set.provider),
            invoice: join(&set.invoice),
            total: join(&set.total),
            taxid: join(&set.taxid),
            iban: join(&set.iban),
        }
    }

    fn into_set(self) -> AiCandidateSet {
        AiCandidateSet {
            date: split_cell(&self.date),
            provider: split_cell(&self.provider),
            invoice: split_cell(&self.invoice),
            total: split_cell(&self.total),
            taxid: split_cell(&self.taxid),
            iban: split_cell(&self.iban),
        }
    }
}

fn split_cell(cell: &str) -> Vec<String> {
    cell.split(CANDIDATE_SEPARATOR)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append-only CSV cache of AI candidates.
#[derive(Debug, Clone)]
pub struct AiCacheStore {
    path: PathBuf,
}

impl AiCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache. A missing file is an empty cache.
    pub fn load(&self) -> Result<AiCache, StoreError> {
        let mut cache = AiCache::new();
        if !self.path.exists() {
            return Ok(cache);
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        for (row, result) in rdr.deserialize::<CacheRow>().enumerate() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping AI cache row {} in {}: {}", row + 1, self.path.display(), e);
                    continue;
                }
            };
            if entry.filename.trim().is_empty() {
                continue;
            }
            let filename = entry.filename.trim().to_string();
            cache.insert(filename, entry.into_set());
        }

        info!("Loaded AI cache: {} files", cache.len());
        Ok(cache)
    }

    /// Append the candidates for one file.
    pub fn append(&self, filename: &str, set: &AiCandidateSet) -> Result<(), StoreError> {
        let (file, needs_header) = open_for_append(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            wtr.write_record(AI_CACHE_HEADER)?;
        }
        wtr.serialize(CacheRow::from_set(filename, set))?;
        wtr.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::FieldKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_keeps_candidate_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = AiCacheStore::new(dir.path().join("ai_cache.csv"));

        let mut set = AiCandidateSet::default();
        set.total = vec!["120,50".to_string(), "120.50".to_string()];
        set.iban = vec!["DE89370400440532013000".to_string()];
        store.append("a.pdf", &set).unwrap();

        let cache = store.load().unwrap();
        assert_eq!(cache.get("a.pdf"), Some(&set));

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.lines().next(), Some(AI_CACHE_HEADER.join(",").as_str()));
        assert!(content.contains("120,50 | 120.50"));
    }

    #[test]
    fn test_later_rows_replace_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let store = AiCacheStore::new(dir.path().join("ai_cache.csv"));

        let mut first = AiCandidateSet::default();
        first.provider = vec!["Old".to_string()];
        let mut second = AiCandidateSet::default();
        second.provider = vec!["New".to_string()];

        store.append("a.pdf", &first).unwrap();
        store.append("a.pdf", &second).unwrap();

        let cache = store.load().unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.candidates("a.pdf", FieldKey::Provider), ["New".to_string()]);
    }

    #[test]
    fn test_load_skips_rows_without_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ai_cache.csv");
        std::fs::write(
            &path,
            "filename,date,provider,invoice,total,taxid,iban\n,2023-01-01,,,,,\nb.pdf,, Acme |  | Acme Corp ,,,,\n",
        )
        .unwrap();

        let cache = AiCacheStore::new(&path).load().unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.candidates("b.pdf", FieldKey::Provider),
            ["Acme".to_string(), "Acme Corp".to_string()]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AiCacheStore::new(dir.path().join("none.csv")).load().unwrap();
        assert!(cache.is_empty());
    }
}
