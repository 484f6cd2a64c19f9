//! CSV persistence for the history table, the AI cache and merged exports.

pub mod ai_cache;
pub mod history;

pub use ai_cache::AiCacheStore;
pub use history::HistoryStore;

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing::{debug, info};

use crate::ai::{AiCache, AiCandidateSet};
use crate::error::StoreError;
use crate::index::RecordIndex;
use crate::models::config::StorageConfig;
use crate::models::record::HistoryRecord;
use crate::suggest::SuggestionAggregator;

/// Rewrite `path` with a header row and `records`.
pub fn write_records(path: &Path, records: &[HistoryRecord]) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| StoreError::io(path, e))?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Open `path` for appending. Returns the file and whether a header is due.
fn open_for_append(path: &Path) -> Result<(File, bool), StoreError> {
    ensure_parent(path)?;
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    debug!("Appending to {} (header: {})", path.display(), needs_header);
    Ok((file, needs_header))
}

/// Both tables loaded and indexed, with the stores they came from.
///
/// Commits go to disk first and are then ingested, so the index always
/// matches what a fresh load would produce.
pub struct Workspace {
    history: HistoryStore,
    ai_store: AiCacheStore,
    index: RecordIndex,
    ai: AiCache,
}

impl Workspace {
    /// Load the history table and AI cache named by `storage`.
    pub fn open(storage: &StorageConfig) -> crate::Result<Self> {
        let history = HistoryStore::new(storage.history_path());
        let ai_store = AiCacheStore::new(storage.ai_cache_path());

        let index = RecordIndex::from_records(history.load()?);
        let ai = ai_store.load()?;

        Ok(Self {
            history,
            ai_store,
            index,
            ai,
        })
    }

    /// Append a record to the history table and index it.
    pub fn commit(&mut self, record: HistoryRecord) -> crate::Result<()> {
        self.history.append(&record)?;
        info!("History updated for {}", record.filename);
        self.index.ingest(record);
        Ok(())
    }

    /// Cache AI candidates for a file, replacing earlier ones.
    pub fn store_ai(&mut self, filename: &str, set: AiCandidateSet) -> crate::Result<()> {
        self.ai_store.append(filename, &set)?;
        self.ai.insert(filename, set);
        Ok(())
    }

    pub fn aggregator(&self) -> SuggestionAggregator<'_> {
        SuggestionAggregator::new(&self.index, &self.ai)
    }

    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    pub fn ai(&self) -> &AiCache {
        &self.ai
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactusError;
    use crate::models::record::{FieldForm, FieldKey};
    use pretty_assertions::assert_eq;

    fn storage(dir: &Path) -> StorageConfig {
        StorageConfig {
            data_dir: dir.join("data"),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_write_records_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("merged.csv");

        let mut record = HistoryRecord::new("a.pdf");
        record.provider = "Acme".to_string();
        write_records(&path, &[record.clone()]).unwrap();

        assert_eq!(HistoryStore::new(&path).load().unwrap(), vec![record]);
    }

    #[test]
    fn test_write_records_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");

        write_records(&path, &[HistoryRecord::new("a.pdf"), HistoryRecord::new("b.pdf")]).unwrap();
        write_records(&path, &[HistoryRecord::new("c.pdf")]).unwrap();

        let loaded = HistoryStore::new(&path).load().unwrap();
        assert_eq!(loaded, vec![HistoryRecord::new("c.pdf")]);
    }

    #[test]
    fn test_workspace_commit_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let mut workspace = Workspace::open(&storage).unwrap();
        assert!(workspace.index().is_empty());

        let mut form = FieldForm::new();
        form.provider = "Acme GmbH".to_string();
        form.total = "120,50".to_string();
        workspace.commit(form.to_record("inv.pdf")).unwrap();

        let mut set = AiCandidateSet::default();
        set.provider = vec!["ACME GMBH".to_string()];
        workspace.store_ai("inv.pdf", set).unwrap();

        let reopened = Workspace::open(&storage).unwrap();
        assert_eq!(reopened.index(), workspace.index());
        assert_eq!(reopened.ai(), workspace.ai());

        let list = reopened
            .aggregator()
            .build("inv.pdf", FieldKey::Provider, &FieldForm::new());
        assert_eq!(list.values().collect::<Vec<_>>(), vec!["Acme GmbH", "ACME GMBH"]);
    }

    #[test]
    fn test_workspace_commit_reports_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();
        let storage = StorageConfig {
            data_dir: blocker,
            ..StorageConfig::default()
        };

        let mut workspace = Workspace::open(&storage).unwrap();
        let result = workspace.commit(HistoryRecord::new("a.pdf"));
        assert!(matches!(result, Err(FactusError::Store(StoreError::Io { .. }))));
        assert!(workspace.index().is_empty());
    }
}
