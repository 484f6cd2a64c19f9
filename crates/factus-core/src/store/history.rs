//! History table: one row per committed classification.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::open_for_append;
use crate::error::StoreError;
use crate::models::record::HistoryRecord;

/// Column order of the history table.
pub const HISTORY_HEADER: [&str; 10] = [
    "filename", "year", "month", "day", "provider", "invoice", "total", "card", "taxid", "iban",
];

/// Append-only CSV history table.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row in file order. A missing file is an empty table.
    ///
    /// Rows that cannot be decoded are logged and skipped.
    pub fn load(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        if !self.path.exists() {
            info!("No history table at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (row, result) in rdr.deserialize::<HistoryRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping history row {} in {}: {}", row + 1, self.path.display(), e),
            }
        }

        info!(
            "Loaded history rows: {} from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Append one record, writing the header first when the table is new.
    pub fn append(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        let (file, needs_header) = open_for_append(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            wtr.write_record(HISTORY_HEADER)?;
        }
        wtr.serialize(record)?;
        wtr.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(filename: &str, provider: &str) -> HistoryRecord {
        HistoryRecord {
            filename: filename.to_string(),
            year: "2023".to_string(),
            month: "02".to_string(),
            day: "23".to_string(),
            provider: provider.to_string(),
            total: "1.234,56".to_string(),
            ..HistoryRecord::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("missing.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.csv"));

        let first = record("a.pdf", "Acme, S.A.");
        let second = record("b.pdf", "Globex \"Intl\"");
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load().unwrap(), vec![first, second]);

        let content = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], HISTORY_HEADER.join(","));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_load_tolerates_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "filename,provider\na.pdf,Acme\n").unwrap();

        let loaded = HistoryStore::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].provider, "Acme");
        assert_eq!(loaded[0].iban, "");
    }
}
