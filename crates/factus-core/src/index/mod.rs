//! Record index over committed history.
//!
//! Derived state only: every table here is a pure function of the ingested
//! record sequence, so incremental ingestion and a full rebuild agree.

pub mod merge;

pub use merge::{merge_groups, LatestRecord, MergePolicy, MostFrequentPerField};

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::invoice::rules::provider::normalize_provider;
use crate::models::record::{FieldKey, HistoryRecord};

/// Fields with global frequency tables (autocomplete sources).
pub const COUNTED_FIELDS: [FieldKey; 3] = [FieldKey::Provider, FieldKey::TaxId, FieldKey::Iban];

/// Key under which likely-duplicate records are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    /// Normalized provider name.
    pub provider: String,
    pub invoice: String,
    pub total: String,
    /// `"{year}-{month}-{day}"`.
    pub date: String,
}

impl GroupKey {
    pub fn for_record(record: &HistoryRecord) -> Self {
        Self {
            provider: normalize_provider(&record.provider),
            invoice: record.invoice.trim().to_string(),
            total: record.total.trim().to_string(),
            date: record.date_string(),
        }
    }
}

/// Records sharing one [`GroupKey`], in ingestion order.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup<'a> {
    pub key: &'a GroupKey,
    pub records: Vec<&'a HistoryRecord>,
}

impl DuplicateGroup<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Frequency tables and grouping over history records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordIndex {
    records: Vec<HistoryRecord>,
    by_filename: HashMap<String, Vec<usize>>,
    frequencies: HashMap<FieldKey, HashMap<String, usize>>,
    groups: BTreeMap<GroupKey, Vec<usize>>,
}

impl RecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a record sequence.
    pub fn from_records(records: impl IntoIterator<Item = HistoryRecord>) -> Self {
        let mut index = Self::new();
        index.rebuild(records);
        index
    }

    /// Add one record to every table.
    pub fn ingest(&mut self, record: HistoryRecord) {
        let position = self.records.len();

        self.by_filename
            .entry(record.filename.clone())
            .or_default()
            .push(position);

        for field in COUNTED_FIELDS {
            let value = record.value(field);
            if !value.is_empty() {
                *self
                    .frequencies
                    .entry(field)
                    .or_default()
                    .entry(value)
                    .or_insert(0) += 1;
            }
        }

        let key = GroupKey::for_record(&record);
        debug!("Indexed {} under {:?}", record.filename, key);
        self.groups.entry(key).or_default().push(position);

        self.records.push(record);
    }

    /// Clear all derived state and ingest `records` in order.
    pub fn rebuild(&mut self, records: impl IntoIterator<Item = HistoryRecord>) {
        self.clear();
        for record in records {
            self.ingest(record);
        }
        info!(
            "Loaded {} records (files indexed: {})",
            self.records.len(),
            self.by_filename.len()
        );
    }

    fn clear(&mut self) {
        self.records.clear();
        self.by_filename.clear();
        self.frequencies.clear();
        self.groups.clear();
    }

    /// Values seen for `filename` and `field`, most frequent first.
    ///
    /// Ties keep first-occurrence order. Blank values are skipped.
    pub fn top_values_for_file(&self, filename: &str, field: FieldKey) -> Vec<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();

        for record in self.records_for_file(filename) {
            let value = record.value(field);
            if value.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(v, _)| *v == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value, 1)),
            }
        }

        // Stable sort keeps first occurrence on ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().map(|(value, _)| value).collect()
    }

    /// All groups, ordered by key.
    pub fn groups(&self) -> Vec<DuplicateGroup<'_>> {
        self.groups
            .iter()
            .map(|(key, positions)| DuplicateGroup {
                key,
                records: positions.iter().map(|&i| &self.records[i]).collect(),
            })
            .collect()
    }

    /// Groups holding more than one record.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup<'_>> {
        self.groups()
            .into_iter()
            .filter(|group| group.len() > 1)
            .collect()
    }

    /// Group containing records that look like `record`.
    pub fn group_for(&self, record: &HistoryRecord) -> Option<DuplicateGroup<'_>> {
        let (key, positions) = self.groups.get_key_value(&GroupKey::for_record(record))?;
        Some(DuplicateGroup {
            key,
            records: positions.iter().map(|&i| &self.records[i]).collect(),
        })
    }

    /// How often `value` was committed for `field` across all records.
    ///
    /// Only provider, tax ID and IBAN are counted.
    pub fn frequency(&self, field: FieldKey, value: &str) -> usize {
        self.frequencies
            .get(&field)
            .and_then(|table| table.get(value.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// Sorted distinct values for autocomplete.
    pub fn known_values(&self, field: FieldKey) -> Vec<String> {
        let mut values: Vec<String> = self
            .frequencies
            .get(&field)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default();
        values.sort();
        values
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn records_for_file(&self, filename: &str) -> impl Iterator<Item = &HistoryRecord> {
        self.by_filename
            .get(filename)
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    pub fn file_count(&self) -> usize {
        self.by_filename.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
