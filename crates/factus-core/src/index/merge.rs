//! Canonical records for duplicate groups.

use super::{DuplicateGroup, RecordIndex};
use crate::models::record::{FieldKey, HistoryRecord};

/// Picks one canonical record for a group of likely duplicates.
pub trait MergePolicy {
    /// Short name used on the command line.
    fn name(&self) -> &'static str;

    /// Collapse a non-empty group into one record.
    fn merge(&self, group: &DuplicateGroup<'_>) -> HistoryRecord;
}

/// Keeps the last record ingested for the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestRecord;

impl MergePolicy for LatestRecord {
    fn name(&self) -> &'static str {
        "latest"
    }

    fn merge(&self, group: &DuplicateGroup<'_>) -> HistoryRecord {
        group.records.last().map(|r| (*r).clone()).unwrap_or_default()
    }
}

/// Takes, for each column, the most frequent non-empty value in the group.
///
/// The date moves as one unit so year, month and day always come from the
/// same record.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFrequentPerField;

impl MergePolicy for MostFrequentPerField {
    fn name(&self) -> &'static str {
        "most-frequent"
    }

    fn merge(&self, group: &DuplicateGroup<'_>) -> HistoryRecord {
        let records = &group.records;
        let pick = |column: fn(&HistoryRecord) -> &str| {
            most_frequent(records.iter().map(|r| column(r)))
        };

        let dates: Vec<String> = records
            .iter()
            .filter(|r| !r.value(FieldKey::Date).is_empty())
            .map(|r| r.date_string())
            .collect();
        let date = most_frequent(dates.iter().map(String::as_str));
        let (year, month, day) = records
            .iter()
            .find(|r| !date.is_empty() && r.date_string() == date)
            .map(|r| {
                (
                    r.year.trim().to_string(),
                    r.month.trim().to_string(),
                    r.day.trim().to_string(),
                )
            })
            .unwrap_or_default();

        HistoryRecord {
            filename: pick(|r| r.filename.as_str()),
            year,
            month,
            day,
            provider: pick(|r| r.provider.as_str()),
            invoice: pick(|r| r.invoice.as_str()),
            total: pick(|r| r.total.as_str()),
            card: pick(|r| r.card.as_str()),
            taxid: pick(|r| r.taxid.as_str()),
            iban: pick(|r| r.iban.as_str()),
        }
    }
}

/// Most frequent trimmed non-empty value; ties go to the first seen.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

/// One merged record per group, in group key order.
pub fn merge_groups(index: &RecordIndex, policy: &dyn MergePolicy) -> Vec<HistoryRecord> {
    index
        .groups()
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| policy.merge(group))
        .collect()
}
