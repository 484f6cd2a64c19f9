//! Suggestion lists for one document field.
//!
//! Candidates come from three provenance tiers, in priority order: values
//! already committed for the same file, AI-extracted candidates, and the
//! value currently typed in the form.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::ai::AiCache;
use crate::index::RecordIndex;
use crate::models::record::{ApplyOutcome, FieldForm, FieldKey, FieldMap};

/// Display text of the leave-unchanged marker.
pub const LEAVE_UNCHANGED: &str = "— leave unchanged —";

/// Display text of the clear-field marker.
pub const CLEAR_FIELD: &str = "— clear field —";

/// One entry of a suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Suggestion {
    /// A candidate value.
    Value(String),
    /// Keep whatever the field holds.
    LeaveUnchanged,
    /// Empty the field.
    ClearField,
}

impl Suggestion {
    pub fn is_marker(&self) -> bool {
        !matches!(self, Suggestion::Value(_))
    }

    /// Display text, with the markers' fixed labels.
    pub fn as_str(&self) -> &str {
        match self {
            Suggestion::Value(v) => v,
            Suggestion::LeaveUnchanged => LEAVE_UNCHANGED,
            Suggestion::ClearField => CLEAR_FIELD,
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Suggestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordered, deduplicated candidates followed by the two control markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionList {
    entries: Vec<Suggestion>,
    default_index: usize,
}

impl SuggestionList {
    pub fn entries(&self) -> &[Suggestion] {
        &self.entries
    }

    /// Candidate values without the markers.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Suggestion::Value(v) => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn default_choice(&self) -> &Suggestion {
        &self.entries[self.default_index]
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the markers are always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge the three candidate tiers into one list.
///
/// Blank values are skipped and each value appears once, at its first
/// position: history before AI before the current value.
pub fn build_suggestions<H, A>(history_ranked: H, ai_candidates: A, current_value: &str) -> SuggestionList
where
    H: IntoIterator,
    H::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    let mut values: Vec<String> = Vec::new();
    let mut add = |candidate: &str| {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !values.iter().any(|v| v == candidate) {
            values.push(candidate.to_string());
        }
    };

    for v in history_ranked {
        add(v.as_ref());
    }
    for v in ai_candidates {
        add(v.as_ref());
    }
    add(current_value);

    let mut entries: Vec<Suggestion> = values.into_iter().map(Suggestion::Value).collect();
    entries.push(Suggestion::LeaveUnchanged);
    entries.push(Suggestion::ClearField);

    let default_index = match entries.first() {
        Some(first) if !first.is_marker() => 0,
        _ => entries
            .iter()
            .position(|e| *e == Suggestion::LeaveUnchanged)
            .unwrap_or(0),
    };

    SuggestionList {
        entries,
        default_index,
    }
}

/// Builds suggestion lists from the record index and the AI cache.
pub struct SuggestionAggregator<'a> {
    index: &'a RecordIndex,
    ai: &'a AiCache,
}

impl<'a> SuggestionAggregator<'a> {
    pub fn new(index: &'a RecordIndex, ai: &'a AiCache) -> Self {
        Self { index, ai }
    }

    /// Suggestions for one field of one file.
    pub fn build(&self, filename: &str, field: FieldKey, form: &FieldForm) -> SuggestionList {
        let history = self.index.top_values_for_file(filename, field);
        let ai = self.ai.candidates(filename, field);
        let current = form.current_value(field);

        let list = build_suggestions(&history, ai, &current);
        debug!(
            "Suggestions for {} [{}]: {} history, {} AI, {} entries",
            filename,
            field,
            history.len(),
            ai.len(),
            list.len()
        );
        list
    }

    /// Suggestions for every field of one file.
    pub fn build_all(&self, filename: &str, form: &FieldForm) -> FieldMap<SuggestionList> {
        FieldMap::from_fn(|field| self.build(filename, field, form))
    }
}

/// Fill every blank field of `form` with its list's default choice.
///
/// Fields that already hold a value are reported as unchanged. A date
/// candidate is parsed and stored zero-padded; one that does not parse
/// leaves the date parts as they were.
pub fn accept_defaults(form: &mut FieldForm, lists: &FieldMap<SuggestionList>) -> FieldMap<ApplyOutcome> {
    FieldMap::from_fn(|field| {
        if !form.current_value(field).is_empty() {
            return ApplyOutcome::Unchanged;
        }
        form.apply(field, lists.get(field).default_choice())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiCandidateSet;
    use crate::models::record::HistoryRecord;
    use pretty_assertions::assert_eq;

    fn values(list: &SuggestionList) -> Vec<&str> {
        list.values().collect()
    }

    const NONE: [&str; 0] = [];

    #[test]
    fn test_all_sources_empty() {
        let list = build_suggestions(NONE, NONE, "");

        assert_eq!(
            list.entries(),
            &[Suggestion::LeaveUnchanged, Suggestion::ClearField]
        );
        assert_eq!(list.default_index(), 0);
        assert_eq!(list.default_choice(), &Suggestion::LeaveUnchanged);
    }

    #[test]
    fn test_tier_order_and_dedup() {
        let list = build_suggestions(
            ["Acme", "Acme Corp"],
            ["Acme Corp", "ACME", " ", "Globex"],
            "Acme",
        );

        assert_eq!(values(&list), vec!["Acme", "Acme Corp", "ACME", "Globex"]);
        assert_eq!(list.default_index(), 0);
        assert_eq!(list.len(), 6);
        assert_eq!(list.get(4), Some(&Suggestion::LeaveUnchanged));
        assert_eq!(list.get(5), Some(&Suggestion::ClearField));
    }

    #[test]
    fn test_current_value_last() {
        let list = build_suggestions(NONE, ["120,50"], " 99,00 ");
        assert_eq!(values(&list), vec!["120,50", "99,00"]);
    }

    #[test]
    fn test_duplicates_within_one_source() {
        let list = build_suggestions(["a", "a", "b"], ["b", "a"], "b");
        assert_eq!(values(&list), vec!["a", "b"]);
    }

    #[test]
    fn test_marker_text_in_values_stays_a_value() {
        let list = build_suggestions([LEAVE_UNCHANGED], NONE, "");
        assert_eq!(list.len(), 3);
        assert_eq!(list.default_index(), 0);
        assert_eq!(list.entries()[0], Suggestion::Value(LEAVE_UNCHANGED.to_string()));
    }

    #[test]
    fn test_serializes_as_strings() {
        let list = build_suggestions(["Acme"], NONE, "");
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entries": ["Acme", LEAVE_UNCHANGED, CLEAR_FIELD],
                "default_index": 0
            })
        );
    }

    #[test]
    fn test_aggregator_uses_all_tiers() {
        let mut index = RecordIndex::new();
        let mut record = HistoryRecord::new("inv.pdf");
        record.provider = "Acme GmbH".to_string();
        record.year = "2023".to_string();
        record.month = "02".to_string();
        record.day = "23".to_string();
        index.ingest(record);

        let mut ai = AiCache::new();
        let mut set = AiCandidateSet::default();
        set.provider = vec!["ACME GMBH".to_string(), "Acme GmbH".to_string()];
        set.date = vec!["23/02/2023".to_string()];
        ai.insert("inv.pdf", set);

        let mut form = FieldForm::new();
        form.provider = "Acme".to_string();

        let aggregator = SuggestionAggregator::new(&index, &ai);
        let all = aggregator.build_all("inv.pdf", &form);

        assert_eq!(values(&all.provider), vec!["Acme GmbH", "ACME GMBH", "Acme"]);
        assert_eq!(values(&all.date), vec!["2023-02-23", "23/02/2023"]);
        assert_eq!(all.iban.default_choice(), &Suggestion::LeaveUnchanged);

        let other = aggregator.build("other.pdf", FieldKey::Provider, &form);
        assert_eq!(values(&other), vec!["Acme"]);
    }

    #[test]
    fn test_accept_defaults_fills_blank_fields() {
        let mut index = RecordIndex::new();
        let mut record = HistoryRecord::new("inv.pdf");
        record.total = "120,50".to_string();
        index.ingest(record);

        let mut ai = AiCache::new();
        let mut set = AiCandidateSet::default();
        set.date = vec!["1 March 2023".to_string()];
        set.provider = vec!["Globex".to_string()];
        ai.insert("inv.pdf", set);

        let mut form = FieldForm::new();
        form.provider = "Typed Ltd".to_string();

        let lists = SuggestionAggregator::new(&index, &ai).build_all("inv.pdf", &form);
        let outcomes = accept_defaults(&mut form, &lists);

        assert_eq!(outcomes.date, ApplyOutcome::Set);
        assert_eq!(
            (form.year.as_str(), form.month.as_str(), form.day.as_str()),
            ("2023", "03", "01")
        );
        assert_eq!(outcomes.provider, ApplyOutcome::Unchanged);
        assert_eq!(form.provider, "Typed Ltd");
        assert_eq!(outcomes.total, ApplyOutcome::Set);
        assert_eq!(form.total, "120,50");
        assert_eq!(outcomes.iban, ApplyOutcome::Unchanged);
        assert_eq!(form.iban, "");
    }

    #[test]
    fn test_accept_defaults_keeps_form_on_unparseable_date() {
        let mut ai = AiCache::new();
        let mut set = AiCandidateSet::default();
        set.date = vec!["sometime in spring".to_string()];
        ai.insert("inv.pdf", set);

        let index = RecordIndex::new();
        let mut form = FieldForm::new();
        let lists = SuggestionAggregator::new(&index, &ai).build_all("inv.pdf", &form);
        let outcomes = accept_defaults(&mut form, &lists);

        assert_eq!(outcomes.date, ApplyOutcome::DateUnparsed);
        assert_eq!(form, FieldForm::new());
    }
}
