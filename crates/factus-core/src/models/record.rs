//! Field keys, committed history records and the in-progress entry form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::invoice::rules::dates::parse_date;
use crate::suggest::Suggestion;

/// A field that takes part in suggestions.
///
/// Card and the separate year/month/day inputs are form-only fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Date,
    Provider,
    Invoice,
    Total,
    TaxId,
    Iban,
}

impl FieldKey {
    /// All keys, in display order.
    pub const ALL: [FieldKey; 6] = [
        FieldKey::Date,
        FieldKey::Provider,
        FieldKey::Invoice,
        FieldKey::Total,
        FieldKey::TaxId,
        FieldKey::Iban,
    ];

    /// Column name used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Date => "date",
            FieldKey::Provider => "provider",
            FieldKey::Invoice => "invoice",
            FieldKey::Total => "total",
            FieldKey::TaxId => "taxid",
            FieldKey::Iban => "iban",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Date => "Date",
            FieldKey::Provider => "Provider",
            FieldKey::Invoice => "Invoice #",
            FieldKey::Total => "Total",
            FieldKey::TaxId => "Tax ID",
            FieldKey::Iban => "IBAN",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// One value per [`FieldKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap<T> {
    pub date: T,
    pub provider: T,
    pub invoice: T,
    pub total: T,
    pub taxid: T,
    pub iban: T,
}

impl<T> FieldMap<T> {
    /// Build a map by evaluating `f` for each key.
    pub fn from_fn(mut f: impl FnMut(FieldKey) -> T) -> Self {
        Self {
            date: f(FieldKey::Date),
            provider: f(FieldKey::Provider),
            invoice: f(FieldKey::Invoice),
            total: f(FieldKey::Total),
            taxid: f(FieldKey::TaxId),
            iban: f(FieldKey::Iban),
        }
    }

    pub fn get(&self, field: FieldKey) -> &T {
        match field {
            FieldKey::Date => &self.date,
            FieldKey::Provider => &self.provider,
            FieldKey::Invoice => &self.invoice,
            FieldKey::Total => &self.total,
            FieldKey::TaxId => &self.taxid,
            FieldKey::Iban => &self.iban,
        }
    }

    pub fn get_mut(&mut self, field: FieldKey) -> &mut T {
        match field {
            FieldKey::Date => &mut self.date,
            FieldKey::Provider => &mut self.provider,
            FieldKey::Invoice => &mut self.invoice,
            FieldKey::Total => &mut self.total,
            FieldKey::TaxId => &mut self.taxid,
            FieldKey::Iban => &mut self.iban,
        }
    }

    /// Iterate `(key, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &T)> {
        FieldKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

/// One committed classification, as stored in the history table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRecord {
    pub filename: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub provider: String,
    pub invoice: String,
    pub total: String,
    pub card: String,
    pub taxid: String,
    pub iban: String,
}

impl HistoryRecord {
    /// Create an empty record for a file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// `"{year}-{month}-{day}"` with trimmed parts, empty parts kept.
    pub fn date_string(&self) -> String {
        format!(
            "{}-{}-{}",
            self.year.trim(),
            self.month.trim(),
            self.day.trim()
        )
    }

    /// Trimmed value of a suggestion field.
    ///
    /// The date is the joined date string when any part is set, else empty.
    pub fn value(&self, field: FieldKey) -> String {
        match field {
            FieldKey::Date => {
                if self.has_date() {
                    self.date_string()
                } else {
                    String::new()
                }
            }
            FieldKey::Provider => self.provider.trim().to_string(),
            FieldKey::Invoice => self.invoice.trim().to_string(),
            FieldKey::Total => self.total.trim().to_string(),
            FieldKey::TaxId => self.taxid.trim().to_string(),
            FieldKey::Iban => self.iban.trim().to_string(),
        }
    }

    fn has_date(&self) -> bool {
        [&self.year, &self.month, &self.day]
            .iter()
            .any(|part| !part.trim().is_empty())
    }
}

/// What [`FieldForm::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The field was left as it was.
    Unchanged,
    /// The field was emptied.
    Cleared,
    /// The field received a new value.
    Set,
    /// A date value could not be parsed; the form is untouched.
    DateUnparsed,
}

/// Live values of the entry form for the current document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldForm {
    pub year: String,
    pub month: String,
    pub day: String,
    pub provider: String,
    pub invoice: String,
    pub total: String,
    pub card: String,
    pub taxid: String,
    pub iban: String,
}

impl FieldForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current trimmed value of a suggestion field.
    ///
    /// The date is synthesized as `"{year}-{month}-{day}"` when any part is
    /// non-empty, else empty.
    pub fn current_value(&self, field: FieldKey) -> String {
        match field {
            FieldKey::Date => {
                let (y, m, d) = (self.year.trim(), self.month.trim(), self.day.trim());
                if y.is_empty() && m.is_empty() && d.is_empty() {
                    String::new()
                } else {
                    format!("{}-{}-{}", y, m, d)
                }
            }
            FieldKey::Provider => self.provider.trim().to_string(),
            FieldKey::Invoice => self.invoice.trim().to_string(),
            FieldKey::Total => self.total.trim().to_string(),
            FieldKey::TaxId => self.taxid.trim().to_string(),
            FieldKey::Iban => self.iban.trim().to_string(),
        }
    }

    /// Apply a chosen suggestion to one field.
    pub fn apply(&mut self, field: FieldKey, choice: &Suggestion) -> ApplyOutcome {
        match choice {
            Suggestion::LeaveUnchanged => ApplyOutcome::Unchanged,
            Suggestion::ClearField => {
                self.clear(field);
                ApplyOutcome::Cleared
            }
            Suggestion::Value(value) => self.set_value(field, value),
        }
    }

    /// Route a selection result into one field.
    pub fn apply_selection(&mut self, field: FieldKey, text: &str) -> ApplyOutcome {
        self.set_value(field, text)
    }

    /// Set a form input by its column name (`year`, `card`, `taxid`, ...).
    ///
    /// Returns `false` for an unknown name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "year" => &mut self.year,
            "month" => &mut self.month,
            "day" => &mut self.day,
            "provider" => &mut self.provider,
            "invoice" => &mut self.invoice,
            "total" => &mut self.total,
            "card" => &mut self.card,
            "taxid" => &mut self.taxid,
            "iban" => &mut self.iban,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Build the trimmed record committed for `filename`.
    pub fn to_record(&self, filename: impl Into<String>) -> HistoryRecord {
        HistoryRecord {
            filename: filename.into(),
            year: self.year.trim().to_string(),
            month: self.month.trim().to_string(),
            day: self.day.trim().to_string(),
            provider: self.provider.trim().to_string(),
            invoice: self.invoice.trim().to_string(),
            total: self.total.trim().to_string(),
            card: self.card.trim().to_string(),
            taxid: self.taxid.trim().to_string(),
            iban: self.iban.trim().to_string(),
        }
    }

    fn set_value(&mut self, field: FieldKey, value: &str) -> ApplyOutcome {
        let value = value.trim();
        if value.is_empty() {
            return ApplyOutcome::Unchanged;
        }

        match field {
            FieldKey::Date => match parse_date(value) {
                Some(date) => {
                    let (year, month, day) = date.padded();
                    self.year = year;
                    self.month = month;
                    self.day = day;
                }
                None => {
                    warn!("Date parse failed for '{}'", value);
                    return ApplyOutcome::DateUnparsed;
                }
            },
            FieldKey::Provider => self.provider = value.to_string(),
            FieldKey::Invoice => self.invoice = value.to_string(),
            FieldKey::Total => self.total = value.to_string(),
            FieldKey::TaxId => self.taxid = value.to_string(),
            FieldKey::Iban => self.iban = value.to_string(),
        }
        ApplyOutcome::Set
    }

    fn clear(&mut self, field: FieldKey) {
        match field {
            FieldKey::Date => {
                self.year.clear();
                self.month.clear();
                self.day.clear();
            }
            FieldKey::Provider => self.provider.clear(),
            FieldKey::Invoice => self.invoice.clear(),
            FieldKey::Total => self.total.clear(),
            FieldKey::TaxId => self.taxid.clear(),
            FieldKey::Iban => self.iban.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_key_parse() {
        assert_eq!("taxid".parse::<FieldKey>(), Ok(FieldKey::TaxId));
        assert_eq!(" IBAN ".parse::<FieldKey>(), Ok(FieldKey::Iban));
        assert!("card".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_field_key_serde() {
        let json = serde_json::to_string(&FieldKey::TaxId).unwrap();
        assert_eq!(json, "\"taxid\"");
    }

    #[test]
    fn test_field_map_access() {
        let mut map: FieldMap<Vec<String>> = FieldMap::default();
        map.get_mut(FieldKey::Total).push("120,50".to_string());

        assert_eq!(map.total, vec!["120,50".to_string()]);
        assert!(map.get(FieldKey::Date).is_empty());

        let keys: Vec<FieldKey> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, FieldKey::ALL.to_vec());
    }

    #[test]
    fn test_record_date_value() {
        let mut record = HistoryRecord::new("a.pdf");
        assert_eq!(record.value(FieldKey::Date), "");
        assert_eq!(record.date_string(), "--");

        record.year = "2023".to_string();
        record.month = " 02".to_string();
        record.day = "23".to_string();
        assert_eq!(record.value(FieldKey::Date), "2023-02-23");
    }

    #[test]
    fn test_current_value_date_synthesis() {
        let mut form = FieldForm::new();
        assert_eq!(form.current_value(FieldKey::Date), "");

        form.year = "2023".to_string();
        assert_eq!(form.current_value(FieldKey::Date), "2023--");
    }

    #[test]
    fn test_apply_date_pads_parts() {
        let mut form = FieldForm::new();
        let outcome = form.apply(FieldKey::Date, &Suggestion::Value("Feb 3, 2023".to_string()));

        assert_eq!(outcome, ApplyOutcome::Set);
        assert_eq!((form.year.as_str(), form.month.as_str(), form.day.as_str()), ("2023", "02", "03"));
    }

    #[test]
    fn test_apply_unparseable_date_leaves_form() {
        let mut form = FieldForm::new();
        form.year = "2022".to_string();

        let outcome = form.apply(FieldKey::Date, &Suggestion::Value("soon".to_string()));
        assert_eq!(outcome, ApplyOutcome::DateUnparsed);
        assert_eq!(form.year, "2022");
    }

    #[test]
    fn test_apply_markers() {
        let mut form = FieldForm::new();
        form.provider = "Acme".to_string();
        form.year = "2023".to_string();

        assert_eq!(form.apply(FieldKey::Provider, &Suggestion::LeaveUnchanged), ApplyOutcome::Unchanged);
        assert_eq!(form.provider, "Acme");

        assert_eq!(form.apply(FieldKey::Provider, &Suggestion::ClearField), ApplyOutcome::Cleared);
        assert_eq!(form.provider, "");

        form.apply(FieldKey::Date, &Suggestion::ClearField);
        assert_eq!(form.current_value(FieldKey::Date), "");
    }

    #[test]
    fn test_apply_selection_and_record() {
        let mut form = FieldForm::new();
        form.apply_selection(FieldKey::Total, "€ 120,50");
        form.apply_selection(FieldKey::Date, "23 de febrero de 2023");
        assert!(form.set_by_name("card", " 4242 "));
        assert!(!form.set_by_name("colour", "red"));

        let record = form.to_record("inv.pdf");
        assert_eq!(
            record,
            HistoryRecord {
                filename: "inv.pdf".to_string(),
                year: "2023".to_string(),
                month: "02".to_string(),
                day: "23".to_string(),
                total: "€ 120,50".to_string(),
                card: "4242".to_string(),
                ..HistoryRecord::default()
            }
        );
    }
}
