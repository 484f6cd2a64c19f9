//! Data models: configuration, history records and the entry form.

pub mod config;
pub mod record;

pub use config::FactusConfig;
pub use record::{ApplyOutcome, FieldForm, FieldKey, FieldMap, HistoryRecord};
