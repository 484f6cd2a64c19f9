//! Core library for invoice field inference.
//!
//! This crate provides:
//! - Date normalization for English and Spanish date notations
//! - Point and rectangle text selection over positioned word tokens
//! - Provider name canonicalization and duplicate grouping
//! - Ranked field suggestions from history, AI candidates and the live form
//! - CSV persistence for the history table and the AI candidate cache

pub mod ai;
pub mod error;
pub mod index;
pub mod invoice;
pub mod models;
pub mod selection;
pub mod store;
pub mod suggest;

pub use ai::{candidates_from_document, AiCache, AiCandidateSet, DocumentExtraction};
pub use error::{FactusError, Result, StoreError};
pub use index::{merge_groups, DuplicateGroup, GroupKey, MergePolicy, RecordIndex};
pub use invoice::{normalize_provider, parse_date, DateParts, IbanScanner};
pub use models::{ApplyOutcome, FactusConfig, FieldForm, FieldKey, FieldMap, HistoryRecord};
pub use selection::{select_at, select_in, SelectionRect, TextSelector, WordToken};
pub use store::{write_records, AiCacheStore, HistoryStore, Workspace};
pub use suggest::{accept_defaults, build_suggestions, Suggestion, SuggestionAggregator, SuggestionList};
