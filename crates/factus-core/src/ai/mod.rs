//! AI-extracted field candidates.
//!
//! Candidates arrive either from the on-disk cache or from a document-AI
//! response mapped by [`candidates_from_document`].

pub mod document;

pub use document::{candidates_from_document, DocumentEntity, DocumentExtraction};

use std::collections::HashMap;

use crate::models::record::{FieldKey, FieldMap};

/// Candidate values per field for one document, in extraction order.
pub type AiCandidateSet = FieldMap<Vec<String>>;

impl AiCandidateSet {
    /// True when no field has a candidate.
    pub fn is_blank(&self) -> bool {
        self.iter().all(|(_, values)| values.is_empty())
    }
}

/// In-memory AI candidates keyed by document filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiCache {
    entries: HashMap<String, AiCandidateSet>,
}

impl AiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the candidates for a file, replacing any earlier set.
    pub fn insert(&mut self, filename: impl Into<String>, set: AiCandidateSet) {
        self.entries.insert(filename.into(), set);
    }

    pub fn get(&self, filename: &str) -> Option<&AiCandidateSet> {
        self.entries.get(filename)
    }

    /// Candidates for one field of one file; empty when the file is unknown.
    pub fn candidates(&self, filename: &str, field: FieldKey) -> &[String] {
        self.entries
            .get(filename)
            .map(|set| set.get(field).as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AiCandidateSet)> {
        self.entries.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
