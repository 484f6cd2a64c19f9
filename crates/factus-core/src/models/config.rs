//! Configuration structures for the factus engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FactusError, Result};
use crate::selection::SelectionThresholds;

/// Main configuration for factus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactusConfig {
    /// Where the history table, AI cache and merged export live.
    pub storage: StorageConfig,

    /// Text selection configuration.
    pub selection: SelectionConfig,

    /// AI candidate configuration.
    pub ai: AiConfig,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding all tables.
    pub data_dir: PathBuf,

    /// History table file name.
    pub history_file: String,

    /// AI candidate cache file name.
    pub ai_cache_file: String,

    /// Merged export file name.
    pub merged_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("factus"),
            history_file: "factus_manual.csv".to_string(),
            ai_cache_file: "ai_cache.csv".to_string(),
            merged_file: "merged_records.csv".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn ai_cache_path(&self) -> PathBuf {
        self.data_dir.join(&self.ai_cache_file)
    }

    pub fn merged_path(&self) -> PathBuf {
        self.data_dir.join(&self.merged_file)
    }
}

/// Text selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Max gap for gluing a currency marker, in document units.
    pub currency_gap: f32,

    /// Max gap for gluing numeric fragments, in document units.
    pub numeric_gap: f32,

    /// Max gap for gluing name pieces, in document units.
    pub name_gap: f32,

    /// Default display zoom (display pixels per document unit).
    pub zoom: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let thresholds = SelectionThresholds::default();
        Self {
            currency_gap: thresholds.currency_gap,
            numeric_gap: thresholds.numeric_gap,
            name_gap: thresholds.name_gap,
            zoom: 1.5,
        }
    }
}

impl SelectionConfig {
    pub fn thresholds(&self) -> SelectionThresholds {
        SelectionThresholds {
            currency_gap: self.currency_gap,
            numeric_gap: self.numeric_gap,
            name_gap: self.name_gap,
        }
    }
}

/// AI candidate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Keep only IBAN candidates with a valid checksum.
    pub validate_iban: bool,
}

impl FactusConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FactusError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
