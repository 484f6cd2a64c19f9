//! Subcommands of the `factus` binary.

pub mod ai;
pub mod commit;
pub mod config;
pub mod date;
pub mod export;
pub mod groups;
pub mod select;
pub mod suggest;

use std::path::Path;

use tracing::debug;

use factus_core::models::config::FactusConfig;

/// Output format for listing commands.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Load `--config` if given, else the default config file if present,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FactusConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(FactusConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(FactusConfig::from_file(&default_path)?)
    } else {
        Ok(FactusConfig::default())
    }
}
