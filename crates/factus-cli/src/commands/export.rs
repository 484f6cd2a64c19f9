//! Export command - write one canonical record per duplicate group.

use std::path::PathBuf;

use clap::Args;
use console::style;

use factus_core::index::{merge_groups, LatestRecord, MergePolicy, MostFrequentPerField};
use factus_core::store::{write_records, Workspace};

use super::load_config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// How each group is collapsed
    #[arg(short, long, value_enum, default_value = "latest")]
    policy: Policy,

    /// Output file (default: storage.merged_file in the data directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Policy {
    /// Last record committed for the group
    Latest,
    /// Most frequent value per column
    MostFrequent,
}

impl Policy {
    fn strategy(self) -> Box<dyn MergePolicy> {
        match self {
            Policy::Latest => Box::new(LatestRecord),
            Policy::MostFrequent => Box::new(MostFrequentPerField),
        }
    }
}

pub fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let workspace = Workspace::open(&config.storage)?;

    let policy = args.policy.strategy();
    let merged = merge_groups(workspace.index(), policy.as_ref());

    let output = args
        .output
        .unwrap_or_else(|| config.storage.merged_path());
    write_records(&output, &merged)?;

    println!(
        "{} Merged {} records into {} ({} policy) at {}",
        style("✓").green(),
        workspace.index().len(),
        merged.len(),
        policy.name(),
        output.display()
    );

    Ok(())
}
