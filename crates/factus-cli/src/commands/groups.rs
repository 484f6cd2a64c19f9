//! Groups command - list likely duplicate records.

use clap::Args;
use console::style;

use factus_core::index::RecordIndex;
use factus_core::models::record::FieldKey;
use factus_core::store::Workspace;

use super::{load_config, OutputFormat};

/// Arguments for the groups command.
#[derive(Args)]
pub struct GroupsArgs {
    /// Include groups with a single record
    #[arg(long)]
    all: bool,

    /// List known values of a field with their counts instead of groups
    #[arg(long, value_name = "FIELD")]
    known: Option<FieldKey>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: GroupsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let workspace = Workspace::open(&config.storage)?;
    let index = workspace.index();

    if let Some(field) = args.known {
        return print_known(index, field, args.format);
    }

    let groups = if args.all {
        index.groups()
    } else {
        index.duplicate_groups()
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        OutputFormat::Text => {
            if groups.is_empty() {
                println!("No duplicate groups among {} records.", index.len());
                return Ok(());
            }

            for group in &groups {
                println!(
                    "{} {} | {} | {} | {}  ({} records)",
                    style("●").cyan(),
                    group.key.provider,
                    group.key.invoice,
                    group.key.total,
                    group.key.date,
                    group.len()
                );
                for record in &group.records {
                    println!("    {}  {}", record.filename, record.provider);
                }
            }
        }
    }

    Ok(())
}

/// Distinct values seen for `field` across the history, with counts.
fn print_known(index: &RecordIndex, field: FieldKey, format: OutputFormat) -> anyhow::Result<()> {
    let values = index.known_values(field);

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = values
                .iter()
                .map(|value| {
                    serde_json::json!({ "value": value, "count": index.frequency(field, value) })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if values.is_empty() {
                println!("No known values for {}.", field.label());
            }
            for value in &values {
                println!("{}  ({})", value, index.frequency(field, value));
            }
        }
    }

    Ok(())
}
