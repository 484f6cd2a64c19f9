//! AI command - import and inspect AI candidates.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use tracing::info;

use factus_core::ai::{candidates_from_document, DocumentExtraction};
use factus_core::invoice::rules::format_iban;
use factus_core::models::record::FieldKey;
use factus_core::store::Workspace;

use super::{load_config, OutputFormat};

/// Arguments for the ai command.
#[derive(Args)]
pub struct AiArgs {
    #[command(subcommand)]
    command: AiCommand,
}

#[derive(Subcommand)]
enum AiCommand {
    /// Map a document-AI JSON response to candidates and cache them
    Import {
        /// Document file name the response belongs to
        filename: String,

        /// JSON response with "text" and "entities"
        document: PathBuf,

        /// Keep only IBANs with a valid checksum (overrides ai.validate_iban)
        #[arg(long)]
        validate_iban: bool,
    },

    /// Show cached candidates for a document
    Show {
        filename: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

pub fn run(args: AiArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut workspace = Workspace::open(&config.storage)?;

    match args.command {
        AiCommand::Import {
            filename,
            document,
            validate_iban,
        } => {
            let content = fs::read_to_string(&document)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", document.display(), e))?;
            let doc: DocumentExtraction = serde_json::from_str(&content)?;
            info!("Read {} entities from {}", doc.entities.len(), document.display());

            let set = candidates_from_document(&doc, validate_iban || config.ai.validate_iban);
            if set.is_blank() {
                eprintln!(
                    "{} No candidates found in {}",
                    style("⚠").yellow(),
                    document.display()
                );
            }
            let count: usize = set.iter().map(|(_, values)| values.len()).sum();
            workspace.store_ai(&filename, set)?;

            println!(
                "{} Cached {} candidates for {}",
                style("✓").green(),
                count,
                filename
            );
        }
        AiCommand::Show { filename, format } => {
            let Some(set) = workspace.ai().get(&filename) else {
                anyhow::bail!("No AI candidates cached for {}", filename);
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(set)?),
                OutputFormat::Text => {
                    for (field, values) in set.iter() {
                        if values.is_empty() {
                            continue;
                        }
                        let shown: Vec<String> = if field == FieldKey::Iban {
                            values.iter().map(|v| format_iban(v)).collect()
                        } else {
                            values.clone()
                        };
                        println!("{}: {}", style(field.label()).bold(), shown.join(" | "));
                    }
                }
            }
        }
    }

    Ok(())
}
