//! Select command - pick text from a page layout.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tracing::info;

use factus_core::models::record::{ApplyOutcome, FieldForm, FieldKey};
use factus_core::selection::{SelectionRect, TextSelector, WordToken};

use super::load_config;

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    #[command(subcommand)]
    command: SelectCommand,
}

#[derive(Subcommand)]
enum SelectCommand {
    /// Select the logical value under a click
    Point {
        #[command(flatten)]
        common: CommonArgs,

        /// Click x in display pixels
        #[arg(long, allow_negative_numbers = true)]
        x: f32,

        /// Click y in display pixels
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
    },

    /// Select every word touched by a drag rectangle
    Rect {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, allow_negative_numbers = true)]
        x0: f32,

        #[arg(long, allow_negative_numbers = true)]
        y0: f32,

        #[arg(long, allow_negative_numbers = true)]
        x1: f32,

        #[arg(long, allow_negative_numbers = true)]
        y1: f32,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// JSON file with the page's word tokens
    #[arg(short, long)]
    tokens: PathBuf,

    /// Display zoom (defaults to selection.zoom from the config)
    #[arg(short, long)]
    zoom: Option<f32>,

    /// Route the selection into this field and print what it would hold
    #[arg(short, long)]
    field: Option<FieldKey>,
}

pub fn run(args: SelectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let selector = TextSelector::new().with_thresholds(config.selection.thresholds());

    let (common, selected) = match args.command {
        SelectCommand::Point { common, x, y } => {
            let tokens = read_tokens(&common.tokens)?;
            let zoom = common.zoom.unwrap_or(config.selection.zoom);
            let selected = selector.select_at(&tokens, x, y, zoom);
            (common, selected)
        }
        SelectCommand::Rect {
            common,
            x0,
            y0,
            x1,
            y1,
        } => {
            let tokens = read_tokens(&common.tokens)?;
            let zoom = common.zoom.unwrap_or(config.selection.zoom);
            let rect = SelectionRect::from_corners((x0, y0), (x1, y1));
            let selected = selector.select_in(&tokens, rect, zoom);
            (common, selected)
        }
    };

    let Some(text) = selected else {
        anyhow::bail!("Nothing selected");
    };

    match common.field {
        Some(field) => {
            let mut form = FieldForm::new();
            if form.apply_selection(field, &text) == ApplyOutcome::DateUnparsed {
                anyhow::bail!("Selected text '{}' is not a date", text);
            }
            println!("{}", form.current_value(field));
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn read_tokens(path: &Path) -> anyhow::Result<Vec<WordToken>> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let tokens: Vec<WordToken> = serde_json::from_str(&content)?;
    info!("Loaded {} tokens from {}", tokens.len(), path.display());
    Ok(tokens)
}
