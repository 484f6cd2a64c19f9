//! Suggest command - show ranked suggestions for a document.

use std::collections::BTreeMap;

use clap::Args;
use console::style;

use factus_core::invoice::rules::format_iban;
use factus_core::models::record::{ApplyOutcome, FieldForm, FieldKey};
use factus_core::store::Workspace;
use factus_core::suggest::SuggestionList;

use super::{load_config, OutputFormat};

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Document file name as recorded in the history table
    filename: String,

    /// Only show this field
    #[arg(short, long)]
    field: Option<FieldKey>,

    /// Current form value, as name=value (repeatable; "date" accepts any date notation)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: SuggestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let workspace = Workspace::open(&config.storage)?;
    let form = form_from_assignments(&args.set)?;

    let aggregator = workspace.aggregator();
    let fields: Vec<FieldKey> = match args.field {
        Some(field) => vec![field],
        None => FieldKey::ALL.to_vec(),
    };

    let lists: Vec<(FieldKey, SuggestionList)> = fields
        .into_iter()
        .map(|field| (field, aggregator.build(&args.filename, field, &form)))
        .collect();

    match args.format {
        OutputFormat::Json => {
            let map: BTreeMap<&str, &SuggestionList> =
                lists.iter().map(|(field, list)| (field.as_str(), list)).collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Text => print_lists(&lists),
    }

    Ok(())
}

/// Build a form from `name=value` assignments.
pub(crate) fn form_from_assignments(assignments: &[String]) -> anyhow::Result<FieldForm> {
    let mut form = FieldForm::new();

    for assignment in assignments {
        let Some((name, value)) = assignment.split_once('=') else {
            anyhow::bail!("Expected NAME=VALUE, got '{}'", assignment);
        };

        if name.trim().eq_ignore_ascii_case("date") {
            if form.apply_selection(FieldKey::Date, value) == ApplyOutcome::DateUnparsed {
                anyhow::bail!("No date found in '{}'", value);
            }
        } else if !form.set_by_name(name, value.trim()) {
            anyhow::bail!("Unknown field: {}", name);
        }
    }

    Ok(form)
}

fn print_lists(lists: &[(FieldKey, SuggestionList)]) {
    for (field, list) in lists {
        println!("{}", style(field.label()).bold());
        for (i, entry) in list.entries().iter().enumerate() {
            let marker = if i == list.default_index() { "*" } else { " " };
            if entry.is_marker() {
                println!("  {} {}", marker, style(entry).dim());
            } else if *field == FieldKey::Iban {
                println!("  {} {}", marker, format_iban(entry.as_str()));
            } else {
                println!("  {} {}", marker, entry);
            }
        }
    }
}
