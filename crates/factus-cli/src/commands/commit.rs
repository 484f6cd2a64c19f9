//! Commit command - record the classification of a document.

use clap::Args;
use console::style;

use factus_core::models::record::{ApplyOutcome, FieldForm, FieldKey};
use factus_core::store::Workspace;
use factus_core::suggest::accept_defaults;

use super::load_config;

/// Arguments for the commit command.
#[derive(Args)]
pub struct CommitArgs {
    /// Document file name
    filename: String,

    /// Date in any supported notation (sets year, month and day)
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    year: Option<String>,

    #[arg(long)]
    month: Option<String>,

    #[arg(long)]
    day: Option<String>,

    #[arg(long)]
    provider: Option<String>,

    /// Invoice number
    #[arg(long)]
    invoice: Option<String>,

    #[arg(long)]
    total: Option<String>,

    #[arg(long)]
    card: Option<String>,

    #[arg(long)]
    taxid: Option<String>,

    #[arg(long)]
    iban: Option<String>,

    /// Fill blank fields with their default suggestion
    #[arg(long)]
    accept_suggestions: bool,

    /// Apply suggestion number INDEX to a field, as shown by `suggest` (repeatable)
    #[arg(long = "pick", value_name = "FIELD=INDEX")]
    picks: Vec<String>,
}

impl CommitArgs {
    fn to_form(&self) -> anyhow::Result<FieldForm> {
        let mut form = FieldForm::new();

        let inputs = [
            ("year", &self.year),
            ("month", &self.month),
            ("day", &self.day),
            ("provider", &self.provider),
            ("invoice", &self.invoice),
            ("total", &self.total),
            ("card", &self.card),
            ("taxid", &self.taxid),
            ("iban", &self.iban),
        ];
        for (name, value) in inputs {
            if let Some(value) = value {
                form.set_by_name(name, value.as_str());
            }
        }

        if let Some(date) = &self.date {
            if form.apply_selection(FieldKey::Date, date) == ApplyOutcome::DateUnparsed {
                anyhow::bail!("No date found in '{}'", date);
            }
        }

        Ok(form)
    }

    fn parse_picks(&self) -> anyhow::Result<Vec<(FieldKey, usize)>> {
        self.picks
            .iter()
            .map(|pick| {
                let Some((name, index)) = pick.split_once('=') else {
                    anyhow::bail!("Expected FIELD=INDEX, got '{}'", pick);
                };
                let field: FieldKey = name.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid suggestion index in '{}'", pick))?;
                Ok((field, index))
            })
            .collect()
    }
}

pub fn run(args: CommitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut workspace = Workspace::open(&config.storage)?;

    let filename = args.filename.trim();
    let mut form = args.to_form()?;
    let picks = args.parse_picks()?;

    if args.accept_suggestions || !picks.is_empty() {
        let lists = workspace.aggregator().build_all(filename, &form);

        if args.accept_suggestions {
            let outcomes = accept_defaults(&mut form, &lists);
            for (field, outcome) in outcomes.iter() {
                match outcome {
                    ApplyOutcome::Set => println!(
                        "  {} {}: {}",
                        style("→").dim(),
                        field.label(),
                        form.current_value(field)
                    ),
                    ApplyOutcome::DateUnparsed => eprintln!(
                        "{} Suggested date for {} is not a date, left blank",
                        style("⚠").yellow(),
                        filename
                    ),
                    _ => {}
                }
            }
        }

        for (field, index) in picks {
            let list = lists.get(field);
            let Some(choice) = list.get(index) else {
                anyhow::bail!(
                    "No suggestion {} for {} ({} available)",
                    index,
                    field,
                    list.len()
                );
            };
            if form.apply(field, choice) == ApplyOutcome::DateUnparsed {
                anyhow::bail!("Suggestion '{}' is not a date", choice);
            }
        }
    }

    let record = form.to_record(filename);
    workspace.commit(record.clone())?;

    println!(
        "{} Recorded {} in {}",
        style("✓").green(),
        record.filename,
        workspace.history().path().display()
    );

    if let Some(group) = workspace.index().group_for(&record) {
        if group.len() > 1 {
            println!(
                "{} {} records share this provider, invoice, total and date",
                style("⚠").yellow(),
                group.len()
            );
        }
    }

    Ok(())
}
