//! Date command - normalize a free-form date.

use clap::Args;
use tracing::debug;

use factus_core::invoice::rules::dates::{normalize_date_text, parse_date};

/// Arguments for the date command.
#[derive(Args)]
pub struct DateArgs {
    /// Date text, e.g. "23 de febrero de 2023" (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,

    /// Also check that the date exists in the calendar
    #[arg(long)]
    strict: bool,
}

pub fn run(args: DateArgs) -> anyhow::Result<()> {
    let text = args.text.join(" ");
    debug!("Normalized input: '{}'", normalize_date_text(&text));

    let Some(date) = parse_date(&text) else {
        anyhow::bail!("No date found in '{}'", text);
    };

    if args.strict && date.to_naive_date().is_none() {
        anyhow::bail!("{} is not a calendar date", date);
    }

    println!("{}", date);

    Ok(())
}
