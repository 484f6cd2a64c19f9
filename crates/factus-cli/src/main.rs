//! CLI application for invoice field inference.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{ai, commit, config, date, export, groups, select, suggest};

/// Invoice field inference - suggest, select and record invoice fields
#[derive(Parser)]
#[command(name = "factus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a free-form date
    Date(date::DateArgs),

    /// Select text from a page layout by point or rectangle
    Select(select::SelectArgs),

    /// Show suggestions for a document
    Suggest(suggest::SuggestArgs),

    /// Record the classification of a document
    Commit(commit::CommitArgs),

    /// Manage AI candidates
    Ai(ai::AiArgs),

    /// List groups of likely duplicate records
    Groups(groups::GroupsArgs),

    /// Write one merged record per duplicate group
    Export(export::ExportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Date(args) => date::run(args),
        Commands::Select(args) => select::run(args, config_path),
        Commands::Suggest(args) => suggest::run(args, config_path),
        Commands::Commit(args) => commit::run(args, config_path),
        Commands::Ai(args) => ai::run(args, config_path),
        Commands::Groups(args) => groups::run(args, config_path),
        Commands::Export(args) => export::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
