//! Lugh CLI - Inspect, query and convert linked data graphs

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, convert, find, show};
use config::Config;
use lugh_core::QueryResult;
use lugh_storage::{read_path, MemoryStorage, RdfFormat, Storage};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "lugh")]
#[command(author, version, about = "In-memory linked data graphs")]
pub struct Cli {
    /// Output format: text, json (default from config)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Input format: turtle, ntriples (default from file extension)
    #[arg(short, long, global = true)]
    pub input_format: Option<RdfFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the top-level nodes of a document
    Show(show::ShowArgs),
    /// Re-export a document in another format
    Convert(convert::ConvertArgs),
    /// Query a document by graph path or type
    Find(find::FindArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage and settings
pub struct AppContext {
    pub storage: MemoryStorage,
    pub config: Config,
    pub input_format: Option<RdfFormat>,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Self {
        let config = Config::load();
        let input_format = cli.input_format.or(config.input_format);
        let output_format = cli.format.unwrap_or(config.output_format);
        Self {
            storage: MemoryStorage::new(),
            config,
            input_format,
            output_format,
        }
    }

    /// Read `path` and build its graph
    pub fn import(&self, path: &Path, always_all: bool) -> anyhow::Result<QueryResult> {
        let statements = read_path(path, self.input_format)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let result = self
            .storage
            .create_result_from(&statements, always_all || self.config.always_all)
            .with_context(|| format!("Failed to build graph from {}", path.display()))?;
        tracing::info!("Imported {} statements from {:?}", statements.len(), path);
        Ok(result)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting lugh CLI");

    // Config and completions do not need a document
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let ctx = AppContext::new(&cli);

    match &cli.command {
        Commands::Show(args) => show::run(args, &ctx)?,
        Commands::Convert(args) => convert::run(args, &ctx)?,
        Commands::Find(args) => find::run(args, &ctx)?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
