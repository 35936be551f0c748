//! Convert command

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use lugh_core::Expansion;
use lugh_storage::{RdfFormat, Storage};

use crate::config::parse_expansion;
use crate::output::format_output;
use crate::AppContext;

/// Target of a conversion
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum ConvertTarget {
    Turtle,
    #[default]
    #[value(name = "ntriples")]
    NTriples,
    /// Statements as JSON objects
    Json,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Turtle or N-Triples document
    pub file: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target format
    #[arg(short, long, default_value = "ntriples")]
    pub to: ConvertTarget,

    /// Expansion of named nodes: all, current or none (default from config)
    #[arg(short, long, value_parser = parse_expansion)]
    pub expand: Option<Expansion>,
}

pub fn run(args: &ConvertArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let result = ctx.import(&args.file, false)?;
    let expansion = args.expand.unwrap_or(ctx.config.expand_named);
    let statements = ctx.storage.export(&result, expansion);
    tracing::info!("Exporting {} statements", statements.len());

    let text = match args.to {
        ConvertTarget::Turtle => RdfFormat::Turtle.write(&statements)?,
        ConvertTarget::NTriples => RdfFormat::NTriples.write(&statements)?,
        ConvertTarget::Json => format_output(&statements) + "\n",
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}
