//! Show command

use std::path::PathBuf;

use clap::Args;

use crate::output::format_result;
use crate::AppContext;

#[derive(Args)]
pub struct ShowArgs {
    /// Turtle or N-Triples document
    pub file: PathBuf,

    /// Print every node, not only the top level
    #[arg(short, long)]
    pub all: bool,
}

pub fn run(args: &ShowArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let result = ctx.import(&args.file, args.all)?;
    if result.is_empty() {
        tracing::warn!("{:?} describes no nodes", args.file);
        return Ok(());
    }
    println!("{}", format_result(&result, ctx.output_format));
    Ok(())
}
