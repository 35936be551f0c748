//! Find command

use std::path::PathBuf;

use clap::Args;
use lugh_core::{GraphPath, QueryResult};

use crate::output::format_result;
use crate::AppContext;

#[derive(Args)]
pub struct FindArgs {
    /// Turtle or N-Triples document
    pub file: PathBuf,

    /// Graph path from the top-level nodes, e.g. `<http://example.org/author> / *`
    #[arg(short, long)]
    pub path: Option<String>,

    /// Keep only nodes of this type; alone, also searches directly below the
    /// top-level nodes
    #[arg(short = 't', long)]
    pub r#type: Option<String>,

    /// Fail unless exactly one object is found
    #[arg(long)]
    pub unique: bool,
}

pub fn run(args: &FindArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let start = ctx.import(&args.file, false)?;

    let found = match (&args.path, &args.r#type) {
        (Some(path), type_iri) => {
            let path = GraphPath::parse(path)?;
            tracing::debug!("Applying graph path {}", path);
            let found = path.apply(&start)?;
            match type_iri {
                Some(type_iri) => found
                    .into_iter()
                    .filter(|o| o.as_node().is_some_and(|n| n.has_type(type_iri)))
                    .collect(),
                None => found,
            }
        }
        (None, Some(type_iri)) => {
            let mut found = QueryResult::new();
            for node in start.nodes() {
                if node.has_type(type_iri) {
                    found.insert(node.clone().into());
                }
                found.extend(node.get_by_type(type_iri));
            }
            found
        }
        (None, None) => anyhow::bail!("Give --path, --type or both"),
    };

    if args.unique {
        found.value()?;
    }
    if found.is_empty() {
        tracing::warn!("Nothing found");
        return Ok(());
    }
    println!("{}", format_result(&found, ctx.output_format));
    Ok(())
}
