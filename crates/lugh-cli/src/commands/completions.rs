//! Shell completions command

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// bash, zsh, fish, powershell or elvish
    pub shell: Shell,
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", args.shell, name);
    generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
