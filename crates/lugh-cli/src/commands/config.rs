//! Config command for managing CLI defaults

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// input_format, output_format, always_all or expand_named
        key: String,
    },
    /// Change one setting
    Set {
        key: String,
        value: String,
    },
    /// Restore one setting to its default
    Reset {
        key: String,
    },
    /// Print every setting
    List,
    /// Print the config file location
    Path,
    /// Write a config file with default settings
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            let value = Config::load().get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
        ConfigCommands::Reset { key } => {
            let defaults = Config::default();
            let mut config = Config::load();
            match key.as_str() {
                "input_format" => config.input_format = defaults.input_format,
                "output_format" => config.output_format = defaults.output_format,
                "always_all" => config.always_all = defaults.always_all,
                "expand_named" => config.expand_named = defaults.expand_named,
                _ => return Err(unknown_key(key)),
            }
            config.save()?;
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
        ConfigCommands::List => {
            let config = Config::load();
            println!("# {}", config_file_path().display());
            for key in Config::keys() {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
            }
            Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        Config::keys().join(", ")
    )
}
