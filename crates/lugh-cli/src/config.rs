//! CLI configuration

use std::path::PathBuf;

use anyhow::Context;
use lugh_core::Expansion;
use lugh_storage::RdfFormat;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "LUGH_CONFIG";

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lugh")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input format when a file extension does not tell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<RdfFormat>,
    pub output_format: OutputFormat,
    /// Return every node on import, not only the top level
    pub always_all: bool,
    /// Default expansion of named nodes on export
    pub expand_named: Expansion,
}

impl Config {
    /// Load the config file, falling back to defaults
    pub fn load() -> Self {
        let path = config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["input_format", "output_format", "always_all", "expand_named"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "input_format" => Some(
                self.input_format
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            "output_format" => Some(self.output_format.to_string()),
            "always_all" => Some(self.always_all.to_string()),
            "expand_named" => Some(expansion_name(self.expand_named).to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "input_format" => self.input_format = Some(value.parse()?),
            "output_format" => self.output_format = value.parse()?,
            "always_all" => {
                self.always_all = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got {:?}", value))?
            }
            "expand_named" => self.expand_named = parse_expansion(value)?,
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

pub fn expansion_name(expansion: Expansion) -> &'static str {
    match expansion {
        Expansion::All => "all",
        Expansion::Current => "current",
        Expansion::None => "none",
    }
}

pub fn parse_expansion(value: &str) -> anyhow::Result<Expansion> {
    match value.to_lowercase().as_str() {
        "all" => Ok(Expansion::All),
        "current" => Ok(Expansion::Current),
        "none" => Ok(Expansion::None),
        other => anyhow::bail!("Unknown expansion: {}. Expected all, current or none", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        assert_eq!(config.get("output_format").as_deref(), Some("text"));
        assert_eq!(config.get("input_format").as_deref(), Some("(not set)"));

        config.set("input_format", "nt").unwrap();
        config.set("always_all", "true").unwrap();
        config.set("expand_named", "ALL").unwrap();
        assert_eq!(config.input_format, Some(RdfFormat::NTriples));
        assert!(config.always_all);
        assert_eq!(config.expand_named, Expansion::All);
        assert_eq!(config.get("expand_named").as_deref(), Some("all"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("always_all", "maybe").is_err());
        assert!(config.set("expand_named", "deep").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.get("colour").is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            input_format: Some(RdfFormat::Turtle),
            output_format: OutputFormat::Json,
            always_all: true,
            expand_named: Expansion::None,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("expand_named = \"none\""));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
        assert_eq!(toml::from_str::<Config>("").unwrap(), Config::default());
    }
}
