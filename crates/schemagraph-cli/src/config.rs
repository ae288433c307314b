//! CLI configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use schemagraph_storage::DEFAULT_GRAPH_FILE;

/// Overrides the config file location
pub const CONFIG_ENV: &str = "SCHEMAGRAPH_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("schemagraph")
}

/// Location of `config.toml`
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("schemagraph")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub graph_file: String,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            graph_file: DEFAULT_GRAPH_FILE.to_string(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if it is missing or invalid
    pub fn load() -> Self {
        let path = config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["data_dir", "graph_file", "format"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => Some(self.data_dir.display().to_string()),
            "graph_file" => Some(self.graph_file.clone()),
            "format" => Some(self.format.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "graph_file" => {
                if value.trim().is_empty() {
                    anyhow::bail!("graph_file cannot be empty");
                }
                self.graph_file = value.to_string();
            }
            "format" => self.format = value.parse()?,
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Graph file used when `--file` is not given
    pub fn graph_path(&self) -> PathBuf {
        self.data_dir.join(&self.graph_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        assert_eq!(config.get("graph_file").as_deref(), Some("graph_data.gdb"));
        assert_eq!(config.get("format").as_deref(), Some("table"));

        config.set("format", "json").unwrap();
        config.set("data_dir", "/tmp/sg").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.graph_path(), PathBuf::from("/tmp/sg/graph_data.gdb"));

        assert!(config.set("format", "xml").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.get("colour").is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.set("graph_file", "social.gdb").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);

        let partial: Config = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(partial.graph_file, DEFAULT_GRAPH_FILE);
        assert_eq!(partial.format, OutputFormat::Json);
    }
}
