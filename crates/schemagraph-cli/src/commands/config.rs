//! `config` subcommands: read and edit `config.toml`

use clap::{Args, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{config_file_path, Config};
use crate::output::{format_json, table, OutputFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// data_dir, graph_file or format
        key: String,
    },
    /// Change one setting
    Set {
        /// data_dir, graph_file or format
        key: String,
        value: String,
    },
    /// Restore a setting to its default
    Reset {
        /// data_dir, graph_file or format
        key: String,
    },
    /// Print every setting and the graph file they resolve to
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

#[derive(Serialize)]
struct ConfigView {
    path: String,
    graph: String,
    settings: IndexMap<&'static str, String>,
}

impl ConfigView {
    fn new(config: &Config) -> Self {
        Self {
            path: config_file_path().display().to_string(),
            graph: config.graph_path().display().to_string(),
            settings: Config::keys()
                .iter()
                .filter_map(|&key| config.get(key).map(|value| (key, value)))
                .collect(),
        }
    }
}

/// `format` is the `--format` flag only; a configured default never changes
/// how the configuration itself is printed.
pub fn run(args: &ConfigArgs, format: Option<OutputFormat>) -> anyhow::Result<()> {
    let json = format == Some(OutputFormat::Json);
    match &args.command {
        ConfigCommands::Get { key } => get(key, json),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, value)?;
            config.save()?;
            tracing::info!("Config {} changed to {}", key, value);
            println!("Set {} = {}", key, value);
            Ok(())
        }
        ConfigCommands::Reset { key } => {
            let default = Config::default().get(key).ok_or_else(|| unknown_key(key))?;
            let mut config = Config::load();
            config.set(key, &default)?;
            config.save()?;
            println!("Reset {} = {}", key, default);
            Ok(())
        }
        ConfigCommands::List => list(json),
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Init { force } => init(*force),
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        Config::keys().join(", ")
    )
}

fn get(key: &str, json: bool) -> anyhow::Result<()> {
    let value = Config::load().get(key).ok_or_else(|| unknown_key(key))?;
    if json {
        println!("{}", format_json(&serde_json::json!({ key: value }))?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn list(json: bool) -> anyhow::Result<()> {
    let view = ConfigView::new(&Config::load());
    if json {
        println!("{}", format_json(&view)?);
        return Ok(());
    }

    let mut settings = table(["KEY", "VALUE"]);
    for (key, value) in &view.settings {
        settings.add_row(vec![key.to_string(), value.clone()]);
    }
    println!("{}", settings);
    println!("Config file: {}", view.path);
    println!("Graph file:  {}", view.graph);
    Ok(())
}

fn init(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to replace it)",
            path.display()
        );
    }

    Config::default().save()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_lists_every_key_in_order() {
        let mut config = Config::default();
        config.set("graph_file", "social.gdb").unwrap();

        let view = ConfigView::new(&config);
        let keys: Vec<_> = view.settings.keys().copied().collect();
        assert_eq!(keys, Config::keys());
        assert_eq!(view.settings["graph_file"], "social.gdb");
        assert!(view.graph.ends_with("social.gdb"));
    }

    #[test]
    fn test_unknown_key_names_the_alternatives() {
        let message = unknown_key("colour").to_string();
        assert!(message.contains("colour"));
        assert!(message.contains("data_dir, graph_file, format"));
    }
}
