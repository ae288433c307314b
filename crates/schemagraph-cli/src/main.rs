//! Schemagraph CLI - Command line interface for the property graph engine

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, edge, graph, node, schema, traverse};
use config::Config;
use output::OutputFormat;
use schemagraph_core::GraphEngine;
use schemagraph_storage::{FileStorage, StorageBackend};

#[derive(Parser)]
#[command(name = "schemagraph")]
#[command(author, version, about = "Schema-enforced property graph engine")]
pub struct Cli {
    /// Graph file (default: <data_dir>/<graph_file> from config)
    #[arg(short, long, global = true, env = "SCHEMAGRAPH_FILE")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Define, drop and list node and relationship types
    Schema(schema::SchemaArgs),
    /// Manage nodes
    Node(node::NodeArgs),
    /// Manage edges
    Edge(edge::EdgeArgs),
    /// Walk the graph (bfs, dfs, path, neighbors)
    Traverse(traverse::TraverseArgs),
    /// Count nodes or edges
    Count(graph::CountArgs),
    /// Show property index entries
    Index,
    /// Remove all data (and with --all, the schema too)
    Clear(graph::ClearArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context: the loaded engine and where it is persisted
pub struct AppContext {
    pub storage: FileStorage,
    pub engine: GraphEngine,
    pub format: OutputFormat,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let path = cli.file.clone().unwrap_or_else(|| config.graph_path());
        tracing::debug!("Using graph file at: {:?}", path);

        let storage = FileStorage::open(&path);
        storage.initialize().await?;
        let engine = storage
            .load_engine()
            .await
            .with_context(|| format!("Failed to load graph from {}", path.display()))?;

        Ok(Self {
            storage,
            engine,
            format: cli.format.unwrap_or(config.format),
        })
    }

    /// Persist the engine after a successful mutation
    pub async fn commit(&self) -> anyhow::Result<()> {
        self.storage
            .save_engine(&self.engine)
            .await
            .with_context(|| format!("Failed to save graph to {}", self.storage.path().display()))
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, cli.format),
        Commands::Completions(args) => return completions::run(args, &mut std::io::stdout()),
        _ => {}
    }

    let config = Config::load();
    let mut ctx = AppContext::new(cli, &config).await?;

    match &cli.command {
        Commands::Schema(args) => schema::run(args, &mut ctx).await,
        Commands::Node(args) => node::run(args, &mut ctx).await,
        Commands::Edge(args) => edge::run(args, &mut ctx).await,
        Commands::Traverse(args) => traverse::run(args, &ctx),
        Commands::Count(args) => graph::run_count(args, &ctx),
        Commands::Index => graph::run_index(&ctx),
        Commands::Clear(args) => graph::run_clear(args, &mut ctx).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    tracing::debug!("Starting schemagraph CLI");

    let result = run(&cli).await;
    if let Err(e) = &result {
        tracing::warn!("Command failed: {:#}", e);
    }
    result
}
