//! Whole-graph commands: counts, index inspection and clearing

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{format_json, print_table, table};
use crate::AppContext;

#[derive(Args)]
pub struct CountArgs {
    #[command(subcommand)]
    pub command: CountCommands,
}

#[derive(Subcommand)]
pub enum CountCommands {
    /// Count nodes
    Nodes {
        /// Only nodes of this type
        #[arg(short = 't', long)]
        r#type: Option<String>,
    },
    /// Count edges
    Edges {
        /// Only edges of this relationship type
        #[arg(short = 'r', long = "rel")]
        relation_type: Option<String>,
    },
}

#[derive(Args)]
pub struct ClearArgs {
    /// Also drop every node and relationship type
    #[arg(long)]
    pub all: bool,
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    key: &'a str,
    value: &'a str,
    nodes: Vec<&'a str>,
}

pub fn run_count(args: &CountArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let count = match &args.command {
        CountCommands::Nodes { r#type } => ctx.engine.count_nodes(r#type.as_deref()),
        CountCommands::Edges { relation_type } => ctx.engine.count_edges(relation_type.as_deref()),
    };

    if ctx.json() {
        println!("{}", format_json(&serde_json::json!({ "count": count }))?);
    } else {
        println!("{}", count);
    }
    Ok(())
}

pub fn run_index(ctx: &AppContext) -> anyhow::Result<()> {
    let entries: Vec<IndexEntry> = ctx
        .engine
        .index()
        .entries()
        .into_iter()
        .map(|(key, value, ids)| IndexEntry {
            key,
            value,
            nodes: ids.iter().map(String::as_str).collect(),
        })
        .collect();

    if ctx.json() {
        println!("{}", format_json(&entries)?);
        return Ok(());
    }

    let mut table = table(["KEY", "VALUE", "NODES"]);
    for entry in &entries {
        table.add_row(vec![
            entry.key.to_string(),
            entry.value.to_string(),
            entry.nodes.join(","),
        ]);
    }
    print_table(&table, "Index is empty.");
    Ok(())
}

pub async fn run_clear(args: &ClearArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    let nodes = ctx.engine.count_nodes(None);
    let edges = ctx.engine.count_edges(None);

    if args.all {
        ctx.engine.clear_all();
    } else {
        ctx.engine.clear_graph();
    }
    ctx.commit().await?;

    tracing::info!("Cleared {} node(s) and {} edge(s)", nodes, edges);
    if args.all {
        println!("Cleared {} node(s), {} edge(s) and the schema", nodes, edges);
    } else {
        println!("Cleared {} node(s) and {} edge(s)", nodes, edges);
    }
    Ok(())
}
