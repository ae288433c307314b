//! Traversal commands

use clap::{Args, Subcommand};

use crate::output::format_json;
use crate::AppContext;
use schemagraph_core::{TraversalQuery, TraversalResult};

#[derive(Args)]
pub struct TraverseArgs {
    #[command(subcommand)]
    pub command: TraverseCommands,

    /// Only follow edges of this relationship type
    #[arg(short = 'r', long = "rel", global = true)]
    pub relation_type: Option<String>,
}

#[derive(Subcommand)]
pub enum TraverseCommands {
    /// Breadth-first visit order
    Bfs {
        /// Start node ID
        start: String,
    },
    /// Depth-first visit order
    Dfs {
        /// Start node ID
        start: String,
    },
    /// Shortest path between two nodes
    Path {
        /// Start node ID
        start: String,
        /// Target node ID
        target: String,
    },
    /// Direct outgoing neighbors
    Neighbors {
        /// Node ID
        id: String,
    },
}

pub fn run(args: &TraverseArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let query = match &args.command {
        TraverseCommands::Bfs { start } => TraversalQuery::bfs(start),
        TraverseCommands::Dfs { start } => TraversalQuery::dfs(start),
        TraverseCommands::Path { start, target } => TraversalQuery::shortest_path(start, target),
        TraverseCommands::Neighbors { id } => TraversalQuery::neighbors(id),
    };
    let query = match &args.relation_type {
        Some(rel) => query.filter_relation_type(rel),
        None => query,
    };

    let result = ctx.engine.traverse(&query)?;

    if ctx.json() {
        println!("{}", format_json(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &TraversalResult) {
    match &result.path {
        Some(path) if path.is_empty() => {
            println!(
                "No path from {} to {}",
                result.start,
                result.target.as_deref().unwrap_or(&result.start)
            );
        }
        Some(path) => {
            println!("{}", path.nodes.join(" -> "));
            println!("({} hop(s))", path.hops());
        }
        None if result.visited.is_empty() => println!("No nodes reached."),
        None => {
            for id in &result.visited {
                println!("{}", id);
            }
        }
    }
}
