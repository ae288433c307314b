//! Edge commands

use clap::{Args, Subcommand, ValueEnum};

use super::{parse_property, to_properties};
use crate::output::{edges_table, format_json, print_table};
use crate::AppContext;
use schemagraph_core::{Direction, Edge};

#[derive(Args)]
pub struct EdgeArgs {
    #[command(subcommand)]
    pub command: EdgeCommands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Outgoing,
    Incoming,
    Both,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Outgoing => Direction::Outgoing,
            DirectionArg::Incoming => Direction::Incoming,
            DirectionArg::Both => Direction::Both,
        }
    }
}

#[derive(Subcommand)]
pub enum EdgeCommands {
    /// Add a new edge
    Add {
        /// Source node ID
        from: String,
        /// Target node ID
        to: String,
        /// Relationship type
        #[arg(short = 'r', long = "rel")]
        relation_type: String,
        /// Properties as key=value
        #[arg(short, long = "prop", value_parser = parse_property)]
        props: Vec<(String, String)>,
    },
    /// Delete an edge
    Delete {
        /// Source node ID
        from: String,
        /// Target node ID
        to: String,
        /// Relationship type
        #[arg(short = 'r', long = "rel")]
        relation_type: String,
    },
    /// Set an edge property (omit VALUE to remove it)
    Set {
        /// Source node ID
        from: String,
        /// Target node ID
        to: String,
        /// Relationship type
        #[arg(short = 'r', long = "rel")]
        relation_type: String,
        /// Property key
        key: String,
        /// New value
        value: Option<String>,
    },
    /// List edges
    List {
        /// Only edges touching this node
        #[arg(short, long)]
        node: Option<String>,
        /// Direction relative to --node
        #[arg(short, long, value_enum, default_value = "both")]
        direction: DirectionArg,
        /// Filter by relationship type
        #[arg(short = 'r', long = "rel")]
        relation_type: Option<String>,
    },
}

pub async fn run(args: &EdgeArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        EdgeCommands::Add {
            from,
            to,
            relation_type,
            props,
        } => {
            let edge = Edge::new(from, to, relation_type).with_properties(to_properties(props));
            let label = edge.key().to_string();
            ctx.engine.add_edge(edge)?;
            ctx.commit().await?;
            println!("Added edge: {}", label);
        }
        EdgeCommands::Delete {
            from,
            to,
            relation_type,
        } => {
            let edge = ctx.engine.delete_edge(from, to, relation_type)?;
            ctx.commit().await?;
            println!("Deleted edge: {}", edge.key());
        }
        EdgeCommands::Set {
            from,
            to,
            relation_type,
            key,
            value,
        } => {
            ctx.engine
                .update_edge_property(from, to, relation_type, key, value.as_deref())?;
            ctx.commit().await?;
            match value.as_deref().filter(|v| !v.trim().is_empty()) {
                Some(v) => println!("Set {} = {} on {} -[{}]-> {}", key, v, from, relation_type, to),
                None => println!("Removed {} from {} -[{}]-> {}", key, from, relation_type, to),
            }
        }
        EdgeCommands::List {
            node,
            direction,
            relation_type,
        } => {
            let mut edges = match node {
                Some(id) => ctx.engine.edges_of(id, (*direction).into())?,
                None => ctx.engine.all_edges(),
            };
            if let Some(rel) = relation_type {
                edges.retain(|e| e.relation_type == *rel);
            }

            if ctx.json() {
                println!("{}", format_json(&edges)?);
            } else {
                print_table(&edges_table(edges), "No edges found.");
            }
        }
    }
    Ok(())
}
