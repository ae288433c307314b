//! Node commands

use clap::{Args, Subcommand};

use super::{parse_property, to_properties};
use crate::output::{edges_table, format_json, nodes_table, print_table};
use crate::AppContext;
use schemagraph_core::{FindQuery, Node};

#[derive(Args)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommands,
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Add a new node
    Add {
        /// Node ID
        id: String,
        /// Node type
        #[arg(short = 't', long)]
        r#type: String,
        /// Properties as key=value
        #[arg(short, long = "prop", value_parser = parse_property)]
        props: Vec<(String, String)>,
    },
    /// Show a node with its edges
    Get {
        /// Node ID
        id: String,
    },
    /// Delete a node and every edge touching it
    Delete {
        /// Node ID
        id: String,
    },
    /// Set a property (omit VALUE to remove it)
    Set {
        /// Node ID
        id: String,
        /// Property key
        key: String,
        /// New value
        value: Option<String>,
    },
    /// List nodes
    List {
        /// Filter by type
        #[arg(short = 't', long)]
        r#type: Option<String>,
        /// Filter by property (key=value)
        #[arg(short = 'w', long = "where", value_parser = parse_property)]
        filter: Option<(String, String)>,
    },
}

pub async fn run(args: &NodeArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        NodeCommands::Add { id, r#type, props } => {
            let node = Node::new(id, r#type).with_properties(to_properties(props));
            ctx.engine.add_node(node)?;
            ctx.commit().await?;
            println!("Added node: {}", id);
        }
        NodeCommands::Get { id } => get(ctx, id)?,
        NodeCommands::Delete { id } => {
            let removed = ctx.engine.delete_node(id)?;
            ctx.commit().await?;
            println!(
                "Deleted node: {} ({} edge(s) removed)",
                removed.node.id,
                removed.edges.len()
            );
        }
        NodeCommands::Set { id, key, value } => {
            let old = ctx.engine.update_node_property(id, key, value.as_deref())?;
            ctx.commit().await?;
            match value.as_deref().filter(|v| !v.trim().is_empty()) {
                Some(v) => println!("Set {}.{} = {}", id, key, v),
                None if old.is_some() => println!("Removed {}.{}", id, key),
                None => println!("{}.{} was not set", id, key),
            }
        }
        NodeCommands::List { r#type, filter } => {
            let mut query = FindQuery::all();
            if let Some(t) = r#type {
                query = query.with_type(t);
            }
            if let Some((key, value)) = filter {
                query = query.where_property(key, value);
            }
            let nodes = ctx.engine.find(&query);

            if ctx.json() {
                println!("{}", format_json(&nodes)?);
            } else {
                print_table(&nodes_table(nodes), "No nodes found.");
            }
        }
    }
    Ok(())
}

fn get(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let description = ctx.engine.describe_node(id)?;

    if ctx.json() {
        println!("{}", format_json(&description)?);
        return Ok(());
    }

    println!("{}", description.node);
    if !description.outgoing.is_empty() {
        println!();
        println!("Outgoing:");
        println!("{}", edges_table(&description.outgoing));
    }
    if !description.incoming.is_empty() {
        println!();
        println!("Incoming:");
        println!("{}", edges_table(&description.incoming));
    }
    Ok(())
}
