//! Schema commands

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{format_json, print_table, table};
use crate::AppContext;
use schemagraph_core::{NodeTypeDef, RelationshipTypeDef};

#[derive(Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommands,
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Define a node type
    NodeType {
        /// Type name
        name: String,
        /// Required property keys (comma separated)
        #[arg(long, value_delimiter = ',')]
        required: Vec<String>,
        /// Optional property keys (comma separated)
        #[arg(long, value_delimiter = ',')]
        optional: Vec<String>,
    },
    /// Define a relationship type
    RelType {
        /// Type name
        name: String,
        /// Node type every source must have
        #[arg(long)]
        from: Option<String>,
        /// Node type every target must have
        #[arg(long)]
        to: Option<String>,
        /// Required property keys (comma separated)
        #[arg(long, value_delimiter = ',')]
        required: Vec<String>,
        /// Optional property keys (comma separated)
        #[arg(long, value_delimiter = ',')]
        optional: Vec<String>,
    },
    /// Drop an unused node type
    DropNodeType {
        /// Type name
        name: String,
    },
    /// Drop an unused relationship type
    DropRelType {
        /// Type name
        name: String,
    },
    /// Show all defined types
    Show,
}

#[derive(Serialize)]
struct SchemaView<'a> {
    node_types: Vec<&'a NodeTypeDef>,
    relationship_types: Vec<&'a RelationshipTypeDef>,
}

pub async fn run(args: &SchemaArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        SchemaCommands::NodeType {
            name,
            required,
            optional,
        } => {
            let def = NodeTypeDef::new(name)
                .with_required(required.iter().map(String::as_str))
                .with_optional(optional.iter().map(String::as_str));
            ctx.engine.define_node_type(def)?;
            ctx.commit().await?;
            println!("Defined node type: {}", name);
        }
        SchemaCommands::RelType {
            name,
            from,
            to,
            required,
            optional,
        } => {
            let mut def = RelationshipTypeDef::new(name)
                .with_required(required.iter().map(String::as_str))
                .with_optional(optional.iter().map(String::as_str));
            def.from_type = from.clone();
            def.to_type = to.clone();
            ctx.engine.define_relationship_type(def)?;
            ctx.commit().await?;
            println!("Defined relationship type: {}", name);
        }
        SchemaCommands::DropNodeType { name } => {
            ctx.engine.drop_node_type(name)?;
            ctx.commit().await?;
            println!("Dropped node type: {}", name);
        }
        SchemaCommands::DropRelType { name } => {
            ctx.engine.drop_relationship_type(name)?;
            ctx.commit().await?;
            println!("Dropped relationship type: {}", name);
        }
        SchemaCommands::Show => show(ctx)?,
    }
    Ok(())
}

fn show(ctx: &AppContext) -> anyhow::Result<()> {
    let catalog = ctx.engine.catalog();

    if ctx.json() {
        let view = SchemaView {
            node_types: catalog.node_types().collect(),
            relationship_types: catalog.relationship_types().collect(),
        };
        println!("{}", format_json(&view)?);
        return Ok(());
    }

    let mut nodes = table(["NODE TYPE", "REQUIRED", "OPTIONAL"]);
    for def in catalog.node_types() {
        nodes.add_row(vec![
            def.name.clone(),
            key_list(def.properties.required()),
            key_list(def.properties.optional()),
        ]);
    }
    print_table(&nodes, "No node types defined.");
    println!();

    let mut rels = table(["RELATIONSHIP", "FROM", "TO", "REQUIRED", "OPTIONAL"]);
    for def in catalog.relationship_types() {
        rels.add_row(vec![
            def.name.clone(),
            def.from_type.clone().unwrap_or_else(|| "*".to_string()),
            def.to_type.clone().unwrap_or_else(|| "*".to_string()),
            key_list(def.properties.required()),
            key_list(def.properties.optional()),
        ]);
    }
    print_table(&rels, "No relationship types defined.");
    Ok(())
}

fn key_list(keys: &[String]) -> String {
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.join(",")
    }
}
