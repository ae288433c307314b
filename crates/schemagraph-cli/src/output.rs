//! Output formatting utilities

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table};
use serde::{Deserialize, Serialize};

use schemagraph_core::{node::format_properties, Edge, Node, Properties};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

/// Serialize as pretty JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Empty table with a header row
pub fn table<I, S>(headers: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.into_iter().map(Into::into).collect::<Vec<String>>());
    table
}

fn properties_cell(properties: &Properties) -> String {
    if properties.is_empty() {
        "-".to_string()
    } else {
        format_properties(properties)
    }
}

pub fn nodes_table<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Table {
    let mut table = table(["ID", "TYPE", "PROPERTIES"]);
    for node in nodes {
        table.add_row(vec![
            node.id.clone(),
            node.node_type.clone(),
            properties_cell(&node.properties),
        ]);
    }
    table
}

pub fn edges_table<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Table {
    let mut table = table(["FROM", "TO", "RELATIONSHIP", "PROPERTIES"]);
    for edge in edges {
        table.add_row(vec![
            edge.from.clone(),
            edge.to.clone(),
            edge.relation_type.clone(),
            properties_cell(&edge.properties),
        ]);
    }
    table
}

/// Print a collection as a table, or a placeholder line when it is empty
pub fn print_table(table: &Table, empty: &str) {
    if table.row_iter().next().is_none() {
        println!("{}", empty);
    } else {
        println!("{}", table);
    }
}
