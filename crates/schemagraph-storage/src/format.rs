//! Graph file codecs
//!
//! The flat format has four sections in fixed order:
//!
//! ```text
//! [SCHEMA_NODE_TYPES]
//! User|req:name,age|opt:email
//! [SCHEMA_RELATIONSHIP_TYPES]
//! WORKS_AT|User|Company|req:since|opt:
//! [NODES]
//! u1|User|age=30;name=Alice
//! [EDGES]
//! u1|c1|WORKS_AT|since=2020
//! ```
//!
//! An empty source or destination column means the relationship type is
//! unconstrained on that side. Inside ids, type names and property keys and
//! values, `\ | ; =` are written as `~b ~p ~s ~e`. A literal `~` followed by
//! one of those letters does not survive a round trip. Line breaks cannot be
//! stored at all; the engine refuses them before they reach a snapshot, and
//! schema keys may not contain `,`.

use crate::error::{StorageError, StorageResult};
use schemagraph_core::{
    Edge, GraphSnapshot, Node, NodeTypeDef, Properties, PropertySchema, RelationshipTypeDef,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default graph file name
pub const DEFAULT_GRAPH_FILE: &str = "graph_data.gdb";

const SEC_NODE_TYPES: &str = "[SCHEMA_NODE_TYPES]";
const SEC_REL_TYPES: &str = "[SCHEMA_RELATIONSHIP_TYPES]";
const SEC_NODES: &str = "[NODES]";
const SEC_EDGES: &str = "[EDGES]";

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// `|`-delimited sectioned text
    #[default]
    Flat,
    /// Pretty-printed JSON of the snapshot
    Json,
}

impl SnapshotFormat {
    /// JSON for `.json` files, flat text otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Flat,
        }
    }

    pub fn encode(self, snapshot: &GraphSnapshot) -> StorageResult<String> {
        match self {
            Self::Flat => Ok(encode(snapshot)),
            Self::Json => Ok(serde_json::to_string_pretty(snapshot)?),
        }
    }

    pub fn decode(self, input: &str) -> StorageResult<GraphSnapshot> {
        match self {
            Self::Flat => decode(input),
            Self::Json => Ok(serde_json::from_str(input)?),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    NodeTypes,
    RelationshipTypes,
    Nodes,
    Edges,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            SEC_NODE_TYPES => Some(Self::NodeTypes),
            SEC_REL_TYPES => Some(Self::RelationshipTypes),
            SEC_NODES => Some(Self::Nodes),
            SEC_EDGES => Some(Self::Edges),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a snapshot to the flat format
pub fn encode(snapshot: &GraphSnapshot) -> String {
    let mut out = String::new();

    out.push_str(SEC_NODE_TYPES);
    out.push('\n');
    for def in &snapshot.node_types {
        out.push_str(&format!(
            "{}|req:{}|opt:{}\n",
            escape(&def.name),
            encode_keys(def.properties.required()),
            encode_keys(def.properties.optional())
        ));
    }

    out.push_str(SEC_REL_TYPES);
    out.push('\n');
    for def in &snapshot.relationship_types {
        out.push_str(&format!(
            "{}|{}|{}|req:{}|opt:{}\n",
            escape(&def.name),
            escape(def.from_type.as_deref().unwrap_or("")),
            escape(def.to_type.as_deref().unwrap_or("")),
            encode_keys(def.properties.required()),
            encode_keys(def.properties.optional())
        ));
    }

    out.push_str(SEC_NODES);
    out.push('\n');
    for node in &snapshot.nodes {
        out.push_str(&format!(
            "{}|{}|{}\n",
            escape(&node.id),
            escape(&node.node_type),
            encode_properties(&node.properties)
        ));
    }

    out.push_str(SEC_EDGES);
    out.push('\n');
    for edge in &snapshot.edges {
        out.push_str(&format!(
            "{}|{}|{}|{}\n",
            escape(&edge.from),
            escape(&edge.to),
            escape(&edge.relation_type),
            encode_properties(&edge.properties)
        ));
    }

    out
}

fn encode_keys(keys: &[String]) -> String {
    keys.iter().map(|k| escape(k)).collect::<Vec<_>>().join(",")
}

fn encode_properties(properties: &Properties) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Replace the delimiter characters with their `~` codes.
///
/// Backslash goes first so its code is never re-escaped.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "~b")
        .replace('|', "~p")
        .replace(';', "~s")
        .replace('=', "~e")
}

/// Inverse of [`escape`]; `~b` is restored last.
pub fn unescape(value: &str) -> String {
    value
        .replace("~p", "|")
        .replace("~s", ";")
        .replace("~e", "=")
        .replace("~b", "\\")
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the flat format.
///
/// Blank lines are ignored. Record rows are taken verbatim so surrounding
/// whitespace in ids and values survives. Any row outside a section or with
/// too few fields fails with the 1-based line number.
pub fn decode(input: &str) -> StorageResult<GraphSnapshot> {
    let mut snapshot = GraphSnapshot::new();
    let mut section: Option<Section> = None;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Every record has at least one `|`, headers never do
        if is_header(trimmed) {
            section = Some(Section::from_header(trimmed).ok_or_else(|| {
                StorageError::format(line_no, format!("unknown section {}", trimmed))
            })?);
            continue;
        }

        match section {
            None => {
                return Err(StorageError::format(
                    line_no,
                    "record appears before any section header",
                ))
            }
            Some(Section::NodeTypes) => snapshot.node_types.push(decode_node_type(line, line_no)?),
            Some(Section::RelationshipTypes) => snapshot
                .relationship_types
                .push(decode_relationship_type(line, line_no)?),
            Some(Section::Nodes) => snapshot.nodes.push(decode_node(line, line_no)?),
            Some(Section::Edges) => snapshot.edges.push(decode_edge(line, line_no)?),
        }
    }

    tracing::debug!(
        "Decoded {} node type(s), {} relationship type(s), {} node(s), {} edge(s)",
        snapshot.node_types.len(),
        snapshot.relationship_types.len(),
        snapshot.nodes.len(),
        snapshot.edges.len()
    );
    Ok(snapshot)
}

/// `Name|req:a,b|opt:c`
fn decode_node_type(line: &str, line_no: usize) -> StorageResult<NodeTypeDef> {
    let mut fields = line.split('|');
    let name = non_empty(fields.next(), "node type name", line_no)?;
    let mut def = NodeTypeDef::new(name);
    for field in fields {
        apply_key_list(field, line_no, &mut def.properties)?;
    }
    Ok(def)
}

/// `Name|Src|Dst|req:..|opt:..`
fn decode_relationship_type(line: &str, line_no: usize) -> StorageResult<RelationshipTypeDef> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < 3 {
        return Err(StorageError::format(
            line_no,
            "relationship type needs name, source and destination columns",
        ));
    }

    let mut def = RelationshipTypeDef::new(non_empty(
        Some(fields[0]),
        "relationship type name",
        line_no,
    )?);
    def.from_type = optional(fields[1]);
    def.to_type = optional(fields[2]);
    for field in &fields[3..] {
        apply_key_list(field, line_no, &mut def.properties)?;
    }
    Ok(def)
}

/// `id|type|k=v;k=v`
fn decode_node(line: &str, line_no: usize) -> StorageResult<Node> {
    let mut fields = line.splitn(3, '|');
    let id = non_empty(fields.next(), "node id", line_no)?;
    let node_type = non_empty(fields.next(), "node type", line_no)?;
    let properties = decode_properties(fields.next().unwrap_or(""), line_no)?;
    Ok(Node::new(id, node_type).with_properties(properties))
}

/// `src|dst|rel|k=v;k=v`
fn decode_edge(line: &str, line_no: usize) -> StorageResult<Edge> {
    let mut fields = line.splitn(4, '|');
    let from = non_empty(fields.next(), "edge source", line_no)?;
    let to = non_empty(fields.next(), "edge destination", line_no)?;
    let relation_type = non_empty(fields.next(), "edge relationship type", line_no)?;
    let properties = decode_properties(fields.next().unwrap_or(""), line_no)?;
    Ok(Edge::new(from, to, relation_type).with_properties(properties))
}

fn decode_properties(field: &str, line_no: usize) -> StorageResult<Properties> {
    let mut properties = Properties::new();
    for pair in field.split(';').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            StorageError::format(line_no, format!("property '{}' is not key=value", pair))
        })?;
        properties.insert(unescape(key), unescape(value));
    }
    Ok(properties)
}

/// Apply a `req:a,b` or `opt:c` column to a property schema
fn apply_key_list(field: &str, line_no: usize, schema: &mut PropertySchema) -> StorageResult<()> {
    let keys = |list: &str| {
        list.split(',')
            .filter(|k| !k.is_empty())
            .map(unescape)
            .collect::<Vec<_>>()
    };

    if let Some(list) = field.strip_prefix("req:") {
        keys(list).into_iter().for_each(|k| schema.require(k));
    } else if let Some(list) = field.strip_prefix("opt:") {
        keys(list).into_iter().for_each(|k| schema.allow(k));
    } else if !field.is_empty() {
        return Err(StorageError::format(
            line_no,
            format!("expected req: or opt: list, found '{}'", field),
        ));
    }
    Ok(())
}

fn is_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']') && !line.contains('|')
}

fn non_empty(field: Option<&str>, what: &str, line_no: usize) -> StorageResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(unescape(value)),
        _ => Err(StorageError::format(line_no, format!("missing {}", what))),
    }
}

fn optional(field: &str) -> Option<String> {
    (!field.trim().is_empty()).then(|| unescape(field))
}
