//! Error types for schemagraph core

use crate::schema::TypeKind;
use thiserror::Error;

/// Result type alias using the engine's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by engine operations.
///
/// Every variant is an expected, recoverable condition. Layers below the
/// facade fail fast with the specific variant and the facade passes it
/// through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Node ID already exists: {0}")]
    DuplicateId(String),

    #[error("Edge already exists: {from} -[{relation_type}]-> {to}")]
    DuplicateEdge {
        from: String,
        to: String,
        relation_type: String,
    },

    #[error("Unknown {kind} type: '{name}'")]
    UnknownType { kind: TypeKind, name: String },

    #[error("{kind} type '{name}' already exists")]
    DuplicateType { kind: TypeKind, name: String },

    #[error("Missing required propert{} {} for {kind} type '{type_name}'", plural(.missing), .missing.join(", "))]
    MissingRequiredProperty {
        kind: TypeKind,
        type_name: String,
        missing: Vec<String>,
    },

    #[error("Cannot set required property '{key}' of {kind} type '{type_name}' to an empty value")]
    RequiredPropertyViolation {
        kind: TypeKind,
        type_name: String,
        key: String,
    },

    #[error(
        "Relationship '{relation_type}' expects ({} -> {}) but got ({actual_from} -> {actual_to})",
        .expected_from.as_deref().unwrap_or("*"),
        .expected_to.as_deref().unwrap_or("*")
    )]
    TypeMismatch {
        relation_type: String,
        expected_from: Option<String>,
        expected_to: Option<String>,
        actual_from: String,
        actual_to: String,
    },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {from} -[{relation_type}]-> {to}")]
    EdgeNotFound {
        from: String,
        to: String,
        relation_type: String,
    },

    #[error("Invalid {field} {value:?}: {reason}")]
    InvalidText {
        field: String,
        value: String,
        reason: &'static str,
    },

    #[error("Cannot drop {kind} type '{name}': {count} instance(s) still exist")]
    TypeInUse {
        kind: TypeKind,
        name: String,
        count: usize,
    },
}

impl Error {
    /// True for both node and edge not-found failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::EdgeNotFound { .. })
    }
}

fn plural(keys: &[String]) -> &'static str {
    if keys.len() == 1 {
        "y"
    } else {
        "ies"
    }
}
