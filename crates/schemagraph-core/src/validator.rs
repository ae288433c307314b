//! Constraint checks run before every mutation
//!
//! The validator reads the catalog and store but never writes to either. A
//! rejected operation therefore leaves all engine state untouched.

use crate::catalog::SchemaCatalog;
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::node::{Node, Properties};
use crate::schema::{is_blank, NodeTypeDef, PropertySchema, RelationshipTypeDef, TypeKind};
use crate::store::GraphStore;

pub struct ConstraintValidator;

impl ConstraintValidator {
    /// Check a node before insertion.
    ///
    /// Order: id shape, duplicate ID, unknown type, missing required
    /// properties, property text.
    pub fn validate_node_insert(
        catalog: &SchemaCatalog,
        store: &GraphStore,
        node: &Node,
    ) -> Result<()> {
        Self::validate_name("node id", &node.id)?;
        if store.contains_node(&node.id) {
            return Err(Error::DuplicateId(node.id.clone()));
        }

        let def = catalog
            .node_type(&node.node_type)
            .ok_or_else(|| Error::UnknownType {
                kind: TypeKind::Node,
                name: node.node_type.clone(),
            })?;

        let missing = def.properties.missing_from(&node.properties);
        if !missing.is_empty() {
            return Err(Error::MissingRequiredProperty {
                kind: TypeKind::Node,
                type_name: def.name.clone(),
                missing,
            });
        }
        Self::validate_properties(&node.properties)?;

        tracing::debug!("Node {} passed validation", node.id);
        Ok(())
    }

    /// Check a property write on an existing node or edge of `type_name`.
    ///
    /// `None` (or a blank value) means the property is being removed, which
    /// is only allowed for keys the type does not require.
    pub fn validate_property_update(
        catalog: &SchemaCatalog,
        kind: TypeKind,
        type_name: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<()> {
        let properties = match kind {
            TypeKind::Node => catalog.node_type(type_name).map(|d| &d.properties),
            TypeKind::Relationship => catalog.relationship_type(type_name).map(|d| &d.properties),
        };
        let Some(properties) = properties else {
            return Err(Error::UnknownType {
                kind,
                name: type_name.to_string(),
            });
        };

        if properties.is_required(key) && value.map_or(true, is_blank) {
            return Err(Error::RequiredPropertyViolation {
                kind,
                type_name: type_name.to_string(),
                key: key.to_string(),
            });
        }
        Self::validate_text("property key", key)?;
        if let Some(value) = value {
            Self::validate_text("property value", value)?;
        }
        Ok(())
    }

    /// Check an edge before insertion.
    ///
    /// Order: source exists, destination exists, relationship type declared,
    /// no duplicate identity, endpoint types match, required properties set.
    pub fn validate_edge_insert(
        catalog: &SchemaCatalog,
        store: &GraphStore,
        edge: &Edge,
    ) -> Result<()> {
        let from = store
            .node(&edge.from)
            .ok_or_else(|| Error::NodeNotFound(edge.from.clone()))?;
        let to = store
            .node(&edge.to)
            .ok_or_else(|| Error::NodeNotFound(edge.to.clone()))?;

        let def = catalog
            .relationship_type(&edge.relation_type)
            .ok_or_else(|| Error::UnknownType {
                kind: TypeKind::Relationship,
                name: edge.relation_type.clone(),
            })?;

        if store.edge_exists(&edge.from, &edge.to, &edge.relation_type) {
            return Err(Error::DuplicateEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                relation_type: edge.relation_type.clone(),
            });
        }

        if !def.allows(&from.node_type, &to.node_type) {
            return Err(Error::TypeMismatch {
                relation_type: def.name.clone(),
                expected_from: def.from_type.clone(),
                expected_to: def.to_type.clone(),
                actual_from: from.node_type.clone(),
                actual_to: to.node_type.clone(),
            });
        }

        let missing = def.properties.missing_from(&edge.properties);
        if !missing.is_empty() {
            return Err(Error::MissingRequiredProperty {
                kind: TypeKind::Relationship,
                type_name: def.name.clone(),
                missing,
            });
        }
        Self::validate_properties(&edge.properties)?;

        tracing::debug!("Edge {} passed validation", edge.key());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text rules
    //
    // Records are stored one per line with `,`-separated key lists, so line
    // breaks are refused everywhere and commas in schema keys.
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a node type definition before it enters the catalog
    pub fn validate_node_type_def(def: &NodeTypeDef) -> Result<()> {
        Self::validate_name("node type name", &def.name)?;
        Self::validate_schema_keys(&def.properties)
    }

    /// Check a relationship type definition before it enters the catalog
    pub fn validate_relationship_type_def(def: &RelationshipTypeDef) -> Result<()> {
        Self::validate_name("relationship type name", &def.name)?;
        if let Some(from) = &def.from_type {
            Self::validate_name("source type", from)?;
        }
        if let Some(to) = &def.to_type {
            Self::validate_name("destination type", to)?;
        }
        Self::validate_schema_keys(&def.properties)
    }

    /// Ids and type names: non-blank, single line
    pub fn validate_name(field: &str, value: &str) -> Result<()> {
        if is_blank(value) {
            return Err(invalid(field, value, "must not be blank"));
        }
        Self::validate_text(field, value)
    }

    /// Free text (property keys and values): single line
    pub fn validate_text(field: &str, value: &str) -> Result<()> {
        if value.contains(['\n', '\r']) {
            return Err(invalid(field, value, "line breaks are not allowed"));
        }
        Ok(())
    }

    fn validate_properties(properties: &Properties) -> Result<()> {
        for (key, value) in properties {
            Self::validate_text("property key", key)?;
            Self::validate_text("property value", value)?;
        }
        Ok(())
    }

    fn validate_schema_keys(schema: &PropertySchema) -> Result<()> {
        for key in schema.all() {
            Self::validate_name("property key", key)?;
            if key.contains(',') {
                return Err(invalid("property key", key, "commas are not allowed in schema keys"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &'static str) -> Error {
    Error::InvalidText {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    }
}
