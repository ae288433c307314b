//! Schema catalog: registry of node and relationship type definitions
//!
//! The catalog is pure metadata. It has no view of live nodes or edges, so
//! it cannot tell whether a type is still in use; the engine checks that
//! before asking the catalog to remove anything.

use crate::error::{Error, Result};
use crate::schema::{NodeTypeDef, RelationshipTypeDef, TypeKind};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    node_types: IndexMap<String, NodeTypeDef>,
    relationship_types: IndexMap<String, RelationshipTypeDef>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node types
    // ─────────────────────────────────────────────────────────────────────────

    pub fn define_node_type(&mut self, def: NodeTypeDef) -> Result<()> {
        if self.node_types.contains_key(&def.name) {
            return Err(Error::DuplicateType {
                kind: TypeKind::Node,
                name: def.name,
            });
        }
        tracing::info!("Node type created: {}", def);
        self.node_types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn remove_node_type(&mut self, name: &str) -> Result<NodeTypeDef> {
        let def = self
            .node_types
            .shift_remove(name)
            .ok_or_else(|| Error::UnknownType {
                kind: TypeKind::Node,
                name: name.to_string(),
            })?;
        tracing::info!("Node type dropped: {}", name);
        Ok(def)
    }

    pub fn node_type(&self, name: &str) -> Option<&NodeTypeDef> {
        self.node_types.get(name)
    }

    pub fn node_type_exists(&self, name: &str) -> bool {
        self.node_types.contains_key(name)
    }

    /// Node types in definition order
    pub fn node_types(&self) -> impl Iterator<Item = &NodeTypeDef> {
        self.node_types.values()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship types
    // ─────────────────────────────────────────────────────────────────────────

    pub fn define_relationship_type(&mut self, def: RelationshipTypeDef) -> Result<()> {
        if self.relationship_types.contains_key(&def.name) {
            return Err(Error::DuplicateType {
                kind: TypeKind::Relationship,
                name: def.name,
            });
        }
        tracing::info!("Relationship type created: {}", def);
        self.relationship_types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn remove_relationship_type(&mut self, name: &str) -> Result<RelationshipTypeDef> {
        let def = self
            .relationship_types
            .shift_remove(name)
            .ok_or_else(|| Error::UnknownType {
                kind: TypeKind::Relationship,
                name: name.to_string(),
            })?;
        tracing::info!("Relationship type dropped: {}", name);
        Ok(def)
    }

    pub fn relationship_type(&self, name: &str) -> Option<&RelationshipTypeDef> {
        self.relationship_types.get(name)
    }

    pub fn relationship_type_exists(&self, name: &str) -> bool {
        self.relationship_types.contains_key(name)
    }

    /// Relationship types in definition order
    pub fn relationship_types(&self) -> impl Iterator<Item = &RelationshipTypeDef> {
        self.relationship_types.values()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generic queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn type_exists(&self, kind: TypeKind, name: &str) -> bool {
        match kind {
            TypeKind::Node => self.node_type_exists(name),
            TypeKind::Relationship => self.relationship_type_exists(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty() && self.relationship_types.is_empty()
    }

    /// Insert or overwrite definitions from a persisted snapshot.
    pub(crate) fn restore(
        &mut self,
        node_types: impl IntoIterator<Item = NodeTypeDef>,
        relationship_types: impl IntoIterator<Item = RelationshipTypeDef>,
    ) {
        for def in node_types {
            self.node_types.insert(def.name.clone(), def);
        }
        for def in relationship_types {
            self.relationship_types.insert(def.name.clone(), def);
        }
    }

    /// Remove every definition from both registries
    pub fn clear(&mut self) {
        self.node_types.clear();
        self.relationship_types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut catalog = SchemaCatalog::new();
        catalog
            .define_node_type(NodeTypeDef::new("User").with_required(["name"]))
            .unwrap();
        catalog
            .define_relationship_type(RelationshipTypeDef::new("FRIENDS").from_type("User"))
            .unwrap();

        assert!(catalog.node_type_exists("User"));
        assert!(catalog.type_exists(TypeKind::Relationship, "FRIENDS"));
        assert!(!catalog.type_exists(TypeKind::Node, "FRIENDS"));
        assert_eq!(
            catalog.node_type("User").unwrap().properties.required(),
            ["name"]
        );
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut catalog = SchemaCatalog::new();
        catalog.define_node_type(NodeTypeDef::new("User")).unwrap();

        let err = catalog
            .define_node_type(NodeTypeDef::new("User").with_required(["name"]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateType {
                kind: TypeKind::Node,
                name: "User".to_string()
            }
        );
        // First definition untouched
        assert!(catalog.node_type("User").unwrap().properties.required().is_empty());
    }

    #[test]
    fn test_node_and_relationship_namespaces_are_separate() {
        let mut catalog = SchemaCatalog::new();
        catalog.define_node_type(NodeTypeDef::new("Link")).unwrap();
        catalog
            .define_relationship_type(RelationshipTypeDef::new("Link"))
            .unwrap();
        assert!(catalog.node_type_exists("Link"));
        assert!(catalog.relationship_type_exists("Link"));
    }

    #[test]
    fn test_remove_unknown_type() {
        let mut catalog = SchemaCatalog::new();
        let err = catalog.remove_relationship_type("FRIENDS").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType {
                kind: TypeKind::Relationship,
                ..
            }
        ));
    }

    #[test]
    fn test_definition_order_preserved() {
        let mut catalog = SchemaCatalog::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            catalog.define_node_type(NodeTypeDef::new(name)).unwrap();
        }
        catalog.remove_node_type("Alpha").unwrap();

        let names: Vec<_> = catalog.node_types().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Mid"]);
    }

    #[test]
    fn test_clear() {
        let mut catalog = SchemaCatalog::new();
        catalog.define_node_type(NodeTypeDef::new("User")).unwrap();
        catalog
            .define_relationship_type(RelationshipTypeDef::new("FRIENDS"))
            .unwrap();
        catalog.clear();
        assert!(catalog.is_empty());
    }
}
