//! Property index: (key, value) -> node IDs
//!
//! Two-level inverted map `key -> value -> {node id}`. Empty inner and outer
//! containers are pruned on removal so lookups on absent keys stay O(1) and
//! no stale empty buckets accumulate.

use crate::node::Node;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    index: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

impl PropertyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from scratch over the given nodes
    pub fn rebuild<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut index = Self::new();
        for node in nodes {
            index.index_node(node);
        }
        index
    }

    /// Add an entry for every current property of `node`
    pub fn index_node(&mut self, node: &Node) {
        for (key, value) in &node.properties {
            self.insert(key, value, &node.id);
        }
    }

    /// Remove the entries for every current property of `node`.
    ///
    /// Call with the node's property snapshot before it is deleted.
    pub fn deindex_node(&mut self, node: &Node) {
        for (key, value) in &node.properties {
            self.remove(key, value, &node.id);
        }
    }

    /// Move `id` from `(key, old_value)` to `(key, new_value)`.
    ///
    /// Either side may be absent: a new property has no old value and a
    /// removed property has no new value.
    pub fn update_entry(
        &mut self,
        id: &str,
        key: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        if let Some(old) = old_value {
            self.remove(key, old, id);
        }
        if let Some(new) = new_value {
            self.insert(key, new, id);
        }
    }

    /// Node IDs holding `key = value` (empty when there are none)
    pub fn lookup(&self, key: &str, value: &str) -> BTreeSet<String> {
        self.index
            .get(key)
            .and_then(|values| values.get(value))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_entry(&self, key: &str, value: &str) -> bool {
        self.index
            .get(key)
            .and_then(|values| values.get(value))
            .is_some_and(|ids| !ids.is_empty())
    }

    /// Every `(key, value, ids)` bucket, sorted by key then value
    pub fn entries(&self) -> Vec<(&str, &str, &BTreeSet<String>)> {
        let mut entries: Vec<_> = self
            .index
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |(value, ids)| (key.as_str(), value.as_str(), ids))
            })
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }

    /// Number of distinct indexed keys
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }

    fn insert(&mut self, key: &str, value: &str, id: &str) {
        self.index
            .entry(key.to_string())
            .or_default()
            .entry(value.to_string())
            .or_default()
            .insert(id.to_string());
    }

    fn remove(&mut self, key: &str, value: &str, id: &str) {
        let Some(values) = self.index.get_mut(key) else {
            return;
        };
        if let Some(ids) = values.get_mut(value) {
            ids.remove(id);
            if ids.is_empty() {
                values.remove(value);
            }
        }
        if values.is_empty() {
            self.index.remove(key);
        }
    }
}
