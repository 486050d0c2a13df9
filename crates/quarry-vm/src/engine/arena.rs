//! Deduplicating object arena for nested results.
//!
//! Roots are keyed by their composite key, nested nodes by a chain key that
//! prefixes the local key with every ancestor's key. Objects are stored flat
//! and only materialized into [`Value`] trees when collected.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::error::RuntimeError;
use super::value::Value;

#[derive(Debug, Default)]
struct Entry {
    fields: Vec<(String, Value)>,
    /// Child slots in declaration order, each holding arena indices.
    slots: Vec<(String, Vec<usize>)>,
}

impl Entry {
    fn new(fields: Vec<(String, Value)>, slots: &[&str]) -> Self {
        Self {
            fields,
            slots: slots.iter().map(|s| (s.to_string(), Vec::new())).collect(),
        }
    }
}

/// Parent of a nested node.
#[derive(Clone, Copy, Debug)]
pub enum Parent<'a> {
    /// Root object with this composite key.
    Root(&'a str),
    /// Nested node at `path` with this chain key.
    Node { path: &'a str, chain: &'a str },
}

#[derive(Debug, Default)]
pub struct Arena {
    entries: Vec<Entry>,
    roots: IndexMap<String, usize>,
    /// path -> chain key -> entry
    nodes: HashMap<String, HashMap<String, usize>>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Get or create the root object for `key`. `init` runs only on first
    /// sight of the key.
    pub fn root(
        &mut self,
        key: &str,
        slots: &[&str],
        init: impl FnOnce() -> Result<Vec<(String, Value)>, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        if self.roots.contains_key(key) {
            return Ok(());
        }
        let id = self.alloc(Entry::new(init()?, slots));
        self.roots.insert(key.to_string(), id);
        Ok(())
    }

    /// Get or create the node at `path` with `local_key` under `parent`, and
    /// return its chain key.
    pub fn node(
        &mut self,
        path: &str,
        parent: Parent<'_>,
        slot: &str,
        local_key: &str,
        slots: &[&str],
        init: impl FnOnce() -> Result<Vec<(String, Value)>, RuntimeError>,
    ) -> Result<String, RuntimeError> {
        let (parent_id, parent_chain) = match parent {
            Parent::Root(key) => (self.roots.get(key).copied(), key),
            Parent::Node { path, chain } => (
                self.nodes.get(path).and_then(|m| m.get(chain)).copied(),
                chain,
            ),
        };
        let chain = format!("{parent_chain}|{path}:{local_key}");
        if self.nodes.get(path).is_some_and(|m| m.contains_key(&chain)) {
            return Ok(chain);
        }

        let Some(parent_id) = parent_id else {
            let path = match parent {
                Parent::Root(_) => "<root>",
                Parent::Node { path, .. } => path,
            };
            return Err(RuntimeError::UnknownParent {
                path: path.to_string(),
                chain: parent_chain.to_string(),
            });
        };

        let id = self.alloc(Entry::new(init()?, slots));
        let parent = &mut self.entries[parent_id];
        match parent.slots.iter_mut().find(|(name, _)| name == slot) {
            Some((_, children)) => children.push(id),
            None => parent.slots.push((slot.to_string(), vec![id])),
        }
        self.nodes
            .entry(path.to_string())
            .or_default()
            .insert(chain.clone(), id);
        Ok(chain)
    }

    /// Every root object in first-seen order.
    pub fn finish_many(self) -> Vec<Value> {
        self.roots
            .values()
            .map(|&id| self.materialize(id))
            .collect()
    }

    /// The single root object.
    pub fn finish_one(self) -> Result<Value, RuntimeError> {
        match self.roots.len() {
            0 => Err(RuntimeError::NotFound),
            1 => Ok(self.finish_many().remove(0)),
            count => Err(RuntimeError::MultipleParentsForOne { count }),
        }
    }

    fn alloc(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    fn materialize(&self, id: usize) -> Value {
        let entry = &self.entries[id];
        let mut object = entry.fields.clone();
        for (slot, children) in &entry.slots {
            let items = children.iter().map(|&c| self.materialize(c)).collect();
            object.push((slot.clone(), Value::Array(items)));
        }
        Value::Object(object)
    }
}

/// Key text of one value; null is `nil`.
///
/// Strings are JSON-quoted so a `|` inside one cannot be mistaken for the
/// part delimiter and `"1"` stays distinct from `1`.
pub fn key_part(value: &Value) -> String {
    match value {
        Value::Null => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => format!("{f:?}"),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Composite key of several key values.
pub fn composite_key(parts: &[&Value]) -> String {
    parts
        .iter()
        .map(|v| key_part(v))
        .collect::<Vec<_>>()
        .join("|")
}

/// Local key of a nested node; `None` when any key value is null, which
/// means the row carries no object for this node.
pub fn node_key(parts: &[&Value]) -> Option<String> {
    if parts.iter().any(|v| v.is_null()) {
        return None;
    }
    Some(composite_key(parts))
}
