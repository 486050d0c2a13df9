//! Lexical scope for template identifiers.
//!
//! The base layer binds every declared parameter. Each loop body pushes one
//! layer binding its item name; leaving the loop pops it. Lookups search
//! from the innermost layer outward.

use indexmap::IndexMap;
use quarry_core::utils::to_rust_ident;
use quarry_ir::query::ParamBinding;

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct Scope {
    /// Innermost layer is at the end. Never empty.
    layers: Vec<IndexMap<String, String>>,
    next_item_id: u32,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            layers: vec![IndexMap::new()],
            next_item_id: 0,
        }
    }

    /// Scope whose base layer binds each parameter to its Rust variable name.
    pub fn with_parameters<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scope = Self::new();
        for name in names {
            scope.layers[0].insert(name.to_string(), parameter_var(name));
        }
        scope
    }

    /// Push a layer binding `name` to `target`.
    pub fn bind(&mut self, name: impl Into<String>, target: impl Into<String>) {
        let mut layer = IndexMap::new();
        layer.insert(name.into(), target.into());
        self.layers.push(layer);
    }

    /// Push a layer for a loop item and return its unique target variable.
    pub fn bind_loop_item(&mut self, name: &str) -> String {
        let base = parameter_var(name);
        let base = base.strip_prefix("r#").unwrap_or(&base);
        let var = format!("{base}_{}", self.next_item_id);
        self.next_item_id += 1;
        self.bind(name, var.clone());
        var
    }

    pub fn lookup(&self, name: &str) -> Result<&str> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(name))
            .map(String::as_str)
            .ok_or_else(|| Error::UnboundIdentifier(name.to_string()))
    }

    /// Remove the innermost loop layer. The base layer is never removed.
    pub fn pop(&mut self) -> bool {
        if self.layers.len() > 1 {
            self.layers.pop();
            true
        } else {
            false
        }
    }

    /// Number of loop layers currently open.
    pub fn loop_depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Parameter bindings of the base layer, in declaration order.
    pub fn parameter_bindings(&self) -> Vec<ParamBinding> {
        self.layers[0]
            .iter()
            .map(|(name, var)| ParamBinding {
                name: name.clone(),
                var: var.clone(),
            })
            .collect()
    }
}

/// Rust variable name of a template parameter.
pub fn parameter_var(name: &str) -> String {
    to_rust_ident(name)
}
