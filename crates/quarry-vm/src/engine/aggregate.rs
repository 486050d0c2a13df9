//! Executes scan programs over result rows.

use std::collections::HashMap;
use std::mem;

use quarry_ir::{Attach, FieldCopy, KeyColumn, ScanStatement};

use super::arena::{Arena, Parent, composite_key, node_key};
use super::error::RuntimeError;
use super::helpers::{Row, column};
use super::value::Value;

/// Folded result.
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregated {
    Many(Vec<Value>),
    One(Value),
}

impl Aggregated {
    pub fn into_value(self) -> Value {
        match self {
            Aggregated::Many(items) => Value::Array(items),
            Aggregated::One(item) => item,
        }
    }
}

pub struct Aggregator<'r> {
    rows: &'r [Row],
    arena: Arena,
    /// Key and chain variables of the current row.
    chains: HashMap<String, String>,
    result: Option<Aggregated>,
}

impl<'r> Aggregator<'r> {
    pub fn run(statements: &[ScanStatement], rows: &'r [Row]) -> Result<Aggregated, RuntimeError> {
        let mut agg = Aggregator {
            rows,
            arena: Arena::new(),
            chains: HashMap::new(),
            result: None,
        };
        for stmt in statements {
            agg.exec(stmt, None)?;
        }
        tracing::debug!(rows = rows.len(), "aggregated rows");
        Ok(agg
            .result
            .unwrap_or_else(|| Aggregated::Many(mem::take(&mut agg.arena).finish_many())))
    }

    /// Row-level statements outside `ForEachRow` have no row and do nothing.
    fn exec(&mut self, stmt: &ScanStatement, row: Option<&Row>) -> Result<(), RuntimeError> {
        match stmt {
            ScanStatement::ForEachRow(body) => {
                let rows = self.rows;
                for row in rows {
                    self.chains.clear();
                    for stmt in body {
                        self.exec(stmt, Some(row))?;
                    }
                }
            }
            ScanStatement::CollectMany => {
                let arena = mem::take(&mut self.arena);
                self.result = Some(Aggregated::Many(arena.finish_many()));
            }
            ScanStatement::CollectOne => {
                let arena = mem::take(&mut self.arena);
                self.result = Some(Aggregated::One(arena.finish_one()?));
            }
            ScanStatement::RootKey { var, columns } => {
                let Some(row) = row else { return Ok(()) };
                let key = composite_key(&key_values(row, columns)?);
                self.chains.insert(var.clone(), key);
            }
            ScanStatement::GetOrCreateRoot {
                key_var,
                fields,
                child_slots,
            } => {
                let Some(row) = row else { return Ok(()) };
                let Some(key) = self.chains.get(key_var) else {
                    return Err(RuntimeError::UnboundVariable(key_var.clone()));
                };
                let slots: Vec<&str> = child_slots.iter().map(String::as_str).collect();
                self.arena.root(key, &slots, || copy_fields(row, fields))?;
            }
            ScanStatement::Node(node) => {
                let Some(row) = row else { return Ok(()) };
                // Parent skipped on this row.
                let Some(parent_chain) = self.chains.get(&node.parent_chain) else {
                    return Ok(());
                };
                let Some(local_key) = node_key(&key_values(row, &node.key_columns)?) else {
                    return Ok(());
                };
                let parent = match &node.attach {
                    Attach::Root => Parent::Root(parent_chain),
                    Attach::Ancestor { path } => Parent::Node {
                        path,
                        chain: parent_chain,
                    },
                };
                let slots: Vec<&str> = node.child_slots.iter().map(String::as_str).collect();
                let chain = self.arena.node(
                    &node.path,
                    parent,
                    &node.slot,
                    &local_key,
                    &slots,
                    || copy_fields(row, &node.fields),
                )?;
                self.chains.insert(node.chain_var.clone(), chain);
            }
        }
        Ok(())
    }
}

fn key_values<'a>(row: &'a Row, columns: &[KeyColumn]) -> Result<Vec<&'a Value>, RuntimeError> {
    columns.iter().map(|k| column(row, &k.column)).collect()
}

fn copy_fields(row: &Row, fields: &[FieldCopy]) -> Result<Vec<(String, Value)>, RuntimeError> {
    fields
        .iter()
        .map(|f| Ok((f.field.clone(), column(row, &f.column)?.clone())))
        .collect()
}
