//! `<fn>_scan` and `<fn>_iter`: turn result rows into result structs.

use std::collections::HashMap;

use quarry_core::Affinity;
use quarry_ir::{Attach, FieldCopy, KeyColumn, NodeScan, ScanStatement};

use super::Emitter;
use super::naming::ItemNames;
use crate::hierarchy::ROOT_KEY_VAR;
use crate::{Error, Result, ResultShape};

fn columns_expr(columns: &[KeyColumn]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|k| format!("rt::column(row, {:?})?", k.column))
        .collect();
    format!("&[{}]", parts.join(", "))
}

fn slots_expr(slots: &[String]) -> String {
    let parts: Vec<String> = slots.iter().map(|s| format!("{s:?}")).collect();
    format!("&[{}]", parts.join(", "))
}

fn fields_expr(fields: &[FieldCopy]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| format!("({:?}.to_string(), rt::column(row, {:?})?.clone())", f.field, f.column))
        .collect();
    format!("|| Ok(vec![{}])", parts.join(", "))
}

impl Emitter<'_> {
    fn result_type(&self, names: &ItemNames) -> Option<String> {
        let result = names.result.as_ref()?;
        Some(match self.unit.affinity {
            Affinity::One => result.clone(),
            Affinity::Many | Affinity::None => format!("Vec<{result}>"),
        })
    }

    pub(super) fn emit_scan_fn(&mut self, names: &ItemNames) {
        let unit = self.unit;
        let Some(ret) = self.result_type(names) else {
            return;
        };
        let rt = self.rt().to_string();
        let vis = self.vis();
        let head = format!(
            "{vis}fn {}_scan(rows: &[{rt}::Row]) -> Result<{ret}, {rt}::RuntimeError>",
            names.function
        );
        let one = unit.affinity == Affinity::One;

        self.block(&head, |e| {
            e.line(&format!("use {rt} as rt;"));
            match &unit.result {
                ResultShape::None => {}
                ResultShape::Rows { .. } if one => {
                    e.line("let row = rows.first().ok_or(rt::RuntimeError::NotFound)?;");
                    e.line("rt::from_row(row)");
                }
                ResultShape::Rows { .. } => e.line("rows.iter().map(rt::from_row).collect()"),
                ResultShape::Hierarchical { scan, .. } => e.emit_scan_program(scan, one),
            }
        });
        self.blank();
    }

    fn emit_scan_program(&mut self, program: &[ScanStatement], one: bool) {
        // Chain variables are renamed by position; node keys may contain `__`.
        let mut locals: HashMap<&str, String> = HashMap::new();
        locals.insert(ROOT_KEY_VAR, "root_key".to_string());

        self.line("let mut arena = rt::Arena::new();");
        for stmt in program {
            match stmt {
                ScanStatement::ForEachRow(body) => {
                    self.block("for row in rows", |e| {
                        for stmt in body {
                            e.emit_scan_row(stmt, &mut locals);
                        }
                    });
                }
                ScanStatement::CollectOne => self.line("rt::from_value(arena.finish_one()?)"),
                ScanStatement::CollectMany => {
                    self.line("arena.finish_many().into_iter().map(rt::from_value).collect()");
                }
                other => self.emit_scan_row(other, &mut locals),
            }
        }
        if !program
            .iter()
            .any(|s| matches!(s, ScanStatement::CollectOne | ScanStatement::CollectMany))
        {
            let collect = if one {
                "rt::from_value(arena.finish_one()?)"
            } else {
                "arena.finish_many().into_iter().map(rt::from_value).collect()"
            };
            self.line(collect);
        }
    }

    fn emit_scan_row<'p>(&mut self, stmt: &'p ScanStatement, locals: &mut HashMap<&'p str, String>) {
        match stmt {
            ScanStatement::RootKey { var, columns } => {
                let local = locals.get(var.as_str()).cloned().unwrap_or_else(|| var.clone());
                self.line(&format!(
                    "let {local} = rt::composite_key({});",
                    columns_expr(columns)
                ));
            }
            ScanStatement::GetOrCreateRoot {
                key_var,
                fields,
                child_slots,
            } => {
                let key = locals.get(key_var.as_str()).cloned().unwrap_or_else(|| key_var.clone());
                self.line(&format!(
                    "arena.root(&{key}, {}, {})?;",
                    slots_expr(child_slots),
                    fields_expr(fields)
                ));
            }
            ScanStatement::Node(node) => {
                let local = format!("chain_{}", locals.len() - 1);
                self.emit_node(node, &local, locals);
                locals.insert(&node.chain_var, local);
            }
            ScanStatement::ForEachRow(_) | ScanStatement::CollectOne | ScanStatement::CollectMany => {}
        }
    }

    fn emit_node(&mut self, node: &NodeScan, local: &str, locals: &HashMap<&str, String>) {
        let parent = locals
            .get(node.parent_chain.as_str())
            .cloned()
            .unwrap_or_else(|| node.parent_chain.clone());
        let create = |parent_expr: String| {
            format!(
                "Some(arena.node({:?}, {parent_expr}, {:?}, &key, {}, {})?)",
                node.path,
                node.slot,
                slots_expr(&node.child_slots),
                fields_expr(&node.fields)
            )
        };
        let key = format!("rt::node_key({})", columns_expr(&node.key_columns));

        match &node.attach {
            Attach::Root => {
                self.block(&format!("let {local} = match {key}"), |e| {
                    e.line(&format!(
                        "Some(key) => {},",
                        create(format!("rt::Parent::Root(&{parent})"))
                    ));
                    e.line("None => None,");
                });
            }
            Attach::Ancestor { path } => {
                self.block(
                    &format!("let {local} = match ({parent}.as_deref(), {key})"),
                    |e| {
                        let parent_expr = format!("rt::Parent::Node {{ path: {path:?}, chain }}");
                        e.line(&format!("(Some(chain), Some(key)) => {},", create(parent_expr)));
                        e.line("_ => None,");
                    },
                );
            }
        }
        // `match` blocks need a trailing semicolon.
        self.output.truncate(self.output.trim_end().len());
        self.output.push_str(";\n");
    }

    pub(super) fn emit_iter_fn(&mut self, names: &ItemNames) -> Result<()> {
        let unit = self.unit;
        let Some(result) = &names.result else {
            return Err(Error::IteratorRequiresShape(unit.function_name.clone()));
        };
        let rt = self.rt().to_string();
        let vis = self.vis();
        let scan = format!("{}_scan", names.function);
        let head = format!(
            "{vis}fn {}_iter(rows: &[{rt}::Row]) -> impl Iterator<Item = Result<{result}, {rt}::RuntimeError>> + '_",
            names.function
        );

        self.block(&head, |e| match (&unit.result, unit.affinity) {
            (_, Affinity::One) => e.line(&format!("std::iter::once({scan}(rows))")),
            (ResultShape::Rows { .. }, _) => e.line(&format!("rows.iter().map({rt}::from_row)")),
            _ => {
                e.block(&format!("let (items, error) = match {scan}(rows)"), |e| {
                    e.line("Ok(items) => (items, None),");
                    e.line("Err(error) => (Vec::new(), Some(error)),");
                });
                e.output.truncate(e.output.trim_end().len());
                e.output.push_str(";\n");
                e.line("items.into_iter().map(Ok).chain(error.map(Err))");
            }
        });
        self.blank();
        Ok(())
    }
}
