//! Human-readable listings of compiled units, for debugging and tests.

use std::fmt::Write as _;

use quarry_core::Step;

use crate::access::{AccessStmt, ResolvedAccess};
use crate::hierarchy::Hierarchy;
use crate::query::{Argument, CompiledQuery, GenStatement, QueryBody, SeparatorGuard};
use crate::scan::{Attach, FieldCopy, KeyColumn, ScanStatement};

const INDENT: &str = "  ";

/// Dump a compiled query.
pub fn dump(query: &CompiledQuery) -> String {
    let mut out = String::new();
    let kind = if query.is_static() { "static" } else { "dynamic" };
    writeln!(out, "query {} ({}, {})", query.function_name, query.dialect, kind).unwrap();
    if query.needs_row_lock_clause {
        writeln!(out, "{INDENT}row-lock clause").unwrap();
    }
    if let Some(guard) = &query.fallback_guard {
        writeln!(out, "{INDENT}fallback guard: {guard}").unwrap();
    }

    match &query.body {
        QueryBody::Static { text, arguments } => {
            writeln!(out, "text: {text}").unwrap();
            if !arguments.is_empty() {
                writeln!(out, "args:").unwrap();
            }
            for (i, arg) in arguments.iter().enumerate() {
                writeln!(out, "{INDENT}{i}: {}", format_argument(arg)).unwrap();
            }
        }
        QueryBody::Dynamic { statements } => {
            writeln!(out, "statements:").unwrap();
            dump_statements(&mut out, statements, 1);
        }
    }
    out
}

fn dump_statements(out: &mut String, statements: &[GenStatement], depth: usize) {
    let pad = INDENT.repeat(depth);
    for stmt in statements {
        match stmt {
            GenStatement::DeclareFlag { var } => writeln!(out, "{pad}flag {var}").unwrap(),
            GenStatement::SetFlag { var, value } => {
                writeln!(out, "{pad}set {var} = {value}").unwrap()
            }
            GenStatement::AppendFragment(text) => writeln!(out, "{pad}sql {text:?}").unwrap(),
            GenStatement::AppendSeparator { token, guard } => {
                let cond = match guard {
                    SeparatorGuard::NotLast(var) => format!("!{var}"),
                    SeparatorGuard::BoundaryNeeded(var) => var.clone(),
                };
                writeln!(out, "{pad}sep {token:?} if {cond}").unwrap()
            }
            GenStatement::AppendArg(arg) => {
                writeln!(out, "{pad}arg {}", format_argument(arg)).unwrap()
            }
            GenStatement::If {
                branches,
                otherwise,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let keyword = if i == 0 { "if" } else { "else if" };
                    writeln!(
                        out,
                        "{pad}{keyword} {} = {}",
                        branch.cond_var,
                        format_access(&branch.access)
                    )
                    .unwrap();
                    dump_statements(out, &branch.body, depth + 1);
                }
                if let Some(body) = otherwise {
                    writeln!(out, "{pad}else").unwrap();
                    dump_statements(out, body, depth + 1);
                }
                writeln!(out, "{pad}end").unwrap();
            }
            GenStatement::Loop {
                collection_var,
                access,
                item_var,
                is_last_var,
                body,
            } => {
                write!(
                    out,
                    "{pad}for {item_var} in {collection_var} = {}",
                    format_access(access)
                )
                .unwrap();
                if let Some(last) = is_last_var {
                    write!(out, " (last: {last})").unwrap();
                }
                out.push('\n');
                dump_statements(out, body, depth + 1);
                writeln!(out, "{pad}end").unwrap();
            }
            GenStatement::Fallback {
                active_var,
                probes,
                combos,
                text,
                guard_var,
            } => {
                writeln!(out, "{pad}fallback {active_var} {text:?}").unwrap();
                let inner = INDENT.repeat(depth + 1);
                for probe in probes {
                    writeln!(
                        out,
                        "{inner}probe {} = {}",
                        probe.var,
                        format_access(&probe.access)
                    )
                    .unwrap();
                }
                for combo in combos {
                    let literals: Vec<String> = combo
                        .iter()
                        .map(|l| format!("{}={}", l.probe, l.when))
                        .collect();
                    writeln!(out, "{inner}when {}", literals.join(" && ")).unwrap();
                }
                if let Some(guard) = guard_var {
                    writeln!(out, "{inner}marks {guard}").unwrap();
                }
                writeln!(out, "{pad}end").unwrap();
            }
        }
    }
}

fn format_argument(arg: &Argument) -> String {
    match arg {
        Argument::Value { expr, access } => format!("{expr} {}", format_access(access)),
        Argument::System { field } => format!("system {field}"),
    }
}

/// `user?.address.city -> tmp0 (ok1)`, or just the variable when direct.
fn format_access(access: &ResolvedAccess) -> String {
    if access.is_direct() {
        return access.result_var.clone();
    }
    let mut path = String::new();
    for stmt in &access.setup {
        match stmt {
            AccessStmt::Alias { source, .. } => path.push_str(source),
            AccessStmt::InitValid { .. } => {}
            AccessStmt::Apply { step, .. } => match step {
                Step::Member { property, safe } => {
                    write!(path, "{}.{property}", if *safe { "?" } else { "" }).unwrap()
                }
                Step::Index { position, safe } => {
                    write!(path, "{}[{position}]", if *safe { "?" } else { "" }).unwrap()
                }
            },
        }
    }
    match &access.validity_var {
        Some(ok) => format!("{path} -> {} ({ok})", access.result_var),
        None => format!("{path} -> {}", access.result_var),
    }
}

/// Dump the node tree of a hierarchy.
pub fn dump_hierarchy(hierarchy: &Hierarchy) -> String {
    let mut out = String::new();
    let keys: Vec<&str> = hierarchy
        .root
        .key_fields
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    writeln!(out, "root key [{}]", keys.join(", ")).unwrap();
    for node in hierarchy.nodes() {
        let pad = INDENT.repeat(node.depth());
        let key: Vec<&str> = node.key_fields.iter().map(|c| c.leaf()).collect();
        let data: Vec<&str> = node.data_fields.iter().map(|c| c.leaf()).collect();
        writeln!(
            out,
            "{pad}{} key [{}] data [{}]",
            node.key(),
            key.join(", "),
            data.join(", ")
        )
        .unwrap();
    }
    out
}

/// Dump a scan program.
pub fn dump_scan(statements: &[ScanStatement]) -> String {
    let mut out = String::new();
    dump_scan_into(&mut out, statements, 0);
    out
}

fn dump_scan_into(out: &mut String, statements: &[ScanStatement], depth: usize) {
    let pad = INDENT.repeat(depth);
    for stmt in statements {
        match stmt {
            ScanStatement::ForEachRow(body) => {
                writeln!(out, "{pad}for row").unwrap();
                dump_scan_into(out, body, depth + 1);
                writeln!(out, "{pad}end").unwrap();
            }
            ScanStatement::RootKey { var, columns } => {
                writeln!(out, "{pad}{var} = key({})", format_keys(columns)).unwrap()
            }
            ScanStatement::GetOrCreateRoot {
                key_var,
                fields,
                child_slots,
            } => writeln!(
                out,
                "{pad}root[{key_var}] {{{}}} slots [{}]",
                format_fields(fields),
                child_slots.join(", ")
            )
            .unwrap(),
            ScanStatement::Node(node) => {
                let target = match &node.attach {
                    Attach::Root => "root".to_string(),
                    Attach::Ancestor { path } => path.clone(),
                };
                writeln!(
                    out,
                    "{pad}{} = {} + {}:key({}) -> {target}.{}",
                    node.chain_var,
                    node.parent_chain,
                    node.path,
                    format_keys(&node.key_columns),
                    node.slot
                )
                .unwrap();
                writeln!(
                    out,
                    "{pad}{INDENT}{{{}}} slots [{}]",
                    format_fields(&node.fields),
                    node.child_slots.join(", ")
                )
                .unwrap();
            }
            ScanStatement::CollectMany => writeln!(out, "{pad}collect many").unwrap(),
            ScanStatement::CollectOne => writeln!(out, "{pad}collect one").unwrap(),
        }
    }
}

fn format_keys(columns: &[KeyColumn]) -> String {
    columns
        .iter()
        .map(|k| {
            if k.nullable {
                format!("{}?", k.column)
            } else {
                k.column.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_fields(fields: &[FieldCopy]) -> String {
    fields
        .iter()
        .map(|f| {
            if f.column == f.field {
                f.field.clone()
            } else {
                format!("{}: {}", f.field, f.column)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
