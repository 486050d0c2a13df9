//! `<fn>_query`: renders the compiled SQL assembly against the runtime.
//!
//! Static queries become a single `BuiltQuery::new`; dynamic ones drive a
//! `SqlBuilder` through the statement tree. Resolved accesses are printed as
//! straight-line code over `&Value` temporaries.

use quarry_core::Step;
use quarry_ir::{
    AccessStmt, Argument, Branch, FallbackLiteral, GenStatement, QueryBody, ResolvedAccess,
    SeparatorGuard,
};

use super::Emitter;
use super::naming::{ItemNames, var};

const SQL: &str = "sql_";
const BUILT: &str = "built_";
const PARAMS: &str = "params_";
const SYSTEM: &str = "system_";

impl Emitter<'_> {
    pub(super) fn emit_query_fn(&mut self, names: &ItemNames) {
        let unit = self.unit;
        let query = &unit.query;
        let rt = self.rt().to_string();

        let mut args = Vec::new();
        if let Some(params) = &names.params {
            args.push(format!("params: &{params}"));
        }
        if let Some(system) = &names.system {
            args.push(format!("system: &{system}"));
        }
        if query.needs_row_lock_clause {
            args.push(format!("lock: {rt}::RowLockMode"));
        }

        let vis = self.vis();
        self.line("#[allow(unused_variables, unused_mut, unused_assignments)]");
        let head = format!(
            "{vis}fn {}_query({}) -> Result<{rt}::BuiltQuery, {rt}::RuntimeError>",
            names.function,
            args.join(", ")
        );
        self.block(&head, |e| {
            e.line(&format!("use {rt} as rt;"));
            if names.params.is_some() {
                e.line(&format!("let {PARAMS} = rt::to_value(params)?;"));
                for binding in &query.bindings {
                    e.line(&format!(
                        "let {} = rt::member(&{PARAMS}, {:?})?;",
                        var(&binding.var),
                        binding.name
                    ));
                }
            }
            if names.system.is_some() {
                e.line(&format!("let {SYSTEM} = rt::to_value(system)?;"));
            }
            let dialect = format!("rt::Dialect::{:?}", query.dialect);

            match &query.body {
                QueryBody::Static { text, arguments } => {
                    let mut values = Vec::new();
                    for arg in arguments {
                        values.push(e.argument(arg, names));
                    }
                    e.line(&format!(
                        "let mut {BUILT} = rt::BuiltQuery::new({text:?}, vec![{}]);",
                        values.join(", ")
                    ));
                }
                QueryBody::Dynamic { statements } => {
                    e.line(&format!("let mut {SQL} = rt::SqlBuilder::new({dialect});"));
                    e.emit_statements(statements, names);
                    e.line(&format!("let mut {BUILT} = {SQL}.finish();"));
                    if let Some(guard) = &query.fallback_guard {
                        e.line(&format!("{BUILT}.fallback_triggered = {};", var(guard)));
                    }
                }
            }

            if query.needs_row_lock_clause {
                e.line(&format!("{BUILT}.append_row_lock({dialect}, lock)?;"));
            }
            e.line(&format!("Ok({BUILT})"));
        });
        self.blank();
    }

    fn emit_statements(&mut self, statements: &[GenStatement], names: &ItemNames) {
        for stmt in statements {
            self.emit_statement(stmt, names);
        }
    }

    fn emit_statement(&mut self, stmt: &GenStatement, names: &ItemNames) {
        match stmt {
            GenStatement::DeclareFlag { var: flag } => {
                self.line(&format!("let mut {} = false;", var(flag)));
            }
            GenStatement::SetFlag { var: flag, value } => {
                self.line(&format!("{} = {value};", var(flag)));
            }
            GenStatement::AppendFragment(text) => {
                self.line(&format!("{SQL}.push_fragment({text:?});"));
            }
            GenStatement::AppendSeparator { token, guard } => {
                let cond = match guard {
                    SeparatorGuard::NotLast(last) => format!("!{}", var(last)),
                    SeparatorGuard::BoundaryNeeded(flag) => var(flag),
                };
                self.line(&format!("if {cond} {{ {SQL}.push_raw({token:?}); }}"));
            }
            GenStatement::AppendArg(arg) => {
                let value = self.argument(arg, names);
                self.line(&format!("{SQL}.push_arg({value});"));
            }
            GenStatement::If {
                branches,
                otherwise,
            } => self.emit_if(branches, otherwise.as_deref(), names),
            GenStatement::Loop {
                collection_var,
                access,
                item_var,
                is_last_var,
                body,
            } => {
                self.emit_access(access);
                let collection = var(collection_var);
                let source = match &access.validity_var {
                    Some(valid) => format!(
                        "if {} {{ {} }} else {{ &rt::NULL }}",
                        var(valid),
                        var(&access.result_var)
                    ),
                    None => var(&access.result_var),
                };
                self.line(&format!("let {collection}: &rt::Value = {source};"));
                let last = is_last_var.as_deref().map_or("_".to_string(), var);
                let head = format!(
                    "for ({}, {last}) in rt::iter_with_last({collection})",
                    var(item_var)
                );
                self.block(&head, |e| e.emit_statements(body, names));
            }
            GenStatement::Fallback {
                active_var,
                probes,
                combos,
                text,
                guard_var,
            } => {
                for probe in probes {
                    self.emit_access(&probe.access);
                    let cond = condition(&probe.access);
                    self.line(&format!("let {} = {cond};", var(&probe.var)));
                }
                let active = var(active_var);
                self.line(&format!("let {active} = {};", combos_expr(combos)));
                self.block(&format!("if {active}"), |e| {
                    e.line(&format!("{SQL}.push_fragment({text:?});"));
                    if let Some(guard) = guard_var {
                        e.line(&format!("{} = true;", var(guard)));
                    }
                });
            }
        }
    }

    /// Conditions of later arms are evaluated only when earlier arms fail,
    /// so each `else if` is nested in the previous `else`.
    fn emit_if(&mut self, branches: &[Branch], otherwise: Option<&[GenStatement]>, names: &ItemNames) {
        let Some((first, rest)) = branches.split_first() else {
            if let Some(body) = otherwise {
                self.emit_statements(body, names);
            }
            return;
        };
        self.emit_access(&first.access);
        let cond = var(&first.cond_var);
        self.line(&format!("let {cond} = {};", condition(&first.access)));
        self.block(&format!("if {cond}"), |e| e.emit_statements(&first.body, names));

        if rest.is_empty() && otherwise.is_none() {
            return;
        }
        // Reopen the closing brace as `} else {`.
        self.output.truncate(self.output.trim_end().len());
        self.output.push_str(" else {\n");
        self.indent += 1;
        self.emit_if(rest, otherwise, names);
        self.indent -= 1;
        self.line("}");
    }

    /// Value expression of an argument, after emitting its access setup.
    fn argument(&mut self, arg: &Argument, names: &ItemNames) -> String {
        match arg {
            Argument::Value { access, .. } => {
                self.emit_access(access);
                value(access)
            }
            Argument::System { field } if names.system.is_some() => {
                format!("rt::member(&{SYSTEM}, {field:?})?.clone()")
            }
            Argument::System { .. } => "rt::Value::Null".to_string(),
        }
    }

    fn emit_access(&mut self, access: &ResolvedAccess) {
        for stmt in &access.setup {
            match stmt {
                AccessStmt::Alias { var: tmp, source } => {
                    self.line(&format!("let mut {}: &rt::Value = {};", var(tmp), var(source)));
                }
                AccessStmt::InitValid { var: valid } => {
                    self.line(&format!("let mut {} = true;", var(valid)));
                }
                AccessStmt::Apply {
                    var: tmp,
                    step,
                    valid,
                } => self.emit_step(&var(tmp), step, valid.as_deref().map(var)),
            }
        }
    }

    fn emit_step(&mut self, tmp: &str, step: &Step, valid: Option<String>) {
        let (safe_call, call) = match step {
            Step::Member { property, .. } => (
                format!("rt::safe_member({tmp}, {property:?})"),
                format!("rt::member({tmp}, {property:?})?"),
            ),
            Step::Index { position, .. } => (
                format!("rt::safe_index({tmp}, {position})"),
                format!("rt::index({tmp}, {position})?"),
            ),
        };
        match (step.is_safe(), valid) {
            (true, Some(valid)) => {
                self.block(&format!("if {valid}"), |e| {
                    e.block(&format!("match {safe_call}"), |e| {
                        e.line(&format!("Some(next) => {tmp} = next,"));
                        e.line(&format!("None => {valid} = false,"));
                    });
                });
            }
            (true, None) => {
                self.line(&format!("if let Some(next) = {safe_call} {{ {tmp} = next; }}"));
            }
            (false, Some(valid)) => {
                self.line(&format!("if {valid} {{ {tmp} = {call}; }}"));
            }
            (false, None) => self.line(&format!("{tmp} = {call};")),
        }
    }
}

fn value(access: &ResolvedAccess) -> String {
    let result = var(&access.result_var);
    match &access.validity_var {
        Some(valid) => format!(
            "if {} {{ {result}.clone() }} else {{ rt::Value::Null }}",
            var(valid)
        ),
        None => format!("{result}.clone()"),
    }
}

fn condition(access: &ResolvedAccess) -> String {
    let result = var(&access.result_var);
    match &access.validity_var {
        Some(valid) => format!("{} && rt::truthy({result})", var(valid)),
        None => format!("rt::truthy({result})"),
    }
}

fn literal(lit: &FallbackLiteral) -> String {
    if lit.when {
        var(&lit.probe)
    } else {
        format!("!{}", var(&lit.probe))
    }
}

fn combos_expr(combos: &[Vec<FallbackLiteral>]) -> String {
    if combos.is_empty() {
        return "true".to_string();
    }
    let terms: Vec<String> = combos
        .iter()
        .map(|combo| match combo.as_slice() {
            [] => "true".to_string(),
            [single] => literal(single),
            many if combos.len() == 1 => many.iter().map(literal).collect::<Vec<_>>().join(" && "),
            many => format!("({})", many.iter().map(literal).collect::<Vec<_>>().join(" && ")),
        })
        .collect();
    terms.join(" || ")
}
