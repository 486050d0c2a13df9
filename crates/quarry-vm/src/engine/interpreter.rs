//! Executes compiled queries against parameter values.

use std::collections::HashMap;

use quarry_core::Step;
use quarry_ir::{
    AccessStmt, Argument, CompiledQuery, GenStatement, QueryBody, ResolvedAccess, SeparatorGuard,
};

use super::builder::{BuiltQuery, SqlBuilder};
use super::error::RuntimeError;
use super::helpers::{index, iter_with_last, member, safe_index, safe_member, truthy};
use super::row_lock::RowLockMode;
use super::value::Value;

/// Run-time inputs of one execution.
#[derive(Clone, Debug, Default)]
pub struct Env {
    pub(crate) params: Value,
    pub(crate) system: Value,
    pub(crate) row_lock: RowLockMode,
}

impl Env {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Values for system arguments, keyed by field name.
    pub fn system(mut self, system: Value) -> Self {
        self.system = system;
        self
    }

    pub fn row_lock(mut self, mode: RowLockMode) -> Self {
        self.row_lock = mode;
        self
    }
}

/// Tree-walking interpreter for [`CompiledQuery`].
pub struct Interpreter<'q> {
    query: &'q CompiledQuery,
    vars: HashMap<String, Value>,
    flags: HashMap<String, bool>,
}

impl<'q> Interpreter<'q> {
    pub fn run(query: &'q CompiledQuery, env: &Env) -> Result<BuiltQuery, RuntimeError> {
        let mut interp = Interpreter {
            query,
            vars: HashMap::new(),
            flags: HashMap::new(),
        };
        for binding in &query.bindings {
            let value = env.params.get(&binding.name).cloned().unwrap_or_default();
            interp.vars.insert(binding.var.clone(), value);
        }

        let mut built = match &query.body {
            QueryBody::Static { text, arguments } => {
                let args = arguments
                    .iter()
                    .map(|arg| interp.argument(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                BuiltQuery::new(text.clone(), args)
            }
            QueryBody::Dynamic { statements } => {
                let mut builder = SqlBuilder::new(query.dialect);
                interp.exec_block(statements, env, &mut builder)?;
                builder.finish()
            }
        };

        if let Some(guard) = &query.fallback_guard {
            built.fallback_triggered = interp.flag(guard);
        }
        if query.needs_row_lock_clause {
            built.append_row_lock(query.dialect, env.row_lock)?;
        }

        tracing::debug!(
            function = %interp.query.function_name,
            args = built.args.len(),
            fallback = built.fallback_triggered,
            "built query"
        );
        Ok(built)
    }

    fn flag(&self, var: &str) -> bool {
        self.flags.get(var).copied().unwrap_or(false)
    }

    fn exec_block(
        &mut self,
        statements: &[GenStatement],
        env: &Env,
        out: &mut SqlBuilder,
    ) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.exec(stmt, env, out)?;
        }
        Ok(())
    }

    fn exec(
        &mut self,
        stmt: &GenStatement,
        env: &Env,
        out: &mut SqlBuilder,
    ) -> Result<(), RuntimeError> {
        tracing::trace!(?stmt, "exec");
        match stmt {
            GenStatement::DeclareFlag { var } => {
                self.flags.insert(var.clone(), false);
            }
            GenStatement::SetFlag { var, value } => {
                self.flags.insert(var.clone(), *value);
            }
            GenStatement::AppendFragment(text) => out.push_fragment(text),
            GenStatement::AppendSeparator { token, guard } => {
                let write = match guard {
                    SeparatorGuard::NotLast(var) => !self.flag(var),
                    SeparatorGuard::BoundaryNeeded(var) => self.flag(var),
                };
                if write {
                    out.push_raw(token);
                }
            }
            GenStatement::AppendArg(arg) => {
                let value = self.argument(arg, env)?;
                out.push_arg(value);
            }
            GenStatement::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    if self.condition(&branch.access)? {
                        return self.exec_block(&branch.body, env, out);
                    }
                }
                if let Some(body) = otherwise {
                    self.exec_block(body, env, out)?;
                }
            }
            GenStatement::Loop {
                access,
                item_var,
                is_last_var,
                body,
                ..
            } => {
                let collection = self.eval_access(access)?.unwrap_or_default();
                for (item, is_last) in iter_with_last(&collection) {
                    self.vars.insert(item_var.clone(), item.clone());
                    if let Some(var) = is_last_var {
                        self.flags.insert(var.clone(), is_last);
                    }
                    self.exec_block(body, env, out)?;
                }
                self.vars.remove(item_var);
            }
            GenStatement::Fallback {
                probes,
                combos,
                text,
                guard_var,
                ..
            } => {
                let mut probed = HashMap::with_capacity(probes.len());
                for probe in probes {
                    probed.insert(probe.var.as_str(), self.condition(&probe.access)?);
                }
                let active = combos.is_empty()
                    || combos.iter().any(|combo| {
                        combo
                            .iter()
                            .all(|lit| probed.get(lit.probe.as_str()).copied() == Some(lit.when))
                    });
                if active {
                    out.push_fragment(text);
                    if let Some(guard) = guard_var {
                        self.flags.insert(guard.clone(), true);
                    }
                }
            }
        }
        Ok(())
    }

    fn argument(&mut self, arg: &Argument, env: &Env) -> Result<Value, RuntimeError> {
        match arg {
            Argument::Value { access, .. } => Ok(self.eval_access(access)?.unwrap_or_default()),
            Argument::System { field } => Ok(env.system.get(field).cloned().unwrap_or_default()),
        }
    }

    /// Truthiness of an access; an invalid access is false.
    fn condition(&mut self, access: &ResolvedAccess) -> Result<bool, RuntimeError> {
        Ok(self.eval_access(access)?.is_some_and(|v| truthy(&v)))
    }

    /// Run the access program. `None` when a safe step short-circuited.
    fn eval_access(&mut self, access: &ResolvedAccess) -> Result<Option<Value>, RuntimeError> {
        for stmt in &access.setup {
            match stmt {
                AccessStmt::Alias { var, source } => {
                    let value = self.var(source)?.clone();
                    self.vars.insert(var.clone(), value);
                }
                AccessStmt::InitValid { var } => {
                    self.flags.insert(var.clone(), true);
                }
                AccessStmt::Apply { var, step, valid } => {
                    if let Some(valid) = valid
                        && !self.flag(valid)
                    {
                        continue;
                    }
                    let current = self.var(var)?;
                    let next = match step {
                        Step::Member {
                            property,
                            safe: true,
                        } => safe_member(current, property).cloned(),
                        Step::Index {
                            position,
                            safe: true,
                        } => safe_index(current, *position).cloned(),
                        Step::Member {
                            property,
                            safe: false,
                        } => Some(member(current, property)?.clone()),
                        Step::Index {
                            position,
                            safe: false,
                        } => Some(index(current, *position)?.clone()),
                    };
                    match next {
                        Some(value) => {
                            self.vars.insert(var.clone(), value);
                        }
                        None => {
                            if let Some(valid) = valid {
                                self.flags.insert(valid.clone(), false);
                            }
                        }
                    }
                }
            }
        }

        if let Some(valid) = &access.validity_var
            && !self.flag(valid)
        {
            return Ok(None);
        }
        self.var(&access.result_var).map(|v| Some(v.clone()))
    }

    fn var(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.vars
            .get(name)
            .ok_or_else(|| RuntimeError::UnboundVariable(name.to_string()))
    }
}
