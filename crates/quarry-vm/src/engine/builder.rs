//! SQL text and argument accumulation.

use quarry_core::Dialect;
use quarry_core::sql::{join_fragments, rewrite_placeholders};
use serde::Serialize;

use super::error::RuntimeError;
use super::guard::{MutationKind, WhereGuard};
use super::row_lock::{RowLockMode, row_lock_clause};
use super::value::Value;

/// Finished statement: SQL text plus positional arguments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
    /// The WHERE clause came from the fallback condition.
    pub fallback_triggered: bool,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
            fallback_triggered: false,
        }
    }

    pub fn mutation_kind(&self) -> MutationKind {
        MutationKind::detect(&self.sql)
    }

    /// Append the dialect's row-lock clause for `mode`.
    pub fn append_row_lock(&mut self, dialect: Dialect, mode: RowLockMode) -> Result<(), RuntimeError> {
        let clause = row_lock_clause(dialect, mode, self.mutation_kind())?;
        if !clause.is_empty() {
            self.sql.push(' ');
            self.sql.push_str(clause);
        }
        Ok(())
    }

    pub fn enforce(&self, guard: &WhereGuard) -> Result<(), RuntimeError> {
        guard.enforce(self.mutation_kind(), self.fallback_triggered)
    }
}

/// Run-time SQL builder used by dynamic queries.
///
/// Fragments carry `?` placeholders; they are numbered in append order for
/// dialects with numbered placeholders.
#[derive(Clone, Debug)]
pub struct SqlBuilder {
    dialect: Dialect,
    sql: String,
    args: Vec<Value>,
    placeholders: usize,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::with_capacity(128),
            args: Vec::new(),
            placeholders: 0,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append SQL text with single-space joining.
    pub fn push_fragment(&mut self, fragment: &str) {
        let fragment = rewrite_placeholders(
            fragment,
            self.dialect.placeholder_style(),
            &mut self.placeholders,
        );
        join_fragments(&mut self.sql, &fragment);
    }

    /// Append text verbatim (separators).
    pub fn push_raw(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    pub fn push_arg(&mut self, value: Value) {
        self.args.push(value);
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery::new(self.sql.trim(), self.args)
    }
}
