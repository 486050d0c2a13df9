//! Compiler state, entry point and the static path.

use quarry_core::sql::{count_placeholders, rewrite_placeholders};
use quarry_core::{Dialect, ExprRef, ExpressionCatalog, Instruction};
use quarry_ir::{Argument, CompiledQuery, QueryBody, ResolvedAccess};

use super::lower::lower;
use super::spacing::{join_fragments, normalize_fragment};
use crate::resolve::{AccessMode, Resolver};
use crate::scope::Scope;
use crate::{Error, Result};

/// Compiler for one instruction stream.
pub struct SqlCompiler<'a> {
    pub(super) catalog: &'a ExpressionCatalog,
    pub(super) scope: Scope,
    pub(super) resolver: Resolver,
    pub(super) dialect: Option<Dialect>,
    pub(super) function_name: String,
    pub(super) next_label_id: u32,
}

/// Builder for `SqlCompiler`.
pub struct SqlCompilerBuilder<'a> {
    catalog: &'a ExpressionCatalog,
    scope: Scope,
    dialect: Option<Dialect>,
    function_name: String,
}

impl<'a> SqlCompilerBuilder<'a> {
    pub fn new(catalog: &'a ExpressionCatalog, scope: Scope) -> Self {
        Self {
            catalog,
            scope,
            dialect: None,
            function_name: String::new(),
        }
    }

    pub fn dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = name.into();
        self
    }

    pub fn build(self) -> SqlCompiler<'a> {
        SqlCompiler {
            catalog: self.catalog,
            scope: self.scope,
            resolver: Resolver::new(),
            dialect: self.dialect,
            function_name: self.function_name,
            next_label_id: 0,
        }
    }
}

impl<'a> SqlCompiler<'a> {
    pub fn builder(catalog: &'a ExpressionCatalog, scope: Scope) -> SqlCompilerBuilder<'a> {
        SqlCompilerBuilder::new(catalog, scope)
    }

    /// Compile the stream into static text or a run-time statement tree.
    pub fn compile(mut self, instructions: &[Instruction]) -> Result<CompiledQuery> {
        let dialect = self.dialect.ok_or(Error::DialectMustBeSpecified)?;
        let instructions = lower(instructions);

        let needs_row_lock_clause = instructions
            .iter()
            .any(|inst| matches!(inst, Instruction::EmitSystemFor { .. }));
        let dynamic = instructions.iter().any(Instruction::is_dynamic);
        tracing::debug!(
            function = %self.function_name,
            %dialect,
            dynamic,
            instructions = instructions.len(),
            "compile sql"
        );

        let bindings = self.scope.parameter_bindings();
        let (body, fallback_guard) = if dynamic {
            self.compile_dynamic(&instructions)?
        } else {
            (self.compile_static(&instructions, dialect)?, None)
        };

        Ok(CompiledQuery {
            function_name: self.function_name,
            dialect,
            bindings,
            body,
            needs_row_lock_clause,
            fallback_guard,
        })
    }

    fn compile_static(&mut self, instructions: &[Instruction], dialect: Dialect) -> Result<QueryBody> {
        let mut text = String::new();
        let mut arguments = Vec::new();

        for inst in instructions {
            match inst {
                Instruction::EmitStatic { value } => {
                    join_fragments(&mut text, &normalize_fragment(value));
                }
                Instruction::AddParam { expr } => {
                    arguments.push(self.value_argument(*expr)?);
                }
                Instruction::AddSystemParam { field } => {
                    arguments.push(Argument::System {
                        field: field.clone(),
                    });
                }
                // Row locking is reported through `needs_row_lock_clause`;
                // everything else was lowered or routed to the dynamic path.
                _ => {}
            }
        }

        let placeholders = count_placeholders(&text);
        if placeholders != arguments.len() {
            tracing::warn!(
                function = %self.function_name,
                placeholders,
                arguments = arguments.len(),
                "placeholder count does not match argument count"
            );
        }

        let mut seen = 0;
        let text = rewrite_placeholders(text.trim(), dialect.placeholder_style(), &mut seen);
        Ok(QueryBody::Static { text, arguments })
    }

    pub(super) fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}{}", self.next_label_id);
        self.next_label_id += 1;
        label
    }

    pub(super) fn resolve(&mut self, id: ExprRef, mode: AccessMode) -> Result<ResolvedAccess> {
        let catalog = self.catalog;
        let expr = catalog.get(id).ok_or(Error::UnknownExpression(id))?;
        self.resolver.resolve(expr, &self.scope, mode)
    }

    pub(super) fn value_argument(&mut self, id: ExprRef) -> Result<Argument> {
        Ok(Argument::Value {
            expr: id,
            access: self.resolve(id, AccessMode::Value)?,
        })
    }
}
