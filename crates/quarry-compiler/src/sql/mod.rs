//! SQL assembly.
//!
//! An instruction stream without control flow compiles to one static SQL
//! string plus its ordered arguments. Anything with conditionals, loops or
//! delimiter management compiles to a statement tree that builds the SQL at
//! run time.

mod compiler;
mod dynamic;
pub mod lower;
pub mod spacing;


pub use compiler::{SqlCompiler, SqlCompilerBuilder};

use quarry_core::{Dialect, ExpressionCatalog, Instruction};
use quarry_ir::CompiledQuery;

use crate::Result;
use crate::scope::Scope;

/// Compile one instruction stream with the given parameters in scope.
pub fn compile(
    instructions: &[Instruction],
    catalog: &ExpressionCatalog,
    scope: Scope,
    dialect: Option<Dialect>,
    function_name: &str,
) -> Result<CompiledQuery> {
    SqlCompiler::builder(catalog, scope)
        .dialect(dialect)
        .function_name(function_name)
        .build()
        .compile(instructions)
}
