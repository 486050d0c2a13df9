//! Test helpers: load units from JSON and compile or dump them.

use quarry_core::{Dialect, QueryUnit};
use quarry_ir::{CompiledQuery, dump};

use crate::scope::Scope;
use crate::{CompiledUnit, Generator, Result};

pub fn unit(json: &str) -> QueryUnit {
    QueryUnit::from_json(json).expect("fixture is a valid unit")
}

/// Compile the unit's instruction stream with its parameters in scope.
pub fn compile_sql(json: &str) -> Result<CompiledQuery> {
    let unit = unit(json);
    let dialect = Dialect::parse_optional(unit.dialect.as_deref())?;
    let scope = Scope::with_parameters(unit.parameters.keys().map(String::as_str));
    crate::sql::compile(
        &unit.instructions,
        &unit.expressions,
        scope,
        dialect,
        &unit.function_name,
    )
}

pub fn dump_sql(json: &str) -> String {
    dump(&compile_sql(json).expect("unit compiles"))
}

pub fn compile_unit(json: &str) -> CompiledUnit {
    Generator::new()
        .compile_unit(&unit(json))
        .expect("unit compiles")
}
