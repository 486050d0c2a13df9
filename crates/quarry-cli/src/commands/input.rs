//! Loading units and JSON inputs from files, stdin or inline text.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use quarry_compiler::{CompiledUnit, Generator};
use quarry_core::{Dialect, QueryUnit};
use quarry_vm::{Row, Value};

pub fn load_unit(path: &Path) -> Result<QueryUnit, String> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?
    };
    QueryUnit::from_json(&text).map_err(|e| format!("invalid unit '{}': {}", path.display(), e))
}

/// Load and compile a unit, with `dialect` replacing the unit's own.
pub fn compile_unit(path: &Path, dialect: Option<&str>) -> Result<CompiledUnit, String> {
    let unit = load_unit(path)?;
    let dialect = Dialect::parse_optional(dialect).map_err(|e| e.to_string())?;
    Generator::with_dialect(dialect)
        .compile_unit(&unit)
        .map_err(|e| format!("{}: {}", unit.function_name, e))
}

/// Parse inline JSON, or the contents of FILE for `@FILE`.
pub fn load_json(arg: &str) -> Result<serde_json::Value, String> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path, e))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))
}

/// Convert a JSON array of objects into result rows.
pub fn rows_from_json(json: serde_json::Value) -> Result<Vec<Row>, String> {
    let serde_json::Value::Array(items) = json else {
        return Err("rows must be a JSON array of objects".to_string());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect()),
            other => Err(format!(
                "row {} is not an object (found {})",
                i,
                Value::from(other).kind()
            )),
        })
        .collect()
}
