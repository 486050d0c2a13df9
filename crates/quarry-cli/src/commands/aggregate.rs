use std::path::PathBuf;

use quarry_compiler::{CompiledUnit, ResultShape};
use quarry_core::Affinity;
use quarry_vm::{Aggregator, Row, RuntimeError, Value};

use super::fail;
use super::input::{compile_unit, load_json, rows_from_json};

pub struct AggregateArgs {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub rows: String,
    pub compact: bool,
}

pub fn run(args: AggregateArgs) {
    let unit = compile_unit(&args.unit_path, args.dialect.as_deref()).unwrap_or_else(|e| fail(e));
    let result = load_json(&args.rows)
        .and_then(rows_from_json)
        .and_then(|rows| aggregate(&unit, &rows).map_err(|e| e.to_string()));
    let value = result.unwrap_or_else(|e| fail(e));

    let json = serde_json::Value::from(value);
    let text = if args.compact {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

/// Shape `rows` the way the unit's generated scan function would.
pub fn aggregate(unit: &CompiledUnit, rows: &[Row]) -> Result<Value, AggregateError> {
    match &unit.result {
        ResultShape::None => Err(AggregateError::NoResult(unit.function_name.clone())),
        ResultShape::Rows { .. } => {
            let object = |row: &Row| {
                Value::Object(
                    row.iter()
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect(),
                )
            };
            match unit.affinity {
                Affinity::One => {
                    let row = rows.first().ok_or(RuntimeError::NotFound)?;
                    Ok(object(row))
                }
                _ => Ok(Value::Array(rows.iter().map(object).collect())),
            }
        }
        ResultShape::Hierarchical { scan, .. } => {
            tracing::debug!(rows = rows.len(), "aggregate rows");
            Ok(Aggregator::run(scan, rows)?.into_value())
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("`{0}` has no result set to aggregate")]
    NoResult(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
