//! A complete compilation unit, as handed over by the template frontend.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::column::ResponseColumn;
use crate::expr::ExpressionCatalog;
use crate::instruction::Instruction;

/// Declared input parameter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub optional: bool,
}

/// System-provided value bound by `AddSystemParam` (timestamps, actor ids).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ImplicitParameter {
    #[serde(rename = "type")]
    pub ty: String,
}

/// One query: its inputs, SQL assembly program and result metadata.
///
/// Dialect and affinity stay textual here; the generator validates them so
/// that a bad value is reported as a compile error rather than a parse error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryUnit {
    pub function_name: String,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub response_affinity: Option<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub implicit_parameters: IndexMap<String, ImplicitParameter>,
    #[serde(default)]
    pub expressions: ExpressionCatalog,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub responses: Vec<ResponseColumn>,
}

impl QueryUnit {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
