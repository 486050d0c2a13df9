//! Template types to Rust types.

use std::fmt;

use quarry_core::utils::is_identifier;

/// Where an unsupported type was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeContext {
    Parameter(String),
    ImplicitParameter(String),
    Column(String),
}

impl fmt::Display for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeContext::Parameter(name) => write!(f, "parameter `{name}`"),
            TypeContext::ImplicitParameter(name) => write!(f, "implicit parameter `{name}`"),
            TypeContext::Column(name) => write!(f, "column `{name}`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported type `{ty}` for {context}: {hint}")]
pub struct UnsupportedTypeError {
    pub ty: String,
    pub context: TypeContext,
    pub hint: &'static str,
}

fn scalar(name: &str, runtime: &str) -> Option<String> {
    let ty = match name.to_ascii_lowercase().as_str() {
        "int" | "int64" | "bigint" => "i64",
        "int32" => "i32",
        "string" | "text" => "String",
        "bool" | "boolean" => "bool",
        "float" | "double" | "float64" => "f64",
        "float32" => "f32",
        "decimal" | "numeric" => "rust_decimal::Decimal",
        "timestamp" | "date" | "time" | "datetime" => "chrono::DateTime<chrono::Utc>",
        "bytes" => "Vec<u8>",
        "any" => return Some(format!("{runtime}::Value")),
        _ => return None,
    };
    Some(ty.to_string())
}

/// Why a type string was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    Empty,
    BadImport,
    Unknown,
}

impl TypeContext {
    /// Hint for an unrecognized type, listing what this position accepts.
    fn hint(&self, rejection: Rejection) -> &'static str {
        match (rejection, self) {
            (Rejection::Empty, _) => "the type is empty",
            (Rejection::BadImport, _) => {
                "an imported type must end in a type name (`./models/User`)"
            }
            (Rejection::Unknown, TypeContext::Parameter(_)) => {
                "parameters take int, string, bool, float, decimal, timestamp, bytes or any, \
                 wrapped as `T[]` or `*T`, or a named or imported type"
            }
            (Rejection::Unknown, TypeContext::ImplicitParameter(_)) => {
                "implicit parameters are supplied by the caller and take a scalar such as \
                 timestamp, string or int"
            }
            (Rejection::Unknown, TypeContext::Column(_)) => {
                "columns take a scalar, `T[]` or a named type; nullability comes from the column's `nullable` flag"
            }
        }
    }
}

fn map(ty: &str, runtime: &str) -> Result<String, Rejection> {
    let ty = ty.trim();
    if ty.is_empty() {
        return Err(Rejection::Empty);
    }
    if let Some(inner) = ty.strip_prefix('*') {
        return Ok(format!("Option<{}>", map(inner, runtime)?));
    }
    if let Some(inner) = ty.strip_suffix("[]") {
        return Ok(format!("Vec<{}>", map(inner, runtime)?));
    }
    if ty.starts_with("./") || ty.starts_with("../") {
        let name = ty.rsplit('/').next().unwrap_or_default();
        if !is_identifier(name) {
            return Err(Rejection::BadImport);
        }
        return Ok(name.to_string());
    }
    if let Some(ty) = scalar(ty, runtime) {
        return Ok(ty);
    }
    if is_identifier(ty) {
        return Ok(ty.to_string());
    }
    Err(Rejection::Unknown)
}

/// Rust type for a template type.
pub fn rust_type(
    ty: &str,
    context: TypeContext,
    runtime: &str,
) -> Result<String, UnsupportedTypeError> {
    map(ty, runtime).map_err(|rejection| UnsupportedTypeError {
        ty: ty.to_string(),
        hint: context.hint(rejection),
        context,
    })
}

/// Wrap in `Option` unless already optional.
pub(super) fn optional(ty: String) -> String {
    if ty.starts_with("Option<") {
        ty
    } else {
        format!("Option<{ty}>")
    }
}
