#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Input model for the Quarry code generator.
//!
//! Everything a compilation unit is made of, as produced by the upstream
//! template parser and optimizer:
//! - `instruction` - the flat SQL assembly instruction stream
//! - `expr` - expression catalog (simple references and access paths)
//! - `column` - response column metadata (with `__` path encoding)
//! - `dialect` - target SQL dialects and response affinity
//! - `unit` - a complete, deserializable compilation unit
//! - `sql` - quote-aware SQL text helpers (placeholders, token spacing)
//! - `utils` - identifier case conversion shared by the emitters

pub mod column;
pub mod dialect;
pub mod expr;
pub mod instruction;
pub mod sql;
pub mod unit;
pub mod utils;

#[cfg(test)]
mod sql_tests;

pub use column::{PATH_SEPARATOR, ResponseColumn};
pub use dialect::{Affinity, Dialect, PlaceholderStyle};
pub use expr::{Expression, ExpressionCatalog, Step};
pub use instruction::{ExprRef, Instruction, RemovalLiteral};
pub use unit::{ImplicitParameter, Parameter, QueryUnit};

/// Errors raised while interpreting unit configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown dialect `{0}` (expected postgres, mysql, mariadb or sqlite)")]
    UnknownDialect(String),

    #[error("unsupported response affinity `{0}` (expected one, many or none)")]
    UnsupportedAffinity(String),

    #[error("invalid expression `{0}`")]
    InvalidExpression(String),
}
