//! Quarry compiler: SQL assembly, result aggregation and Rust emission.
//!
//! This crate turns a [`QueryUnit`](quarry_core::QueryUnit) into compiled IR
//! and generated source:
//! - `scope` - lexical bindings for template identifiers
//! - `resolve` - expression paths to guarded accessor programs
//! - `sql` - instruction stream to static text or a run-time statement tree
//! - `hierarchy` - `__`-encoded columns to a node tree and a scan program
//! - `generator` - per-unit orchestration
//! - `typegen` - Rust source generation

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod generator;
pub mod hierarchy;
pub mod resolve;
pub mod scope;
pub mod sql;
pub mod typegen;

#[cfg(test)]
mod generator_tests;
#[cfg(test)]
pub mod test_utils;

pub use generator::{CompiledUnit, Generator, ResultShape};
pub use hierarchy::HierarchyError;
pub use sql::SqlCompiler;
pub use typegen::rust::{EmitConfig, UnsupportedTypeError};

/// Errors that abort compilation of a unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("dialect must be specified (postgres, mysql, mariadb, sqlite)")]
    DialectMustBeSpecified,

    #[error(transparent)]
    Config(#[from] quarry_core::ParseError),

    #[error("identifier `{0}` is not bound in the current scope")]
    UnboundIdentifier(String),

    #[error("expression {0} is not in the expression catalog")]
    UnknownExpression(quarry_core::ExprRef),

    #[error("unbalanced {opcode} at instruction {index}")]
    UnbalancedBlock { opcode: &'static str, index: usize },

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("iterator output requires a result shape, but `{0}` declares no response columns")]
    IteratorRequiresShape(String),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;
