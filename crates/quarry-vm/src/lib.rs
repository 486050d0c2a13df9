#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime for compiled Quarry queries.
//!
//! Executes [`CompiledQuery`](quarry_ir::CompiledQuery) statement trees into
//! SQL text plus ordered arguments, folds result rows with scan programs, and
//! provides the helpers generated Rust code calls into.

pub mod engine;

pub use engine::{
    Aggregated, Aggregator, Arena, BuiltQuery, Env, Interpreter, IterWithLast, MutationKind, NULL,
    Parent, Row, RowLockMode, RuntimeError, SqlBuilder, Value, WhereGuard, column,
    composite_key, from_row, from_value, index, iter_with_last, key_part, member, node_key,
    row_lock_clause, safe_index, safe_member, to_value, truthy,
};
pub use quarry_core::Dialect;
