//! Execution engine.
//!
//! - `value` - dynamic values exchanged with callers and generated code
//! - `helpers` - truthiness, lookahead iteration and unguarded access
//! - `builder` - SQL text and argument accumulation
//! - `interpreter` - executes compiled statement trees
//! - `arena` - deduplicating object arena for nested results
//! - `aggregate` - executes scan programs over rows
//! - `row_lock` - dialect row-lock clauses
//! - `guard` - WHERE fallback policy for mutations

mod aggregate;
mod arena;
mod builder;
mod error;
mod guard;
mod helpers;
mod interpreter;
mod row_lock;
mod value;

#[cfg(test)]
mod aggregate_tests;
#[cfg(test)]
mod arena_tests;
#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod interpreter_tests;

pub use aggregate::{Aggregated, Aggregator};
pub use arena::{Arena, Parent, composite_key, key_part, node_key};
pub use builder::{BuiltQuery, SqlBuilder};
pub use error::RuntimeError;
pub use guard::{MutationKind, WhereGuard};
pub use helpers::{
    IterWithLast, Row, column, from_row, index, iter_with_last, member, safe_index, safe_member,
    truthy,
};
pub use interpreter::{Env, Interpreter};
pub use row_lock::{RowLockMode, row_lock_clause};
pub use value::{NULL, Value, from_value, to_value};
