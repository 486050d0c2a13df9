#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled query IR.
//!
//! Produced by `quarry-compiler`, consumed by the Rust emitter and by the
//! `quarry-vm` interpreter:
//! - `access` - resolved expression paths with safe-navigation guards
//! - `query` - compiled SQL assembly (static text or statement tree)
//! - `hierarchy` - result nodes derived from `__`-encoded column names
//! - `scan` - single-pass row folding program
//! - `dump` - human-readable listings

pub mod access;
pub mod dump;
pub mod hierarchy;
pub mod query;
pub mod scan;

#[cfg(test)]
mod query_tests;

pub use access::{AccessStmt, ResolvedAccess};
pub use dump::{dump, dump_hierarchy, dump_scan};
pub use hierarchy::{Hierarchy, HierarchyNode, RootGroup};
pub use query::{
    Argument, Branch, CompiledQuery, FallbackLiteral, FallbackProbe, GenStatement, ParamBinding,
    QueryBody, SeparatorGuard,
};
pub use scan::{Attach, FieldCopy, KeyColumn, NodeScan, ScanStatement};
