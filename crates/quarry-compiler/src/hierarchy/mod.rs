//! Hierarchical aggregation.
//!
//! Response columns encode nesting in their names (`lists__cards__title`).
//! `build_nodes` groups them into a node tree; `compile_scan` turns the tree
//! into a single-pass program that folds flat rows into nested objects.

mod build;
mod scan;

#[cfg(test)]
mod build_tests;
#[cfg(test)]
mod scan_tests;

pub use build::build_nodes;
pub use scan::{ROOT_KEY_VAR, compile_scan};

/// Errors raised while deriving a hierarchy from response columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("no response columns")]
    NoResponseColumns,

    #[error("no nested column groups to aggregate")]
    NoGroups,

    #[error("no parent primary key: mark a root column with hierarchy_key_level 1 or name it `id`")]
    NoParentPrimaryKey,

    #[error("node `{node}` has no key fields (expected hierarchy_key_level {level})")]
    NoKeyFields { node: String, level: usize },

    #[error("{count} root columns are marked as keys; expected one")]
    MultipleRootKeys { count: usize },
}
