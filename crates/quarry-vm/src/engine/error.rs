use quarry_core::Dialect;

use super::guard::MutationKind;
use super::row_lock::RowLockMode;

/// Errors raised while building SQL or folding rows.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("no rows found")]
    NotFound,

    #[error("expected exactly one result, found {count}")]
    MultipleParentsForOne { count: usize },

    #[error("row has no column `{0}`")]
    MissingColumn(String),

    #[error("cannot read `{property}` of {found}")]
    MemberAccess {
        property: String,
        found: &'static str,
    },

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot index {found} with [{index}]")]
    NotIndexable { index: usize, found: &'static str },

    #[error("variable `{0}` is not bound")]
    UnboundVariable(String),

    #[error("{mode} is not supported by {dialect} for this statement")]
    RowLockUnsupported {
        dialect: Dialect,
        mode: RowLockMode,
    },

    #[error("{0} without a WHERE condition was rejected")]
    EmptyWhereRejected(MutationKind),

    #[error("parent `{path}` with key `{chain}` was never created")]
    UnknownParent { path: String, chain: String },

    #[error("value conversion failed: {0}")]
    Conversion(String),
}
