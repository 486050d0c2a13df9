//! Row-lock clauses per dialect.

use std::fmt;
use std::str::FromStr;

use quarry_core::Dialect;

use super::error::RuntimeError;
use super::guard::MutationKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowLockMode {
    #[default]
    None,
    ForUpdate,
    ForShare,
    ForUpdateNoWait,
    ForUpdateSkipLocked,
}

impl RowLockMode {
    pub fn name(self) -> &'static str {
        match self {
            RowLockMode::None => "none",
            RowLockMode::ForUpdate => "for_update",
            RowLockMode::ForShare => "for_share",
            RowLockMode::ForUpdateNoWait => "for_update_nowait",
            RowLockMode::ForUpdateSkipLocked => "for_update_skip_locked",
        }
    }
}

impl FromStr for RowLockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "" | "none" => Ok(RowLockMode::None),
            "for_update" | "update" => Ok(RowLockMode::ForUpdate),
            "for_share" | "share" => Ok(RowLockMode::ForShare),
            "for_update_nowait" | "nowait" => Ok(RowLockMode::ForUpdateNoWait),
            "for_update_skip_locked" | "skip_locked" => Ok(RowLockMode::ForUpdateSkipLocked),
            _ => Err(format!("unknown row lock mode `{s}`")),
        }
    }
}

impl fmt::Display for RowLockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clause appended for `mode`; empty when no lock is requested.
///
/// SQLite has no row locks: a `SELECT` silently gets none, a mutation is
/// rejected.
pub fn row_lock_clause(
    dialect: Dialect,
    mode: RowLockMode,
    statement: MutationKind,
) -> Result<&'static str, RuntimeError> {
    let unsupported = || RuntimeError::RowLockUnsupported { dialect, mode };
    if mode == RowLockMode::None {
        return Ok("");
    }

    match dialect {
        Dialect::Postgres | Dialect::MySql => Ok(match mode {
            RowLockMode::None => "",
            RowLockMode::ForUpdate => "FOR UPDATE",
            RowLockMode::ForShare => "FOR SHARE",
            RowLockMode::ForUpdateNoWait => "FOR UPDATE NOWAIT",
            RowLockMode::ForUpdateSkipLocked => "FOR UPDATE SKIP LOCKED",
        }),
        Dialect::MariaDb => match mode {
            RowLockMode::None => Ok(""),
            RowLockMode::ForUpdate => Ok("FOR UPDATE"),
            RowLockMode::ForShare => Ok("LOCK IN SHARE MODE"),
            RowLockMode::ForUpdateNoWait => Ok("FOR UPDATE NOWAIT"),
            RowLockMode::ForUpdateSkipLocked => Err(unsupported()),
        },
        Dialect::Sqlite => match statement {
            MutationKind::None => Ok(""),
            MutationKind::Update | MutationKind::Delete => Err(unsupported()),
        },
    }
}
