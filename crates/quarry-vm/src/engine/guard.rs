//! Policy for mutations whose WHERE clause came from the fallback.

use std::fmt;

use quarry_core::sql::scan_quoted;

use super::error::RuntimeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MutationKind {
    /// Not an `UPDATE`/`DELETE` (reads and inserts).
    #[default]
    None,
    Update,
    Delete,
}

/// Statement verbs that can follow a `WITH` list.
const MAIN_VERBS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE", "VALUES"];

impl MutationKind {
    /// Classify a statement by its leading keyword, looking past a leading
    /// `WITH` list to the main statement.
    pub fn detect(sql: &str) -> Self {
        let mut words = top_level_words(sql).into_iter();
        let mut word = words.next().unwrap_or_default();
        if word.eq_ignore_ascii_case("WITH") {
            word = words
                .find(|w| MAIN_VERBS.iter().any(|verb| w.eq_ignore_ascii_case(verb)))
                .unwrap_or_default();
        }
        if word.eq_ignore_ascii_case("UPDATE") {
            MutationKind::Update
        } else if word.eq_ignore_ascii_case("DELETE") {
            MutationKind::Delete
        } else {
            MutationKind::None
        }
    }
}

/// Alphabetic words outside quotes and parentheses, in order.
fn top_level_words(sql: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    scan_quoted(sql, |_, c, quoted| {
        if !quoted && depth == 0 && c.is_ascii_alphabetic() {
            current.push(c);
            return;
        }
        if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        match c {
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            _ => {}
        }
    });
    if !current.is_empty() {
        words.push(current);
    }
    words
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::None => "statement",
            MutationKind::Update => "UPDATE",
            MutationKind::Delete => "DELETE",
        })
    }
}

/// Which mutations may run with only the fallback condition.
///
/// Both are rejected by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhereGuard {
    pub(crate) allow_update: bool,
    pub(crate) allow_delete: bool,
}

impl WhereGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `UPDATE` without a real WHERE condition.
    pub fn allow_update(mut self, value: bool) -> Self {
        self.allow_update = value;
        self
    }

    /// Allow `DELETE` without a real WHERE condition.
    pub fn allow_delete(mut self, value: bool) -> Self {
        self.allow_delete = value;
        self
    }

    pub fn enforce(&self, kind: MutationKind, fallback_triggered: bool) -> Result<(), RuntimeError> {
        let allowed = match kind {
            MutationKind::None => true,
            MutationKind::Update => self.allow_update,
            MutationKind::Delete => self.allow_delete,
        };
        if fallback_triggered && !allowed {
            tracing::warn!(%kind, "rejected mutation without WHERE condition");
            return Err(RuntimeError::EmptyWhereRejected(kind));
        }
        Ok(())
    }
}
