use quarry_core::Dialect;

use super::builder::{BuiltQuery, SqlBuilder};
use super::guard::MutationKind;
use super::row_lock::RowLockMode;
use super::value::Value;

#[test]
fn placeholders_are_numbered_in_append_order() {
    let mut b = SqlBuilder::new(Dialect::Postgres);
    b.push_fragment("SELECT * FROM t WHERE a = ?");
    b.push_arg(Value::Int(1));
    b.push_raw(" AND ");
    b.push_fragment("b IN (?, ?)");
    b.push_arg(Value::Int(2));
    b.push_arg(Value::Int(3));

    let built = b.finish();
    assert_eq!(built.sql, "SELECT * FROM t WHERE a = $1 AND b IN ($2, $3)");
    assert_eq!(built.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert!(!built.fallback_triggered);
}

#[test]
fn question_mark_dialects_keep_placeholders() {
    let mut b = SqlBuilder::new(Dialect::MySql);
    b.push_fragment("SELECT 'a?' FROM t WHERE");
    b.push_fragment("id = ?");
    assert_eq!(b.finish().sql, "SELECT 'a?' FROM t WHERE id = ?");
}

#[test]
fn fragments_join_with_one_space() {
    let mut b = SqlBuilder::new(Dialect::Sqlite);
    b.push_fragment("SELECT *");
    b.push_fragment(" FROM t ");
    b.push_fragment("  WHERE x = 1");
    assert_eq!(b.finish().sql, "SELECT * FROM t WHERE x = 1");
}

#[test]
fn keywords_after_star_and_literals_are_separated() {
    let mut b = SqlBuilder::new(Dialect::Postgres);
    b.push_fragment("SELECT *");
    b.push_fragment("FROM t WHERE name = 'a'");
    b.push_fragment("ORDER BY id");
    assert_eq!(b.finish().sql, "SELECT * FROM t WHERE name = 'a' ORDER BY id");
}

#[test]
fn row_lock_is_appended() {
    let mut built = BuiltQuery::new("SELECT * FROM jobs", Vec::new());
    built
        .append_row_lock(Dialect::Postgres, RowLockMode::ForUpdateSkipLocked)
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM jobs FOR UPDATE SKIP LOCKED");

    let mut built = BuiltQuery::new("SELECT * FROM jobs", Vec::new());
    built
        .append_row_lock(Dialect::Sqlite, RowLockMode::ForUpdate)
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM jobs");
}

#[test]
fn mutation_kind_from_leading_keyword() {
    assert_eq!(MutationKind::detect("  update t SET a = 1"), MutationKind::Update);
    assert_eq!(MutationKind::detect("DELETE FROM t"), MutationKind::Delete);
    assert_eq!(MutationKind::detect("SELECT 1"), MutationKind::None);
    assert_eq!(MutationKind::detect("UPDATED"), MutationKind::None);
    assert_eq!(MutationKind::detect(""), MutationKind::None);
}

#[test]
fn mutation_kind_looks_past_with_list() {
    let delete = "WITH old AS (SELECT id FROM t WHERE age > 9) DELETE FROM t WHERE id IN (SELECT id FROM old)";
    assert_eq!(MutationKind::detect(delete), MutationKind::Delete);

    let update = "with recursive r(n) as (select 1 union all select n + 1 from r) update t set n = 1";
    assert_eq!(MutationKind::detect(update), MutationKind::Update);

    let select = "WITH gone AS (DELETE FROM t RETURNING id) SELECT * FROM gone";
    assert_eq!(MutationKind::detect(select), MutationKind::None);

    let quoted = "WITH x AS (SELECT ') DELETE' AS s) SELECT s FROM x";
    assert_eq!(MutationKind::detect(quoted), MutationKind::None);
}
