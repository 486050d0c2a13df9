use indoc::indoc;
use quarry_compiler::Generator;
use quarry_core::QueryUnit;
use quarry_ir::CompiledQuery;
use serde_json::json;

use super::builder::BuiltQuery;
use super::error::RuntimeError;
use super::interpreter::{Env, Interpreter};
use super::row_lock::RowLockMode;
use super::value::Value;

fn compile(json: &str) -> CompiledQuery {
    let unit = QueryUnit::from_json(json).unwrap();
    Generator::new().compile_unit(&unit).unwrap().query
}

fn env(params: serde_json::Value) -> Env {
    Env::new(Value::from(params))
}

fn dump(built: &BuiltQuery) -> String {
    let args = serde_json::to_string(&built.args).unwrap();
    format!("{}\nargs: {args}\nfallback: {}", built.sql, built.fallback_triggered)
}

const FIND_USERS: &str = indoc! {r#"
    {
      "function_name": "find_users",
      "dialect": "postgres",
      "parameters": { "name": { "type": "*string" }, "age": { "type": "*int" } },
      "expressions": ["name", "age"],
      "instructions": [
        { "op": "EMIT_STATIC", "value": "SELECT * FROM users WHERE" },
        { "op": "BOUNDARY" },
        { "op": "IF", "expr": 0 },
        { "op": "EMIT_STATIC", "value": "name =" },
        { "op": "EMIT_EVAL", "expr": 0 },
        { "op": "END" },
        { "op": "IF", "expr": 1 },
        { "op": "EMIT_UNLESS_BOUNDARY", "token": "AND" },
        { "op": "EMIT_STATIC", "value": "age >" },
        { "op": "EMIT_EVAL", "expr": 1 },
        { "op": "END" }
      ]
    }
"#};

#[test]
fn separator_only_between_emitted_clauses() {
    let query = compile(FIND_USERS);

    let built = Interpreter::run(&query, &env(json!({ "name": "ann", "age": 30 }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE name = $1 AND age > $2");
    assert_eq!(built.args, vec![Value::from("ann"), Value::Int(30)]);

    let built = Interpreter::run(&query, &env(json!({ "age": 30 }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE age > $1");
    assert_eq!(built.args, vec![Value::Int(30)]);

    let built = Interpreter::run(&query, &env(json!({ "name": "ann" }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE name = $1");
}

const FIND_BY_IDS: &str = indoc! {r#"
    {
      "function_name": "find_by_ids",
      "dialect": "postgres",
      "parameters": { "ids": { "type": "int[]" } },
      "expressions": ["ids", "id"],
      "instructions": [
        { "op": "EMIT_STATIC", "value": "SELECT * FROM users WHERE id IN (" },
        { "op": "LOOP_START", "collection": 0, "item": "id" },
        { "op": "EMIT_EVAL", "expr": 1 },
        { "op": "EMIT_UNLESS_BOUNDARY", "token": "," },
        { "op": "LOOP_END" },
        { "op": "EMIT_STATIC", "value": ")" }
      ]
    }
"#};

#[test]
fn loop_writes_one_separator_fewer_than_items() {
    let query = compile(FIND_BY_IDS);

    let built = Interpreter::run(&query, &env(json!({ "ids": [4, 5, 6] }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE id IN ($1,$2,$3)");
    assert_eq!(built.sql.matches(',').count(), 2);
    assert_eq!(built.args, vec![Value::Int(4), Value::Int(5), Value::Int(6)]);

    let built = Interpreter::run(&query, &env(json!({ "ids": [4] }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE id IN ($1)");

    let built = Interpreter::run(&query, &env(json!({ "ids": [] }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE id IN ()");
    assert!(built.args.is_empty());
}

const FIND_TAGGED: &str = indoc! {r#"
    {
      "function_name": "find_tagged",
      "dialect": "postgres",
      "parameters": { "filter": { "type": "*Filter" } },
      "expressions": ["filter?.groups", "group.tags", "tag"],
      "instructions": [
        { "op": "EMIT_STATIC", "value": "SELECT * FROM t WHERE" },
        { "op": "LOOP_START", "collection": 0, "item": "group" },
        { "op": "EMIT_STATIC", "value": "(" },
        { "op": "LOOP_START", "collection": 1, "item": "tag" },
        { "op": "EMIT_STATIC", "value": "tag =" },
        { "op": "EMIT_EVAL", "expr": 2 },
        { "op": "EMIT_UNLESS_BOUNDARY", "token": "OR" },
        { "op": "LOOP_END" },
        { "op": "EMIT_STATIC", "value": ")" },
        { "op": "EMIT_UNLESS_BOUNDARY", "token": "AND" },
        { "op": "LOOP_END" }
      ]
    }
"#};

#[test]
fn nested_loops() {
    let query = compile(FIND_TAGGED);
    let params = json!({ "filter": { "groups": [{ "tags": ["a", "b"] }, { "tags": ["c"] }] } });

    let built = Interpreter::run(&query, &env(params)).unwrap();
    insta::assert_snapshot!(dump(&built), @r#"
    SELECT * FROM t WHERE (tag = $1 OR tag = $2) AND (tag = $3)
    args: ["a","b","c"]
    fallback: false
    "#);
}

#[test]
fn safe_navigation_short_circuits() {
    let query = compile(FIND_TAGGED);

    let built = Interpreter::run(&query, &env(json!({ "filter": null }))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE");
    assert!(built.args.is_empty());

    let built = Interpreter::run(&query, &env(json!({}))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE");
}

#[test]
fn unguarded_step_on_null_is_an_error() {
    let query = compile(FIND_TAGGED);
    let params = json!({ "filter": { "groups": [null] } });
    assert_eq!(
        Interpreter::run(&query, &env(params)),
        Err(RuntimeError::MemberAccess {
            property: "tags".to_string(),
            found: "null",
        })
    );
}

#[test]
fn else_if_takes_first_true_branch() {
    let query = compile(indoc! {r#"
        {
          "function_name": "sorted",
          "dialect": "mysql",
          "parameters": { "by_name": { "type": "bool" }, "by_date": { "type": "bool" } },
          "expressions": ["by_name", "by_date"],
          "instructions": [
            { "op": "EMIT_STATIC", "value": "SELECT * FROM t ORDER BY" },
            { "op": "IF", "expr": 0 },
            { "op": "EMIT_STATIC", "value": "name" },
            { "op": "ELSE_IF", "expr": 1 },
            { "op": "EMIT_STATIC", "value": "created_at" },
            { "op": "ELSE" },
            { "op": "EMIT_STATIC", "value": "id" },
            { "op": "END" }
          ]
        }
    "#});

    let run = |params| Interpreter::run(&query, &env(params)).unwrap().sql;
    assert_eq!(run(json!({ "by_name": true, "by_date": true })), "SELECT * FROM t ORDER BY name");
    assert_eq!(run(json!({ "by_name": false, "by_date": true })), "SELECT * FROM t ORDER BY created_at");
    assert_eq!(run(json!({ "by_name": false, "by_date": false })), "SELECT * FROM t ORDER BY id");
}

#[test]
fn static_query_with_system_argument_and_row_lock() {
    let query = compile(indoc! {r#"
        {
          "function_name": "get_card",
          "dialect": "postgres",
          "parameters": { "id": { "type": "int" } },
          "implicit_parameters": { "actor": { "type": "string" } },
          "expressions": ["id"],
          "instructions": [
            { "op": "EMIT_STATIC", "value": "SELECT * FROM cards WHERE id =" },
            { "op": "EMIT_EVAL", "expr": 0 },
            { "op": "EMIT_STATIC", "value": "AND owner = ?" },
            { "op": "ADD_SYSTEM_PARAM", "field": "actor" },
            { "op": "EMIT_SYSTEM_FOR", "marker": "row_lock" }
          ]
        }
    "#});

    let env = env(json!({ "id": 7 }))
        .system(Value::from(json!({ "actor": "u1" })))
        .row_lock(RowLockMode::ForShare);
    let built = Interpreter::run(&query, &env).unwrap();
    assert_eq!(
        built.sql,
        "SELECT * FROM cards WHERE id = $1 AND owner = $2 FOR SHARE"
    );
    assert_eq!(built.args, vec![Value::Int(7), Value::from("u1")]);

    let built = Interpreter::run(&query, &Env::new(Value::from(json!({ "id": 7 })))).unwrap();
    assert_eq!(built.sql, "SELECT * FROM cards WHERE id = $1 AND owner = $2");
    assert_eq!(built.args, vec![Value::Int(7), Value::Null]);
}

#[test]
fn invalid_path_argument_is_null() {
    let query = compile(indoc! {r#"
        {
          "function_name": "by_city",
          "dialect": "sqlite",
          "parameters": { "user": { "type": "*User" } },
          "expressions": ["user?.address?.city"],
          "instructions": [
            { "op": "EMIT_STATIC", "value": "SELECT * FROM shops WHERE city = ?" },
            { "op": "ADD_PARAM", "expr": 0 }
          ]
        }
    "#});

    let built = Interpreter::run(&query, &env(json!({ "user": null }))).unwrap();
    assert_eq!(built.args, vec![Value::Null]);

    let params = json!({ "user": { "address": { "city": "Oslo" } } });
    let built = Interpreter::run(&query, &env(params)).unwrap();
    assert_eq!(built.sql, "SELECT * FROM shops WHERE city = ?");
    assert_eq!(built.args, vec![Value::from("Oslo")]);
}
