use indoc::indoc;
use quarry_compiler::{Generator, ResultShape};
use quarry_core::QueryUnit;
use quarry_ir::ScanStatement;
use serde_json::json;

use super::aggregate::{Aggregated, Aggregator};
use super::error::RuntimeError;
use super::helpers::Row;
use super::value::Value;

fn scan_program(affinity: &str, responses: &str) -> Vec<ScanStatement> {
    let json = format!(
        r#"{{
          "function_name": "boards",
          "dialect": "postgres",
          "response_affinity": "{affinity}",
          "instructions": [{{ "op": "EMIT_STATIC", "value": "SELECT 1" }}],
          "responses": {responses}
        }}"#
    );
    let unit = QueryUnit::from_json(&json).unwrap();
    match Generator::new().compile_unit(&unit).unwrap().result {
        ResultShape::Hierarchical { scan, .. } => scan,
        other => panic!("expected hierarchical result, got {other:?}"),
    }
}

fn rows(json: serde_json::Value) -> Vec<Row> {
    let serde_json::Value::Array(items) = json else {
        panic!("rows must be an array");
    };
    items
        .into_iter()
        .map(|item| match Value::from(item) {
            Value::Object(fields) => fields.into_iter().collect(),
            other => panic!("row must be an object, got {other:?}"),
        })
        .collect()
}

fn to_json(result: Aggregated) -> serde_json::Value {
    result.into_value().into()
}

const TAGS: &str = indoc! {r#"
    [
      { "name": "id", "type": "int", "hierarchy_key_level": 1 },
      { "name": "tags__id", "type": "int", "hierarchy_key_level": 2, "nullable": true },
      { "name": "tags__label", "type": "string", "nullable": true }
    ]
"#};

#[test]
fn children_are_folded_into_their_root() {
    let program = scan_program("many", TAGS);
    let rows = rows(json!([
        { "id": 1, "tags__id": 10, "tags__label": "a" },
        { "id": 1, "tags__id": 11, "tags__label": "b" }
    ]));

    let result = Aggregator::run(&program, &rows).unwrap();
    assert_eq!(
        to_json(result),
        json!([{ "id": 1, "tags": [{ "id": 10, "label": "a" }, { "id": 11, "label": "b" }] }])
    );
}

#[test]
fn fan_out_keeps_every_child_once() {
    let program = scan_program("many", TAGS);
    let mut input = Vec::new();
    for root in 1..=3 {
        for tag in 1..=4 {
            input.push(json!({ "id": root, "tags__id": tag, "tags__label": "t" }));
            // Duplicate rows from a second join do not duplicate children.
            input.push(json!({ "id": root, "tags__id": tag, "tags__label": "t" }));
        }
    }
    let rows = rows(serde_json::Value::Array(input));

    let Aggregated::Many(roots) = Aggregator::run(&program, &rows).unwrap() else {
        panic!("expected many");
    };
    assert_eq!(roots.len(), 3);
    for root in &roots {
        let Some(Value::Array(tags)) = root.get("tags") else {
            panic!("root without tags: {root:?}");
        };
        assert_eq!(tags.len(), 4);
    }
}

#[test]
fn null_child_key_means_no_child() {
    let program = scan_program("many", TAGS);
    let rows = rows(json!([
        { "id": 1, "tags__id": null, "tags__label": null },
        { "id": 2, "tags__id": 5, "tags__label": "x" }
    ]));

    let result = Aggregator::run(&program, &rows).unwrap();
    assert_eq!(
        to_json(result),
        json!([
            { "id": 1, "tags": [] },
            { "id": 2, "tags": [{ "id": 5, "label": "x" }] }
        ])
    );
}

#[test]
fn nested_children_chain_through_parents() {
    let program = scan_program(
        "one",
        indoc! {r#"
            [
              { "name": "id", "type": "int", "hierarchy_key_level": 1 },
              { "name": "lists__id", "type": "int", "hierarchy_key_level": 2, "nullable": true },
              { "name": "lists__cards__id", "type": "int", "hierarchy_key_level": 3, "nullable": true }
            ]
        "#},
    );
    let rows = rows(json!([
        { "id": 1, "lists__id": 1, "lists__cards__id": 1 },
        { "id": 1, "lists__id": 2, "lists__cards__id": 1 },
        { "id": 1, "lists__id": 2, "lists__cards__id": null }
    ]));

    let result = Aggregator::run(&program, &rows).unwrap();
    assert_eq!(
        to_json(result),
        json!({
            "id": 1,
            "lists": [
                { "id": 1, "cards": [{ "id": 1 }] },
                { "id": 2, "cards": [{ "id": 1 }] }
            ]
        })
    );
}

#[test]
fn one_affinity_errors() {
    let program = scan_program("one", TAGS);

    assert_eq!(Aggregator::run(&program, &[]), Err(RuntimeError::NotFound));

    let rows = rows(json!([
        { "id": 1, "tags__id": 1, "tags__label": "a" },
        { "id": 2, "tags__id": 1, "tags__label": "a" }
    ]));
    assert_eq!(
        Aggregator::run(&program, &rows),
        Err(RuntimeError::MultipleParentsForOne { count: 2 })
    );
}

#[test]
fn missing_column() {
    let program = scan_program("many", TAGS);
    let rows = rows(json!([{ "id": 1, "tags__id": 1 }]));
    assert_eq!(
        Aggregator::run(&program, &rows),
        Err(RuntimeError::MissingColumn("tags__label".to_string()))
    );
}
