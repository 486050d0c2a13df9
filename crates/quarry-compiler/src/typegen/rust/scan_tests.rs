use indoc::indoc;

use super::{EmitConfig, emit_with_config};
use crate::test_utils::compile_unit;

fn emit_bare(json: &str, iterator: bool) -> String {
    let config = EmitConfig::new().header("").iterator(iterator);
    emit_with_config(&compile_unit(json), config).unwrap()
}

#[test]
fn hierarchical_result() {
    let output = emit_bare(
        indoc! {r#"
            {
              "function_name": "boards",
              "dialect": "postgres",
              "instructions": [{ "op": "EMIT_STATIC", "value": "SELECT * FROM board_tags" }],
              "responses": [
                { "name": "id", "type": "int", "hierarchy_key_level": 1 },
                { "name": "tags__id", "type": "int", "hierarchy_key_level": 2 },
                { "name": "tags__label", "type": "string" }
              ]
            }
        "#},
        false,
    );

    insta::assert_snapshot!(output, @r#"
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    pub struct BoardsResult {
        pub id: i64,
        pub tags: Vec<BoardsTags>,
    }

    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    pub struct BoardsTags {
        pub id: i64,
        pub label: String,
    }

    #[allow(unused_variables, unused_mut, unused_assignments)]
    pub fn boards_query() -> Result<quarry_vm::BuiltQuery, quarry_vm::RuntimeError> {
        use quarry_vm as rt;
        let mut built_ = rt::BuiltQuery::new("SELECT * FROM board_tags", vec![]);
        Ok(built_)
    }

    pub fn boards_scan(rows: &[quarry_vm::Row]) -> Result<Vec<BoardsResult>, quarry_vm::RuntimeError> {
        use quarry_vm as rt;
        let mut arena = rt::Arena::new();
        for row in rows {
            let root_key = rt::composite_key(&[rt::column(row, "id")?]);
            arena.root(&root_key, &["tags"], || Ok(vec![("id".to_string(), rt::column(row, "id")?.clone())]))?;
            let chain_0 = match rt::node_key(&[rt::column(row, "tags__id")?]) {
                Some(key) => Some(arena.node("tags", rt::Parent::Root(&root_key), "tags", &key, &[], || Ok(vec![("id".to_string(), rt::column(row, "tags__id")?.clone()), ("label".to_string(), rt::column(row, "tags__label")?.clone())]))?),
                None => None,
            };
        }
        arena.finish_many().into_iter().map(rt::from_value).collect()
    }
    "#);
}

#[test]
fn nested_nodes_use_the_parent_chain() {
    let output = emit_bare(
        indoc! {r#"
            {
              "function_name": "board",
              "dialect": "postgres",
              "response_affinity": "one",
              "instructions": [{ "op": "EMIT_STATIC", "value": "SELECT 1" }],
              "responses": [
                { "name": "id", "type": "int", "hierarchy_key_level": 1 },
                { "name": "lists__id", "type": "int", "hierarchy_key_level": 2, "nullable": true },
                { "name": "lists__cards__id", "type": "int", "hierarchy_key_level": 3, "nullable": true }
              ]
            }
        "#},
        true,
    );

    assert!(output.contains("pub struct BoardLists {\n    pub id: Option<i64>,\n    pub cards: Vec<BoardListsCards>,\n}"));
    assert!(output.contains(indoc! {r#"
                let chain_1 = match (chain_0.as_deref(), rt::node_key(&[rt::column(row, "lists__cards__id")?])) {
                    (Some(chain), Some(key)) => Some(arena.node("lists__cards", rt::Parent::Node { path: "lists", chain }, "cards", &key, &[], || Ok(vec![("id".to_string(), rt::column(row, "lists__cards__id")?.clone())]))?),
                    _ => None,
                };
    "#}.lines().map(|l| format!("        {l}\n")).collect::<String>().as_str()));
    assert!(output.contains("    rt::from_value(arena.finish_one()?)\n}"));
    assert!(output.contains(indoc! {"
        pub fn board_iter(rows: &[quarry_vm::Row]) -> impl Iterator<Item = Result<BoardResult, quarry_vm::RuntimeError>> + '_ {
            std::iter::once(board_scan(rows))
        }
    "}));
}

#[test]
fn flat_rows_map_directly() {
    let output = emit_bare(
        indoc! {r#"
            {
              "function_name": "list_users",
              "dialect": "sqlite",
              "instructions": [{ "op": "EMIT_STATIC", "value": "SELECT id FROM users" }],
              "responses": [{ "name": "id", "type": "int" }]
            }
        "#},
        true,
    );

    assert!(output.contains(indoc! {"
        pub fn list_users_scan(rows: &[quarry_vm::Row]) -> Result<Vec<ListUsersResult>, quarry_vm::RuntimeError> {
            use quarry_vm as rt;
            rows.iter().map(rt::from_row).collect()
        }
    "}));
    assert!(output.ends_with(indoc! {"
        pub fn list_users_iter(rows: &[quarry_vm::Row]) -> impl Iterator<Item = Result<ListUsersResult, quarry_vm::RuntimeError>> + '_ {
            rows.iter().map(quarry_vm::from_row)
        }
    "}));
}
