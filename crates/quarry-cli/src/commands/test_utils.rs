use indoc::indoc;
use quarry_compiler::{CompiledUnit, Generator};
use quarry_core::QueryUnit;

pub const BOARDS: &str = indoc! {r#"
    {
      "function_name": "boards",
      "dialect": "postgres",
      "instructions": [
        { "op": "EMIT_STATIC", "value": "SELECT * FROM board_tags" }
      ],
      "responses": [
        { "name": "id", "type": "int", "hierarchy_key_level": 1 },
        { "name": "tags__id", "type": "int", "hierarchy_key_level": 2 },
        { "name": "tags__label", "type": "string" }
      ]
    }
"#};

pub const FIND_USERS: &str = indoc! {r#"
    {
      "function_name": "find_users",
      "dialect": "postgres",
      "response_affinity": "one",
      "parameters": { "name": { "type": "*string" } },
      "expressions": ["name"],
      "instructions": [
        { "op": "EMIT_STATIC", "value": "SELECT id, name FROM users WHERE" },
        { "op": "BOUNDARY" },
        { "op": "IF", "expr": 0 },
        { "op": "EMIT_STATIC", "value": "name =" },
        { "op": "EMIT_EVAL", "expr": 0 },
        { "op": "END" }
      ],
      "responses": [
        { "name": "id", "type": "int" },
        { "name": "name", "type": "string" }
      ]
    }
"#};

pub const DELETE_USERS: &str = indoc! {r#"
    {
      "function_name": "delete_users",
      "dialect": "postgres",
      "response_affinity": "none",
      "parameters": { "name": { "type": "*string" } },
      "expressions": ["name"],
      "instructions": [
        { "op": "EMIT_STATIC", "value": "DELETE FROM users WHERE" },
        { "op": "BOUNDARY" },
        { "op": "IF", "expr": 0 },
        { "op": "EMIT_STATIC", "value": "name =" },
        { "op": "EMIT_EVAL", "expr": 0 },
        { "op": "END" },
        { "op": "FALLBACK_CONDITION", "value": "1 = 1", "combos": [[{ "expr": 0, "when": false }]] }
      ]
    }
"#};

pub fn compile(json: &str) -> CompiledUnit {
    let unit = QueryUnit::from_json(json).expect("fixture is a valid unit");
    Generator::new().compile_unit(&unit).expect("unit compiles")
}
