use indoc::indoc;
use quarry_core::{Affinity, Dialect, ParseError};

use crate::test_utils::unit;
use crate::{Error, Generator, ResultShape};

const BOARDS: &str = indoc! {r#"
    {
      "function_name": "boards",
      "dialect": "postgres",
      "response_affinity": "many",
      "instructions": [{ "op": "EMIT_STATIC", "value": "SELECT b.id, t.id AS tags__id, t.label AS tags__label FROM boards b JOIN tags t ON t.board_id = b.id" }],
      "responses": [
        { "name": "id", "type": "int", "hierarchy_key_level": 1 },
        { "name": "tags__id", "type": "int", "hierarchy_key_level": 2 },
        { "name": "tags__label", "type": "string" }
      ]
    }
"#};

const COUNT: &str = indoc! {r#"
    {
      "function_name": "count_boards",
      "dialect": "postgres",
      "response_affinity": "one",
      "instructions": [{ "op": "EMIT_STATIC", "value": "SELECT count(*) AS total FROM boards" }],
      "responses": [{ "name": "total", "type": "int" }]
    }
"#};

#[test]
fn hierarchical_unit() {
    let compiled = Generator::new().compile_unit(&unit(BOARDS)).unwrap();

    assert_eq!(compiled.affinity, Affinity::Many);
    assert_eq!(compiled.query.dialect, Dialect::Postgres);
    let hierarchy = compiled.hierarchy().unwrap();
    assert_eq!(hierarchy.len(), 1);
    assert!(matches!(compiled.result, ResultShape::Hierarchical { ref scan, .. } if scan.len() == 2));
}

#[test]
fn cache_is_reset_between_units() {
    let mut generator = Generator::new();

    generator.compile_unit(&unit(BOARDS)).unwrap();
    assert!(generator.hierarchy().is_some());

    let compiled = generator.compile_unit(&unit(COUNT)).unwrap();
    assert!(generator.hierarchy().is_none());
    assert!(compiled.hierarchy().is_none());
    assert!(matches!(compiled.result, ResultShape::Rows { ref columns } if columns.len() == 1));
    assert_eq!(compiled.affinity, Affinity::One);
}

#[test]
fn dialect_override_wins() {
    let compiled = Generator::with_dialect(Some(Dialect::Sqlite))
        .compile_unit(&unit(COUNT))
        .unwrap();
    assert_eq!(compiled.query.dialect, Dialect::Sqlite);
}

#[test]
fn exec_units_have_no_result() {
    let json = indoc! {r#"
        {
          "function_name": "touch",
          "dialect": "mysql",
          "response_affinity": "none",
          "instructions": [{ "op": "EMIT_STATIC", "value": "UPDATE boards SET touched = 1" }],
          "responses": [{ "name": "id", "type": "int" }]
        }
    "#};
    let compiled = Generator::new().compile_unit(&unit(json)).unwrap();
    assert_eq!(compiled.result, ResultShape::None);
}

#[test]
fn unsupported_affinity() {
    let json = indoc! {r#"
        {
          "function_name": "q",
          "dialect": "mysql",
          "response_affinity": "sometimes",
          "instructions": []
        }
    "#};
    let err = Generator::new().compile_unit(&unit(json)).unwrap_err();
    assert_eq!(
        err,
        Error::Config(ParseError::UnsupportedAffinity("sometimes".to_string()))
    );
}

#[test]
fn hierarchy_errors_abort_the_unit() {
    let json = indoc! {r#"
        {
          "function_name": "q",
          "dialect": "mysql",
          "instructions": [],
          "responses": [
            { "name": "name", "type": "string" },
            { "name": "tags__id", "type": "int", "hierarchy_key_level": 2 }
          ]
        }
    "#};
    let err = Generator::new().compile_unit(&unit(json)).unwrap_err();
    assert_eq!(err, Error::Hierarchy(crate::HierarchyError::NoParentPrimaryKey));
    assert_eq!(
        err.to_string(),
        "no parent primary key: mark a root column with hierarchy_key_level 1 or name it `id`"
    );
}
