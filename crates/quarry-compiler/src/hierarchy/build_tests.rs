use quarry_core::ResponseColumn;
use quarry_ir::dump_hierarchy;

use super::{HierarchyError, build_nodes};

fn col(name: &str) -> ResponseColumn {
    ResponseColumn::new(name, "string")
}

fn key(name: &str, level: u32) -> ResponseColumn {
    ResponseColumn::new(name, "int").key_level(level)
}

#[test]
fn single_child_group() {
    let hierarchy = build_nodes(&[key("id", 1), key("tags__id", 2), col("tags__label")]).unwrap();

    insta::assert_snapshot!(dump_hierarchy(&hierarchy), @r"
    root key [id]
      tags key [id] data [label]
    ");
}

#[test]
fn nodes_sorted_by_depth_then_path() {
    let hierarchy = build_nodes(&[
        key("id", 1),
        col("name"),
        key("lists__cards__id", 3),
        col("lists__cards__title"),
        key("lists__id", 2),
        col("lists__title"),
        key("labels__id", 2),
    ])
    .unwrap();

    insta::assert_snapshot!(dump_hierarchy(&hierarchy), @r"
    root key [id]
      labels key [id] data []
      lists key [id] data [title]
        lists__cards key [id] data [title]
    ");

    let root_fields: Vec<&str> = hierarchy.root.fields.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(root_fields, vec!["id", "name"]);

    let cards = hierarchy.get("lists__cards").unwrap();
    assert_eq!(cards.parent_path, vec!["lists".to_string()]);
    assert_eq!(hierarchy.parent_of(cards).map(|n| n.key()), Some("lists".to_string()));
}

#[test]
fn root_key_falls_back_to_id_name() {
    let hierarchy = build_nodes(&[col("name"), col("user_id"), key("posts__id", 2)]).unwrap();
    assert_eq!(hierarchy.root.key_fields, vec![col("user_id")]);

    let hierarchy = build_nodes(&[col("ID"), key("posts__id", 2)]).unwrap();
    assert_eq!(hierarchy.root.key_fields, vec![col("ID")]);
}

#[test]
fn flat_columns_have_no_nodes() {
    let hierarchy = build_nodes(&[key("id", 1), col("name")]).unwrap();
    assert!(hierarchy.is_empty());
}

#[test]
fn errors() {
    assert_eq!(build_nodes(&[]), Err(HierarchyError::NoResponseColumns));
    assert_eq!(
        build_nodes(&[key("id", 1), key("org_id", 1), key("a__id", 2)]),
        Err(HierarchyError::MultipleRootKeys { count: 2 })
    );
    assert_eq!(
        build_nodes(&[col("name"), key("tags__id", 2)]),
        Err(HierarchyError::NoParentPrimaryKey)
    );
    assert_eq!(
        build_nodes(&[key("id", 1), col("tags__label")]),
        Err(HierarchyError::NoKeyFields {
            node: "tags".to_string(),
            level: 2
        })
    );
}

#[test]
fn missing_intermediate_node() {
    assert_eq!(
        build_nodes(&[key("id", 1), key("a__b__id", 3)]),
        Err(HierarchyError::NoKeyFields {
            node: "a".to_string(),
            level: 2
        })
    );
}
