use quarry_core::{Affinity, ResponseColumn};
use quarry_ir::dump_scan;

use super::{HierarchyError, build_nodes, compile_scan};

#[test]
fn one_level() {
    let hierarchy = build_nodes(&[
        ResponseColumn::new("id", "int").key_level(1),
        ResponseColumn::new("tags__id", "int").key_level(2),
        ResponseColumn::new("tags__label", "string"),
    ])
    .unwrap();
    let program = compile_scan(&hierarchy, Affinity::Many).unwrap();

    insta::assert_snapshot!(dump_scan(&program), @r"
    for row
      root_key = key(id)
      root[root_key] {id} slots [tags]
      chain_tags = root_key + tags:key(tags__id) -> root.tags
        {id: tags__id, label: tags__label} slots []
    end
    collect many
    ");
}

#[test]
fn nested_nodes_chain_through_parent() {
    let hierarchy = build_nodes(&[
        ResponseColumn::new("id", "int").key_level(1),
        ResponseColumn::new("lists__id", "int").key_level(2).nullable(true),
        ResponseColumn::new("lists__cards__id", "int").key_level(3).nullable(true),
        ResponseColumn::new("lists__cards__title", "string").nullable(true),
    ])
    .unwrap();
    let program = compile_scan(&hierarchy, Affinity::One).unwrap();

    insta::assert_snapshot!(dump_scan(&program), @r"
    for row
      root_key = key(id)
      root[root_key] {id} slots [lists]
      chain_lists = root_key + lists:key(lists__id?) -> root.lists
        {id: lists__id} slots [cards]
      chain_lists__cards = chain_lists + lists__cards:key(lists__cards__id?) -> lists.cards
        {id: lists__cards__id, title: lists__cards__title} slots []
    end
    collect one
    ");
}

#[test]
fn no_groups() {
    let hierarchy = build_nodes(&[ResponseColumn::new("id", "int")]).unwrap();
    assert_eq!(
        compile_scan(&hierarchy, Affinity::Many),
        Err(HierarchyError::NoGroups)
    );
}
