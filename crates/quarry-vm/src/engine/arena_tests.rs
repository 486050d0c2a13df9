use serde_json::json;

use super::arena::{Arena, Parent, composite_key, key_part, node_key};
use super::error::RuntimeError;
use super::value::Value;

fn fields(id: i64) -> Result<Vec<(String, Value)>, RuntimeError> {
    Ok(vec![("id".to_string(), Value::Int(id))])
}

#[test]
fn keys() {
    assert_eq!(key_part(&Value::Null), "nil");
    assert_eq!(key_part(&Value::from("a")), r#""a""#);
    assert_eq!(composite_key(&[&Value::Int(1), &Value::Null]), "1|nil");
    assert_eq!(node_key(&[&Value::Int(1), &Value::Int(2)]), Some("1|2".to_string()));
    assert_eq!(node_key(&[&Value::Int(1), &Value::Null]), None);
}

#[test]
fn keys_do_not_collide_across_parts_or_types() {
    let (ab, c) = (Value::from("a|b"), Value::from("c"));
    let (a, bc) = (Value::from("a"), Value::from("b|c"));
    assert_ne!(composite_key(&[&ab, &c]), composite_key(&[&a, &bc]));

    assert_ne!(key_part(&Value::Int(1)), key_part(&Value::from("1")));
    assert_ne!(key_part(&Value::Int(1)), key_part(&Value::Float(1.0)));
    assert_ne!(key_part(&Value::Null), key_part(&Value::from("nil")));
    assert_ne!(key_part(&Value::Bool(true)), key_part(&Value::from("true")));
}

#[test]
fn roots_are_created_once() {
    let mut arena = Arena::new();
    arena.root("1", &["tags"], || fields(1)).unwrap();
    arena
        .root("1", &["tags"], || panic!("root 1 already exists"))
        .unwrap();
    arena.root("2", &["tags"], || fields(2)).unwrap();
    assert_eq!(arena.root_count(), 2);

    let out: Vec<serde_json::Value> = arena.finish_many().into_iter().map(Into::into).collect();
    assert_eq!(
        out,
        vec![json!({ "id": 1, "tags": [] }), json!({ "id": 2, "tags": [] })]
    );
}

#[test]
fn equal_child_keys_under_different_parents_stay_distinct() {
    let mut arena = Arena::new();
    arena.root("1", &["lists"], || fields(1)).unwrap();

    let a = arena
        .node("lists", Parent::Root("1"), "lists", "10", &["cards"], || fields(10))
        .unwrap();
    let b = arena
        .node("lists", Parent::Root("1"), "lists", "11", &["cards"], || fields(11))
        .unwrap();
    assert_eq!(a, "1|lists:10");

    for parent in [&a, &b] {
        let parent = Parent::Node {
            path: "lists",
            chain: parent,
        };
        arena
            .node("lists__cards", parent, "cards", "7", &[], || fields(7))
            .unwrap();
    }
    // Seen again under the first list.
    let again = arena
        .node(
            "lists__cards",
            Parent::Node {
                path: "lists",
                chain: &a,
            },
            "cards",
            "7",
            &[],
            || panic!("card 7 already exists under list 10"),
        )
        .unwrap();
    assert_eq!(again, "1|lists:10|lists__cards:7");

    let out: serde_json::Value = arena.finish_one().unwrap().into();
    assert_eq!(
        out,
        json!({
            "id": 1,
            "lists": [
                { "id": 10, "cards": [{ "id": 7 }] },
                { "id": 11, "cards": [{ "id": 7 }] }
            ]
        })
    );
}

#[test]
fn unknown_parent() {
    let mut arena = Arena::new();
    let err = arena
        .node("tags", Parent::Root("9"), "tags", "1", &[], || fields(1))
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnknownParent {
            path: "<root>".to_string(),
            chain: "9".to_string(),
        }
    );
}

#[test]
fn finish_one_requires_exactly_one_root() {
    assert_eq!(Arena::new().finish_one(), Err(RuntimeError::NotFound));

    let mut arena = Arena::new();
    arena.root("1", &[], || fields(1)).unwrap();
    arena.root("2", &[], || fields(2)).unwrap();
    assert_eq!(
        arena.finish_one(),
        Err(RuntimeError::MultipleParentsForOne { count: 2 })
    );
}
