//! Structural diff scenarios over catalog-shaped documents.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chronicat_core::diff::{compute_diff, OpKind, OpValue, PatchOp};
use chronicat_core::tree::Tree;
use serde_json::{json, Value};

fn tree(value: Value) -> Tree {
    Tree::from(value)
}

fn find<'a>(ops: &'a [PatchOp], path: &str) -> &'a PatchOp {
    ops.iter()
        .find(|op| op.path == path)
        .unwrap_or_else(|| panic!("no operation at {} in {:?}", path, ops))
}

#[test]
fn test_array_replace_then_trailing_remove() {
    let ops = compute_diff(Some(&tree(json!(["a", "b", "c"]))), &tree(json!(["a", "d"])));

    assert_eq!(ops.len(), 2);
    let replaced = find(&ops, "/1");
    assert_eq!(replaced.op, OpKind::Replace);
    assert_eq!(replaced.value, Some(OpValue::Scalar(Tree::from("d"))));
    let removed = find(&ops, "/2");
    assert_eq!(removed.op, OpKind::Remove);
    assert!(removed.value.is_none());
}

#[test]
fn test_nested_object_replace() {
    let before = tree(json!({"dependencies": {"name": "de.websitename:file.jar"}}));
    let after = tree(json!({"dependencies": {"name": "file.jar"}}));

    let ops = compute_diff(Some(&before), &after);

    assert_eq!(ops, vec![PatchOp::replace("/dependencies/name", &Tree::from("file.jar"))]);
}

#[test]
fn test_first_insert_adds_each_mandatory_field() {
    let doc = tree(json!({
        "id": "x",
        "type": "service",
        "name": "N",
        "owner": "O",
        "description": "D"
    }));

    let ops = compute_diff(None, &doc);

    assert_eq!(ops.len(), 5);
    for (field, expected) in [
        ("id", "x"),
        ("type", "service"),
        ("name", "N"),
        ("owner", "O"),
        ("description", "D"),
    ] {
        let op = find(&ops, &format!("/{}", field));
        assert_eq!(op.op, OpKind::Add);
        assert_eq!(op.value.as_ref().map(OpValue::as_text).as_deref(), Some(expected));
    }
}

#[test]
fn test_first_insert_explodes_nested_structures() {
    let doc = tree(json!({
        "id": "x",
        "service": {"provides": [{"port": 8080}, {"port": 8443}]}
    }));

    let ops = compute_diff(None, &doc);
    let paths: Vec<&str> = ops.iter().map(|op| op.path.as_str()).collect();

    assert_eq!(
        paths,
        vec!["/id", "/service/provides/0/port", "/service/provides/1/port"]
    );
}

#[test]
fn test_array_of_objects_element_added_in_front() {
    let before = tree(json!({"links": [{"rel": "b"}]}));
    let after = tree(json!({"links": [{"rel": "a"}, {"rel": "b"}]}));

    let ops = compute_diff(Some(&before), &after);

    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].op, OpKind::Add);
    assert_eq!(ops[0].path, "/links/0");
    assert_eq!(ops[0].value, Some(OpValue::Container(r#"{"rel":"a"}"#.to_string())));
}

#[test]
fn test_whole_array_replaced_by_scalar() {
    let before = tree(json!({"tags": ["a"]}));
    let after = tree(json!({"tags": "a"}));

    let ops = compute_diff(Some(&before), &after);

    assert_eq!(ops, vec![PatchOp::replace("/tags", &Tree::from("a"))]);
}

#[test]
fn test_member_removed_entirely() {
    let before = tree(json!({"id": "x", "contact": {"mail": "m"}}));
    let after = tree(json!({"id": "x"}));

    let ops = compute_diff(Some(&before), &after);

    assert_eq!(ops, vec![PatchOp::remove("/contact")]);
}

#[test]
fn test_null_to_value_is_replace() {
    let before = tree(json!({"owner": null}));
    let after = tree(json!({"owner": "team"}));

    let ops = compute_diff(Some(&before), &after);

    assert_eq!(ops, vec![PatchOp::replace("/owner", &Tree::from("team"))]);
}
