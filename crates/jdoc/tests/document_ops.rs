use jdoc::{Document, Error, TypedValue};

fn num(literal: &str) -> TypedValue {
    TypedValue::Num(literal.to_string())
}

fn s(text: &str) -> TypedValue {
    TypedValue::Str(text.to_string())
}

#[test]
fn parse_rejects_empty_and_malformed_input() {
    assert_eq!(
        Document::from_json(""),
        Err(Error::Parse("empty input".to_string()))
    );
    assert!(matches!(
        Document::from_json("{\"a\":"),
        Err(Error::Parse(_))
    ));
    assert!(matches!(Document::from_json("nope"), Err(Error::Parse(_))));
}

#[test]
fn member_order_is_insertion_order() {
    let doc = Document::from_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let children = doc.children(doc.root()).unwrap();
    let keys: Vec<_> = children
        .iter()
        .map(|c| doc.key(*c).unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
    assert_eq!(doc.size(doc.root()).unwrap(), children.len());
}

#[test]
fn size_errors_on_scalars() {
    let doc = Document::from_json("42").unwrap();
    assert_eq!(
        doc.size(doc.root()),
        Err(Error::WrongKind {
            expected: "an array or object"
        })
    );
}

#[test]
fn element_access_works_on_objects_too() {
    let doc = Document::from_json(r#"{"a": 1, "b": 2}"#).unwrap();
    let second = doc.element(doc.root(), 1).unwrap();
    assert_eq!(doc.key(second).unwrap(), "b");
    assert_eq!(doc.element(doc.root(), 2), Err(Error::IndexOutOfRange));
}

#[test]
fn add_member_overwrites_in_place() {
    let mut doc = Document::from_json(r#"{"a": 1, "b": 2}"#).unwrap();
    doc.set_member(doc.root(), "a", &num("9")).unwrap();
    assert_eq!(doc.to_json(doc.root()).unwrap(), r#"{"a":9,"b":2}"#);
    doc.set_member(doc.root(), "c", &s("new")).unwrap();
    assert_eq!(
        doc.to_json(doc.root()).unwrap(),
        r#"{"a":9,"b":2,"c":"new"}"#
    );
}

#[test]
fn replace_member_requires_the_key() {
    let mut doc = Document::from_json(r#"{"a": 1}"#).unwrap();
    assert_eq!(
        doc.replace_member(doc.root(), "missing", &num("0")),
        Err(Error::KeyNotFound("missing".to_string()))
    );
    doc.replace_member(doc.root(), "a", &TypedValue::Bool(false))
        .unwrap();
    assert_eq!(doc.to_json(doc.root()).unwrap(), r#"{"a":false}"#);
}

#[test]
fn delete_member_is_noop_safe() {
    let mut doc = Document::from_json(r#"{"a": 1}"#).unwrap();
    doc.remove_member(doc.root(), "missing").unwrap();
    doc.remove_member(doc.root(), "a").unwrap();
    assert_eq!(doc.to_json(doc.root()).unwrap(), "{}");
}

#[test]
fn member_ops_require_an_object() {
    let mut doc = Document::from_json("[1]").unwrap();
    let err = Err(Error::WrongKind {
        expected: "an object",
    });
    assert_eq!(doc.set_member(doc.root(), "k", &num("1")).map(|_| ()), err);
    assert_eq!(doc.has_member(doc.root(), "k").map(|_| ()), err);
    assert_eq!(doc.member(doc.root(), "k").map(|_| ()), err);
}

#[test]
fn insert_element_boundary_semantics() {
    let mut doc = Document::from_json("[10, 20]").unwrap();
    let root = doc.root();
    // Insertion requires an existing position; the end slot is append-only.
    assert_eq!(
        doc.insert_element(root, 2, &num("30")),
        Err(Error::IndexOutOfRange)
    );
    doc.push_element(root, &num("30")).unwrap();
    doc.insert_element(root, 0, &num("5")).unwrap();
    assert_eq!(doc.to_json(root).unwrap(), "[5,10,20,30]");
}

#[test]
fn array_ops_require_an_array() {
    let mut doc = Document::from_json(r#"{"a": 1}"#).unwrap();
    let err = Err(Error::WrongKind {
        expected: "an array",
    });
    assert_eq!(doc.push_element(doc.root(), &num("1")), err.clone());
    assert_eq!(doc.insert_element(doc.root(), 0, &num("1")), err.clone());
    assert_eq!(doc.remove_element(doc.root(), 0).map(|_| ()), err);
}

#[test]
fn replace_and_delete_elements() {
    let mut doc = Document::from_json("[1, 2, 3]").unwrap();
    let root = doc.root();
    doc.replace_element(root, 1, &s("two")).unwrap();
    assert_eq!(doc.to_json(root).unwrap(), r#"[1,"two",3]"#);
    doc.remove_element(root, 0).unwrap();
    assert_eq!(doc.to_json(root).unwrap(), r#"["two",3]"#);
    assert_eq!(
        doc.remove_element(root, 5).map(|_| ()),
        Err(Error::IndexOutOfRange)
    );
}

#[test]
fn string_value_access_is_kind_checked() {
    let doc = Document::from_json(r#"{"s": "text", "n": 7}"#).unwrap();
    let s_node = doc.member(doc.root(), "s").unwrap();
    let n_node = doc.member(doc.root(), "n").unwrap();
    assert_eq!(doc.string_value(s_node).unwrap(), "text");
    assert_eq!(
        doc.string_value(n_node),
        Err(Error::WrongKind {
            expected: "a string"
        })
    );
}

#[test]
fn typed_spec_with_bad_literal_fails_without_mutating() {
    let mut doc = Document::from_json(r#"{"a": 1}"#).unwrap();
    let bad = TypedValue::List(vec![num("1"), num("not-a-number")]);
    assert!(matches!(
        doc.set_member(doc.root(), "b", &bad),
        Err(Error::Spec(_))
    ));
    assert_eq!(doc.to_json(doc.root()).unwrap(), r#"{"a":1}"#);
}

#[test]
fn json_round_trip_reparses_equivalently() {
    let text = r#"{"b":true,"s":"x\"y","n":1.5,"i":-7,"arr":[1,2,[3]],"o":{"k":"v"},"z":null}"#;
    let doc = Document::from_json(text).unwrap();
    let rendered = doc.to_json(doc.root()).unwrap();
    let reparsed = Document::from_json(&rendered).unwrap();
    assert_eq!(reparsed.to_json(reparsed.root()).unwrap(), rendered);
}

#[test]
fn typed_round_trip_reproduces_structure() {
    let text = r#"{"b":true,"s":"x","n":1.5,"i":42,"arr":[1,"two"],"o":{"k":false}}"#;
    let doc = Document::from_json(text).unwrap();
    let typed = doc.to_typed(doc.root()).unwrap();
    let rebuilt = Document::from_typed(&typed).unwrap();
    assert_eq!(
        rebuilt.to_json(rebuilt.root()).unwrap(),
        doc.to_json(doc.root()).unwrap()
    );
    assert_eq!(rebuilt.to_typed(rebuilt.root()).unwrap(), typed);
}

#[test]
fn pretty_printer_exact_output() {
    let doc = Document::from_json(r#"{"a":[1,2,3,4]}"#).unwrap();
    assert_eq!(
        doc.to_json_pretty(doc.root()).unwrap(),
        "{\n  \"a\": [\n    1,\n    2,\n    3,\n    4\n  ]\n}"
    );

    let nested = Document::from_json(r#"{"a":{"b":1}}"#).unwrap();
    assert_eq!(
        nested.to_json_pretty(nested.root()).unwrap(),
        "{\n  \"a\": {\n    \"b\": 1\n  }\n}"
    );

    // Empty containers keep the writer's bare newline pair
    let empty = Document::from_json("{}").unwrap();
    assert_eq!(empty.to_json_pretty(empty.root()).unwrap(), "{\n\n}");
    let empty_arr = Document::from_json("[]").unwrap();
    assert_eq!(empty_arr.to_json_pretty(empty_arr.root()).unwrap(), "[\n\n]");
}

#[test]
fn non_finite_numbers_never_reach_json_output() {
    let mut doc = Document::from_json("[]").unwrap();
    doc.push_element(doc.root(), &num("NaN")).unwrap();
    doc.push_element(doc.root(), &num("inf")).unwrap();
    assert_eq!(doc.to_json(doc.root()).unwrap(), "[null,null]");
    assert_eq!(
        doc.to_typed(doc.root()).unwrap(),
        TypedValue::List(vec![
            TypedValue::Str(String::new()),
            TypedValue::Str(String::new())
        ])
    );
}

#[test]
fn numbers_collapse_to_integers_within_i32_range() {
    let doc = Document::from_json(r#"[1e2, 2.5, -4, 2147483647]"#).unwrap();
    assert_eq!(doc.to_json(doc.root()).unwrap(), "[100,2.5,-4,2147483647]");
}
