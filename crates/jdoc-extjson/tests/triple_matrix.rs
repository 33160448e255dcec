use jdoc::TypedValue;
use jdoc_extjson::{custom_to_typed, typed_to_custom, Triple, TripleError, TripleValue};

fn scalar(name: &str, type_name: &str, value: &str) -> Triple {
    Triple::new(name, type_name, TripleValue::Scalar(value.to_string()))
}

fn decode_one(triple: Triple) -> TypedValue {
    let typed = custom_to_typed(std::slice::from_ref(&triple)).unwrap();
    let TypedValue::Map(mut map) = typed else {
        panic!("decode did not produce a map");
    };
    map.shift_remove(&triple.name).unwrap()
}

#[test]
fn int64_round_trip() {
    let triples = vec![scalar("n", "int64", "5")];
    let typed = custom_to_typed(&triples).unwrap();
    assert_eq!(
        typed.encode(),
        r#"["M",{"n":["M",{"$numberLong":["N","5"]}]}]"#
    );
    assert_eq!(typed_to_custom(&typed).unwrap(), triples);
}

#[test]
fn bare_int_is_an_int32_alias() {
    assert_eq!(
        decode_one(scalar("n", "int", "7")).encode(),
        r#"["M",{"$numberInt":["N","7"]}]"#
    );
    assert_eq!(
        decode_one(scalar("n", "int32", "7")),
        decode_one(scalar("n", "int", "7"))
    );
}

#[test]
fn string_and_boolean_stay_bare() {
    assert_eq!(
        decode_one(scalar("s", "string", "hi")),
        TypedValue::Str("hi".to_string())
    );
    assert_eq!(
        decode_one(scalar("b", "boolean", "1")),
        TypedValue::Bool(true)
    );
    assert_eq!(
        decode_one(scalar("b", "boolean", "false")),
        TypedValue::Bool(false)
    );
}

#[test]
fn date_wraps_a_long() {
    assert_eq!(
        decode_one(scalar("d", "date", "1700000000000")).encode(),
        r#"["M",{"$date":["M",{"$numberLong":["N","1700000000000"]}]}]"#
    );
}

#[test]
fn timestamp_and_regex_take_pairs() {
    let ts = Triple::new(
        "ts",
        "timestamp",
        TripleValue::Pair("123".to_string(), "9".to_string()),
    );
    assert_eq!(
        decode_one(ts.clone()).encode(),
        r#"["M",{"$timestamp":["M",{"t":["S","123"],"i":["S","9"]}]}]"#
    );

    let re = Triple::new(
        "re",
        "regex",
        TripleValue::Pair("^a.*".to_string(), "i".to_string()),
    );
    assert_eq!(
        decode_one(re.clone()).encode(),
        r#"["M",{"$regularExpression":["M",{"pattern":["S","^a.*"],"options":["S","i"]}]}]"#
    );

    // Both survive the round trip
    let triples = vec![ts, re];
    let typed = custom_to_typed(&triples).unwrap();
    assert_eq!(typed_to_custom(&typed).unwrap(), triples);
}

#[test]
fn oid_round_trip() {
    let triples = vec![scalar("id", "oid", "65f000000000000000000001")];
    let typed = custom_to_typed(&triples).unwrap();
    assert_eq!(
        typed.encode(),
        r#"["M",{"id":["M",{"$oid":["S","65f000000000000000000001"]}]}]"#
    );
    assert_eq!(typed_to_custom(&typed).unwrap(), triples);
}

#[test]
fn arrays_require_positional_names() {
    let good = Triple::new(
        "xs",
        "array",
        TripleValue::Triples(vec![
            scalar("0", "int32", "1"),
            scalar("1", "string", "two"),
        ]),
    );
    let typed = custom_to_typed(std::slice::from_ref(&good)).unwrap();
    assert_eq!(typed_to_custom(&typed).unwrap(), vec![good]);

    let bad = Triple::new(
        "xs",
        "array",
        TripleValue::Triples(vec![scalar("1", "int32", "1")]),
    );
    assert_eq!(
        custom_to_typed(&[bad]),
        Err(TripleError::BadArrayIndex)
    );
}

#[test]
fn documents_nest() {
    let triples = vec![Triple::new(
        "outer",
        "document",
        TripleValue::Triples(vec![scalar("inner", "string", "v")]),
    )];
    let typed = custom_to_typed(&triples).unwrap();
    assert_eq!(
        typed.encode(),
        r#"["M",{"outer":["M",{"inner":["S","v"]}]}]"#
    );
    assert_eq!(typed_to_custom(&typed).unwrap(), triples);
}

#[test]
fn bare_numbers_pick_the_narrowest_type() {
    let typed = TypedValue::Map(indexmap::IndexMap::from([
        ("a".to_string(), TypedValue::Num("5".to_string())),
        ("b".to_string(), TypedValue::Num("3000000000".to_string())),
        ("c".to_string(), TypedValue::Num("1.5".to_string())),
    ]));
    assert_eq!(
        typed_to_custom(&typed).unwrap(),
        vec![
            scalar("a", "int32", "5"),
            scalar("b", "int64", "3000000000"),
            scalar("c", "double", "1.5"),
        ]
    );
}

#[test]
fn decimal_and_key_sentinels_reencode_lossily() {
    // decimal decodes to its own wrapper but comes back as a double
    let decimal = decode_one(scalar("d", "decimal", "2.5"));
    assert_eq!(
        decimal.encode(),
        r#"["M",{"$numberDecimal":["N","2.5"]}]"#
    );
    let typed = TypedValue::Map(indexmap::IndexMap::from([("d".to_string(), decimal)]));
    assert_eq!(
        typed_to_custom(&typed).unwrap(),
        vec![scalar("d", "double", "2.5")]
    );

    // minKey/maxKey flatten to int64
    let min_key = TypedValue::Map(indexmap::IndexMap::from([(
        "k".to_string(),
        TypedValue::Map(indexmap::IndexMap::from([(
            "$minKey".to_string(),
            TypedValue::Num("1".to_string()),
        )])),
    )]));
    assert_eq!(
        typed_to_custom(&min_key).unwrap(),
        vec![scalar("k", "int64", "1")]
    );
}

#[test]
fn unknown_single_key_maps_fall_back_to_documents() {
    let typed = TypedValue::Map(indexmap::IndexMap::from([(
        "w".to_string(),
        TypedValue::Map(indexmap::IndexMap::from([(
            "$weird".to_string(),
            TypedValue::Str("x".to_string()),
        )])),
    )]));
    assert_eq!(
        typed_to_custom(&typed).unwrap(),
        vec![Triple::new(
            "w",
            "document",
            TripleValue::Triples(vec![scalar("$weird", "string", "x")]),
        )]
    );
}

#[test]
fn scalar_top_level_is_unsupported() {
    assert_eq!(
        typed_to_custom(&TypedValue::Str("x".to_string())),
        Err(TripleError::Unsupported)
    );
    assert_eq!(
        typed_to_custom(&TypedValue::List(vec![])),
        Err(TripleError::Unsupported)
    );
}

#[test]
fn malformed_inputs_name_the_problem() {
    assert_eq!(
        custom_to_typed(&[scalar("x", "widget", "v")]),
        Err(TripleError::UnknownType("widget".to_string()))
    );
    assert_eq!(
        custom_to_typed(&[scalar("x", "int32", "abc")]),
        Err(TripleError::InvalidValue {
            expected: "integer",
            value: "abc".to_string()
        })
    );
    assert_eq!(
        custom_to_typed(&[scalar("x", "timestamp", "not-a-pair")]),
        Err(TripleError::WrongShape {
            type_name: "timestamp",
            expected: "a two-element value"
        })
    );
    // A $timestamp wrapper missing its fields fails on encode
    let broken = TypedValue::Map(indexmap::IndexMap::from([(
        "ts".to_string(),
        TypedValue::Map(indexmap::IndexMap::from([(
            "$timestamp".to_string(),
            TypedValue::Str("bare".to_string()),
        )])),
    )]));
    assert!(matches!(
        typed_to_custom(&broken),
        Err(TripleError::MalformedWrapper { .. })
    ));
}

#[test]
fn full_document_round_trip() {
    let triples = vec![
        scalar("name", "string", "widget"),
        scalar("count", "int32", "3"),
        scalar("total", "int64", "9999999999"),
        scalar("ratio", "double", "0.5"),
        scalar("active", "boolean", "1"),
        scalar("when", "date", "1700000000000"),
        scalar("id", "oid", "abc123"),
        Triple::new(
            "meta",
            "document",
            TripleValue::Triples(vec![scalar("v", "int32", "2")]),
        ),
        Triple::new(
            "tags",
            "array",
            TripleValue::Triples(vec![
                scalar("0", "string", "a"),
                scalar("1", "string", "b"),
            ]),
        ),
    ];
    let typed = custom_to_typed(&triples).unwrap();
    assert_eq!(typed_to_custom(&typed).unwrap(), triples);
}
