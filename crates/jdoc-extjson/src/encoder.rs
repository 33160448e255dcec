//! Typed values → triple notation.

use jdoc::TypedValue;

use crate::error::TripleError;
use crate::value::{Triple, TripleValue};

/// Convert a typed value into a triple sequence. Only maps can be
/// expressed at the top level; bare scalars and lists are rejected.
pub fn typed_to_custom(typed: &TypedValue) -> Result<Vec<Triple>, TripleError> {
    let TypedValue::Map(map) = typed else {
        return Err(TripleError::Unsupported);
    };
    encode_members(map)
}

fn encode_members(
    map: &indexmap::IndexMap<String, TypedValue>,
) -> Result<Vec<Triple>, TripleError> {
    let mut triples = Vec::with_capacity(map.len());
    for (name, value) in map {
        let (type_name, value) = encode_value(value)?;
        triples.push(Triple::new(name.clone(), type_name, value));
    }
    Ok(triples)
}

fn encode_value(value: &TypedValue) -> Result<(&'static str, TripleValue), TripleError> {
    match value {
        TypedValue::Str(s) => Ok(("string", TripleValue::Scalar(s.clone()))),
        TypedValue::Bool(b) => Ok((
            "boolean",
            TripleValue::Scalar(if *b { "1" } else { "0" }.to_string()),
        )),
        // A bare number picks the narrowest representation that parses
        // exactly: int32, then int64, then double.
        TypedValue::Num(literal) => {
            if let Ok(v) = literal.parse::<i32>() {
                Ok(("int32", TripleValue::Scalar(v.to_string())))
            } else if let Ok(v) = literal.parse::<i64>() {
                Ok(("int64", TripleValue::Scalar(v.to_string())))
            } else if let Some(n) = literal.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Ok(("double", TripleValue::Scalar(n.to_string())))
            } else {
                Err(TripleError::InvalidNumber(literal.clone()))
            }
        }
        TypedValue::List(items) => {
            let mut triples = Vec::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                let (type_name, value) = encode_value(item)?;
                triples.push(Triple::new(position.to_string(), type_name, value));
            }
            Ok(("array", TripleValue::Triples(triples)))
        }
        TypedValue::Map(map) => {
            if map.len() == 1 {
                if let Some((key, inner)) = map.first() {
                    match key.as_str() {
                        "$timestamp" => return encode_timestamp(inner),
                        "$regularExpression" => return encode_regex(inner),
                        "$date" => return encode_date(inner),
                        "$numberInt" => {
                            let v = wrapped_number(inner, "$numberInt")?.parse::<i32>().map_err(
                                |_| TripleError::MalformedWrapper {
                                    wrapper: "$numberInt",
                                    expected: "a 32-bit integer",
                                },
                            )?;
                            return Ok(("int32", TripleValue::Scalar(v.to_string())));
                        }
                        // minKey/maxKey carry their sentinel as a plain long
                        "$numberLong" | "$minKey" | "$maxKey" => {
                            let v = wrapped_number(inner, "$numberLong")?.parse::<i64>().map_err(
                                |_| TripleError::MalformedWrapper {
                                    wrapper: "$numberLong",
                                    expected: "a 64-bit integer",
                                },
                            )?;
                            return Ok(("int64", TripleValue::Scalar(v.to_string())));
                        }
                        // Decimals lose their wider precision here: both
                        // wrappers re-encode as plain doubles
                        "$numberDouble" | "$numberDecimal" => {
                            let literal = wrapped_number(inner, "$numberDouble")?;
                            let n = literal
                                .parse::<f64>()
                                .ok()
                                .and_then(serde_json::Number::from_f64)
                                .ok_or(TripleError::MalformedWrapper {
                                    wrapper: "$numberDouble",
                                    expected: "a finite double",
                                })?;
                            return Ok(("double", TripleValue::Scalar(n.to_string())));
                        }
                        "$oid" => {
                            let TypedValue::Str(oid) = inner else {
                                return Err(TripleError::MalformedWrapper {
                                    wrapper: "$oid",
                                    expected: "an (S, ...) value",
                                });
                            };
                            return Ok(("oid", TripleValue::Scalar(oid.clone())));
                        }
                        _ => {}
                    }
                }
            }
            // Not a recognized single-key wrapper: a plain nested document
            Ok(("document", TripleValue::Triples(encode_members(map)?)))
        }
    }
}

fn wrapped_number<'a>(
    inner: &'a TypedValue,
    wrapper: &'static str,
) -> Result<&'a str, TripleError> {
    match inner {
        TypedValue::Num(literal) => Ok(literal),
        _ => Err(TripleError::MalformedWrapper {
            wrapper,
            expected: "an (N, ...) value",
        }),
    }
}

fn encode_timestamp(inner: &TypedValue) -> Result<(&'static str, TripleValue), TripleError> {
    let malformed = TripleError::MalformedWrapper {
        wrapper: "$timestamp",
        expected: "a map with (S, ...) fields 't' and 'i'",
    };
    let TypedValue::Map(fields) = inner else {
        return Err(malformed);
    };
    if fields.len() != 2 {
        return Err(malformed);
    }
    match (fields.get("t"), fields.get("i")) {
        (Some(TypedValue::Str(time)), Some(TypedValue::Str(increment))) => Ok((
            "timestamp",
            TripleValue::Pair(time.clone(), increment.clone()),
        )),
        _ => Err(malformed),
    }
}

fn encode_regex(inner: &TypedValue) -> Result<(&'static str, TripleValue), TripleError> {
    let malformed = TripleError::MalformedWrapper {
        wrapper: "$regularExpression",
        expected: "a map with (S, ...) fields 'pattern' and 'options'",
    };
    let TypedValue::Map(fields) = inner else {
        return Err(malformed);
    };
    if fields.len() != 2 {
        return Err(malformed);
    }
    match (fields.get("pattern"), fields.get("options")) {
        (Some(TypedValue::Str(pattern)), Some(TypedValue::Str(options))) => {
            Ok(("regex", TripleValue::Pair(pattern.clone(), options.clone())))
        }
        _ => Err(malformed),
    }
}

fn encode_date(inner: &TypedValue) -> Result<(&'static str, TripleValue), TripleError> {
    let malformed = TripleError::MalformedWrapper {
        wrapper: "$date",
        expected: "a {$numberLong: (N, ...)} value",
    };
    let TypedValue::Map(fields) = inner else {
        return Err(malformed);
    };
    if fields.len() != 1 {
        return Err(malformed);
    }
    match fields.get("$numberLong") {
        Some(TypedValue::Num(literal)) => {
            let v = literal.parse::<i64>().map_err(|_| malformed.clone())?;
            Ok(("date", TripleValue::Scalar(v.to_string())))
        }
        _ => Err(malformed),
    }
}
