//! Triple notation → typed values.

use indexmap::IndexMap;
use jdoc::TypedValue;

use crate::error::TripleError;
use crate::value::{Triple, TripleValue};

/// Convert a triple sequence into a typed value. The result is always a
/// map; duplicate names overwrite in order.
pub fn custom_to_typed(triples: &[Triple]) -> Result<TypedValue, TripleError> {
    let mut map = IndexMap::with_capacity(triples.len());
    for triple in triples {
        map.insert(triple.name.clone(), decode_value(triple)?);
    }
    Ok(TypedValue::Map(map))
}

fn decode_value(triple: &Triple) -> Result<TypedValue, TripleError> {
    match triple.type_name.as_str() {
        "string" => Ok(TypedValue::Str(scalar(triple, "string")?.to_string())),
        // Bare "int" is an alias for int32
        "int" | "int32" => {
            let literal = integer(scalar(triple, "int32")?)?;
            Ok(wrap("$numberInt", TypedValue::Num(literal)))
        }
        "int64" => {
            let literal = integer(scalar(triple, "int64")?)?;
            Ok(wrap("$numberLong", TypedValue::Num(literal)))
        }
        "boolean" => {
            let raw = scalar(triple, "boolean")?;
            let flag = match raw {
                "0" | "false" => false,
                "1" | "true" => true,
                _ => {
                    return Err(TripleError::InvalidValue {
                        expected: "boolean",
                        value: raw.to_string(),
                    })
                }
            };
            Ok(TypedValue::Bool(flag))
        }
        "double" => {
            let literal = double(scalar(triple, "double")?)?;
            Ok(wrap("$numberDouble", TypedValue::Num(literal)))
        }
        "decimal" => {
            let literal = double(scalar(triple, "decimal")?)?;
            Ok(wrap("$numberDecimal", TypedValue::Num(literal)))
        }
        "date" => {
            let literal = integer(scalar(triple, "date")?)?;
            Ok(wrap("$date", wrap("$numberLong", TypedValue::Num(literal))))
        }
        "document" => custom_to_typed(triples_of(triple, "document")?),
        "array" => {
            let elements = triples_of(triple, "array")?;
            let mut items = Vec::with_capacity(elements.len());
            for (position, element) in elements.iter().enumerate() {
                if element.name.parse::<usize>() != Ok(position) {
                    return Err(TripleError::BadArrayIndex);
                }
                items.push(decode_value(element)?);
            }
            Ok(TypedValue::List(items))
        }
        "timestamp" => {
            let (time, increment) = pair(triple, "timestamp")?;
            let fields = IndexMap::from([
                ("t".to_string(), TypedValue::Str(time.to_string())),
                ("i".to_string(), TypedValue::Str(increment.to_string())),
            ]);
            Ok(wrap("$timestamp", TypedValue::Map(fields)))
        }
        "regex" => {
            let (pattern, options) = pair(triple, "regex")?;
            let fields = IndexMap::from([
                ("pattern".to_string(), TypedValue::Str(pattern.to_string())),
                ("options".to_string(), TypedValue::Str(options.to_string())),
            ]);
            Ok(wrap("$regularExpression", TypedValue::Map(fields)))
        }
        "oid" => Ok(wrap(
            "$oid",
            TypedValue::Str(scalar(triple, "oid")?.to_string()),
        )),
        other => Err(TripleError::UnknownType(other.to_string())),
    }
}

fn wrap(key: &str, inner: TypedValue) -> TypedValue {
    TypedValue::Map(IndexMap::from([(key.to_string(), inner)]))
}

fn scalar<'a>(triple: &'a Triple, type_name: &'static str) -> Result<&'a str, TripleError> {
    match &triple.value {
        TripleValue::Scalar(s) => Ok(s),
        _ => Err(TripleError::WrongShape {
            type_name,
            expected: "a scalar",
        }),
    }
}

fn pair<'a>(
    triple: &'a Triple,
    type_name: &'static str,
) -> Result<(&'a str, &'a str), TripleError> {
    match &triple.value {
        TripleValue::Pair(a, b) => Ok((a, b)),
        _ => Err(TripleError::WrongShape {
            type_name,
            expected: "a two-element value",
        }),
    }
}

fn triples_of<'a>(
    triple: &'a Triple,
    type_name: &'static str,
) -> Result<&'a [Triple], TripleError> {
    match &triple.value {
        TripleValue::Triples(items) => Ok(items),
        _ => Err(TripleError::WrongShape {
            type_name,
            expected: "nested triples",
        }),
    }
}

/// Canonicalize an integer payload.
fn integer(raw: &str) -> Result<String, TripleError> {
    raw.parse::<i64>()
        .map(|v| v.to_string())
        .map_err(|_| TripleError::InvalidValue {
            expected: "integer",
            value: raw.to_string(),
        })
}

/// Canonicalize a double payload; non-finite input is rejected.
fn double(raw: &str) -> Result<String, TripleError> {
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(|n| n.to_string())
        .ok_or_else(|| TripleError::InvalidValue {
            expected: "double",
            value: raw.to_string(),
        })
}
