//! The typed tagged-value representation and its conversions.
//!
//! A [`TypedValue`] is the canonical interchange form of a JSON value: a
//! proper sum type in memory, and a two-element `[tag, payload]` array on
//! the wire (tags `S`, `N`, `BOOL`, `M`, `L`), realized by the manual serde
//! impls below. `N` payloads are numeric literals carried as text and
//! emitted verbatim into JSON output; `M` payloads preserve member order
//! with last-write-wins duplicate keys.

use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::error::Error;
use crate::json::{escape_into, format_number};
use crate::node::{Document, NodeId, NodeKind};

/// A tagged JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Tag `S`: a string.
    Str(String),
    /// Tag `N`: a numeric literal, kept as text and emitted verbatim.
    Num(String),
    /// Tag `BOOL`: a boolean; 0/1 on the wire.
    Bool(bool),
    /// Tag `M`: an ordered map.
    Map(IndexMap<String, TypedValue>),
    /// Tag `L`: an ordered list.
    List(Vec<TypedValue>),
}

impl TypedValue {
    /// Render as compact JSON document text (not the `[tag, payload]` wire
    /// form): `S` escaped and quoted, `N` verbatim, `BOOL` as
    /// `true`/`false`, containers comma-joined.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        match self {
            TypedValue::Str(s) => {
                out.push('"');
                escape_into(s, out);
                out.push('"');
            }
            TypedValue::Num(literal) => out.push_str(literal),
            TypedValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            TypedValue::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_json(out);
                }
                out.push(']');
            }
            TypedValue::Map(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    escape_into(key, out);
                    out.push_str("\":");
                    value.write_json(out);
                }
                out.push('}');
            }
        }
    }

    /// Decode the textual `[tag, payload]` wire form.
    pub fn decode(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Spec(e.to_string()))
    }

    /// Encode to the textual `[tag, payload]` wire form.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Document {
    /// Convert a subtree to the typed representation.
    ///
    /// Null, valueless Raw and non-finite numbers all collapse to `(S, "")`;
    /// a number equal to its saturating 32-bit truncation becomes an integer
    /// literal, anything else the shortest double literal.
    pub fn to_typed(&self, id: NodeId) -> Result<TypedValue, Error> {
        let node = self.node(id)?;
        Ok(match &node.kind {
            NodeKind::Null | NodeKind::Raw(None) => TypedValue::Str(String::new()),
            NodeKind::Bool(b) => TypedValue::Bool(*b),
            NodeKind::Number(value) => match format_number(*value) {
                Some(literal) => TypedValue::Num(literal),
                None => TypedValue::Str(String::new()),
            },
            NodeKind::String(s) | NodeKind::Raw(Some(s)) => TypedValue::Str(s.clone()),
            NodeKind::Array => {
                let mut items = Vec::with_capacity(node.children.len());
                for child in &node.children {
                    items.push(self.to_typed(*child)?);
                }
                TypedValue::List(items)
            }
            NodeKind::Object => {
                let mut map = IndexMap::with_capacity(node.children.len());
                for child in &node.children {
                    let child_node = self.node(*child)?;
                    let key = child_node.key.clone().unwrap_or_default();
                    map.insert(key, self.to_typed(*child)?);
                }
                TypedValue::Map(map)
            }
        })
    }

    /// Convert a subtree to the untyped simple representation: native
    /// nested containers with no tags. Lossy: null and non-finite numbers
    /// become empty strings, and the integer/double split follows the same
    /// 32-bit truncation check as [`Document::to_typed`].
    pub fn to_simple(&self, id: NodeId) -> Result<Value, Error> {
        let node = self.node(id)?;
        Ok(match &node.kind {
            NodeKind::Null | NodeKind::Raw(None) => Value::String(String::new()),
            NodeKind::Bool(b) => Value::Bool(*b),
            NodeKind::Number(value) => simple_number(*value),
            NodeKind::String(s) | NodeKind::Raw(Some(s)) => Value::String(s.clone()),
            NodeKind::Array => {
                let mut items = Vec::with_capacity(node.children.len());
                for child in &node.children {
                    items.push(self.to_simple(*child)?);
                }
                Value::Array(items)
            }
            NodeKind::Object => {
                let mut map = serde_json::Map::with_capacity(node.children.len());
                for child in &node.children {
                    let child_node = self.node(*child)?;
                    let key = child_node.key.clone().unwrap_or_default();
                    map.insert(key, self.to_simple(*child)?);
                }
                Value::Object(map)
            }
        })
    }
}

fn simple_number(value: f64) -> Value {
    if !value.is_finite() {
        return Value::String(String::new());
    }
    let truncated = value as i32;
    if value == f64::from(truncated) {
        return Value::Number(truncated.into());
    }
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(String::new()))
}

/// Parse JSON text and return its typed representation; no document is
/// retained.
pub fn json_to_typed(text: &str) -> Result<TypedValue, Error> {
    let doc = Document::from_json(text)?;
    doc.to_typed(doc.root())
}

/// Parse JSON text and return its simple representation; no document is
/// retained.
pub fn json_to_simple(text: &str) -> Result<Value, Error> {
    let doc = Document::from_json(text)?;
    doc.to_simple(doc.root())
}

// --------------------------------------------------------------------
// Wire form: [tag, payload]

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        match self {
            TypedValue::Str(s) => {
                pair.serialize_element("S")?;
                pair.serialize_element(s)?;
            }
            TypedValue::Num(literal) => {
                pair.serialize_element("N")?;
                pair.serialize_element(literal)?;
            }
            TypedValue::Bool(b) => {
                pair.serialize_element("BOOL")?;
                pair.serialize_element(&(*b as u8))?;
            }
            TypedValue::Map(map) => {
                pair.serialize_element("M")?;
                pair.serialize_element(map)?;
            }
            TypedValue::List(items) => {
                pair.serialize_element("L")?;
                pair.serialize_element(items)?;
            }
        }
        pair.end()
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PairVisitor)
    }
}

struct PairVisitor;

impl<'de> Visitor<'de> for PairVisitor {
    type Value = TypedValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a [tag, payload] pair")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TypedValue, A::Error> {
        let tag: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let missing = || de::Error::invalid_length(1, &"a [tag, payload] pair");
        let value = match tag.as_str() {
            "S" => TypedValue::Str(seq.next_element()?.ok_or_else(missing)?),
            "N" => TypedValue::Num(seq.next_element::<NumLiteral>()?.ok_or_else(missing)?.0),
            "BOOL" => TypedValue::Bool(seq.next_element::<BoolPayload>()?.ok_or_else(missing)?.0),
            "M" => TypedValue::Map(seq.next_element()?.ok_or_else(missing)?),
            "L" => TypedValue::List(seq.next_element()?.ok_or_else(missing)?),
            other => {
                return Err(de::Error::unknown_variant(
                    other,
                    &["S", "N", "BOOL", "M", "L"],
                ))
            }
        };
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(3, &self));
        }
        Ok(value)
    }
}

/// An `N` payload: accepted as a JSON string or a JSON number, stored as
/// its literal text.
struct NumLiteral(String);

impl<'de> Deserialize<'de> for NumLiteral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LiteralVisitor;
        impl Visitor<'_> for LiteralVisitor {
            type Value = NumLiteral;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a numeric literal")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NumLiteral, E> {
                Ok(NumLiteral(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NumLiteral, E> {
                Ok(NumLiteral(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NumLiteral, E> {
                Ok(NumLiteral(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<NumLiteral, E> {
                serde_json::Number::from_f64(v)
                    .map(|n| NumLiteral(n.to_string()))
                    .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
        deserializer.deserialize_any(LiteralVisitor)
    }
}

/// A `BOOL` payload: strictly 0/1, with JSON booleans also tolerated.
struct BoolPayload(bool);

impl<'de> Deserialize<'de> for BoolPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;
        impl Visitor<'_> for FlagVisitor {
            type Value = BoolPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 0/1 flag")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<BoolPayload, E> {
                Ok(BoolPayload(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<BoolPayload, E> {
                match v {
                    0 => Ok(BoolPayload(false)),
                    1 => Ok(BoolPayload(true)),
                    _ => Err(de::Error::invalid_value(de::Unexpected::Signed(v), &self)),
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BoolPayload, E> {
                self.visit_i64(v as i64)
            }
        }
        deserializer.deserialize_any(FlagVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trip() {
        let value = TypedValue::Map(IndexMap::from([
            ("a".to_string(), TypedValue::Num("1".to_string())),
            ("b".to_string(), TypedValue::Bool(true)),
            (
                "c".to_string(),
                TypedValue::List(vec![TypedValue::Str("x".to_string())]),
            ),
        ]));
        let wire = value.encode();
        assert_eq!(wire, r#"["M",{"a":["N","1"],"b":["BOOL",1],"c":["L",[["S","x"]]]}]"#);
        assert_eq!(TypedValue::decode(&wire).unwrap(), value);
    }

    #[test]
    fn wire_form_rejects_bad_shapes() {
        assert!(TypedValue::decode(r#"["S"]"#).is_err());
        assert!(TypedValue::decode(r#"["S","x","y"]"#).is_err());
        assert!(TypedValue::decode(r#"["Q","x"]"#).is_err());
        assert!(TypedValue::decode(r#"["BOOL",2]"#).is_err());
        assert!(TypedValue::decode(r#"{"S":"x"}"#).is_err());
    }

    #[test]
    fn wire_form_accepts_numbers_and_bools_liberally() {
        assert_eq!(
            TypedValue::decode(r#"["N",5]"#).unwrap(),
            TypedValue::Num("5".to_string())
        );
        assert_eq!(
            TypedValue::decode(r#"["BOOL",true]"#).unwrap(),
            TypedValue::Bool(true)
        );
    }
}
