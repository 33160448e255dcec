//! The triple model.

/// One `(name, type, value)` triple. At the top level and inside
/// `document` values the name is a member key; inside `array` values it is
/// the element's position as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub name: String,
    pub type_name: String,
    pub value: TripleValue,
}

impl Triple {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: TripleValue,
    ) -> Self {
        Triple {
            name: name.into(),
            type_name: type_name.into(),
            value,
        }
    }
}

/// The value slot of a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripleValue {
    /// Scalar payload: strings, numbers, booleans, oids.
    Scalar(String),
    /// Two-part payload: `timestamp` (t, increment) and `regex`
    /// (pattern, options).
    Pair(String, String),
    /// Nested triples: `document` and `array` payloads.
    Triples(Vec<Triple>),
}
