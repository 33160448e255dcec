//! Error taxonomy for the document engine.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed JSON text; carries the parser's reason.
    #[error("invalid json: {0}")]
    Parse(String),

    /// Malformed path expression.
    #[error("invalid path: {0}")]
    Path(#[from] jdoc_json_path::ParseError),

    /// Malformed typed-value input (bad numeric literal, bad wire shape).
    #[error("invalid typed spec: {0}")]
    Spec(String),

    /// The operation requires a node of a different kind.
    #[error("node is not {expected}")]
    WrongKind { expected: &'static str },

    /// A handle or node id does not resolve to a live node.
    #[error("node not found")]
    NodeNotFound,

    /// The container is valid but the key is absent.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The container is valid but the position is not.
    #[error("index out of bounds")]
    IndexOutOfRange,

    /// Path evaluation hit a structural mismatch.
    #[error("query error: {0}")]
    Query(&'static str),
}
