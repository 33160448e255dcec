//! Error types for triple-notation conversion.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TripleError {
    /// The type string is not part of the vocabulary.
    #[error("unknown type '{0}' in triple notation")]
    UnknownType(String),

    /// A scalar payload did not parse as the type demands.
    #[error("invalid {expected} value: {value}")]
    InvalidValue {
        expected: &'static str,
        value: String,
    },

    /// The value slot has the wrong shape for its type (scalar where a
    /// pair or nested triples were needed, or the reverse).
    #[error("'{type_name}' value must be {expected}")]
    WrongShape {
        type_name: &'static str,
        expected: &'static str,
    },

    /// Array element triples must be named 0, 1, 2, ... in position order.
    #[error("array indices must be consecutive from 0")]
    BadArrayIndex,

    /// A `$`-wrapper map did not have the shape its key promises.
    #[error("malformed {wrapper} wrapper: expected {expected}")]
    MalformedWrapper {
        wrapper: &'static str,
        expected: &'static str,
    },

    /// A numeric typed value fit none of int32, int64 or double.
    #[error("invalid numeric literal: {0}")]
    InvalidNumber(String),

    /// Bare scalars cannot be expressed at the top level of the notation.
    #[error("no support in triple notation")]
    Unsupported,
}
