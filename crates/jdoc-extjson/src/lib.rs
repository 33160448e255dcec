//! Flattened triple-notation interchange for typed values.
//!
//! The triple notation represents a document as a flat sequence of
//! `(name, type, value)` triples with an extended type vocabulary
//! (`int32`, `int64`, `double`, `decimal`, `date`, `timestamp`, `regex`,
//! `oid`, ...). Extended types map to and from `$`-prefixed wrapper maps in
//! the typed representation (`{"$numberLong": ...}`, `{"$oid": ...}`), the
//! same shapes MongoDB Extended JSON uses. Nested documents and arrays
//! recurse with the same triple convention; array element triples are named
//! by their position and checked on decode.
//!
//! # Example
//!
//! ```
//! use jdoc_extjson::{custom_to_typed, typed_to_custom, Triple, TripleValue};
//!
//! let triples = vec![Triple::new("n", "int64", TripleValue::Scalar("5".into()))];
//! let typed = custom_to_typed(&triples).unwrap();
//! assert_eq!(typed_to_custom(&typed).unwrap(), triples);
//! ```

mod value;
pub use value::{Triple, TripleValue};

mod error;
pub use error::TripleError;

mod decoder;
pub use decoder::custom_to_typed;

mod encoder;
pub use encoder::typed_to_custom;
