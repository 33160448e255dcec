//! Handle-addressable mutable JSON document engine.
//!
//! A [`Document`] is an arena-allocated JSON tree that can be queried and
//! edited in place; an [`Engine`] owns a store of documents plus a
//! [`Registry`] of opaque string handles, exposing every operation by
//! handle the way a host-language binding would consume it. Values convert
//! between three representations: raw JSON text, the untyped "simple" form
//! (`serde_json::Value`), and the tagged [`TypedValue`] form; path queries
//! use the selector programs of the `jdoc-json-path` crate.
//!
//! # Example
//!
//! ```
//! use jdoc::{Engine, TypedValue};
//!
//! let engine = Engine::new();
//! let root = engine.parse(r#"{"a": [1, 2, 3]}"#).unwrap();
//! let arr = engine.get_member(&root, "a").unwrap();
//! engine.append_element(&arr, &TypedValue::Num("4".to_string())).unwrap();
//! assert_eq!(engine.to_json(&root).unwrap(), r#"{"a":[1,2,3,4]}"#);
//!
//! let matches = engine.query(&root, "$.a[0]").unwrap();
//! assert_eq!(engine.to_json(&matches[0]).unwrap(), "1");
//! ```

pub mod engine;
pub mod error;
pub mod json;
pub mod node;
mod query;
pub mod registry;
pub mod typed;

pub use engine::Engine;
pub use error::Error;
pub use json::escape_json_string;
pub use node::{Document, NodeId, NodeKind};
pub use registry::{DocId, NodeRef, Registry};
pub use typed::{json_to_simple, json_to_typed, TypedValue};

pub use jdoc_json_path::{ParseError as PathParseError, PathParser, Program, Selector};
