//! JSONPath-style path expressions.
//!
//! This crate parses a `$`-rooted path string into a [`Program`] — a flat
//! sequence of [`Selector`]s evaluated elsewhere against a document tree.
//! The grammar is the pragmatic subset used by the document engine: member
//! access (`.name`, `['name']`), deep scan (`..name`), wildcards (`.*`,
//! `[*]`, `['*']`), indices (`[0]`), index sets (`[1,4]`) and slices
//! (`[1:3]`, `[:2]`, `[-2:]`). Filter expressions are not supported.
//!
//! # Example
//!
//! ```
//! use jdoc_json_path::{PathParser, Selector};
//!
//! let program = PathParser::parse("$.store.books[0]").unwrap();
//! assert_eq!(
//!     program.selectors,
//!     vec![
//!         Selector::Root,
//!         Selector::Name("store".to_string()),
//!         Selector::Name("books".to_string()),
//!         Selector::Index(0),
//!     ]
//! );
//! ```

mod types;
pub use types::{Program, Selector};

mod parser;
pub use parser::{ParseError, PathParser};
