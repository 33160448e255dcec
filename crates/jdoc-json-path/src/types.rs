//! Selector program types.

/// A single step of a compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The document root: `$`. Always the first selector of a program.
    Root,
    /// Object member access by exact key: `.name`, `['name']`.
    Name(String),
    /// Array element access by position: `[3]`.
    Index(i64),
    /// Recursive self-or-descendant search: `..`. The parser guarantees a
    /// `Name` selector immediately follows; it is the scan's target.
    DeepScan,
    /// All members of an object: `.*`, `['*']`.
    WildcardName,
    /// All elements of an array: `[*]`.
    WildcardIndex,
    /// An explicit list of positions, evaluated in written order: `[1,4,1]`.
    IndexSet(Vec<i64>),
    /// Python-style slice, inclusive start, exclusive end: `[1:3]`.
    /// Negative bounds wrap around the array length at evaluation time; an
    /// `end` of 0 after wraparound means "through the end of the array".
    Slice { start: i64, end: i64 },
}

/// A compiled path expression: the ordered selector sequence produced by the
/// parser. Built once per query string and walked front to back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub selectors: Vec<Selector>,
}

impl Program {
    /// The selector sequence as a slice, for cursor-style evaluation.
    pub fn as_slice(&self) -> &[Selector] {
        &self.selectors
    }
}
