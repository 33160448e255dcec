//! Path evaluation over a document tree.
//!
//! The evaluator walks the selector program front to back with a slice
//! cursor, recursing into the tree. Misses on member names and wildcards on
//! wrong-kind nodes yield empty results; index, index-set and slice
//! selectors on the wrong kind or out of range abort the whole query.
//! Matches are collected in document order and never deduplicated.

use jdoc_json_path::{Program, Selector};

use crate::error::Error;
use crate::node::{Document, NodeId, NodeKind};

impl Document {
    /// Evaluate a compiled path program rooted at `id`.
    pub fn query(&self, id: NodeId, program: &Program) -> Result<Vec<NodeId>, Error> {
        self.node(id)?;
        let mut matches = Vec::new();
        self.step(id, program.as_slice(), &mut matches)?;
        Ok(matches)
    }

    fn step(&self, id: NodeId, chain: &[Selector], out: &mut Vec<NodeId>) -> Result<(), Error> {
        let Some((selector, rest)) = chain.split_first() else {
            out.push(id);
            return Ok(());
        };

        match selector {
            Selector::Root => self.step(id, rest, out),

            Selector::Name(name) => {
                // Absent keys and non-objects are silent misses, unlike the
                // hard errors the index selectors raise; deep scans rely on
                // this to probe arbitrary nodes.
                if matches!(self.node(id)?.kind, NodeKind::Object) {
                    if let Some((_, child)) = self.find_member(id, name)? {
                        return self.step(child, rest, out);
                    }
                }
                Ok(())
            }

            Selector::Index(index) => {
                let node = self.node(id)?;
                if !matches!(node.kind, NodeKind::Array) {
                    return Err(Error::Query("index selector on a non-array"));
                }
                if *index < 0 || *index as usize >= node.children.len() {
                    return Err(Error::Query("child index out of bounds"));
                }
                self.step(node.children[*index as usize], rest, out)
            }

            Selector::DeepScan => {
                let Some(target) = rest.first() else {
                    return Err(Error::Query("deep scan requires a target selector"));
                };
                let after = &rest[1..];
                let node = self.node(id)?;
                match node.kind {
                    NodeKind::Object => {
                        for child in &node.children {
                            if let Selector::Name(name) = target {
                                if self.node(*child)?.key.as_deref() == Some(name.as_str()) {
                                    self.step(*child, after, out)?;
                                }
                            }
                            // A match at this level must not stop deeper
                            // matches of the same name inside the member.
                            self.step(*child, chain, out)?;
                        }
                        Ok(())
                    }
                    NodeKind::Array => {
                        for (position, child) in node.children.iter().enumerate() {
                            if let Selector::Index(index) = target {
                                if *index == position as i64 {
                                    self.step(*child, after, out)?;
                                }
                            }
                            self.step(*child, chain, out)?;
                        }
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }

            Selector::WildcardName => {
                let node = self.node(id)?;
                if matches!(node.kind, NodeKind::Object) {
                    for child in &node.children {
                        self.step(*child, rest, out)?;
                    }
                }
                Ok(())
            }

            Selector::WildcardIndex => {
                let node = self.node(id)?;
                if matches!(node.kind, NodeKind::Array) {
                    for child in &node.children {
                        self.step(*child, rest, out)?;
                    }
                }
                Ok(())
            }

            Selector::IndexSet(indices) => {
                let node = self.node(id)?;
                if !matches!(node.kind, NodeKind::Array) {
                    return Err(Error::Query("index set selector on a non-array"));
                }
                let children = &node.children;
                for &index in indices {
                    if index < 0 || index as usize >= children.len() {
                        return Err(Error::Query("child index out of bounds"));
                    }
                    self.step(children[index as usize], rest, out)?;
                }
                Ok(())
            }

            Selector::Slice { start, end } => {
                let node = self.node(id)?;
                if !matches!(node.kind, NodeKind::Array) {
                    return Err(Error::Query("slice selector on a non-array"));
                }
                let children = &node.children;
                let length = children.len() as i64;
                let mut start = *start;
                let mut end = *end;
                if start < 0 {
                    start += length;
                }
                if end < 0 {
                    end += length;
                }
                // A normalized end of 0 means "through end of array"; this
                // covers the written-out `[n:]` form and, deliberately, an
                // explicit 0.
                if end == 0 {
                    end = length;
                }
                if start < 0 || start >= length {
                    return Err(Error::Query("slice start out of bounds"));
                }
                if end < 0 || end > length {
                    return Err(Error::Query("slice end out of bounds"));
                }
                for position in start..end {
                    self.step(children[position as usize], rest, out)?;
                }
                Ok(())
            }
        }
    }
}
