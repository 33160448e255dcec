//! The value tree: an arena-allocated, mutable JSON document.
//!
//! Nodes live in per-document arena slots addressed by [`NodeId`] — an index
//! plus a generation counter. Deleting a subtree returns its slots to a free
//! list and bumps their generations, so a stale id held by anyone (most
//! importantly the handle registry) simply stops resolving instead of
//! dangling. Children are kept in insertion order.

use serde_json::Value;

use crate::error::Error;
use crate::typed::TypedValue;

/// Identity of a node within one document: arena index plus the generation
/// the slot had when the node was created. Stale generations fail to
/// resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// The discriminated kind of a value node, payload included.
///
/// `Raw` holds pre-rendered JSON text (or nothing); it never results from
/// parsing, but the codecs handle it like the original engine did: a
/// valueless `Raw` renders as an empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Raw(Option<String>),
    Array,
    Object,
}

#[derive(Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    /// Present iff the parent is an Object.
    pub(crate) key: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Set once the node has been handed out through the handle registry;
    /// deletion reports exposed nodes so their handles can be dropped.
    pub(crate) exposed: bool,
}

#[derive(Debug, PartialEq)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A JSON document: an arena of nodes owning one tree.
#[derive(Debug, PartialEq)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Document {
    /// Parse JSON text into a document. Empty input is an error; malformed
    /// input fails with the parser's reason and allocates nothing lasting.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        if text.is_empty() {
            return Err(Error::Parse("empty input".to_string()));
        }
        let value: Value = serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
        let mut doc = Self::empty();
        doc.root = doc.build_json(&value);
        Ok(doc)
    }

    /// Build a document from a typed value, validating numeric literals at
    /// every level.
    pub fn from_typed(spec: &TypedValue) -> Result<Self, Error> {
        let mut doc = Self::empty();
        doc.root = doc.build_typed(spec)?;
        Ok(doc)
    }

    fn empty() -> Self {
        Document {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ----------------------------------------------------------------
    // Arena plumbing

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            key: None,
            parent: None,
            children: Vec::new(),
            exposed: false,
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn slot_node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.slot_node(id).ok_or(Error::NodeNotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .ok_or(Error::NodeNotFound)?;
        slot.node.as_mut().ok_or(Error::NodeNotFound)
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot_node(id).is_some()
    }

    fn attach(&mut self, parent: NodeId, key: Option<String>, child: NodeId) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
            node.key = key;
        }
        if let Ok(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Free `id` and its whole subtree, bumping generations. The caller is
    /// responsible for unlinking `id` from its parent first. Returns the
    /// freed nodes that were exposed through handles, for registry cleanup.
    fn free_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut dropped = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.slot_node(current).is_none() {
                continue;
            }
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                if node.exposed {
                    dropped.push(current);
                }
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        dropped
    }

    /// All currently live nodes that were exposed through handles. Used by
    /// whole-document destruction to invalidate every issued handle.
    pub fn exposed_nodes(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let node = slot.node.as_ref()?;
                node.exposed.then_some(NodeId {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect()
    }

    pub(crate) fn mark_exposed(&mut self, id: NodeId) -> Result<(), Error> {
        self.node_mut(id)?.exposed = true;
        Ok(())
    }

    // ----------------------------------------------------------------
    // Builders

    fn build_json(&mut self, value: &Value) -> NodeId {
        match value {
            Value::Null => self.alloc(NodeKind::Null),
            Value::Bool(b) => self.alloc(NodeKind::Bool(*b)),
            Value::Number(n) => self.alloc(NodeKind::Number(n.as_f64().unwrap_or(f64::NAN))),
            Value::String(s) => self.alloc(NodeKind::String(s.clone())),
            Value::Array(items) => {
                let id = self.alloc(NodeKind::Array);
                for item in items {
                    let child = self.build_json(item);
                    self.attach(id, None, child);
                }
                id
            }
            Value::Object(map) => {
                let id = self.alloc(NodeKind::Object);
                for (key, item) in map {
                    let child = self.build_json(item);
                    self.attach(id, Some(key.clone()), child);
                }
                id
            }
        }
    }

    /// Recursive typed-spec build. A failed inner build frees everything
    /// allocated so far for this spec, so errors leak no nodes.
    fn build_typed(&mut self, spec: &TypedValue) -> Result<NodeId, Error> {
        match spec {
            TypedValue::Str(s) => Ok(self.alloc(NodeKind::String(s.clone()))),
            TypedValue::Bool(b) => Ok(self.alloc(NodeKind::Bool(*b))),
            TypedValue::Num(literal) => {
                let value: f64 = literal
                    .parse()
                    .map_err(|_| Error::Spec(format!("invalid numeric literal: {literal}")))?;
                Ok(self.alloc(NodeKind::Number(value)))
            }
            TypedValue::List(items) => {
                let id = self.alloc(NodeKind::Array);
                for item in items {
                    match self.build_typed(item) {
                        Ok(child) => self.attach(id, None, child),
                        Err(e) => {
                            self.free_subtree(id);
                            return Err(e);
                        }
                    }
                }
                Ok(id)
            }
            TypedValue::Map(map) => {
                let id = self.alloc(NodeKind::Object);
                for (key, item) in map {
                    match self.build_typed(item) {
                        Ok(child) => self.attach(id, Some(key.clone()), child),
                        Err(e) => {
                            self.free_subtree(id);
                            return Err(e);
                        }
                    }
                }
                Ok(id)
            }
        }
    }

    // ----------------------------------------------------------------
    // Kind checks

    fn expect_object(&self, id: NodeId) -> Result<&Node, Error> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Object => Ok(node),
            _ => Err(Error::WrongKind {
                expected: "an object",
            }),
        }
    }

    fn expect_array(&self, id: NodeId) -> Result<&Node, Error> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Array => Ok(node),
            _ => Err(Error::WrongKind {
                expected: "an array",
            }),
        }
    }

    fn expect_container(&self, id: NodeId) -> Result<&Node, Error> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Array | NodeKind::Object => Ok(node),
            _ => Err(Error::WrongKind {
                expected: "an array or object",
            }),
        }
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, Error> {
        Ok(&self.node(id)?.kind)
    }

    pub fn is_number(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::Number(_)))
    }

    pub fn is_bool(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::Bool(_)))
    }

    pub fn is_string(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::String(_)))
    }

    pub fn is_null(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::Null))
    }

    pub fn is_object(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::Object))
    }

    pub fn is_array(&self, id: NodeId) -> Result<bool, Error> {
        Ok(matches!(self.node(id)?.kind, NodeKind::Array))
    }

    // ----------------------------------------------------------------
    // Read access

    /// Number of children. Scalars are an error, not zero.
    pub fn size(&self, id: NodeId) -> Result<usize, Error> {
        Ok(self.expect_container(id)?.children.len())
    }

    pub(crate) fn find_member(&self, id: NodeId, key: &str) -> Result<Option<(usize, NodeId)>, Error> {
        let node = self.expect_object(id)?;
        for (position, child) in node.children.iter().enumerate() {
            if self.node(*child)?.key.as_deref() == Some(key) {
                return Ok(Some((position, *child)));
            }
        }
        Ok(None)
    }

    /// Look up an object member by exact key.
    pub fn member(&self, id: NodeId, key: &str) -> Result<NodeId, Error> {
        self.find_member(id, key)?
            .map(|(_, child)| child)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn has_member(&self, id: NodeId, key: &str) -> Result<bool, Error> {
        Ok(self.find_member(id, key)?.is_some())
    }

    /// Child by ordinal position; valid for both arrays and objects.
    pub fn element(&self, id: NodeId, index: usize) -> Result<NodeId, Error> {
        self.expect_container(id)?
            .children
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange)
    }

    /// All children in insertion order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, Error> {
        Ok(self.expect_container(id)?.children.clone())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, Error> {
        Ok(self.node(id)?.parent)
    }

    /// The member key of a node whose parent is an object.
    pub fn key(&self, id: NodeId) -> Result<&str, Error> {
        self.node(id)?.key.as_deref().ok_or(Error::WrongKind {
            expected: "an object member",
        })
    }

    /// The string payload of a String node (or a Raw node carrying text).
    pub fn string_value(&self, id: NodeId) -> Result<&str, Error> {
        match &self.node(id)?.kind {
            NodeKind::String(s) | NodeKind::Raw(Some(s)) => Ok(s),
            _ => Err(Error::WrongKind {
                expected: "a string",
            }),
        }
    }

    // ----------------------------------------------------------------
    // Mutation. All mutators validate kind, position and spec before
    // touching the tree; the `Vec<NodeId>` results list freed nodes that
    // were exposed through handles, for the caller to unregister.

    /// Append a member, or overwrite in place when the key already exists
    /// (last-write-wins, as duplicate keys behave in JSON).
    pub fn set_member(
        &mut self,
        id: NodeId,
        key: &str,
        spec: &TypedValue,
    ) -> Result<Vec<NodeId>, Error> {
        let existing = self.find_member(id, key)?;
        let child = self.build_typed(spec)?;
        match existing {
            Some((position, old)) => {
                self.replace_child(id, position, Some(key.to_string()), child);
                Ok(self.free_subtree(old))
            }
            None => {
                self.attach(id, Some(key.to_string()), child);
                Ok(Vec::new())
            }
        }
    }

    /// Replace an existing member; absent keys are an error.
    pub fn replace_member(
        &mut self,
        id: NodeId,
        key: &str,
        spec: &TypedValue,
    ) -> Result<Vec<NodeId>, Error> {
        let (position, old) = self
            .find_member(id, key)?
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        let child = self.build_typed(spec)?;
        self.replace_child(id, position, Some(key.to_string()), child);
        Ok(self.free_subtree(old))
    }

    /// Remove a member; absent keys are a no-op.
    pub fn remove_member(&mut self, id: NodeId, key: &str) -> Result<Vec<NodeId>, Error> {
        match self.find_member(id, key)? {
            Some((position, old)) => {
                if let Ok(node) = self.node_mut(id) {
                    node.children.remove(position);
                }
                Ok(self.free_subtree(old))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Append an element to an array.
    pub fn push_element(&mut self, id: NodeId, spec: &TypedValue) -> Result<(), Error> {
        self.expect_array(id)?;
        let child = self.build_typed(spec)?;
        self.attach(id, None, child);
        Ok(())
    }

    /// Insert before the element at `index`; `index` must name an existing
    /// position (appending is `push_element`'s job).
    pub fn insert_element(
        &mut self,
        id: NodeId,
        index: usize,
        spec: &TypedValue,
    ) -> Result<(), Error> {
        if index >= self.expect_array(id)?.children.len() {
            return Err(Error::IndexOutOfRange);
        }
        let child = self.build_typed(spec)?;
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(id);
        }
        if let Ok(node) = self.node_mut(id) {
            node.children.insert(index, child);
        }
        Ok(())
    }

    pub fn replace_element(
        &mut self,
        id: NodeId,
        index: usize,
        spec: &TypedValue,
    ) -> Result<Vec<NodeId>, Error> {
        let children = &self.expect_array(id)?.children;
        let old = *children.get(index).ok_or(Error::IndexOutOfRange)?;
        let child = self.build_typed(spec)?;
        self.replace_child(id, index, None, child);
        Ok(self.free_subtree(old))
    }

    pub fn remove_element(&mut self, id: NodeId, index: usize) -> Result<Vec<NodeId>, Error> {
        let children = &self.expect_array(id)?.children;
        let old = *children.get(index).ok_or(Error::IndexOutOfRange)?;
        if let Ok(node) = self.node_mut(id) {
            node.children.remove(index);
        }
        Ok(self.free_subtree(old))
    }

    fn replace_child(&mut self, parent: NodeId, position: usize, key: Option<String>, child: NodeId) {
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
            node.key = key;
        }
        if let Ok(node) = self.node_mut(parent) {
            node.children[position] = child;
        }
    }
}
