//! The by-handle operation surface.
//!
//! An [`Engine`] owns the document store and the handle registry, and
//! exposes every tree operation keyed by opaque handle strings — the layer
//! a host-language adapter would call. Documents live behind their own
//! mutexes, so operations on different documents never contend and access
//! to one document is serialized (the single-writer rule, enforced
//! structurally). Lock order is always store map, then document, then
//! registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jdoc_json_path::PathParser;
use serde_json::Value;

use crate::error::Error;
use crate::node::{Document, NodeId};
use crate::registry::{DocId, NodeRef, Registry};
use crate::typed::TypedValue;

type SharedDoc = Arc<Mutex<Document>>;

/// Document store plus handle registry; one per process or runtime.
#[derive(Debug, Default)]
pub struct Engine {
    docs: Mutex<HashMap<DocId, SharedDoc>>,
    next_doc: AtomicU64,
    registry: Registry,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry, for callers that manage handles directly.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ----------------------------------------------------------------
    // Document lifecycle

    /// Parse JSON text into a new document; returns the root handle.
    pub fn parse(&self, text: &str) -> Result<String, Error> {
        self.install(Document::from_json(text)?)
    }

    /// Build a new document from a typed spec; returns the root handle.
    pub fn create(&self, spec: &TypedValue) -> Result<String, Error> {
        self.install(Document::from_typed(spec)?)
    }

    fn install(&self, mut doc: Document) -> Result<String, Error> {
        let doc_id = self.next_doc.fetch_add(1, Ordering::Relaxed);
        let root = doc.root();
        doc.mark_exposed(root)?;
        lock(&self.docs).insert(doc_id, Arc::new(Mutex::new(doc)));
        Ok(self.registry.register(NodeRef {
            doc: doc_id,
            node: root,
        }))
    }

    /// Destroy a whole document. Only legal on a root handle; every handle
    /// issued for any node of the document stops resolving.
    pub fn destroy(&self, handle: &str) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        {
            let doc = lock_doc(&shared);
            if doc.parent(target.node)?.is_some() {
                return Err(Error::WrongKind {
                    expected: "a document root",
                });
            }
            for node in doc.exposed_nodes() {
                self.registry.forget(NodeRef {
                    doc: target.doc,
                    node,
                });
            }
        }
        lock(&self.docs).remove(&target.doc);
        Ok(())
    }

    // ----------------------------------------------------------------
    // Reads

    pub fn size(&self, handle: &str) -> Result<usize, Error> {
        let (shared, target) = self.lookup(handle)?;
        let doc = lock_doc(&shared);
        doc.size(target.node)
    }

    pub fn has_member(&self, handle: &str, key: &str) -> Result<bool, Error> {
        let (shared, target) = self.lookup(handle)?;
        let doc = lock_doc(&shared);
        doc.has_member(target.node, key)
    }

    /// Object member lookup; exposes the member through a new handle.
    pub fn get_member(&self, handle: &str, key: &str) -> Result<String, Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let child = doc.member(target.node, key)?;
        self.expose(&mut doc, target.doc, child)
    }

    /// Child by ordinal position, for arrays and objects alike.
    pub fn get_element(&self, handle: &str, index: usize) -> Result<String, Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let child = doc.element(target.node, index)?;
        self.expose(&mut doc, target.doc, child)
    }

    /// Handles for every child, in insertion order.
    pub fn children(&self, handle: &str) -> Result<Vec<String>, Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let children = doc.children(target.node)?;
        let mut handles = Vec::with_capacity(children.len());
        for child in children {
            handles.push(self.expose(&mut doc, target.doc, child)?);
        }
        Ok(handles)
    }

    /// The member key of the node, where it has one.
    pub fn get_key(&self, handle: &str) -> Result<String, Error> {
        let (shared, target) = self.lookup(handle)?;
        let doc = lock_doc(&shared);
        doc.key(target.node).map(str::to_string)
    }

    /// The string payload of a String node.
    pub fn get_string(&self, handle: &str) -> Result<String, Error> {
        let (shared, target) = self.lookup(handle)?;
        let doc = lock_doc(&shared);
        doc.string_value(target.node).map(str::to_string)
    }

    pub fn is_number(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_number(node))
    }

    pub fn is_bool(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_bool(node))
    }

    pub fn is_string(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_string(node))
    }

    pub fn is_null(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_null(node))
    }

    pub fn is_object(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_object(node))
    }

    pub fn is_array(&self, handle: &str) -> Result<bool, Error> {
        self.with_doc(handle, |doc, node| doc.is_array(node))
    }

    // ----------------------------------------------------------------
    // Conversions

    pub fn to_typed(&self, handle: &str) -> Result<TypedValue, Error> {
        self.with_doc(handle, |doc, node| doc.to_typed(node))
    }

    pub fn to_simple(&self, handle: &str) -> Result<Value, Error> {
        self.with_doc(handle, |doc, node| doc.to_simple(node))
    }

    pub fn to_json(&self, handle: &str) -> Result<String, Error> {
        self.with_doc(handle, |doc, node| doc.to_json(node))
    }

    pub fn to_json_pretty(&self, handle: &str) -> Result<String, Error> {
        self.with_doc(handle, |doc, node| doc.to_json_pretty(node))
    }

    // ----------------------------------------------------------------
    // Mutation

    pub fn add_member(&self, handle: &str, key: &str, spec: &TypedValue) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let dropped = doc.set_member(target.node, key, spec)?;
        self.drop_handles(target.doc, dropped);
        Ok(())
    }

    pub fn replace_member(&self, handle: &str, key: &str, spec: &TypedValue) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let dropped = doc.replace_member(target.node, key, spec)?;
        self.drop_handles(target.doc, dropped);
        Ok(())
    }

    pub fn delete_member(&self, handle: &str, key: &str) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let dropped = doc.remove_member(target.node, key)?;
        self.drop_handles(target.doc, dropped);
        Ok(())
    }

    pub fn append_element(&self, handle: &str, spec: &TypedValue) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        doc.push_element(target.node, spec)
    }

    pub fn insert_element(
        &self,
        handle: &str,
        index: usize,
        spec: &TypedValue,
    ) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        doc.insert_element(target.node, index, spec)
    }

    pub fn replace_element(
        &self,
        handle: &str,
        index: usize,
        spec: &TypedValue,
    ) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let dropped = doc.replace_element(target.node, index, spec)?;
        self.drop_handles(target.doc, dropped);
        Ok(())
    }

    pub fn delete_element(&self, handle: &str, index: usize) -> Result<(), Error> {
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let dropped = doc.remove_element(target.node, index)?;
        self.drop_handles(target.doc, dropped);
        Ok(())
    }

    // ----------------------------------------------------------------
    // Queries

    /// Evaluate a path expression rooted at the handle's node. Matches are
    /// registered as handles only after the whole evaluation succeeds, so a
    /// failed query leaves no new handles behind.
    pub fn query(&self, handle: &str, path: &str) -> Result<Vec<String>, Error> {
        let program = PathParser::parse(path)?;
        let (shared, target) = self.lookup(handle)?;
        let mut doc = lock_doc(&shared);
        let matches = doc.query(target.node, &program)?;
        let mut handles = Vec::with_capacity(matches.len());
        for node in matches {
            handles.push(self.expose(&mut doc, target.doc, node)?);
        }
        Ok(handles)
    }

    // ----------------------------------------------------------------
    // Plumbing

    fn lookup(&self, handle: &str) -> Result<(SharedDoc, NodeRef), Error> {
        let target = self.registry.resolve(handle).ok_or(Error::NodeNotFound)?;
        let shared = lock(&self.docs)
            .get(&target.doc)
            .cloned()
            .ok_or(Error::NodeNotFound)?;
        Ok((shared, target))
    }

    fn with_doc<T>(
        &self,
        handle: &str,
        f: impl FnOnce(&Document, NodeId) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let (shared, target) = self.lookup(handle)?;
        let doc = lock_doc(&shared);
        f(&doc, target.node)
    }

    fn expose(&self, doc: &mut Document, doc_id: DocId, node: NodeId) -> Result<String, Error> {
        doc.mark_exposed(node)?;
        Ok(self.registry.register(NodeRef { doc: doc_id, node }))
    }

    fn drop_handles(&self, doc: DocId, dropped: Vec<NodeId>) {
        for node in dropped {
            self.registry.forget(NodeRef { doc, node });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_doc(shared: &SharedDoc) -> MutexGuard<'_, Document> {
    lock(shared)
}
