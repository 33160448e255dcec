//! The handle registry: opaque string handles for live tree nodes.
//!
//! Handles are derived deterministically from node identity (document id,
//! arena index, generation), so registering the same node twice yields the
//! same handle and no duplicate entries. One mutex guards the map; every
//! operation is a short insert/remove/lookup.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::node::NodeId;

/// Identifier of a document within an engine.
pub type DocId = u64;

/// A node's full identity: which document, which arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub doc: DocId,
    pub node: NodeId,
}

/// Process-wide mapping from handle strings to node references.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, NodeRef>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle string a node reference maps to. Pure derivation; does
    /// not touch the registry.
    pub fn handle_for(target: NodeRef) -> String {
        format!(
            "node{:x}-{:x}-{:x}",
            target.doc, target.node.index, target.node.generation
        )
    }

    /// Register a node, returning its handle. Idempotent: an existing entry
    /// is reused, never duplicated.
    pub fn register(&self, target: NodeRef) -> String {
        let handle = Self::handle_for(target);
        self.lock().entry(handle.clone()).or_insert(target);
        handle
    }

    /// Remove a handle. Unknown handles are a safe no-op; the return value
    /// reports whether an entry existed.
    pub fn unregister(&self, handle: &str) -> bool {
        self.lock().remove(handle).is_some()
    }

    /// Resolve a handle to the node reference it names.
    pub fn resolve(&self, handle: &str) -> Option<NodeRef> {
        self.lock().get(handle).copied()
    }

    /// Hook invoked for every exposed node removed from a tree, keeping the
    /// registry free of dangling entries.
    pub(crate) fn forget(&self, target: NodeRef) {
        self.lock().remove(&Self::handle_for(target));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, NodeRef>> {
        // A poisoned map is still structurally sound; keep serving.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
