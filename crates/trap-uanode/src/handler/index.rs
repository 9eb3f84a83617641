// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity to context index.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::context::NodeContext;
use crate::error::{IndexError, NodeResult};
use crate::types::NodeId;

/// Shared handle to an indexed context. The index holds the owning handle.
pub type NodeRef = Rc<RefCell<NodeContext>>;

/// Non-owning handle given to the server as the per-node opaque context.
pub type WeakNodeRef = Weak<RefCell<NodeContext>>;

/// Maps identities to their contexts, at most one context per identity.
#[derive(Debug, Default)]
pub struct NodeIndex {
    nodes: HashMap<NodeId, NodeRef>,
}

impl NodeIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a context under `node_id`.
    ///
    /// # Errors
    ///
    /// Fails if `node_id` is already present. The existing entry is kept.
    pub fn register(&mut self, node_id: NodeId, node: NodeRef) -> NodeResult<()> {
        if self.nodes.contains_key(&node_id) {
            return Err(IndexError::already_registered(node_id.to_string()).into());
        }
        self.nodes.insert(node_id, node);
        Ok(())
    }

    /// Removes and returns the context under `node_id`.
    ///
    /// # Errors
    ///
    /// Fails if `node_id` is absent.
    pub fn unregister(&mut self, node_id: &NodeId) -> NodeResult<NodeRef> {
        self.nodes
            .remove(node_id)
            .ok_or_else(|| IndexError::not_registered(node_id.to_string()).into())
    }

    /// Returns the context under `node_id`.
    pub fn lookup(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.nodes.get(node_id).cloned()
    }

    /// Returns `true` if `node_id` is present.
    #[inline]
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all identities.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    /// Returns the identity of an arbitrary remaining entry.
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.keys().next().cloned()
    }
}
