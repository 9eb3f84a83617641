// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node index, server materialization and event dispatch.
//!
//! [`NodeHandler`] owns every registered context through its [`NodeIndex`]
//! and is the single point where contexts are turned into server nodes.
//! Registration is explicit: build a context, then hand it to
//! [`NodeHandler::register`].
//!
//! # Examples
//!
//! ```
//! use trap_uanode::context::NodeBuilder;
//! use trap_uanode::handler::NodeHandler;
//! use trap_uanode::server::MemoryServer;
//! use trap_uanode::value::to_variant;
//!
//! let mut handler = NodeHandler::with_server(MemoryServer::default());
//!
//! let node = handler
//!     .register(NodeBuilder::variable().name("Speed").data_type::<f64>().readable(true).build())
//!     .unwrap();
//! node.borrow_mut()
//!     .as_variable_mut()
//!     .unwrap()
//!     .set_simple_read_callback(|value| {
//!         value.set_value(to_variant(12.5f64));
//!         true
//!     });
//!
//! let id = node.borrow().node_id().cloned().unwrap();
//! handler.add_node_to_server(&id).unwrap();
//! assert!(handler.server().unwrap().contains(&id));
//! ```

mod dispatch;
mod index;

pub use dispatch::{on_method_call, on_read, on_write};
pub use index::{NodeIndex, NodeRef, WeakNodeRef};

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::context::{NodeContext, NodeKind};
use crate::error::{ContextError, IndexError, NodeError, NodeResult, ServerError};
use crate::server::{
    AddressSpace, DataSource, MethodNodeRequest, ObjectNodeRequest, VariableNodeRequest,
};
use crate::types::{NodeClass, NodeId, StatusCode, DEFAULT_NAMESPACE};
use crate::value::Variant;

/// First numeric identity handed out to identity-less contexts.
const FIRST_GENERATED_ID: u32 = 50_000;

/// Registry of node contexts bound to an address-space server.
#[derive(Debug)]
pub struct NodeHandler<S: AddressSpace> {
    index: NodeIndex,
    server: Option<S>,
    namespace: u16,
    next_numeric_id: u32,
}

impl<S: AddressSpace> Default for NodeHandler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AddressSpace> NodeHandler<S> {
    /// Creates a handler without a server.
    pub fn new() -> Self {
        Self {
            index: NodeIndex::new(),
            server: None,
            namespace: DEFAULT_NAMESPACE,
            next_numeric_id: FIRST_GENERATED_ID,
        }
    }

    /// Creates a handler bound to `server`.
    pub fn with_server(server: S) -> Self {
        let mut handler = Self::new();
        handler.server = Some(server);
        handler
    }

    /// Sets the namespace of generated identities.
    pub fn with_namespace(mut self, namespace: u16) -> Self {
        self.namespace = namespace;
        self
    }

    /// Returns the namespace of generated identities.
    #[inline]
    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    // =========================================================================
    // Server binding
    // =========================================================================

    /// Binds the server.
    ///
    /// # Errors
    ///
    /// Fails if a server is already bound.
    pub fn set_server(&mut self, server: S) -> NodeResult<()> {
        if self.server.is_some() {
            return Err(ServerError::AlreadyBound.into());
        }
        self.server = Some(server);
        Ok(())
    }

    /// Returns the bound server.
    #[inline]
    pub fn server(&self) -> Option<&S> {
        self.server.as_ref()
    }

    /// Returns the bound server mutably.
    #[inline]
    pub fn server_mut(&mut self) -> Option<&mut S> {
        self.server.as_mut()
    }

    /// Returns `true` if a server is bound and ready.
    pub fn check_server(&self) -> bool {
        self.server.as_ref().is_some_and(|server| server.is_ready())
    }

    fn ready_server(&mut self) -> NodeResult<&mut S> {
        let server = self.server.as_mut().ok_or_else(NodeError::server_not_bound)?;
        if !server.is_ready() {
            return Err(ServerError::NotReady.into());
        }
        Ok(server)
    }

    // =========================================================================
    // Index
    // =========================================================================

    /// Returns the index.
    #[inline]
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    /// Registers a Bound context and returns its shared handle.
    ///
    /// # Errors
    ///
    /// Fails if the context is Unbound or its identity is taken. The
    /// context is dropped in both cases; the index is unchanged.
    pub fn register(&mut self, context: NodeContext) -> NodeResult<NodeRef> {
        let node_id = context
            .node_id()
            .cloned()
            .ok_or_else(|| IndexError::Unbound {
                name: context.name().to_string(),
            })?;

        let node = Rc::new(RefCell::new(context));
        self.index.register(node_id.clone(), Rc::clone(&node))?;
        debug!(node_id = %node_id, "Node registered");
        Ok(node)
    }

    /// Registers `context`, or a default object context if `None`.
    ///
    /// An Unbound context is first bound to the next generated numeric
    /// identity in the handler's namespace.
    pub fn create_and_register(&mut self, context: Option<NodeContext>) -> NodeResult<NodeRef> {
        let mut context = context.unwrap_or_else(NodeContext::object);
        if !context.is_bound() {
            let node_id = self.next_node_id();
            context.set_node(node_id)?;
        }
        self.register(context)
    }

    fn next_node_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::numeric(self.namespace, self.next_numeric_id);
            self.next_numeric_id = self.next_numeric_id.wrapping_add(1);
            if !self.index.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Removes a context from the index without touching the server.
    pub fn unregister(&mut self, node_id: &NodeId) -> NodeResult<NodeRef> {
        let node = self.index.unregister(node_id)?;
        debug!(node_id = %node_id, "Node unregistered");
        Ok(node)
    }

    /// Returns the context registered under `node_id`.
    pub fn lookup(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.index.lookup(node_id)
    }

    /// Returns `true` if `node_id` is registered.
    #[inline]
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.index.contains(node_id)
    }

    /// Returns the number of registered contexts.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no context is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn require(&self, node_id: &NodeId) -> NodeResult<NodeRef> {
        self.index
            .lookup(node_id)
            .ok_or_else(|| NodeError::not_registered(node_id.to_string()))
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Links two registered contexts as parent and child.
    pub fn attach(&self, parent_id: &NodeId, child_id: &NodeId) -> NodeResult<()> {
        if parent_id == child_id {
            return Err(ContextError::SelfReference {
                node_id: parent_id.to_string(),
            }
            .into());
        }
        let parent = self.require(parent_id)?;
        let child = self.require(child_id)?;
        let mut parent = borrow_mut(&parent, parent_id)?;
        let mut child = borrow_mut(&child, child_id)?;
        parent.add_child(&mut child)
    }

    /// Unlinks two registered contexts.
    pub fn detach(&self, parent_id: &NodeId, child_id: &NodeId) -> NodeResult<()> {
        if parent_id == child_id {
            return Err(ContextError::SelfReference {
                node_id: parent_id.to_string(),
            }
            .into());
        }
        let parent = self.require(parent_id)?;
        let child = self.require(child_id)?;
        let mut parent = borrow_mut(&parent, parent_id)?;
        let mut child = borrow_mut(&child, child_id)?;
        parent.remove_child(&mut child)
    }

    /// Resolves the parent of a registered context through the index.
    ///
    /// Returns `None` if the context has no parent or the parent is not
    /// registered.
    pub fn resolve_parent(&self, node_id: &NodeId) -> NodeResult<Option<NodeRef>> {
        let node = self.require(node_id)?;
        let ctx = borrow(&node, node_id)?;
        Ok(ctx.parent().and_then(|parent| self.index.lookup(parent)))
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    /// Creates the server node of a registered context, by kind.
    pub fn add_node_to_server(&mut self, node_id: &NodeId) -> NodeResult<()> {
        let node = self.require(node_id)?;
        let class = borrow(&node, node_id)?.node_class();
        match class {
            NodeClass::Variable => self.add_variable_node(node_id),
            NodeClass::Object => self.add_object_node(node_id),
            NodeClass::Method => self.add_method_node(node_id),
        }
    }

    /// Creates a data-source-backed variable node under the resolved parent.
    ///
    /// # Errors
    ///
    /// Fails without a ready server, for an unknown or non-variable
    /// context, for a variable that is neither readable nor writeable, and
    /// when the server rejects the node.
    pub fn add_variable_node(&mut self, node_id: &NodeId) -> NodeResult<()> {
        self.ready_server()?;
        let node = self.require(node_id)?;
        let request = {
            let ctx = borrow(&node, node_id)?;
            let NodeKind::Variable(var) = ctx.kind() else {
                let actual = ctx.kind().name();
                return Err(ContextError::wrong_kind(node_id.to_string(), "variable", actual).into());
            };
            if !var.is_readable() && !var.is_writeable() {
                return Err(ServerError::nothing_to_serve(node_id.to_string()).into());
            }
            VariableNodeRequest {
                node_id: node_id.clone(),
                parent_id: ctx.resolved_parent(),
                reference_type: NodeId::ORGANIZES,
                browse_name: ctx.qualified_name().clone(),
                type_definition: NodeId::BASE_DATA_VARIABLE_TYPE,
                attributes: var.attributes().clone(),
                data_source: DataSource {
                    read: on_read,
                    write: on_write,
                },
                context: Rc::downgrade(&node),
            }
        };

        self.submit("add_variable_node", node_id, |server| {
            server.add_variable_node(request)
        })
    }

    /// Creates an object node under the resolved parent.
    pub fn add_object_node(&mut self, node_id: &NodeId) -> NodeResult<()> {
        self.ready_server()?;
        let node = self.require(node_id)?;
        let request = {
            let ctx = borrow(&node, node_id)?;
            let NodeKind::Object(obj) = ctx.kind() else {
                let actual = ctx.kind().name();
                return Err(ContextError::wrong_kind(node_id.to_string(), "object", actual).into());
            };
            ObjectNodeRequest {
                node_id: node_id.clone(),
                parent_id: ctx.resolved_parent(),
                reference_type: NodeId::ORGANIZES,
                browse_name: ctx.qualified_name().clone(),
                type_definition: obj.object_type().node_id(),
                attributes: obj.attributes().clone(),
                context: Rc::downgrade(&node),
            }
        };

        self.submit("add_object_node", node_id, |server| {
            server.add_object_node(request)
        })
    }

    /// Creates a method node with its argument lists under the resolved parent.
    pub fn add_method_node(&mut self, node_id: &NodeId) -> NodeResult<()> {
        self.ready_server()?;
        let node = self.require(node_id)?;
        let request = {
            let ctx = borrow(&node, node_id)?;
            let NodeKind::Method(method) = ctx.kind() else {
                let actual = ctx.kind().name();
                return Err(ContextError::wrong_kind(node_id.to_string(), "method", actual).into());
            };
            MethodNodeRequest {
                node_id: node_id.clone(),
                parent_id: ctx.resolved_parent(),
                reference_type: NodeId::HAS_ORDERED_COMPONENT,
                browse_name: ctx.qualified_name().clone(),
                attributes: method.attributes().clone(),
                input_arguments: method.input_arguments().to_vec(),
                output_arguments: method.output_arguments().to_vec(),
                method: on_method_call,
                context: Rc::downgrade(&node),
            }
        };

        self.submit("add_method_node", node_id, |server| {
            server.add_method_node(request)
        })
    }

    fn submit(
        &mut self,
        operation: &'static str,
        node_id: &NodeId,
        send: impl FnOnce(&mut S) -> StatusCode,
    ) -> NodeResult<()> {
        let status = send(self.ready_server()?);
        if status.is_bad() {
            return Err(ServerError::rejected(operation, node_id.to_string(), status).into());
        }
        debug!(node_id = %node_id, operation, "Node materialized");
        Ok(())
    }

    /// Forwards a value to the server node of a registered context.
    pub fn write_value(&mut self, node_id: &NodeId, value: Variant) -> NodeResult<()> {
        if !self.index.contains(node_id) {
            return Err(NodeError::not_registered(node_id.to_string()));
        }
        let status = self.ready_server()?.write_value(node_id, value);
        if status.is_bad() {
            return Err(ServerError::rejected("write_value", node_id.to_string(), status).into());
        }
        Ok(())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Deletes a registered context and its server node.
    ///
    /// The context leaves the index and its parent's child set, the server
    /// deletes the node recursively, and the context is dropped. Children
    /// of the deleted context keep their parent link.
    ///
    /// # Errors
    ///
    /// Fails if `node_id` is not registered, or if the context or its
    /// indexed parent is borrowed. Nothing changes on failure.
    pub fn delete_node(&mut self, node_id: &NodeId) -> NodeResult<()> {
        let node = self.require(node_id)?;
        {
            let ctx = borrow_mut(&node, node_id)?;
            let parent = ctx
                .parent()
                .and_then(|id| self.index.lookup(id).map(|parent| (id.clone(), parent)));
            let mut parent_ctx = match &parent {
                Some((parent_id, parent)) => Some(borrow_mut(parent, parent_id)?),
                None => None,
            };

            self.index.unregister(node_id)?;
            if let Some(parent_ctx) = parent_ctx.as_mut() {
                parent_ctx.forget_child(node_id);
            }
        }

        if self.check_server() {
            if let Some(server) = self.server.as_mut() {
                let status = server.delete_node(node_id, true);
                if status.is_bad() {
                    warn!(node_id = %node_id, %status, "Server node not deleted");
                }
            }
        }

        drop(node);
        debug!(node_id = %node_id, "Node deleted");
        Ok(())
    }

    /// Deletes every registered context. Returns how many were deleted.
    ///
    /// Stops at the first context that cannot be deleted.
    pub fn delete_all_nodes(&mut self) -> usize {
        let mut deleted = 0;
        while let Some(node_id) = self.index.first() {
            if let Err(e) = self.delete_node(&node_id) {
                warn!(node_id = %node_id, error = %e, "Teardown stopped");
                break;
            }
            deleted += 1;
        }
        if deleted > 0 {
            info!(deleted, "All nodes deleted");
        }
        deleted
    }
}

impl<S: AddressSpace> Drop for NodeHandler<S> {
    fn drop(&mut self) {
        self.delete_all_nodes();
    }
}

fn borrow<'a>(node: &'a NodeRef, node_id: &NodeId) -> NodeResult<std::cell::Ref<'a, NodeContext>> {
    node.try_borrow().map_err(|_| {
        ContextError::Busy {
            node_id: node_id.to_string(),
        }
        .into()
    })
}

fn borrow_mut<'a>(
    node: &'a NodeRef,
    node_id: &NodeId,
) -> NodeResult<std::cell::RefMut<'a, NodeContext>> {
    node.try_borrow_mut().map_err(|_| {
        ContextError::Busy {
            node_id: node_id.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MethodNode, NodeBuilder, ObjectNode};
    use crate::error::NodeError;
    use crate::server::MemoryServer;

    fn handler() -> NodeHandler<MemoryServer> {
        NodeHandler::with_server(MemoryServer::default())
    }

    #[test]
    fn test_register_requires_identity() {
        let mut handler = handler();
        let err = handler.register(NodeContext::variable()).unwrap_err();
        assert!(matches!(err, NodeError::Index(IndexError::Unbound { .. })));
        assert!(handler.is_empty());
    }

    #[test]
    fn test_create_and_register_generates_identity() {
        let mut handler = handler().with_namespace(4);
        let node = handler.create_and_register(None).unwrap();
        let id = node.borrow().node_id().cloned().unwrap();
        assert_eq!(id, NodeId::numeric(4, FIRST_GENERATED_ID));
        assert!(node.borrow().as_object().is_some());

        let second = handler.create_and_register(None).unwrap();
        assert_eq!(
            second.borrow().node_id(),
            Some(&NodeId::numeric(4, FIRST_GENERATED_ID + 1))
        );
    }

    #[test]
    fn test_create_and_register_collision_drops_new_context() {
        let mut handler = handler();
        let id = NodeId::string(1, "Dup");
        let first = NodeContext::with_node_id(id.clone(), ObjectNode::new());
        let first = handler.create_and_register(Some(first)).unwrap();

        let second = NodeContext::with_node_id(id.clone(), MethodNode::new());
        let err = handler.create_and_register(Some(second)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_NODE_ID_EXISTS);
        assert!(Rc::ptr_eq(&handler.lookup(&id).unwrap(), &first));
    }

    #[test]
    fn test_server_binds_once() {
        let mut handler: NodeHandler<MemoryServer> = NodeHandler::new();
        assert!(!handler.check_server());
        handler.set_server(MemoryServer::default()).unwrap();
        assert!(handler.check_server());
        assert!(handler.set_server(MemoryServer::default()).is_err());

        handler.server_mut().unwrap().set_running(false);
        assert!(!handler.check_server());
    }

    #[test]
    fn test_attach_detach_through_index() {
        let mut handler = handler();
        handler.register(NodeBuilder::object().name("Plant").build()).unwrap();
        handler.register(NodeBuilder::object().name("Pump").build()).unwrap();
        let plant = NodeId::string(1, "Plant");
        let pump = NodeId::string(1, "Pump");

        handler.attach(&plant, &pump).unwrap();
        let parent = handler.resolve_parent(&pump).unwrap().unwrap();
        assert_eq!(parent.borrow().node_id(), Some(&plant));
        assert!(handler.attach(&plant, &pump).is_err());
        assert!(handler.attach(&plant, &plant).is_err());

        handler.detach(&plant, &pump).unwrap();
        assert!(handler.resolve_parent(&pump).unwrap().is_none());
        assert!(handler.detach(&plant, &pump).is_err());
    }

    #[test]
    fn test_variable_without_access_is_not_served() {
        let mut handler = handler();
        handler.register(NodeBuilder::variable().name("Idle").build()).unwrap();
        let id = NodeId::string(1, "Idle");

        let err = handler.add_variable_node(&id).unwrap_err();
        assert!(matches!(err, NodeError::Server(ServerError::NothingToServe { .. })));
        assert!(!handler.server().unwrap().contains(&id));
    }

    #[test]
    fn test_materialization_requires_ready_server() {
        let mut handler: NodeHandler<MemoryServer> = NodeHandler::new();
        handler.register(NodeBuilder::object().name("Plant").build()).unwrap();
        let id = NodeId::string(1, "Plant");

        let err = handler.add_object_node(&id).unwrap_err();
        assert!(matches!(err, NodeError::Server(ServerError::NotBound)));

        handler.set_server(MemoryServer::default()).unwrap();
        handler.server_mut().unwrap().set_running(false);
        let err = handler.add_node_to_server(&id).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mut handler = handler();
        handler.register(NodeBuilder::object().name("Plant").build()).unwrap();
        let err = handler.add_method_node(&NodeId::string(1, "Plant")).unwrap_err();
        assert!(matches!(err, NodeError::Context(ContextError::WrongNodeKind { .. })));
    }

    #[test]
    fn test_delete_unlinks_parent() {
        let mut handler = handler();
        handler.register(NodeBuilder::object().name("Plant").build()).unwrap();
        handler.register(NodeBuilder::object().name("Pump").build()).unwrap();
        let plant = NodeId::string(1, "Plant");
        let pump = NodeId::string(1, "Pump");
        handler.attach(&plant, &pump).unwrap();

        handler.delete_node(&pump).unwrap();
        assert!(handler.lookup(&pump).is_none());
        assert!(!handler.lookup(&plant).unwrap().borrow().is_child(&pump));
        assert!(handler.delete_node(&pump).is_err());
    }

    #[test]
    fn test_write_value_requires_registration() {
        let mut handler = handler();
        let err = handler
            .write_value(&NodeId::string(1, "Nope"), Variant::Empty)
            .unwrap_err();
        assert!(matches!(err, NodeError::Index(IndexError::NotRegistered { .. })));
    }
}
