// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory address space.

use std::collections::HashMap;
use std::rc::Weak;

use tracing::{debug, trace};

use crate::context::{Argument, MethodAttributes, ObjectAttributes, Session, VariableAttributes};
use crate::handler::WeakNodeRef;
use crate::server::{
    AddressSpace, DataSource, MethodFn, MethodNodeRequest, ObjectNodeRequest, ServerConfig,
    VariableNodeRequest,
};
use crate::types::{AccessLevel, LocalizedText, NodeClass, NodeId, QualifiedName, StatusCode};
use crate::value::{DataValue, NumericRange, Variant};

// =============================================================================
// MemoryNode
// =============================================================================

/// Class-specific content of a stored node.
#[derive(Debug, Clone)]
pub enum NodeBinding {
    /// A data-source-backed variable.
    Variable {
        /// Rendered attributes.
        attributes: VariableAttributes,
        /// Read/write entry points.
        data_source: DataSource,
        /// Last value stored through [`AddressSpace::write_value`].
        value: Option<Variant>,
    },
    /// An object.
    Object {
        /// Rendered attributes.
        attributes: ObjectAttributes,
    },
    /// A method.
    Method {
        /// Rendered attributes.
        attributes: MethodAttributes,
        /// Declared inputs.
        inputs: Vec<Argument>,
        /// Declared outputs.
        outputs: Vec<Argument>,
        /// Invoke entry point.
        method: MethodFn,
    },
}

/// A node stored by [`MemoryServer`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    /// Identity.
    pub node_id: NodeId,
    /// Parent, `None` for the root folder.
    pub parent_id: Option<NodeId>,
    /// Reference type from the parent.
    pub reference_type: Option<NodeId>,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Type definition, `None` for methods.
    pub type_definition: Option<NodeId>,
    /// Class-specific content.
    pub binding: NodeBinding,
    context: WeakNodeRef,
}

impl MemoryNode {
    /// Returns the node class.
    pub fn node_class(&self) -> NodeClass {
        match self.binding {
            NodeBinding::Variable { .. } => NodeClass::Variable,
            NodeBinding::Object { .. } => NodeClass::Object,
            NodeBinding::Method { .. } => NodeClass::Method,
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &LocalizedText {
        match &self.binding {
            NodeBinding::Variable { attributes, .. } => &attributes.display_name,
            NodeBinding::Object { attributes } => &attributes.display_name,
            NodeBinding::Method { attributes, .. } => &attributes.display_name,
        }
    }

    /// Returns the opaque per-node handle.
    pub fn context(&self) -> &WeakNodeRef {
        &self.context
    }

    fn folder(node_id: NodeId, parent_id: Option<NodeId>, name: &str, locale: &str) -> Self {
        Self {
            reference_type: parent_id.as_ref().map(|_| NodeId::ORGANIZES),
            parent_id,
            browse_name: QualifiedName::new(0, name),
            type_definition: Some(NodeId::FOLDER_TYPE),
            binding: NodeBinding::Object {
                attributes: ObjectAttributes {
                    display_name: LocalizedText::new(locale, name),
                    description: LocalizedText::default(),
                },
            },
            context: Weak::new(),
            node_id,
        }
    }
}

/// Outcome of a simulated method call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    /// Call status.
    pub status: StatusCode,
    /// Output arguments, sized to the declared output count.
    pub outputs: Vec<Variant>,
}

impl CallResult {
    fn failed(status: StatusCode) -> Self {
        Self {
            status,
            outputs: Vec::new(),
        }
    }
}

// =============================================================================
// MemoryServer
// =============================================================================

/// An address space held in memory.
///
/// The standard root and Objects folders exist from the start. The server
/// is ready on construction; [`set_running`](Self::set_running) toggles it.
#[derive(Debug)]
pub struct MemoryServer {
    config: ServerConfig,
    nodes: HashMap<NodeId, MemoryNode>,
    running: bool,
}

impl Default for MemoryServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl MemoryServer {
    /// Creates a running server with the standard folders.
    pub fn new(config: ServerConfig) -> Self {
        let mut nodes = HashMap::new();
        let root = MemoryNode::folder(NodeId::ROOT_FOLDER, None, "Root", &config.locale);
        let objects = MemoryNode::folder(
            NodeId::OBJECTS_FOLDER,
            Some(NodeId::ROOT_FOLDER),
            "Objects",
            &config.locale,
        );
        nodes.insert(root.node_id.clone(), root);
        nodes.insert(objects.node_id.clone(), objects);

        debug!(name = %config.name, port = config.port, "Memory server created");
        Self {
            config,
            nodes,
            running: true,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Marks the server as running or stopped.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Returns the stored node.
    pub fn node(&self, node_id: &NodeId) -> Option<&MemoryNode> {
        self.nodes.get(node_id)
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Returns the number of nodes, standard folders included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the identities of the direct children of `node_id`, sorted.
    pub fn children_of(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.parent_id.as_ref() == Some(node_id))
            .map(|n| n.node_id.clone())
            .collect();
        children.sort();
        children
    }

    /// Returns the value stored through [`AddressSpace::write_value`].
    pub fn stored_value(&self, node_id: &NodeId) -> Option<&Variant> {
        match &self.nodes.get(node_id)?.binding {
            NodeBinding::Variable { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    fn insert(&mut self, node: MemoryNode) -> StatusCode {
        if self.nodes.contains_key(&node.node_id) {
            return StatusCode::BAD_NODE_ID_EXISTS;
        }
        if let Some(parent) = &node.parent_id {
            if !self.nodes.contains_key(parent) {
                return StatusCode::BAD_PARENT_NODE_ID_INVALID;
            }
        }
        trace!(node_id = %node.node_id, class = %node.node_class(), "Node stored");
        self.nodes.insert(node.node_id.clone(), node);
        StatusCode::GOOD
    }

    // =========================================================================
    // Simulated requests
    // =========================================================================

    /// Serves a read request through the node's data source.
    pub fn read(
        &self,
        session: &Session,
        node_id: &NodeId,
        include_source_timestamp: bool,
        range: Option<&NumericRange>,
    ) -> DataValue {
        let Some(node) = self.nodes.get(node_id) else {
            return DataValue::default().with_status(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        let NodeBinding::Variable {
            attributes,
            data_source,
            ..
        } = &node.binding
        else {
            return DataValue::default().with_status(StatusCode::BAD_ATTRIBUTE_ID_INVALID);
        };
        if !attributes.access_level.contains(AccessLevel::READ) {
            return DataValue::default().with_status(StatusCode::BAD_NOT_READABLE);
        }

        let mut value = DataValue::default();
        value.status = (data_source.read)(
            session,
            node_id,
            &node.context,
            include_source_timestamp,
            range,
            &mut value,
        );
        value.stamp_server_now();
        value
    }

    /// Serves a write request through the node's data source.
    pub fn write(
        &self,
        session: &Session,
        node_id: &NodeId,
        range: Option<&NumericRange>,
        value: &DataValue,
    ) -> StatusCode {
        let Some(node) = self.nodes.get(node_id) else {
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        };
        let NodeBinding::Variable {
            attributes,
            data_source,
            ..
        } = &node.binding
        else {
            return StatusCode::BAD_ATTRIBUTE_ID_INVALID;
        };
        if !attributes.access_level.contains(AccessLevel::WRITE) {
            return StatusCode::BAD_NOT_WRITABLE;
        }

        (data_source.write)(session, node_id, &node.context, range, value)
    }

    /// Serves a method call on `object_id`.
    pub fn call(
        &self,
        session: &Session,
        object_id: &NodeId,
        method_id: &NodeId,
        inputs: &[Variant],
    ) -> CallResult {
        if !self.nodes.contains_key(object_id) {
            return CallResult::failed(StatusCode::BAD_NODE_ID_UNKNOWN);
        }
        let Some(node) = self.nodes.get(method_id) else {
            return CallResult::failed(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        let NodeBinding::Method {
            attributes,
            outputs,
            method,
            ..
        } = &node.binding
        else {
            return CallResult::failed(StatusCode::BAD_METHOD_INVALID);
        };
        if !attributes.executable || !attributes.user_executable {
            return CallResult::failed(StatusCode::BAD_NOT_EXECUTABLE);
        }

        let mut results = vec![Variant::Empty; outputs.len()];
        let status = method(session, method_id, &node.context, object_id, inputs, &mut results);
        CallResult {
            status,
            outputs: results,
        }
    }
}

impl AddressSpace for MemoryServer {
    fn is_ready(&self) -> bool {
        self.running
    }

    fn add_variable_node(&mut self, request: VariableNodeRequest) -> StatusCode {
        self.insert(MemoryNode {
            node_id: request.node_id,
            parent_id: Some(request.parent_id),
            reference_type: Some(request.reference_type),
            browse_name: request.browse_name,
            type_definition: Some(request.type_definition),
            binding: NodeBinding::Variable {
                attributes: request.attributes,
                data_source: request.data_source,
                value: None,
            },
            context: request.context,
        })
    }

    fn add_object_node(&mut self, request: ObjectNodeRequest) -> StatusCode {
        self.insert(MemoryNode {
            node_id: request.node_id,
            parent_id: Some(request.parent_id),
            reference_type: Some(request.reference_type),
            browse_name: request.browse_name,
            type_definition: Some(request.type_definition),
            binding: NodeBinding::Object {
                attributes: request.attributes,
            },
            context: request.context,
        })
    }

    fn add_method_node(&mut self, request: MethodNodeRequest) -> StatusCode {
        self.insert(MemoryNode {
            node_id: request.node_id,
            parent_id: Some(request.parent_id),
            reference_type: Some(request.reference_type),
            browse_name: request.browse_name,
            type_definition: None,
            binding: NodeBinding::Method {
                attributes: request.attributes,
                inputs: request.input_arguments,
                outputs: request.output_arguments,
                method: request.method,
            },
            context: request.context,
        })
    }

    fn delete_node(&mut self, node_id: &NodeId, cascade: bool) -> StatusCode {
        if self.nodes.remove(node_id).is_none() {
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        }

        let mut removed = 1usize;
        if cascade {
            let mut pending = vec![node_id.clone()];
            while let Some(parent) = pending.pop() {
                for child in self.children_of(&parent) {
                    self.nodes.remove(&child);
                    removed += 1;
                    pending.push(child);
                }
            }
        }
        debug!(node_id = %node_id, removed, "Nodes deleted");
        StatusCode::GOOD
    }

    fn write_value(&mut self, node_id: &NodeId, value: Variant) -> StatusCode {
        match self.nodes.get_mut(node_id).map(|n| &mut n.binding) {
            Some(NodeBinding::Variable { value: stored, .. }) => {
                *stored = Some(value);
                StatusCode::GOOD
            }
            Some(_) => StatusCode::BAD_ATTRIBUTE_ID_INVALID,
            None => StatusCode::BAD_NODE_ID_UNKNOWN,
        }
    }
}
