// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address-space server collaborator.
//!
//! [`AddressSpace`] is the interface the node handler needs from the server
//! that stores nodes and routes protocol requests: node creation under a
//! parent, recursive deletion and value writes. The server calls back into
//! the dispatch entry points registered with each node, passing the opaque
//! per-node handle it was given at creation.
//!
//! [`MemoryServer`] is an in-process implementation that keeps nodes in a
//! map and simulates read, write and call requests.

mod config;
mod memory;

pub use config::{
    ConfigFormat, DiscoveryConfig, ServerConfig, ServerConfigBuilder, ServerRole,
    DEFAULT_PORT, DEFAULT_SERVER_NAME,
};
pub use memory::{CallResult, MemoryNode, MemoryServer, NodeBinding};

use crate::context::{Argument, MethodAttributes, ObjectAttributes, Session, VariableAttributes};
use crate::handler::WeakNodeRef;
use crate::types::{NodeId, QualifiedName, StatusCode};
use crate::value::{DataValue, NumericRange, Variant};

/// Read entry point signature.
pub type ReadFn = fn(
    &Session,
    &NodeId,
    &WeakNodeRef,
    bool,
    Option<&NumericRange>,
    &mut DataValue,
) -> StatusCode;

/// Write entry point signature.
pub type WriteFn =
    fn(&Session, &NodeId, &WeakNodeRef, Option<&NumericRange>, &DataValue) -> StatusCode;

/// Method invoke entry point signature.
pub type MethodFn =
    fn(&Session, &NodeId, &WeakNodeRef, &NodeId, &[Variant], &mut [Variant]) -> StatusCode;

/// Read and write entry points of a data-source-backed variable.
#[derive(Debug, Clone, Copy)]
pub struct DataSource {
    /// Called on read requests.
    pub read: ReadFn,
    /// Called on write requests.
    pub write: WriteFn,
}

/// Request to create a data-source-backed variable node.
#[derive(Debug, Clone)]
pub struct VariableNodeRequest {
    /// Requested identity.
    pub node_id: NodeId,
    /// Parent node.
    pub parent_id: NodeId,
    /// Reference type from the parent.
    pub reference_type: NodeId,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Variable type definition.
    pub type_definition: NodeId,
    /// Rendered attributes.
    pub attributes: VariableAttributes,
    /// Entry points for value access.
    pub data_source: DataSource,
    /// Opaque per-node handle passed back on every event.
    pub context: WeakNodeRef,
}

/// Request to create an object node.
#[derive(Debug, Clone)]
pub struct ObjectNodeRequest {
    /// Requested identity.
    pub node_id: NodeId,
    /// Parent node.
    pub parent_id: NodeId,
    /// Reference type from the parent.
    pub reference_type: NodeId,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Object type definition.
    pub type_definition: NodeId,
    /// Rendered attributes.
    pub attributes: ObjectAttributes,
    /// Opaque per-node handle.
    pub context: WeakNodeRef,
}

/// Request to create a method node.
#[derive(Debug, Clone)]
pub struct MethodNodeRequest {
    /// Requested identity.
    pub node_id: NodeId,
    /// Parent node.
    pub parent_id: NodeId,
    /// Reference type from the parent.
    pub reference_type: NodeId,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Rendered attributes.
    pub attributes: MethodAttributes,
    /// Declared input arguments.
    pub input_arguments: Vec<Argument>,
    /// Declared output arguments.
    pub output_arguments: Vec<Argument>,
    /// Invoke entry point.
    pub method: MethodFn,
    /// Opaque per-node handle passed back on every call.
    pub context: WeakNodeRef,
}

/// The server the node handler materializes nodes into.
///
/// All operations report their outcome as a protocol status code.
pub trait AddressSpace {
    /// Returns `true` if the server accepts requests.
    fn is_ready(&self) -> bool;

    /// Creates a data-source-backed variable node.
    fn add_variable_node(&mut self, request: VariableNodeRequest) -> StatusCode;

    /// Creates an object node.
    fn add_object_node(&mut self, request: ObjectNodeRequest) -> StatusCode;

    /// Creates a method node.
    fn add_method_node(&mut self, request: MethodNodeRequest) -> StatusCode;

    /// Deletes a node. With `cascade`, nodes created under it go too.
    fn delete_node(&mut self, node_id: &NodeId, cascade: bool) -> StatusCode;

    /// Stores a value on a variable node.
    fn write_value(&mut self, node_id: &NodeId, value: Variant) -> StatusCode;
}
