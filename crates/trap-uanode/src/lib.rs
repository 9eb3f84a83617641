// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA node modeling and dispatch for the TRAP gateway.
//!
//! This crate models the nodes a TRAP gateway exposes on its OPC UA server
//! side. Variables, objects and methods are typed contexts kept in a parent
//! and child tree. A node index owns the contexts, and read, write and call
//! events from the address-space server are routed to user callbacks.
//!
//! # Features
//!
//! - Value conversion between native types and tagged variants
//! - Node contexts with identity, names, data type and tree links
//! - Rich and simple callbacks for read, write and method calls
//! - Node index with single registration per identity
//! - Materialization into an [`AddressSpace`](server::AddressSpace) server
//! - In-memory server for tests and embedding
//!
//! # Error Handling
//!
//! ```text
//! NodeError
//! ├── Conversion    - Variant conversion and type inference failures
//! ├── Context       - Identity, tree and attribute precondition violations
//! ├── Index         - Registration collisions and missing entries
//! ├── Server        - Missing or rejecting address-space server
//! └── Configuration - Invalid settings and config files
//! ```
//!
//! # Threading
//!
//! Contexts are shared as `Rc<RefCell<_>>`, so all of this crate runs on
//! the thread that drives the server's event loop.
//!
//! # Example
//!
//! ```
//! use trap_uanode::{MemoryServer, NodeBuilder, NodeHandler, NodeId, Session, StatusCode};
//! use trap_uanode::value::{from_variant, to_variant};
//!
//! let mut handler = NodeHandler::with_server(MemoryServer::default());
//!
//! let valve = handler
//!     .register(
//!         NodeBuilder::variable()
//!             .name("Valve")
//!             .data_type::<bool>()
//!             .readable(true)
//!             .writeable(true)
//!             .build(),
//!     )
//!     .unwrap();
//! valve
//!     .borrow_mut()
//!     .as_variable_mut()
//!     .unwrap()
//!     .set_simple_read_callback(|value| {
//!         value.set_value(to_variant(true));
//!         true
//!     });
//!
//! let id = NodeId::string(1, "Valve");
//! handler.add_node_to_server(&id).unwrap();
//!
//! let session = Session::anonymous();
//! let value = handler.server().unwrap().read(&session, &id, true, None);
//! assert_eq!(value.status, StatusCode::GOOD);
//! assert!(from_variant::<bool>(&value.value).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod context;
pub mod error;
pub mod handler;
pub mod logging;
pub mod server;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use error::{
    ConfigurationError, ContextError, ConversionError, ErrorCode, ErrorSeverity, IndexError,
    NodeError, NodeErrorContext, NodeResult, ServerError,
};

pub use types::{
    AccessLevel, LocalizedText, NodeClass, NodeId, NodeIdentifier, ObjectType, QualifiedName,
    StatusCode,
};

pub use value::{DataTypeTag, DataValue, NumericRange, UaType, Variant};

// Re-export context types
pub use context::{
    MethodNode, NodeBuilder, NodeContext, NodeKind, ObjectNode, Session, VariableNode,
};

// Re-export handler and server types
pub use handler::{NodeHandler, NodeIndex, NodeRef, WeakNodeRef};
pub use server::{AddressSpace, MemoryServer, ServerConfig};
