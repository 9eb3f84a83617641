// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Callback shapes for read, write and method events.
//!
//! Each event kind has a *rich* callback that receives the full event
//! metadata and a *simple* callback that only sees the value or the
//! arguments. When both are set the rich callback wins.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::types::NodeId;
use crate::value::{DataValue, NumericRange, Variant};

// =============================================================================
// Session
// =============================================================================

/// The session an event originates from.
#[derive(Clone)]
pub struct Session {
    id: NodeId,
    context: Option<Rc<dyn Any>>,
}

impl Session {
    /// Creates a session with the given id and no context.
    pub fn new(id: NodeId) -> Self {
        Self { id, context: None }
    }

    /// Creates the anonymous session (null id).
    pub fn anonymous() -> Self {
        Self::new(NodeId::null())
    }

    /// Attaches an application-defined session context.
    pub fn with_context<T: Any>(mut self, context: T) -> Self {
        self.context = Some(Rc::new(context));
        self
    }

    /// Returns the session id.
    #[inline]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Returns the session context if it has type `T`.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

// =============================================================================
// Event metadata
// =============================================================================

/// Metadata of a read event.
#[derive(Debug, Clone, Copy)]
pub struct ReadRequest<'a> {
    /// Originating session.
    pub session: &'a Session,
    /// The node being read.
    pub node_id: &'a NodeId,
    /// Whether the client asked for a source timestamp.
    pub include_source_timestamp: bool,
    /// Requested index range.
    pub range: Option<&'a NumericRange>,
}

/// Metadata of a write event.
#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    /// Originating session.
    pub session: &'a Session,
    /// The node being written.
    pub node_id: &'a NodeId,
    /// Requested index range.
    pub range: Option<&'a NumericRange>,
}

/// Metadata of a method invocation.
#[derive(Debug, Clone, Copy)]
pub struct MethodCall<'a> {
    /// Originating session.
    pub session: &'a Session,
    /// The method node.
    pub method_id: &'a NodeId,
    /// The object the method is invoked on.
    pub object_id: &'a NodeId,
}

// =============================================================================
// Callback types
// =============================================================================

/// Rich read callback. Fills `value`; returns `false` on failure.
pub type ReadCallback = Box<dyn Fn(&ReadRequest<'_>, &mut DataValue) -> bool>;

/// Simple read callback. Fills `value`; returns `false` on failure.
pub type SimpleReadCallback = Box<dyn Fn(&mut DataValue) -> bool>;

/// Rich write callback. Consumes `value`; returns `false` on failure.
pub type WriteCallback = Box<dyn Fn(&WriteRequest<'_>, &DataValue) -> bool>;

/// Simple write callback. Consumes `value`; returns `false` on failure.
pub type SimpleWriteCallback = Box<dyn Fn(&DataValue) -> bool>;

/// Rich method callback over input and output arguments.
pub type MethodCallback = Box<dyn Fn(&MethodCall<'_>, &[Variant], &mut [Variant]) -> bool>;

/// Simple method callback over input and output arguments.
pub type SimpleMethodCallback = Box<dyn Fn(&[Variant], &mut [Variant]) -> bool>;
