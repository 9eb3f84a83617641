// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Dispatch entry points called back by the address-space server.
//!
//! The server hands each call the opaque per-node handle it received when
//! the node was created. The handle is upgraded without an index lookup.
//! Every miss (dropped context, busy context, wrong kind, no callback, or a
//! callback returning `false`) maps to [`StatusCode::BAD_METHOD_INVALID`].

use tracing::{trace, warn};

use crate::context::{
    MethodCall, MethodNode, NodeContext, ReadRequest, Session, VariableNode, WriteRequest,
};
use crate::handler::WeakNodeRef;
use crate::types::{NodeId, StatusCode};
use crate::value::{DataValue, NumericRange, Variant};

fn dispatch<T>(
    handle: &WeakNodeRef,
    node_id: &NodeId,
    event: &'static str,
    project: impl FnOnce(&NodeContext) -> Option<&T>,
    run: impl FnOnce(&T) -> Option<bool>,
) -> StatusCode {
    let Some(node) = handle.upgrade() else {
        warn!(node_id = %node_id, event, "Node context is gone");
        return StatusCode::BAD_METHOD_INVALID;
    };
    let Ok(ctx) = node.try_borrow() else {
        warn!(node_id = %node_id, event, "Node context is busy");
        return StatusCode::BAD_METHOD_INVALID;
    };
    let Some(kind) = project(&*ctx) else {
        warn!(node_id = %node_id, event, kind = ctx.kind().name(), "Wrong node kind");
        return StatusCode::BAD_METHOD_INVALID;
    };

    match run(kind) {
        Some(ok) => {
            trace!(node_id = %node_id, event, ok, "Dispatched");
            StatusCode::from_outcome(ok)
        }
        None => {
            warn!(node_id = %node_id, event, "No callback registered");
            StatusCode::BAD_METHOD_INVALID
        }
    }
}

/// Read entry point.
pub fn on_read(
    session: &Session,
    node_id: &NodeId,
    handle: &WeakNodeRef,
    include_source_timestamp: bool,
    range: Option<&NumericRange>,
    value: &mut DataValue,
) -> StatusCode {
    let request = ReadRequest {
        session,
        node_id,
        include_source_timestamp,
        range,
    };
    dispatch(handle, node_id, "read", NodeContext::as_variable, |var: &VariableNode| {
        var.handle_read(&request, value)
    })
}

/// Write entry point.
pub fn on_write(
    session: &Session,
    node_id: &NodeId,
    handle: &WeakNodeRef,
    range: Option<&NumericRange>,
    value: &DataValue,
) -> StatusCode {
    let request = WriteRequest {
        session,
        node_id,
        range,
    };
    dispatch(handle, node_id, "write", NodeContext::as_variable, |var: &VariableNode| {
        var.handle_write(&request, value)
    })
}

/// Method invoke entry point.
pub fn on_method_call(
    session: &Session,
    method_id: &NodeId,
    handle: &WeakNodeRef,
    object_id: &NodeId,
    inputs: &[Variant],
    outputs: &mut [Variant],
) -> StatusCode {
    let call = MethodCall {
        session,
        method_id,
        object_id,
    };
    dispatch(handle, method_id, "call", NodeContext::as_method, |method: &MethodNode| {
        method.handle_call(&call, inputs, outputs)
    })
}
