// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Variable node specialization.

use std::fmt;

use crate::context::attributes::{AttributeRenderer, VariableAttributes};
use crate::context::callback::{
    ReadCallback, ReadRequest, SimpleReadCallback, SimpleWriteCallback, WriteCallback,
    WriteRequest,
};
use crate::types::{AccessLevel, LocalizedText, NodeId};
use crate::value::DataValue;

/// A variable served through read/write callbacks.
///
/// Readable and writeable flags drive the access level mask: enabling a
/// flag sets its bit and disabling it clears the bit again.
#[derive(Default)]
pub struct VariableNode {
    attributes: VariableAttributes,
    readable: bool,
    writeable: bool,
    read: Option<ReadCallback>,
    read_simple: Option<SimpleReadCallback>,
    write: Option<WriteCallback>,
    write_simple: Option<SimpleWriteCallback>,
}

impl VariableNode {
    /// Creates a variable that is neither readable nor writeable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered attributes.
    #[inline]
    pub fn attributes(&self) -> &VariableAttributes {
        &self.attributes
    }

    /// Returns `true` if the variable is readable.
    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Returns `true` if the variable is writeable.
    #[inline]
    pub fn is_writeable(&self) -> bool {
        self.writeable
    }

    /// Sets or clears read access.
    pub fn set_readable(&mut self, readable: bool) {
        self.readable = readable;
        self.attributes.access_level.set(AccessLevel::READ, readable);
        self.attributes.user_access_level.set(AccessLevel::READ, readable);
    }

    /// Sets or clears write access.
    pub fn set_writeable(&mut self, writeable: bool) {
        self.writeable = writeable;
        self.attributes.access_level.set(AccessLevel::WRITE, writeable);
        self.attributes.user_access_level.set(AccessLevel::WRITE, writeable);
    }

    /// Returns the access level mask.
    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.attributes.access_level
    }

    /// Sets the value rank attribute.
    pub fn set_value_rank(&mut self, value_rank: i32) {
        self.attributes.value_rank = value_rank;
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Sets the rich read callback.
    pub fn set_read_callback<F>(&mut self, callback: F)
    where
        F: Fn(&ReadRequest<'_>, &mut DataValue) -> bool + 'static,
    {
        self.read = Some(Box::new(callback));
    }

    /// Sets the simple read callback.
    pub fn set_simple_read_callback<F>(&mut self, callback: F)
    where
        F: Fn(&mut DataValue) -> bool + 'static,
    {
        self.read_simple = Some(Box::new(callback));
    }

    /// Sets the rich write callback.
    pub fn set_write_callback<F>(&mut self, callback: F)
    where
        F: Fn(&WriteRequest<'_>, &DataValue) -> bool + 'static,
    {
        self.write = Some(Box::new(callback));
    }

    /// Sets the simple write callback.
    pub fn set_simple_write_callback<F>(&mut self, callback: F)
    where
        F: Fn(&DataValue) -> bool + 'static,
    {
        self.write_simple = Some(Box::new(callback));
    }

    /// Removes every callback.
    pub fn clear_callbacks(&mut self) {
        self.read = None;
        self.read_simple = None;
        self.write = None;
        self.write_simple = None;
    }

    /// Returns `true` if a read callback of either shape is set.
    pub fn has_read_handler(&self) -> bool {
        self.read.is_some() || self.read_simple.is_some()
    }

    /// Returns `true` if a write callback of either shape is set.
    pub fn has_write_handler(&self) -> bool {
        self.write.is_some() || self.write_simple.is_some()
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Runs the read callback with rich-over-simple precedence.
    ///
    /// Returns `None` when no callback is set. The simple path stamps the
    /// source timestamp when the request asks for one.
    pub fn handle_read(&self, request: &ReadRequest<'_>, value: &mut DataValue) -> Option<bool> {
        if let Some(read) = &self.read {
            return Some(read(request, value));
        }

        let read = self.read_simple.as_ref()?;
        let ok = read(value);
        if request.include_source_timestamp {
            value.stamp_source_now();
        }
        Some(ok)
    }

    /// Runs the write callback with rich-over-simple precedence.
    ///
    /// Returns `None` when no callback is set.
    pub fn handle_write(&self, request: &WriteRequest<'_>, value: &DataValue) -> Option<bool> {
        if let Some(write) = &self.write {
            return Some(write(request, value));
        }

        self.write_simple.as_ref().map(|write| write(value))
    }
}

impl AttributeRenderer for VariableNode {
    fn render_display_name(&mut self, text: LocalizedText) {
        self.attributes.render_display_name(text);
    }

    fn render_description(&mut self, text: LocalizedText) {
        self.attributes.render_description(text);
    }

    fn render_data_type(&mut self, data_type: Option<NodeId>) {
        self.attributes.render_data_type(data_type);
    }
}

impl fmt::Debug for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableNode")
            .field("attributes", &self.attributes)
            .field("readable", &self.readable)
            .field("writeable", &self.writeable)
            .field("rich_read", &self.read.is_some())
            .field("simple_read", &self.read_simple.is_some())
            .field("rich_write", &self.write.is_some())
            .field("simple_write", &self.write_simple.is_some())
            .finish()
    }
}
