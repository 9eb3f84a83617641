// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method node specialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::attributes::{
    AttributeRenderer, MethodAttributes, VALUE_RANK_ONE_DIMENSION, VALUE_RANK_SCALAR,
};
use crate::context::callback::{MethodCall, MethodCallback, SimpleMethodCallback};
use crate::error::{ContextError, NodeResult};
use crate::types::{LocalizedText, NodeId};
use crate::value::{DataTypeTag, UaType, Variant};

// =============================================================================
// Argument
// =============================================================================

/// Direction of a method argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentDirection {
    /// Input arguments.
    Input,
    /// Output arguments.
    Output,
}

impl ArgumentDirection {
    /// Returns the direction name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

/// A declared method argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Argument description.
    pub description: LocalizedText,
    /// Declared type, `None` until bound.
    pub data_type: Option<DataTypeTag>,
    /// Value rank.
    pub value_rank: i32,
}

impl Argument {
    fn initial(name: &str, description: &LocalizedText) -> Self {
        Self {
            name: name.to_string(),
            description: description.clone(),
            data_type: None,
            value_rank: VALUE_RANK_SCALAR,
        }
    }

    /// Returns the declared type as a data type node id.
    pub fn data_type_id(&self) -> Option<NodeId> {
        self.data_type.map(|tag| tag.node_id())
    }
}

// =============================================================================
// MethodNode
// =============================================================================

/// A method served through an invoke callback.
#[derive(Default)]
pub struct MethodNode {
    attributes: MethodAttributes,
    inputs: Vec<Argument>,
    outputs: Vec<Argument>,
    callback: Option<MethodCallback>,
    callback_simple: Option<SimpleMethodCallback>,
}

impl MethodNode {
    /// Creates a method without arguments or callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered attributes.
    #[inline]
    pub fn attributes(&self) -> &MethodAttributes {
        &self.attributes
    }

    /// Sets the executable flag.
    pub fn set_executable(&mut self, executable: bool) {
        self.attributes.executable = executable;
    }

    /// Sets the user-executable flag.
    pub fn set_user_executable(&mut self, executable: bool) {
        self.attributes.user_executable = executable;
    }

    /// Sets the write mask.
    pub fn set_write_mask(&mut self, mask: u32) {
        self.attributes.write_mask = mask;
    }

    /// Sets the user write mask.
    pub fn set_user_write_mask(&mut self, mask: u32) {
        self.attributes.user_write_mask = mask;
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    /// Replaces the input argument list with `count` fresh arguments.
    ///
    /// Each argument is named after the method's display name and carries
    /// its description.
    pub fn init_input_arguments(&mut self, count: usize) {
        self.inputs = self.fresh_arguments(count);
    }

    /// Replaces the output argument list with `count` fresh arguments.
    pub fn init_output_arguments(&mut self, count: usize) {
        self.outputs = self.fresh_arguments(count);
    }

    fn fresh_arguments(&self, count: usize) -> Vec<Argument> {
        let name = &self.attributes.display_name.text;
        let description = &self.attributes.description;
        (0..count).map(|_| Argument::initial(name, description)).collect()
    }

    /// Returns the input arguments.
    #[inline]
    pub fn input_arguments(&self) -> &[Argument] {
        &self.inputs
    }

    /// Returns the output arguments.
    #[inline]
    pub fn output_arguments(&self) -> &[Argument] {
        &self.outputs
    }

    /// Returns the number of input arguments.
    #[inline]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of output arguments.
    #[inline]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn argument_mut(&mut self, direction: ArgumentDirection, index: usize) -> NodeResult<&mut Argument> {
        let list = match direction {
            ArgumentDirection::Input => &mut self.inputs,
            ArgumentDirection::Output => &mut self.outputs,
        };
        let count = list.len();
        list.get_mut(index)
            .ok_or_else(|| ContextError::argument_out_of_range(direction.name(), index, count).into())
    }

    /// Binds an input argument's type from a native scalar type.
    pub fn init_input_argument_type<T: UaType>(&mut self, index: usize) -> NodeResult<()> {
        self.bind_argument_type::<T>(ArgumentDirection::Input, index, VALUE_RANK_SCALAR)
    }

    /// Binds an input argument's element type and marks it one-dimensional.
    pub fn init_input_argument_array_type<T: UaType>(&mut self, index: usize) -> NodeResult<()> {
        self.bind_argument_type::<T>(ArgumentDirection::Input, index, VALUE_RANK_ONE_DIMENSION)
    }

    /// Binds an output argument's type from a native scalar type.
    pub fn init_output_argument_type<T: UaType>(&mut self, index: usize) -> NodeResult<()> {
        self.bind_argument_type::<T>(ArgumentDirection::Output, index, VALUE_RANK_SCALAR)
    }

    /// Binds an output argument's element type and marks it one-dimensional.
    pub fn init_output_argument_array_type<T: UaType>(&mut self, index: usize) -> NodeResult<()> {
        self.bind_argument_type::<T>(ArgumentDirection::Output, index, VALUE_RANK_ONE_DIMENSION)
    }

    fn bind_argument_type<T: UaType>(
        &mut self,
        direction: ArgumentDirection,
        index: usize,
        value_rank: i32,
    ) -> NodeResult<()> {
        let argument = self.argument_mut(direction, index)?;
        argument.data_type = Some(T::DATA_TYPE);
        argument.value_rank = value_rank;
        Ok(())
    }

    /// Sets an input argument's value rank.
    pub fn set_input_argument_rank(&mut self, index: usize, rank: i32) -> NodeResult<()> {
        self.argument_mut(ArgumentDirection::Input, index)?.value_rank = rank;
        Ok(())
    }

    /// Sets an output argument's value rank.
    pub fn set_output_argument_rank(&mut self, index: usize, rank: i32) -> NodeResult<()> {
        self.argument_mut(ArgumentDirection::Output, index)?.value_rank = rank;
        Ok(())
    }

    /// Sets an input argument's name.
    pub fn set_input_argument_name(&mut self, index: usize, name: impl Into<String>) -> NodeResult<()> {
        self.argument_mut(ArgumentDirection::Input, index)?.name = name.into();
        Ok(())
    }

    /// Sets an output argument's name.
    pub fn set_output_argument_name(&mut self, index: usize, name: impl Into<String>) -> NodeResult<()> {
        self.argument_mut(ArgumentDirection::Output, index)?.name = name.into();
        Ok(())
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Sets the rich invoke callback.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: Fn(&MethodCall<'_>, &[Variant], &mut [Variant]) -> bool + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Sets the simple invoke callback.
    pub fn set_simple_callback<F>(&mut self, callback: F)
    where
        F: Fn(&[Variant], &mut [Variant]) -> bool + 'static,
    {
        self.callback_simple = Some(Box::new(callback));
    }

    /// Removes both callbacks.
    pub fn clear_callbacks(&mut self) {
        self.callback = None;
        self.callback_simple = None;
    }

    /// Returns `true` if a callback of either shape is set.
    pub fn has_handler(&self) -> bool {
        self.callback.is_some() || self.callback_simple.is_some()
    }

    /// Runs the invoke callback with rich-over-simple precedence.
    ///
    /// Returns `None` when no callback is set.
    pub fn handle_call(
        &self,
        call: &MethodCall<'_>,
        inputs: &[Variant],
        outputs: &mut [Variant],
    ) -> Option<bool> {
        if let Some(callback) = &self.callback {
            return Some(callback(call, inputs, outputs));
        }

        self.callback_simple
            .as_ref()
            .map(|callback| callback(inputs, outputs))
    }
}

impl AttributeRenderer for MethodNode {
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

impl fmt::Debug for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodNode")
            .field("attributes", &self.attributes)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("rich_callback", &self.callback.is_some())
            .field("simple_callback", &self.callback_simple.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::callback::Session;
    use crate::error::NodeError;
    use crate::value::{from_variant, to_variant};

    fn named_method() -> MethodNode {
        let mut method = MethodNode::new();
        method.render_display_name(LocalizedText::new("en-US", "Reset"));
        method.render_description(LocalizedText::new("en-US", "Reset counters"));
        method
    }

    #[test]
    fn test_arguments_start_from_method_name() {
        let mut method = named_method();
        method.init_input_arguments(2);
        method.init_output_arguments(1);

        assert_eq!(method.input_count(), 2);
        assert_eq!(method.output_count(), 1);
        let arg = &method.input_arguments()[1];
        assert_eq!(arg.name, "Reset");
        assert_eq!(arg.description.text, "Reset counters");
        assert_eq!(arg.value_rank, VALUE_RANK_SCALAR);
        assert!(arg.data_type.is_none());
    }

    #[test]
    fn test_reinit_replaces_list() {
        let mut method = named_method();
        method.init_input_arguments(3);
        method.set_input_argument_name(2, "c").unwrap();
        method.init_input_arguments(1);
        assert_eq!(method.input_count(), 1);
        assert_eq!(method.input_arguments()[0].name, "Reset");
    }

    #[test]
    fn test_index_equal_to_count_is_rejected() {
        let mut method = named_method();
        method.init_input_arguments(2);

        method.set_input_argument_name(0, "a").unwrap();
        assert_eq!(method.input_arguments()[0].name, "a");

        let err = method.set_input_argument_name(2, "x").unwrap_err();
        assert!(matches!(
            err,
            NodeError::Context(ContextError::ArgumentOutOfRange { index: 2, count: 2, .. })
        ));
        assert!(method.set_output_argument_rank(0, 1).is_err());
    }

    #[test]
    fn test_argument_types() {
        let mut method = named_method();
        method.init_input_arguments(1);
        method.init_output_arguments(1);

        method.init_input_argument_type::<f64>(0).unwrap();
        method.init_output_argument_array_type::<u16>(0).unwrap();

        assert_eq!(method.input_arguments()[0].data_type, Some(DataTypeTag::Double));
        assert_eq!(method.input_arguments()[0].data_type_id(), Some(NodeId::numeric(0, 11)));
        assert_eq!(method.output_arguments()[0].data_type, Some(DataTypeTag::UInt16));
        assert_eq!(method.output_arguments()[0].value_rank, VALUE_RANK_ONE_DIMENSION);
        assert!(method.init_output_argument_type::<bool>(1).is_err());
    }

    #[test]
    fn test_rich_call_takes_precedence() {
        let mut method = named_method();
        method.set_simple_callback(|_inputs, _outputs| false);
        method.set_callback(|call, inputs, outputs| {
            let Ok(x) = from_variant::<i32>(&inputs[0]) else {
                return false;
            };
            outputs[0] = to_variant(x * 2);
            call.object_id == &NodeId::OBJECTS_FOLDER
        });

        let session = Session::anonymous();
        let method_id = NodeId::string(1, "Reset");
        let object_id = NodeId::OBJECTS_FOLDER;
        let call = MethodCall {
            session: &session,
            method_id: &method_id,
            object_id: &object_id,
        };
        let mut outputs = vec![Variant::Empty];
        assert_eq!(method.handle_call(&call, &[to_variant(21i32)], &mut outputs), Some(true));
        assert_eq!(from_variant::<i32>(&outputs[0]).unwrap(), 42);

        method.clear_callbacks();
        assert_eq!(method.handle_call(&call, &[], &mut []), None);
    }

    #[test]
    fn test_execute_flags() {
        let mut method = MethodNode::new();
        method.set_executable(false);
        method.set_user_write_mask(0x04);
        assert!(!method.attributes().executable);
        assert!(method.attributes().user_executable);
        assert_eq!(method.attributes().user_write_mask, 0x04);
    }
}
