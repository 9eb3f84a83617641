// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fluent construction of node contexts.

use crate::context::{MethodNode, NodeContext, NodeKind, ObjectNode, VariableNode};
use crate::types::{NodeId, ObjectType, DEFAULT_LOCALE, DEFAULT_NAMESPACE};
use crate::value::{DataTypeTag, UaType};

/// Builder for [`NodeContext`].
///
/// Building does not register the context anywhere; hand the result to
/// [`NodeHandler::register`](crate::handler::NodeHandler::register).
///
/// # Examples
///
/// ```
/// use trap_uanode::context::NodeBuilder;
/// use trap_uanode::types::NodeId;
///
/// let ctx = NodeBuilder::variable()
///     .name("Temperature")
///     .data_type::<f64>()
///     .readable(true)
///     .build();
///
/// assert_eq!(ctx.node_id(), Some(&NodeId::string(1, "Temperature")));
/// assert!(ctx.is_readable());
/// ```
#[derive(Debug)]
pub struct NodeBuilder {
    kind: NodeKind,
    node_id: Option<NodeId>,
    name: String,
    description: String,
    qualified_name: Option<String>,
    locale: String,
    namespace: u16,
    data_type: Option<DataTypeTag>,
    data_type_number: Option<i16>,
    active: bool,
}

impl NodeBuilder {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            node_id: None,
            name: String::new(),
            description: String::new(),
            qualified_name: None,
            locale: DEFAULT_LOCALE.to_string(),
            namespace: DEFAULT_NAMESPACE,
            data_type: None,
            data_type_number: None,
            active: false,
        }
    }

    /// Starts a variable context.
    pub fn variable() -> Self {
        Self::new(NodeKind::Variable(VariableNode::new()))
    }

    /// Starts a base object context.
    pub fn object() -> Self {
        Self::new(NodeKind::Object(ObjectNode::new()))
    }

    /// Starts a method context.
    pub fn method() -> Self {
        Self::new(NodeKind::Method(MethodNode::new()))
    }

    /// Sets an explicit identity.
    pub fn node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    /// Sets the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the browse name. Defaults to the name.
    pub fn qualified_name(mut self, name: impl Into<String>) -> Self {
        self.qualified_name = Some(name.into());
        self
    }

    /// Sets the locale.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the namespace index.
    pub fn namespace(mut self, namespace: u16) -> Self {
        self.namespace = namespace;
        self
    }

    /// Binds the data type of a native kind.
    pub fn data_type<T: UaType>(mut self) -> Self {
        self.data_type = Some(T::DATA_TYPE);
        self.data_type_number = None;
        self
    }

    /// Stores a raw data type number.
    pub fn data_type_number(mut self, number: i16) -> Self {
        self.data_type_number = Some(number);
        self.data_type = None;
        self
    }

    /// Sets the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets read access. Ignored for non-variable kinds.
    pub fn readable(mut self, readable: bool) -> Self {
        if let NodeKind::Variable(v) = &mut self.kind {
            v.set_readable(readable);
        }
        self
    }

    /// Sets write access. Ignored for non-variable kinds.
    pub fn writeable(mut self, writeable: bool) -> Self {
        if let NodeKind::Variable(v) = &mut self.kind {
            v.set_writeable(writeable);
        }
        self
    }

    /// Sets the object type. Ignored for non-object kinds.
    pub fn object_type(mut self, object_type: ObjectType) -> Self {
        if let NodeKind::Object(o) = &mut self.kind {
            o.set_object_type(object_type);
        }
        self
    }

    /// Builds the context.
    ///
    /// Without an explicit identity, a non-empty name binds
    /// `NodeId::string(namespace, name)`. An empty name leaves the context
    /// Unbound.
    pub fn build(self) -> NodeContext {
        let node_id = self.node_id.or_else(|| {
            (!self.name.is_empty()).then(|| NodeId::string(self.namespace, self.name.clone()))
        });

        let mut ctx = NodeContext::new(self.kind);
        ctx.set_namespace(self.namespace);
        ctx.set_locale(self.locale);
        ctx.set_name(self.name.clone());
        ctx.set_description(self.description);
        ctx.set_qualified_name(self.qualified_name.unwrap_or(self.name));
        ctx.set_active(self.active);

        if let Some(tag) = self.data_type {
            ctx.set_data_type_tag(tag);
        } else if let Some(number) = self.data_type_number {
            ctx.set_data_type_number(number);
        }

        if let Some(id) = node_id {
            // a fresh context is always Unbound
            let _ = ctx.set_node(id);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AttributeRenderer;
    use crate::types::{LocalizedText, QualifiedName};

    #[test]
    fn test_build_binds_string_identity() {
        let ctx = NodeBuilder::object()
            .namespace(2)
            .name("Line1")
            .object_type(ObjectType::Folder)
            .build();

        assert_eq!(ctx.node_id(), Some(&NodeId::string(2, "Line1")));
        assert_eq!(ctx.qualified_name(), &QualifiedName::new(2, "Line1"));
        assert_eq!(ctx.as_object().unwrap().object_type(), ObjectType::Folder);
    }

    #[test]
    fn test_empty_name_stays_unbound() {
        let ctx = NodeBuilder::variable().build();
        assert!(!ctx.is_bound());
    }

    #[test]
    fn test_explicit_identity_wins() {
        let ctx = NodeBuilder::method()
            .node_id(NodeId::numeric(1, 5001))
            .name("Reset")
            .qualified_name("ResetCounters")
            .locale("fr-FR")
            .build();

        assert_eq!(ctx.node_id(), Some(&NodeId::numeric(1, 5001)));
        assert_eq!(ctx.qualified_name().name, "ResetCounters");
        assert_eq!(
            ctx.as_method().unwrap().attributes().display_name,
            LocalizedText::new("fr-FR", "Reset")
        );
    }

    #[test]
    fn test_variable_flags_and_type() {
        let mut ctx = NodeBuilder::variable()
            .name("Setpoint")
            .data_type::<i32>()
            .readable(true)
            .writeable(true)
            .active(true)
            .build();

        assert!(ctx.is_readable() && ctx.is_writeable());
        assert!(ctx.is_active());
        assert_eq!(ctx.data_type(), Some(DataTypeTag::Int32));

        ctx.kind_mut().render_data_type(None);
        assert!(ctx.as_variable().unwrap().attributes().data_type.is_none());
    }
}
