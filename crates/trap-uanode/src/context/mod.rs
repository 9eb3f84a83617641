// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node contexts: the metadata and behavior bound to one address-space node.
//!
//! A [`NodeContext`] carries the state every node shares (identity, names,
//! data type, parent/child links) and a [`NodeKind`] with the
//! specialization-specific state. Attribute changes on the base context are
//! rendered into the kind through [`AttributeRenderer`].
//!
//! # Identity
//!
//! A context starts Unbound or Bound. [`NodeContext::set_node`] binds an
//! Unbound context once; there is no way back.
//!
//! # Tree links
//!
//! Parents are stored by identity, never by reference. A context without a
//! parent resolves to [`NodeId::ROOT_FOLDER`]. [`NodeContext::add_child`] and
//! [`NodeContext::remove_child`] update both sides of a link together.

mod attributes;
mod builder;
mod callback;
mod method;
mod object;
mod variable;

pub use attributes::{
    AttributeRenderer, MethodAttributes, ObjectAttributes, VariableAttributes, VALUE_RANK_ANY,
    VALUE_RANK_ONE_DIMENSION, VALUE_RANK_SCALAR,
};
pub use builder::NodeBuilder;
pub use callback::{
    MethodCall, MethodCallback, ReadCallback, ReadRequest, Session, SimpleMethodCallback,
    SimpleReadCallback, SimpleWriteCallback, WriteCallback, WriteRequest,
};
pub use method::{Argument, ArgumentDirection, MethodNode};
pub use object::ObjectNode;
pub use variable::VariableNode;

use std::collections::BTreeSet;

use crate::error::{ContextError, ConversionError, NodeResult};
use crate::types::{
    LocalizedText, NodeClass, NodeId, QualifiedName, DEFAULT_LOCALE, DEFAULT_NAMESPACE,
};
use crate::value::{DataTypeTag, UaType, Variant};

/// Data type number of a context with no data type.
pub const DATA_TYPE_UNSET: i16 = -1;

// =============================================================================
// NodeKind
// =============================================================================

/// The specialization of a node context.
#[derive(Debug)]
pub enum NodeKind {
    /// A variable node.
    Variable(VariableNode),
    /// An object node.
    Object(ObjectNode),
    /// A method node.
    Method(MethodNode),
}

impl NodeKind {
    /// Returns the node class.
    pub const fn node_class(&self) -> NodeClass {
        match self {
            Self::Variable(_) => NodeClass::Variable,
            Self::Object(_) => NodeClass::Object,
            Self::Method(_) => NodeClass::Method,
        }
    }

    /// Returns the kind name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Object(_) => "object",
            Self::Method(_) => "method",
        }
    }
}

impl AttributeRenderer for NodeKind {
    fn render_display_name(&mut self, text: LocalizedText) {
        match self {
            Self::Variable(v) => v.render_display_name(text),
            Self::Object(o) => o.render_display_name(text),
            Self::Method(m) => m.render_display_name(text),
        }
    }

    fn render_description(&mut self, text: LocalizedText) {
        match self {
            Self::Variable(v) => v.render_description(text),
            Self::Object(o) => o.render_description(text),
            Self::Method(m) => m.render_description(text),
        }
    }

    fn render_data_type(&mut self, data_type: Option<NodeId>) {
        match self {
            Self::Variable(v) => v.render_data_type(data_type),
            Self::Object(o) => o.render_data_type(data_type),
            Self::Method(m) => m.render_data_type(data_type),
        }
    }
}

impl From<VariableNode> for NodeKind {
    fn from(node: VariableNode) -> Self {
        Self::Variable(node)
    }
}

impl From<ObjectNode> for NodeKind {
    fn from(node: ObjectNode) -> Self {
        Self::Object(node)
    }
}

impl From<MethodNode> for NodeKind {
    fn from(node: MethodNode) -> Self {
        Self::Method(node)
    }
}

// =============================================================================
// NodeContext
// =============================================================================

/// Metadata and behavior bound to one node.
#[derive(Debug)]
pub struct NodeContext {
    node_id: Option<NodeId>,
    name: String,
    description: String,
    qualified_name: QualifiedName,
    locale: String,
    data_type: i16,
    active: bool,
    namespace: u16,
    parent: Option<NodeId>,
    children: BTreeSet<NodeId>,
    kind: NodeKind,
}

impl NodeContext {
    /// Creates an Unbound context of the given kind.
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        let mut ctx = Self {
            node_id: None,
            name: String::new(),
            description: String::new(),
            qualified_name: QualifiedName::new(DEFAULT_NAMESPACE, ""),
            locale: DEFAULT_LOCALE.to_string(),
            data_type: DATA_TYPE_UNSET,
            active: false,
            namespace: DEFAULT_NAMESPACE,
            parent: None,
            children: BTreeSet::new(),
            kind: kind.into(),
        };
        ctx.render_texts();
        ctx
    }

    /// Creates a Bound context of the given kind.
    pub fn with_node_id(node_id: NodeId, kind: impl Into<NodeKind>) -> Self {
        let mut ctx = Self::new(kind);
        ctx.node_id = Some(node_id);
        ctx
    }

    /// Creates an Unbound variable context.
    pub fn variable() -> Self {
        Self::new(VariableNode::new())
    }

    /// Creates an Unbound base object context.
    pub fn object() -> Self {
        Self::new(ObjectNode::new())
    }

    /// Creates an Unbound method context.
    pub fn method() -> Self {
        Self::new(MethodNode::new())
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the identity, if bound.
    #[inline]
    pub fn node_id(&self) -> Option<&NodeId> {
        self.node_id.as_ref()
    }

    /// Returns `true` if the context has an identity.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.node_id.is_some()
    }

    /// Binds the identity of an Unbound context.
    ///
    /// # Errors
    ///
    /// Fails if the context is already Bound. The identity is unchanged.
    pub fn set_node(&mut self, node_id: NodeId) -> NodeResult<()> {
        if let Some(current) = &self.node_id {
            return Err(ContextError::identity_already_bound(current.to_string()).into());
        }
        self.node_id = Some(node_id);
        Ok(())
    }

    /// Returns the identity or an [`ContextError::Unbound`] error.
    pub fn require_node_id(&self) -> NodeResult<&NodeId> {
        self.node_id
            .as_ref()
            .ok_or_else(|| ContextError::unbound(self.name.clone()).into())
    }

    /// Returns a printable label: the identity if bound, the name otherwise.
    pub fn label(&self) -> String {
        match &self.node_id {
            Some(id) => id.to_string(),
            None => format!("<unbound '{}'>", self.name),
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Returns the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name and re-renders the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.kind
            .render_display_name(LocalizedText::new(self.locale.clone(), self.name.clone()));
    }

    /// Returns the description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description and re-renders it.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.kind.render_description(LocalizedText::new(
            self.locale.clone(),
            self.description.clone(),
        ));
    }

    /// Returns the browse name.
    #[inline]
    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    /// Sets the browse name in the context's namespace.
    pub fn set_qualified_name(&mut self, name: impl Into<String>) {
        self.qualified_name = QualifiedName::new(self.namespace, name);
    }

    /// Returns the locale.
    #[inline]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Sets the locale and re-renders display name and description.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
        self.render_texts();
    }

    /// Returns the namespace index.
    #[inline]
    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    /// Sets the namespace index. The browse name moves along with it.
    pub fn set_namespace(&mut self, namespace: u16) {
        self.namespace = namespace;
        self.qualified_name.namespace_index = namespace;
    }

    fn render_texts(&mut self) {
        self.kind
            .render_display_name(LocalizedText::new(self.locale.clone(), self.name.clone()));
        self.kind.render_description(LocalizedText::new(
            self.locale.clone(),
            self.description.clone(),
        ));
    }

    // =========================================================================
    // Data type
    // =========================================================================

    /// Returns the stored data type number, [`DATA_TYPE_UNSET`] if none.
    #[inline]
    pub fn data_type_number(&self) -> i16 {
        self.data_type
    }

    /// Returns the data type tag, if the stored number is a known one.
    pub fn data_type(&self) -> Option<DataTypeTag> {
        DataTypeTag::from_index(self.data_type)
    }

    /// Binds the data type inferred from a native value.
    pub fn set_data_type<T: UaType>(&mut self, _value: &T) {
        self.set_data_type_tag(T::DATA_TYPE);
    }

    /// Binds the data type of a native kind.
    pub fn set_data_type_of<T: UaType>(&mut self) {
        self.set_data_type_tag(T::DATA_TYPE);
    }

    /// Binds the data type carried by a variant.
    ///
    /// # Errors
    ///
    /// Fails for an empty variant. The stored number is unchanged.
    pub fn set_data_type_from(&mut self, value: &Variant) -> NodeResult<()> {
        let tag = value.data_type().ok_or(ConversionError::EmptyVariant)?;
        self.set_data_type_tag(tag);
        Ok(())
    }

    /// Binds a data type tag.
    pub fn set_data_type_tag(&mut self, tag: DataTypeTag) {
        self.data_type = tag.index();
        self.kind.render_data_type(Some(tag.node_id()));
    }

    /// Stores a data type number without inference.
    ///
    /// An unknown number clears the rendered data type attribute.
    pub fn set_data_type_number(&mut self, number: i16) {
        self.data_type = number;
        let tag = DataTypeTag::from_index(number);
        if tag.is_none() {
            tracing::warn!(
                node = %self.label(),
                number,
                "Unknown data type number, attribute left empty"
            );
        }
        self.kind.render_data_type(tag.map(|t| t.node_id()));
    }

    // =========================================================================
    // Active flag
    // =========================================================================

    /// Returns the active flag.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // =========================================================================
    // Tree links
    // =========================================================================

    /// Returns the parent identity, if parented.
    #[inline]
    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// Returns `true` if a parent is set.
    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the parent identity, or the root folder if unparented.
    pub fn resolved_parent(&self) -> NodeId {
        self.parent.clone().unwrap_or(NodeId::ROOT_FOLDER)
    }

    /// Links this context under `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is Unbound, if this context already has a parent,
    /// or if `parent` is this context.
    pub fn set_parent(&mut self, parent: &NodeContext) -> NodeResult<()> {
        let parent_id = parent.require_node_id()?;
        if let Some(current) = &self.parent {
            return Err(ContextError::parent_already_set(self.label(), current.to_string()).into());
        }
        if self.node_id.as_ref() == Some(parent_id) {
            return Err(ContextError::SelfReference {
                node_id: parent_id.to_string(),
            }
            .into());
        }
        self.parent = Some(parent_id.clone());
        Ok(())
    }

    /// Clears the parent link.
    ///
    /// # Errors
    ///
    /// Fails if no parent is set.
    pub fn remove_parent(&mut self) -> NodeResult<()> {
        if self.parent.take().is_none() {
            return Err(ContextError::not_parented(self.label()).into());
        }
        Ok(())
    }

    /// Adds `child` to this context's children and links its parent.
    ///
    /// Both contexts are left unchanged on failure.
    ///
    /// # Errors
    ///
    /// Fails if either context is Unbound, if `child` is this context, if
    /// `child` is already a child, or if `child` has another parent.
    pub fn add_child(&mut self, child: &mut NodeContext) -> NodeResult<()> {
        let parent_id = self.require_node_id()?.clone();
        let child_id = child.require_node_id()?.clone();

        if parent_id == child_id {
            return Err(ContextError::SelfReference {
                node_id: parent_id.to_string(),
            }
            .into());
        }
        if self.children.contains(&child_id) {
            return Err(
                ContextError::child_already_present(parent_id.to_string(), child_id.to_string())
                    .into(),
            );
        }
        if let Some(current) = &child.parent {
            return Err(
                ContextError::parent_already_set(child_id.to_string(), current.to_string()).into(),
            );
        }

        child.parent = Some(parent_id);
        self.children.insert(child_id);
        Ok(())
    }

    /// Removes `child` from this context's children and clears its parent.
    ///
    /// # Errors
    ///
    /// Fails if `child` is not a recorded child.
    pub fn remove_child(&mut self, child: &mut NodeContext) -> NodeResult<()> {
        let parent_label = self.label();
        let recorded = child
            .node_id
            .as_ref()
            .is_some_and(|id| self.children.remove(id));
        if !recorded {
            return Err(ContextError::child_not_present(parent_label, child.label()).into());
        }
        child.parent = None;
        Ok(())
    }

    /// Drops a child identity without touching the child context.
    ///
    /// Used when the child context itself is gone.
    pub(crate) fn forget_child(&mut self, child_id: &NodeId) -> bool {
        self.children.remove(child_id)
    }

    /// Returns `true` if `node_id` is a recorded child.
    #[inline]
    pub fn is_child(&self, node_id: &NodeId) -> bool {
        self.children.contains(node_id)
    }

    /// Iterates the child identities in order.
    pub fn children(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.children.iter()
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    // =========================================================================
    // Kind
    // =========================================================================

    /// Returns the specialization.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the specialization mutably.
    #[inline]
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Returns the node class.
    #[inline]
    pub fn node_class(&self) -> NodeClass {
        self.kind.node_class()
    }

    /// Returns the variable specialization.
    pub fn as_variable(&self) -> Option<&VariableNode> {
        match &self.kind {
            NodeKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the variable specialization mutably.
    pub fn as_variable_mut(&mut self) -> Option<&mut VariableNode> {
        match &mut self.kind {
            NodeKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the object specialization.
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match &self.kind {
            NodeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the object specialization mutably.
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match &mut self.kind {
            NodeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the method specialization.
    pub fn as_method(&self) -> Option<&MethodNode> {
        match &self.kind {
            NodeKind::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the method specialization mutably.
    pub fn as_method_mut(&mut self) -> Option<&mut MethodNode> {
        match &mut self.kind {
            NodeKind::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the variable specialization or a wrong-kind error.
    pub fn expect_variable_mut(&mut self) -> NodeResult<&mut VariableNode> {
        let label = self.label();
        let actual = self.kind.name();
        self.as_variable_mut()
            .ok_or_else(|| ContextError::wrong_kind(label, "variable", actual).into())
    }

    /// Returns the object specialization or a wrong-kind error.
    pub fn expect_object_mut(&mut self) -> NodeResult<&mut ObjectNode> {
        let label = self.label();
        let actual = self.kind.name();
        self.as_object_mut()
            .ok_or_else(|| ContextError::wrong_kind(label, "object", actual).into())
    }

    /// Returns the method specialization or a wrong-kind error.
    pub fn expect_method_mut(&mut self) -> NodeResult<&mut MethodNode> {
        let label = self.label();
        let actual = self.kind.name();
        self.as_method_mut()
            .ok_or_else(|| ContextError::wrong_kind(label, "method", actual).into())
    }

    /// Returns `true` for a readable variable.
    pub fn is_readable(&self) -> bool {
        self.as_variable().is_some_and(VariableNode::is_readable)
    }

    /// Returns `true` for a writeable variable.
    pub fn is_writeable(&self) -> bool {
        self.as_variable().is_some_and(VariableNode::is_writeable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeError;
    use crate::types::ObjectType;
    use crate::value::to_variant;

    fn bound(name: &str) -> NodeContext {
        let mut ctx = NodeContext::with_node_id(NodeId::string(1, name), ObjectNode::new());
        ctx.set_name(name);
        ctx
    }

    #[test]
    fn test_identity_binds_once() {
        let mut ctx = NodeContext::variable();
        assert!(!ctx.is_bound());
        assert!(ctx.require_node_id().is_err());

        ctx.set_node(NodeId::numeric(1, 7)).unwrap();
        assert!(ctx.set_node(NodeId::numeric(1, 8)).is_err());
        assert_eq!(ctx.node_id(), Some(&NodeId::numeric(1, 7)));
    }

    #[test]
    fn test_set_parent_requires_bound_unparented() {
        let unbound = NodeContext::object();
        let parent = bound("Plant");
        let other = bound("Line");
        let mut child = bound("Pump");

        assert!(child.set_parent(&unbound).is_err());
        assert!(!child.has_parent());

        child.set_parent(&parent).unwrap();
        assert_eq!(child.resolved_parent(), NodeId::string(1, "Plant"));

        let err = child.set_parent(&other).unwrap_err();
        assert!(matches!(err, NodeError::Context(ContextError::ParentAlreadySet { .. })));

        child.remove_parent().unwrap();
        assert_eq!(child.resolved_parent(), NodeId::ROOT_FOLDER);
        assert!(child.remove_parent().is_err());
    }

    #[test]
    fn test_add_and_remove_child_keep_links_paired() {
        let mut parent = bound("Plant");
        let mut child = bound("Pump");

        parent.add_child(&mut child).unwrap();
        assert!(parent.is_child(&NodeId::string(1, "Pump")));
        assert_eq!(child.resolved_parent(), NodeId::string(1, "Plant"));

        let err = parent.add_child(&mut child).unwrap_err();
        assert!(matches!(err, NodeError::Context(ContextError::ChildAlreadyPresent { .. })));
        assert_eq!(parent.child_count(), 1);

        parent.remove_child(&mut child).unwrap();
        assert!(!parent.is_child(&NodeId::string(1, "Pump")));
        assert_eq!(child.resolved_parent(), NodeId::ROOT_FOLDER);
        assert!(parent.remove_child(&mut child).is_err());
    }

    #[test]
    fn test_add_child_with_foreign_parent_is_atomic() {
        let mut first = bound("A");
        let mut second = bound("B");
        let mut child = bound("C");

        first.add_child(&mut child).unwrap();
        assert!(second.add_child(&mut child).is_err());
        assert_eq!(second.child_count(), 0);
        assert_eq!(child.parent(), Some(&NodeId::string(1, "A")));

        let mut unbound = NodeContext::object();
        assert!(first.add_child(&mut unbound).is_err());
        assert!(unbound.parent().is_none());
    }

    #[test]
    fn test_names_render_into_kind() {
        let mut ctx = NodeContext::variable();
        ctx.set_name("Temperature");
        ctx.set_description("Inlet temperature");
        ctx.set_locale("de-DE");

        let attrs = ctx.as_variable().unwrap().attributes();
        assert_eq!(attrs.display_name, LocalizedText::new("de-DE", "Temperature"));
        assert_eq!(attrs.description, LocalizedText::new("de-DE", "Inlet temperature"));

        ctx.set_namespace(3);
        ctx.set_qualified_name("Temp");
        assert_eq!(ctx.qualified_name(), &QualifiedName::new(3, "Temp"));
    }

    #[test]
    fn test_data_type_binding() {
        let mut ctx = NodeContext::variable();
        assert_eq!(ctx.data_type_number(), DATA_TYPE_UNSET);

        ctx.set_data_type(&3.5f32);
        assert_eq!(ctx.data_type(), Some(DataTypeTag::Float));
        assert_eq!(
            ctx.as_variable().unwrap().attributes().data_type,
            Some(DataTypeTag::Float.node_id())
        );

        assert!(ctx.set_data_type_from(&Variant::Empty).is_err());
        assert_eq!(ctx.data_type(), Some(DataTypeTag::Float));

        ctx.set_data_type_from(&to_variant(String::from("x"))).unwrap();
        assert_eq!(ctx.data_type(), Some(DataTypeTag::String));

        ctx.set_data_type_number(99);
        assert_eq!(ctx.data_type_number(), 99);
        assert!(ctx.data_type().is_none());
        assert!(ctx.as_variable().unwrap().attributes().data_type.is_none());
    }

    #[test]
    fn test_kind_accessors() {
        let mut ctx = NodeContext::object();
        assert_eq!(ctx.node_class(), NodeClass::Object);
        assert!(ctx.as_variable().is_none());
        assert!(ctx.expect_method_mut().is_err());

        ctx.expect_object_mut().unwrap().set_object_type(ObjectType::Folder);
        assert_eq!(ctx.as_object().unwrap().object_type(), ObjectType::Folder);
        assert!(!ctx.is_readable());
    }
}
