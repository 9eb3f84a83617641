// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node Context and Index Tests
//!
//! Covers the context tree, registration rules of the index and the data
//! type bindings of contexts built through [`NodeBuilder`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trap-uanode --test node_context
//! ```

use std::rc::Rc;

use trap_uanode::context::{NodeBuilder, NodeContext, ObjectNode, VariableNode};
use trap_uanode::error::{ContextError, IndexError, NodeError};
use trap_uanode::handler::NodeHandler;
use trap_uanode::server::MemoryServer;
use trap_uanode::types::{NodeId, ObjectType};
use trap_uanode::value::{to_variant, vec_to_variant, DataTypeTag};

// =============================================================================
// Helpers
// =============================================================================

fn id(name: &str) -> NodeId {
    NodeId::string(1, name)
}

fn object(name: &str) -> NodeContext {
    NodeBuilder::object().name(name).build()
}

// =============================================================================
// Tree
// =============================================================================

#[test]
fn test_tree_links_are_mutual() {
    let mut plant = object("Plant");
    let mut pump = object("Pump");
    let mut valve = object("Valve");

    plant.add_child(&mut pump).unwrap();
    plant.add_child(&mut valve).unwrap();

    assert_eq!(pump.parent(), Some(&id("Plant")));
    assert!(plant.is_child(&id("Valve")));
    let children: Vec<_> = plant.children().cloned().collect();
    assert_eq!(children, vec![id("Pump"), id("Valve")]);

    plant.remove_child(&mut pump).unwrap();
    assert!(!pump.has_parent());
    assert_eq!(pump.resolved_parent(), NodeId::ROOT_FOLDER);
    assert_eq!(plant.child_count(), 1);
}

#[test]
fn test_failed_add_child_changes_nothing() {
    let mut plant = object("Plant");
    let mut line = object("Line");
    let mut pump = object("Pump");
    line.add_child(&mut pump).unwrap();

    let err = plant.add_child(&mut pump).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Context(ContextError::ParentAlreadySet { .. })
    ));
    assert_eq!(plant.child_count(), 0);
    assert_eq!(pump.parent(), Some(&id("Line")));

    let mut unbound = NodeBuilder::object().build();
    assert!(plant.add_child(&mut unbound).is_err());
    assert!(!unbound.has_parent());
    assert_eq!(plant.child_count(), 0);
}

#[test]
fn test_set_parent_preconditions() {
    let plant = object("Plant");
    let unbound = NodeBuilder::object().build();
    let mut pump = object("Pump");

    assert!(pump.set_parent(&unbound).is_err());
    pump.set_parent(&plant).unwrap();
    assert!(pump.set_parent(&plant).is_err());

    // a parent link alone does not add a child entry
    assert_eq!(plant.child_count(), 0);

    pump.remove_parent().unwrap();
    assert!(pump.remove_parent().is_err());
}

#[test]
fn test_handler_attach_and_detach() {
    let mut handler = NodeHandler::<MemoryServer>::new();
    handler.register(object("Plant")).unwrap();
    handler.register(object("Pump")).unwrap();

    assert!(handler.attach(&id("Plant"), &id("Plant")).is_err());
    handler.attach(&id("Plant"), &id("Pump")).unwrap();
    assert!(handler.attach(&id("Plant"), &id("Pump")).is_err());

    let parent = handler.resolve_parent(&id("Pump")).unwrap().unwrap();
    assert_eq!(parent.borrow().name(), "Plant");

    handler.detach(&id("Plant"), &id("Pump")).unwrap();
    assert!(handler.resolve_parent(&id("Pump")).unwrap().is_none());
    assert!(handler.detach(&id("Plant"), &id("Pump")).is_err());
    assert!(handler.attach(&id("Plant"), &id("Missing")).is_err());
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_registration_collision_keeps_first() {
    let mut handler = NodeHandler::<MemoryServer>::new();
    let first = handler
        .register(NodeBuilder::object().name("Pump").description("first").build())
        .unwrap();

    let err = handler
        .register(NodeBuilder::variable().name("Pump").readable(true).build())
        .unwrap_err();
    assert!(matches!(
        err,
        NodeError::Index(IndexError::AlreadyRegistered { .. })
    ));

    let stored = handler.lookup(&id("Pump")).unwrap();
    assert!(Rc::ptr_eq(&first, &stored));
    assert_eq!(stored.borrow().description(), "first");
    assert_eq!(handler.len(), 1);
}

#[test]
fn test_unbound_context_is_not_registered() {
    let mut handler = NodeHandler::<MemoryServer>::new();
    let err = handler
        .register(NodeContext::new(VariableNode::new()))
        .unwrap_err();
    assert!(matches!(err, NodeError::Index(IndexError::Unbound { .. })));
    assert!(handler.is_empty());
}

#[test]
fn test_generated_identities_skip_taken_ones() {
    let mut handler = NodeHandler::<MemoryServer>::new().with_namespace(3);
    handler
        .register(NodeContext::with_node_id(
            NodeId::numeric(3, 50_000),
            ObjectNode::new(),
        ))
        .unwrap();

    let generated = handler.create_and_register(None).unwrap();
    assert_eq!(generated.borrow().node_id(), Some(&NodeId::numeric(3, 50_001)));
    assert_eq!(generated.borrow().kind().name(), "object");

    let bound = handler
        .create_and_register(Some(NodeBuilder::method().name("Reset").build()))
        .unwrap();
    assert_eq!(bound.borrow().node_id(), Some(&id("Reset")));
    assert_eq!(handler.len(), 3);
}

#[test]
fn test_unregister_keeps_handles_alive() {
    let mut handler = NodeHandler::<MemoryServer>::new();
    handler.register(object("Plant")).unwrap();

    let node = handler.unregister(&id("Plant")).unwrap();
    assert!(!handler.contains(&id("Plant")));
    assert_eq!(node.borrow().name(), "Plant");
    assert!(handler.unregister(&id("Plant")).is_err());
}

// =============================================================================
// Attributes and Data Types
// =============================================================================

#[test]
fn test_builder_renders_attributes() {
    let ctx = NodeBuilder::variable()
        .namespace(4)
        .locale("de-DE")
        .name("Druck")
        .description("Leitungsdruck")
        .qualified_name("Pressure")
        .data_type::<f32>()
        .readable(true)
        .build();

    assert_eq!(ctx.node_id(), Some(&NodeId::string(4, "Druck")));
    assert_eq!(ctx.qualified_name().name, "Pressure");
    assert_eq!(ctx.qualified_name().namespace_index, 4);

    let attributes = ctx.as_variable().unwrap().attributes();
    assert_eq!(attributes.display_name.locale, "de-DE");
    assert_eq!(attributes.display_name.text, "Druck");
    assert_eq!(attributes.description.text, "Leitungsdruck");
    assert_eq!(attributes.data_type, Some(DataTypeTag::Float.node_id()));
}

#[test]
fn test_data_type_bindings() {
    let mut ctx = NodeBuilder::variable().name("Flex").build();
    assert!(ctx.data_type().is_none());

    ctx.set_data_type(&7u16);
    assert_eq!(ctx.data_type(), Some(DataTypeTag::UInt16));

    ctx.set_data_type_from(&vec_to_variant(&[1.0f64, 2.0])).unwrap();
    assert_eq!(ctx.data_type(), Some(DataTypeTag::Double));

    ctx.set_data_type_from(&to_variant(String::from("on"))).unwrap();
    assert_eq!(ctx.data_type(), Some(DataTypeTag::String));

    ctx.set_data_type_number(DataTypeTag::Boolean.index());
    assert_eq!(ctx.data_type(), Some(DataTypeTag::Boolean));

    ctx.set_data_type_number(999);
    assert_eq!(ctx.data_type_number(), 999);
    assert!(ctx.data_type().is_none());
    assert!(ctx.as_variable().unwrap().attributes().data_type.is_none());
}

#[test]
fn test_kind_specific_builder_options() {
    let folder = NodeBuilder::object()
        .name("Area")
        .object_type(ObjectType::Folder)
        .readable(true)
        .build();
    assert_eq!(folder.as_object().unwrap().object_type(), ObjectType::Folder);
    assert!(!folder.is_readable());

    let var = NodeBuilder::variable()
        .name("Speed")
        .object_type(ObjectType::Folder)
        .writeable(true)
        .build();
    assert!(var.is_writeable());
    assert!(!var.is_readable());
}

#[test]
fn test_object_type_by_name_and_code() {
    let mut ctx = object("Area");
    let obj = ctx.expect_object_mut().unwrap();

    obj.set_object_type_name("folder").unwrap();
    assert_eq!(obj.object_type(), ObjectType::Folder);

    assert!(obj.set_object_type_code(4711).is_err());
    assert_eq!(obj.object_type(), ObjectType::Folder);

    obj.set_object_type_code(58).unwrap();
    assert_eq!(obj.object_type(), ObjectType::Base);

    assert!(ctx.expect_variable_mut().is_err());
}
