// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Object node specialization.

use crate::context::attributes::{AttributeRenderer, ObjectAttributes};
use crate::error::NodeResult;
use crate::types::{LocalizedText, NodeId, ObjectType};

/// An object node classified as [`ObjectType::Base`] or [`ObjectType::Folder`].
#[derive(Debug, Clone, Default)]
pub struct ObjectNode {
    attributes: ObjectAttributes,
    object_type: ObjectType,
}

impl ObjectNode {
    /// Creates a base object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object of the given type.
    pub fn with_type(object_type: ObjectType) -> Self {
        Self {
            object_type,
            ..Self::default()
        }
    }

    /// Returns the rendered attributes.
    #[inline]
    pub fn attributes(&self) -> &ObjectAttributes {
        &self.attributes
    }

    /// Returns the object type.
    #[inline]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Sets the object type.
    pub fn set_object_type(&mut self, object_type: ObjectType) {
        self.object_type = object_type;
    }

    /// Sets the object type by vocabulary name (`"base"` or `"folder"`).
    ///
    /// The type is left unchanged on failure.
    pub fn set_object_type_name(&mut self, name: &str) -> NodeResult<()> {
        self.object_type = ObjectType::from_name(name)?;
        Ok(())
    }

    /// Sets the object type by numeric type code (58 or 61).
    pub fn set_object_type_code(&mut self, code: u32) -> NodeResult<()> {
        self.object_type = ObjectType::from_code(code)?;
        Ok(())
    }
}

impl AttributeRenderer for ObjectNode {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_by_name_is_exact() {
        let mut obj = ObjectNode::new();
        assert_eq!(obj.object_type(), ObjectType::Base);

        obj.set_object_type_name("folder").unwrap();
        assert_eq!(obj.object_type(), ObjectType::Folder);

        assert!(obj.set_object_type_name("Folder").is_err());
        assert!(obj.set_object_type_name("device").is_err());
        assert_eq!(obj.object_type(), ObjectType::Folder);
    }

    #[test]
    fn test_object_type_by_code() {
        let mut obj = ObjectNode::with_type(ObjectType::Folder);
        obj.set_object_type_code(58).unwrap();
        assert_eq!(obj.object_type(), ObjectType::Base);

        assert!(obj.set_object_type_code(62).is_err());
        assert_eq!(obj.object_type(), ObjectType::Base);
    }
}
