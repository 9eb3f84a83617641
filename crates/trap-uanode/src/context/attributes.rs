// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Rendered node attributes handed to the address-space server.

use serde::{Deserialize, Serialize};

use crate::types::{AccessLevel, LocalizedText, NodeId};

/// Value rank of a scalar.
pub const VALUE_RANK_SCALAR: i32 = -1;

/// Value rank accepting any dimensionality.
pub const VALUE_RANK_ANY: i32 = -2;

/// Value rank of a one-dimensional array.
pub const VALUE_RANK_ONE_DIMENSION: i32 = 1;

/// Renders base-context attributes into a node kind's attribute set.
///
/// Every node kind implements this; the base context forwards each
/// attribute change to its kind, so there is no fallback path.
pub trait AttributeRenderer {
    /// Renders the display name.
    fn render_display_name(&mut self, text: LocalizedText);

    /// Renders the description.
    fn render_description(&mut self, text: LocalizedText);

    /// Renders the data type. `None` clears it.
    fn render_data_type(&mut self, data_type: Option<NodeId>);
}

// =============================================================================
// VariableAttributes
// =============================================================================

/// Attributes of a variable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAttributes {
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Data type node id.
    pub data_type: Option<NodeId>,
    /// Value rank.
    pub value_rank: i32,
    /// Access level.
    pub access_level: AccessLevel,
    /// User access level.
    pub user_access_level: AccessLevel,
}

impl Default for VariableAttributes {
    fn default() -> Self {
        Self {
            display_name: LocalizedText::default(),
            description: LocalizedText::default(),
            data_type: None,
            value_rank: VALUE_RANK_ANY,
            access_level: AccessLevel::NONE,
            user_access_level: AccessLevel::NONE,
        }
    }
}

impl AttributeRenderer for VariableAttributes {
    fn render_display_name(&mut self, text: LocalizedText) {
        self.display_name = text;
    }

    fn render_description(&mut self, text: LocalizedText) {
        self.description = text;
    }

    fn render_data_type(&mut self, data_type: Option<NodeId>) {
        self.data_type = data_type;
    }
}

// =============================================================================
// ObjectAttributes
// =============================================================================

/// Attributes of an object node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectAttributes {
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
}

impl AttributeRenderer for ObjectAttributes {
    fn render_display_name(&mut self, text: LocalizedText) {
        self.display_name = text;
    }

    fn render_description(&mut self, text: LocalizedText) {
        self.description = text;
    }

    // objects carry no data type attribute
    fn render_data_type(&mut self, _data_type: Option<NodeId>) {}
}

// =============================================================================
// MethodAttributes
// =============================================================================

/// Attributes of a method node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodAttributes {
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Whether the method can be called.
    pub executable: bool,
    /// Whether the current user can call the method.
    pub user_executable: bool,
    /// Writable-attribute mask.
    pub write_mask: u32,
    /// Writable-attribute mask for the current user.
    pub user_write_mask: u32,
}

impl Default for MethodAttributes {
    fn default() -> Self {
        Self {
            display_name: LocalizedText::default(),
            description: LocalizedText::default(),
            executable: true,
            user_executable: true,
            write_mask: 0,
            user_write_mask: 0,
        }
    }
}

impl AttributeRenderer for MethodAttributes {
    fn render_display_name(&mut self, text: LocalizedText) {
        self.display_name = text;
    }

    fn render_description(&mut self, text: LocalizedText) {
        self.description = text;
    }

    fn render_data_type(&mut self, _data_type: Option<NodeId>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_renders_data_type() {
        let mut attrs = VariableAttributes::default();
        attrs.render_data_type(Some(NodeId::numeric(0, 11)));
        assert_eq!(attrs.data_type, Some(NodeId::numeric(0, 11)));
        assert_eq!(attrs.value_rank, VALUE_RANK_ANY);
    }

    #[test]
    fn test_method_defaults_executable() {
        let attrs = MethodAttributes::default();
        assert!(attrs.executable);
        assert!(attrs.user_executable);
        assert_eq!(attrs.write_mask, 0);
    }
}
