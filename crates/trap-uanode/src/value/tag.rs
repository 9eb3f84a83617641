// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Built-in data type tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::NodeId;

/// Tag identifying the built-in type held by a variant.
///
/// The closed set covers booleans, signed and unsigned integers of
/// 8/16/32/64 bits, IEEE float and double, and UTF-8 strings. Each tag has
/// a stable table index (stored by node contexts as their data type number)
/// and a type id in namespace 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeTag {
    /// Boolean value.
    Boolean,
    /// Signed 8-bit integer.
    SByte,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit IEEE 754 float.
    Float,
    /// 64-bit IEEE 754 double.
    Double,
    /// UTF-8 string.
    String,
}

impl DataTypeTag {
    /// All tags in table order.
    pub const ALL: [DataTypeTag; 12] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
    ];

    /// Returns the position in the built-in type table.
    pub const fn index(&self) -> i16 {
        match self {
            Self::Boolean => 0,
            Self::SByte => 1,
            Self::Byte => 2,
            Self::Int16 => 3,
            Self::UInt16 => 4,
            Self::Int32 => 5,
            Self::UInt32 => 6,
            Self::Int64 => 7,
            Self::UInt64 => 8,
            Self::Float => 9,
            Self::Double => 10,
            Self::String => 11,
        }
    }

    /// Resolves a table position. Returns `None` for unknown positions.
    pub fn from_index(index: i16) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Returns the OPC UA type id.
    pub const fn type_id(&self) -> u32 {
        self.index() as u32 + 1
    }

    /// Returns the data type node id (ns=0).
    pub const fn node_id(&self) -> NodeId {
        NodeId::numeric(0, self.type_id())
    }

    /// Resolves a data type node id.
    pub fn from_node_id(node_id: &NodeId) -> Option<Self> {
        if node_id.namespace_index != 0 {
            return None;
        }
        let id = node_id.as_numeric()?;
        Self::ALL.iter().copied().find(|t| t.type_id() == id)
    }

    /// Returns the OPC UA type name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
        }
    }
}

impl fmt::Display for DataTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for tag in DataTypeTag::ALL {
            assert_eq!(DataTypeTag::from_index(tag.index()), Some(tag));
        }
        assert_eq!(DataTypeTag::from_index(-1), None);
        assert_eq!(DataTypeTag::from_index(12), None);
    }

    #[test]
    fn test_type_ids() {
        assert_eq!(DataTypeTag::Boolean.type_id(), 1);
        assert_eq!(DataTypeTag::Double.type_id(), 11);
        assert_eq!(DataTypeTag::String.node_id(), NodeId::numeric(0, 12));
        assert_eq!(
            DataTypeTag::from_node_id(&NodeId::numeric(0, 6)),
            Some(DataTypeTag::Int32)
        );
        assert_eq!(DataTypeTag::from_node_id(&NodeId::numeric(1, 6)), None);
    }
}
