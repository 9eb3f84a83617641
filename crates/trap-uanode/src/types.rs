// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space identity and attribute types.
//!
//! - **NodeId**: namespace-scoped node identity, usable as a map key
//! - **QualifiedName / LocalizedText**: browse and display names
//! - **StatusCode**: protocol result codes returned by dispatch
//! - **AccessLevel**: read/write access mask of variable nodes
//! - **ObjectType**: the closed object-type vocabulary
//!
//! # Examples
//!
//! ```
//! use trap_uanode::types::{NodeId, AccessLevel};
//!
//! let node: NodeId = "ns=1;s=Pump.Speed".parse().unwrap();
//! assert_eq!(node, NodeId::string(1, "Pump.Speed"));
//!
//! let mut access = AccessLevel::NONE;
//! access.set(AccessLevel::READ, true);
//! assert!(access.contains(AccessLevel::READ));
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, ContextError, NodeError, NodeResult};

/// Locale used for display names and descriptions unless overridden.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Namespace new nodes are created in unless overridden.
pub const DEFAULT_NAMESPACE: u16 = 1;

// =============================================================================
// NodeId
// =============================================================================

/// Identity of a node within one address space.
///
/// Consists of a namespace index and a numeric, string, GUID or opaque
/// identifier. Comparable and hashable, so it doubles as the node index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Root folder node (ns=0, i=84). Default parent of every context.
    pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);

    /// Objects folder node (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);

    /// `Organizes` reference type (ns=0, i=35).
    pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);

    /// `HasOrderedComponent` reference type (ns=0, i=49).
    pub const HAS_ORDERED_COMPONENT: NodeId = NodeId::numeric(0, 49);

    /// `BaseObjectType` (ns=0, i=58).
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);

    /// `FolderType` (ns=0, i=61).
    pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);

    /// `BaseDataVariableType` (ns=0, i=63).
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            NodeIdentifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to the OPC UA string format, e.g. `ns=2;i=1001`.
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = NodeError;

    /// Parses `ns=<n>;{i|s|g|b}=<value>` or the namespace-0 short form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: String| {
            NodeError::configuration(ConfigurationError::invalid_node_id(s, reason))
        };

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns, id) = rest
                    .split_once(';')
                    .ok_or_else(|| invalid("Missing identifier after namespace".into()))?;
                let ns: u16 = ns
                    .parse()
                    .map_err(|_| invalid("Invalid namespace index".into()))?;
                (ns, id)
            }
            None => (0, s),
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            NodeIdentifier::Numeric(
                id.parse()
                    .map_err(|_| invalid("Invalid numeric identifier".into()))?,
            )
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            NodeIdentifier::Guid(
                Uuid::parse_str(id).map_err(|e| invalid(format!("Invalid GUID: {}", e)))?,
            )
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            NodeIdentifier::Opaque(
                BASE64
                    .decode(id)
                    .map_err(|e| invalid(format!("Invalid base64: {}", e)))?,
            )
        } else {
            return Err(invalid(
                "Unknown identifier type. Expected i=, s=, g=, or b=".into(),
            ));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// Local part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),

    /// String identifier.
    String(String),

    /// GUID identifier.
    Guid(Uuid),

    /// Opaque identifier.
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// QualifiedName / LocalizedText
// =============================================================================

/// Namespace-scoped browse name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,
    /// The name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

/// Text paired with the locale it is written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale, e.g. "en-US".
    pub locale: String,
    /// The text.
    pub text: String,
}

impl LocalizedText {
    /// Creates a new localized text.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// =============================================================================
// StatusCode
// =============================================================================

/// OPC UA status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Operation succeeded.
    pub const GOOD: StatusCode = StatusCode(0x0000_0000);
    /// Internal error.
    pub const BAD_INTERNAL_ERROR: StatusCode = StatusCode(0x8002_0000);
    /// Server is not connected or not running.
    pub const BAD_SERVER_NOT_CONNECTED: StatusCode = StatusCode(0x800D_0000);
    /// Node id is unknown to the server.
    pub const BAD_NODE_ID_UNKNOWN: StatusCode = StatusCode(0x8034_0000);
    /// Attribute is not supported by the node class.
    pub const BAD_ATTRIBUTE_ID_INVALID: StatusCode = StatusCode(0x8035_0000);
    /// Node is not readable.
    pub const BAD_NOT_READABLE: StatusCode = StatusCode(0x803A_0000);
    /// Node is not writable.
    pub const BAD_NOT_WRITABLE: StatusCode = StatusCode(0x803B_0000);
    /// Index range is invalid.
    pub const BAD_INDEX_RANGE_INVALID: StatusCode = StatusCode(0x8036_0000);
    /// Parent node id does not exist.
    pub const BAD_PARENT_NODE_ID_INVALID: StatusCode = StatusCode(0x805B_0000);
    /// Node id is already used.
    pub const BAD_NODE_ID_EXISTS: StatusCode = StatusCode(0x805E_0000);
    /// Value type does not match.
    pub const BAD_TYPE_MISMATCH: StatusCode = StatusCode(0x8074_0000);
    /// Method or callback invalid. Returned by every failed dispatch.
    pub const BAD_METHOD_INVALID: StatusCode = StatusCode(0x8075_0000);
    /// Configuration error.
    pub const BAD_CONFIGURATION_ERROR: StatusCode = StatusCode(0x8089_0000);
    /// Method is not executable.
    pub const BAD_NOT_EXECUTABLE: StatusCode = StatusCode(0x8111_0000);

    /// Returns `true` for good status codes.
    #[inline]
    pub const fn is_good(&self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    /// Returns `true` for bad status codes.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Returns the symbolic name for known codes.
    pub const fn name(&self) -> &'static str {
        match self.0 {
            0x0000_0000 => "Good",
            0x8002_0000 => "BadInternalError",
            0x800D_0000 => "BadServerNotConnected",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x8036_0000 => "BadIndexRangeInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x805B_0000 => "BadParentNodeIdInvalid",
            0x805E_0000 => "BadNodeIdExists",
            0x8074_0000 => "BadTypeMismatch",
            0x8075_0000 => "BadMethodInvalid",
            0x8089_0000 => "BadConfigurationError",
            0x8111_0000 => "BadNotExecutable",
            _ => "Unknown",
        }
    }

    /// Maps a callback's boolean outcome to a dispatch status.
    #[inline]
    pub const fn from_outcome(ok: bool) -> Self {
        if ok {
            Self::GOOD
        } else {
            Self::BAD_METHOD_INVALID
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.0)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// Node classes this crate creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
}

impl NodeClass {
    /// Returns the OPC UA node class mask value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
        }
    }

    /// Returns the lowercase kind name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Variable => "variable",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// AccessLevel
// =============================================================================

/// Access level mask of a variable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccessLevel(u8);

impl AccessLevel {
    /// No access.
    pub const NONE: AccessLevel = AccessLevel(0x00);
    /// Current value is readable.
    pub const READ: AccessLevel = AccessLevel(0x01);
    /// Current value is writable.
    pub const WRITE: AccessLevel = AccessLevel(0x02);

    /// Creates an access level from raw bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    #[inline]
    pub const fn contains(&self, other: AccessLevel) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets `flag` when `enabled`, clears it otherwise.
    #[inline]
    pub fn set(&mut self, flag: AccessLevel, enabled: bool) {
        if enabled {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = if self.contains(Self::READ) { 'r' } else { '-' };
        let w = if self.contains(Self::WRITE) { 'w' } else { '-' };
        write!(f, "{}{}", r, w)
    }
}

// =============================================================================
// ObjectType
// =============================================================================

/// Object-type classification of object nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// `BaseObjectType` (i=58).
    #[default]
    Base,
    /// `FolderType` (i=61).
    Folder,
}

impl ObjectType {
    /// Returns the numeric type code in namespace 0.
    pub const fn code(&self) -> u32 {
        match self {
            Self::Base => 58,
            Self::Folder => 61,
        }
    }

    /// Returns the type definition node id.
    pub const fn node_id(&self) -> NodeId {
        NodeId::numeric(0, self.code())
    }

    /// Returns the vocabulary name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Folder => "folder",
        }
    }

    /// Resolves a vocabulary name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> NodeResult<Self> {
        match name {
            "base" => Ok(Self::Base),
            "folder" => Ok(Self::Folder),
            other => Err(ContextError::UnknownObjectType {
                name: other.to_string(),
            }
            .into()),
        }
    }

    /// Resolves a numeric type code.
    pub fn from_code(code: u32) -> NodeResult<Self> {
        match code {
            58 => Ok(Self::Base),
            61 => Ok(Self::Folder),
            other => Err(ContextError::UnknownObjectTypeCode { code: other }.into()),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_string_format() {
        assert_eq!(NodeId::numeric(2, 1001).to_opc_string(), "ns=2;i=1001");
        assert_eq!(NodeId::string(1, "Tank").to_string(), "ns=1;s=Tank");
        assert_eq!(NodeId::ROOT_FOLDER.to_string(), "i=84");
    }

    #[test]
    fn test_node_id_parse() {
        let parsed: NodeId = "ns=1;s=Pump.Speed".parse().unwrap();
        assert_eq!(parsed, NodeId::string(1, "Pump.Speed"));

        let parsed: NodeId = "i=85".parse().unwrap();
        assert_eq!(parsed, NodeId::OBJECTS_FOLDER);

        let parsed: NodeId = "ns=3;b=AQID".parse().unwrap();
        assert_eq!(parsed, NodeId::opaque(3, vec![1, 2, 3]));

        let uuid = Uuid::new_v4();
        let parsed: NodeId = format!("ns=2;g={}", uuid).parse().unwrap();
        assert_eq!(parsed, NodeId::guid(2, uuid));
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("ns=1".parse::<NodeId>().is_err());
        assert!("ns=1;q=1".parse::<NodeId>().is_err());
        assert!("i=abc".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_id_null() {
        assert!(NodeId::default().is_null());
        assert!(!NodeId::ROOT_FOLDER.is_null());
    }

    #[test]
    fn test_status_code() {
        assert!(StatusCode::GOOD.is_good());
        assert!(StatusCode::BAD_METHOD_INVALID.is_bad());
        assert_eq!(StatusCode::BAD_METHOD_INVALID.0, 0x8075_0000);
        assert_eq!(StatusCode::from_outcome(true), StatusCode::GOOD);
        assert_eq!(StatusCode::from_outcome(false), StatusCode::BAD_METHOD_INVALID);
        assert_eq!(StatusCode::BAD_NODE_ID_EXISTS.name(), "BadNodeIdExists");
    }

    #[test]
    fn test_access_level_set_and_clear() {
        let mut access = AccessLevel::NONE;
        access.set(AccessLevel::READ, true);
        access.set(AccessLevel::WRITE, true);
        assert_eq!(access.bits(), 0x03);
        assert_eq!(access.to_string(), "rw");

        access.set(AccessLevel::WRITE, false);
        assert_eq!(access.bits(), 0x01);
        access.set(AccessLevel::WRITE, false);
        assert_eq!(access.bits(), 0x01);
        access.set(AccessLevel::READ, false);
        assert_eq!(access, AccessLevel::NONE);
    }

    #[test]
    fn test_object_type_vocabulary() {
        assert_eq!(ObjectType::from_name("folder").unwrap(), ObjectType::Folder);
        assert_eq!(ObjectType::from_name("base").unwrap(), ObjectType::Base);
        assert!(ObjectType::from_name("Folder").is_err());
        assert!(ObjectType::from_name("").is_err());

        assert_eq!(ObjectType::from_code(61).unwrap(), ObjectType::Folder);
        assert!(ObjectType::from_code(62).is_err());
        assert_eq!(ObjectType::Folder.node_id(), NodeId::FOLDER_TYPE);
    }
}
