// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for node modeling, indexing and server binding.
//!
//! Every fallible operation in this crate reports failure through
//! [`NodeResult`]. A failed operation never leaves partial state behind,
//! so callers may retry or abandon at their own discretion.
//!
//! # Error Categories
//!
//! ```text
//! NodeError
//! ├── Conversion    - Variant conversion and type inference failures
//! ├── Context       - Identity, tree and attribute precondition violations
//! ├── Index         - Registration collisions and missing entries
//! ├── Server        - Missing or rejecting address-space server
//! └── Configuration - Invalid settings and config files
//! ```
//!
//! # Examples
//!
//! ```
//! use trap_uanode::error::{NodeError, IndexError, ErrorSeverity};
//!
//! let error = NodeError::index(IndexError::already_registered("ns=1;s=Pump"));
//! assert_eq!(error.category(), "index");
//! assert_eq!(error.severity(), ErrorSeverity::Warning);
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

use crate::types::StatusCode;

// =============================================================================
// NodeError - Main Error Type
// =============================================================================

/// The main error type for node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Value conversion errors.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Node context precondition errors.
    #[error("{0}")]
    Context(#[from] ContextError),

    /// Node index errors.
    #[error("{0}")]
    Index(#[from] IndexError),

    /// Address-space server errors.
    #[error("{0}")]
    Server(#[from] ServerError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl NodeError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a conversion error.
    #[inline]
    pub fn conversion(error: ConversionError) -> Self {
        Self::Conversion(error)
    }

    /// Creates a context error.
    #[inline]
    pub fn context(error: ContextError) -> Self {
        Self::Context(error)
    }

    /// Creates an index error.
    #[inline]
    pub fn index(error: IndexError) -> Self {
        Self::Index(error)
    }

    /// Creates a server error.
    #[inline]
    pub fn server(error: ServerError) -> Self {
        Self::Server(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    // =========================================================================
    // Convenience Constructors
    // =========================================================================

    /// Creates a "node not registered" error.
    pub fn not_registered(node_id: impl Into<String>) -> Self {
        Self::Index(IndexError::not_registered(node_id))
    }

    /// Creates a "no server bound" error.
    pub fn server_not_bound() -> Self {
        Self::Server(ServerError::NotBound)
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns `true` if re-attempting the operation later may succeed.
    ///
    /// Only a server that is bound but not ready is considered transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server(ServerError::NotReady))
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Conversion(_) => ErrorSeverity::Error,
            Self::Context(_) => ErrorSeverity::Warning,
            Self::Index(_) => ErrorSeverity::Warning,
            Self::Server(e) => e.severity(),
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "conversion",
            Self::Context(_) => "context",
            Self::Index(_) => "index",
            Self::Server(_) => "server",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Conversion(e) => e.error_code(),
            Self::Context(e) => e.error_code(),
            Self::Index(e) => e.error_code(),
            Self::Server(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
        }
    }

    /// Returns the protocol status code this failure maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conversion(ConversionError::TypeMismatch { .. }) => StatusCode::BAD_TYPE_MISMATCH,
            Self::Conversion(_) => StatusCode::BAD_INTERNAL_ERROR,
            Self::Context(_) => StatusCode::BAD_INTERNAL_ERROR,
            Self::Index(IndexError::AlreadyRegistered { .. }) => StatusCode::BAD_NODE_ID_EXISTS,
            Self::Index(_) => StatusCode::BAD_NODE_ID_UNKNOWN,
            Self::Server(ServerError::Rejected { status, .. }) => *status,
            Self::Server(ServerError::NotBound | ServerError::NotReady) => {
                StatusCode::BAD_SERVER_NOT_CONNECTED
            }
            Self::Server(_) => StatusCode::BAD_INTERNAL_ERROR,
            Self::Configuration(_) => StatusCode::BAD_CONFIGURATION_ERROR,
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let code = self.error_code();

        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// Variant conversion errors.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The variant holds a different kind than requested.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type.
        expected: String,
        /// Actual type.
        actual: String,
    },

    /// The variant carries no value.
    #[error("Variant is empty")]
    EmptyVariant,

    /// The array holds no elements.
    #[error("Array is empty")]
    EmptyArray,

    /// The array is not one-dimensional.
    #[error("Array with {dimensions} dimensions cannot be read as a sequence")]
    NotVectorizable {
        /// Number of dimensions of the source array.
        dimensions: usize,
    },

    /// Array dimensions do not match the element count.
    #[error("Array dimensions {dimensions:?} do not cover {length} elements")]
    DimensionMismatch {
        /// Declared dimensions.
        dimensions: Vec<u32>,
        /// Actual element count.
        length: usize,
    },

    /// The array mixes element kinds.
    #[error("Array element {position} is {actual}, expected {expected}")]
    HeterogeneousArray {
        /// Position of the first offending element.
        position: usize,
        /// Declared element type.
        expected: String,
        /// Actual element type.
        actual: String,
    },

    /// A numeric range could not be parsed or applied.
    #[error("Invalid numeric range '{range}': {message}")]
    InvalidRange {
        /// The range text.
        range: String,
        /// Error message.
        message: String,
    },
}

impl ConversionError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a heterogeneous array error.
    pub fn heterogeneous(
        position: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::HeterogeneousArray {
            position,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid range error.
    pub fn invalid_range(range: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.into(),
            message: message.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::new(1, 2),
            Self::EmptyVariant => ErrorCode::new(1, 3),
            Self::EmptyArray => ErrorCode::new(1, 4),
            Self::NotVectorizable { .. } => ErrorCode::new(1, 5),
            Self::DimensionMismatch { .. } => ErrorCode::new(1, 6),
            Self::HeterogeneousArray { .. } => ErrorCode::new(1, 7),
            Self::InvalidRange { .. } => ErrorCode::new(1, 8),
        }
    }
}

// =============================================================================
// ContextError
// =============================================================================

/// Precondition violations on a node context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The context already has an identity.
    #[error("Node identity already bound to {node_id}")]
    IdentityAlreadyBound {
        /// The existing identity.
        node_id: String,
    },

    /// The context has no identity yet.
    #[error("Node '{name}' has no identity")]
    Unbound {
        /// Display name of the context.
        name: String,
    },

    /// The context already has a parent.
    #[error("Node {node_id} already has parent {parent}")]
    ParentAlreadySet {
        /// The child identity.
        node_id: String,
        /// The current parent.
        parent: String,
    },

    /// The context has no parent to remove.
    #[error("Node {node_id} has no parent")]
    NotParented {
        /// The node identity.
        node_id: String,
    },

    /// The child is already recorded.
    #[error("Node {child} is already a child of {parent}")]
    ChildAlreadyPresent {
        /// The parent identity.
        parent: String,
        /// The child identity.
        child: String,
    },

    /// The child is not recorded.
    #[error("Node {child} is not a child of {parent}")]
    ChildNotPresent {
        /// The parent identity.
        parent: String,
        /// The child identity.
        child: String,
    },

    /// A node cannot be its own child.
    #[error("Node {node_id} cannot be its own child")]
    SelfReference {
        /// The node identity.
        node_id: String,
    },

    /// Object type name outside of the known vocabulary.
    #[error("Unknown object type name '{name}'")]
    UnknownObjectType {
        /// The rejected name.
        name: String,
    },

    /// Object type code outside of the known vocabulary.
    #[error("Unknown object type code {code}")]
    UnknownObjectTypeCode {
        /// The rejected code.
        code: u32,
    },

    /// Method argument index out of bounds.
    #[error("{direction} argument index {index} out of range (count {count})")]
    ArgumentOutOfRange {
        /// "input" or "output".
        direction: &'static str,
        /// Requested index.
        index: usize,
        /// Number of arguments.
        count: usize,
    },

    /// The operation requires a different node kind.
    #[error("Node {node_id} is a {actual} node, expected {expected}")]
    WrongNodeKind {
        /// The node identity.
        node_id: String,
        /// Required kind.
        expected: &'static str,
        /// Actual kind.
        actual: &'static str,
    },

    /// The context is borrowed elsewhere.
    #[error("Node {node_id} is busy")]
    Busy {
        /// The node identity.
        node_id: String,
    },
}

impl ContextError {
    /// Creates an identity-already-bound error.
    pub fn identity_already_bound(node_id: impl Into<String>) -> Self {
        Self::IdentityAlreadyBound {
            node_id: node_id.into(),
        }
    }

    /// Creates an unbound error.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self::Unbound { name: name.into() }
    }

    /// Creates a parent-already-set error.
    pub fn parent_already_set(node_id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::ParentAlreadySet {
            node_id: node_id.into(),
            parent: parent.into(),
        }
    }

    /// Creates a not-parented error.
    pub fn not_parented(node_id: impl Into<String>) -> Self {
        Self::NotParented {
            node_id: node_id.into(),
        }
    }

    /// Creates a child-already-present error.
    pub fn child_already_present(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::ChildAlreadyPresent {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Creates a child-not-present error.
    pub fn child_not_present(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::ChildNotPresent {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Creates an argument-out-of-range error.
    pub fn argument_out_of_range(direction: &'static str, index: usize, count: usize) -> Self {
        Self::ArgumentOutOfRange {
            direction,
            index,
            count,
        }
    }

    /// Creates a wrong-node-kind error.
    pub fn wrong_kind(
        node_id: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongNodeKind {
            node_id: node_id.into(),
            expected,
            actual,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::IdentityAlreadyBound { .. } => ErrorCode::new(2, 1),
            Self::Unbound { .. } => ErrorCode::new(2, 2),
            Self::ParentAlreadySet { .. } => ErrorCode::new(2, 3),
            Self::NotParented { .. } => ErrorCode::new(2, 4),
            Self::ChildAlreadyPresent { .. } => ErrorCode::new(2, 5),
            Self::ChildNotPresent { .. } => ErrorCode::new(2, 6),
            Self::SelfReference { .. } => ErrorCode::new(2, 7),
            Self::UnknownObjectType { .. } => ErrorCode::new(2, 8),
            Self::UnknownObjectTypeCode { .. } => ErrorCode::new(2, 9),
            Self::ArgumentOutOfRange { .. } => ErrorCode::new(2, 10),
            Self::WrongNodeKind { .. } => ErrorCode::new(2, 11),
            Self::Busy { .. } => ErrorCode::new(2, 12),
        }
    }
}

// =============================================================================
// IndexError
// =============================================================================

/// Node index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An entry for the identity already exists.
    #[error("Node {node_id} is already registered")]
    AlreadyRegistered {
        /// The colliding identity.
        node_id: String,
    },

    /// No entry exists for the identity.
    #[error("Node {node_id} is not registered")]
    NotRegistered {
        /// The missing identity.
        node_id: String,
    },

    /// A context without identity cannot be registered.
    #[error("Cannot register node '{name}' without identity")]
    Unbound {
        /// Display name of the context.
        name: String,
    },
}

impl IndexError {
    /// Creates an already-registered error.
    pub fn already_registered(node_id: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            node_id: node_id.into(),
        }
    }

    /// Creates a not-registered error.
    pub fn not_registered(node_id: impl Into<String>) -> Self {
        Self::NotRegistered {
            node_id: node_id.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::AlreadyRegistered { .. } => ErrorCode::new(3, 1),
            Self::NotRegistered { .. } => ErrorCode::new(3, 2),
            Self::Unbound { .. } => ErrorCode::new(3, 3),
        }
    }
}

// =============================================================================
// ServerError
// =============================================================================

/// Address-space server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// No server has been bound to the handler.
    #[error("No address-space server bound")]
    NotBound,

    /// A server is already bound.
    #[error("An address-space server is already bound")]
    AlreadyBound,

    /// The bound server does not accept requests.
    #[error("Address-space server is not ready")]
    NotReady,

    /// A variable node with neither read nor write access has nothing to serve.
    #[error("Variable {node_id} is neither readable nor writeable")]
    NothingToServe {
        /// The variable identity.
        node_id: String,
    },

    /// The server answered with a bad status code.
    #[error("Server rejected {operation} for {node_id}: {status}")]
    Rejected {
        /// The attempted operation.
        operation: &'static str,
        /// The node identity.
        node_id: String,
        /// The returned status.
        status: StatusCode,
    },
}

impl ServerError {
    /// Creates a nothing-to-serve error.
    pub fn nothing_to_serve(node_id: impl Into<String>) -> Self {
        Self::NothingToServe {
            node_id: node_id.into(),
        }
    }

    /// Creates a rejected error.
    pub fn rejected(operation: &'static str, node_id: impl Into<String>, status: StatusCode) -> Self {
        Self::Rejected {
            operation,
            node_id: node_id.into(),
            status,
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotReady => ErrorSeverity::Warning,
            Self::NothingToServe { .. } => ErrorSeverity::Warning,
            Self::AlreadyBound => ErrorSeverity::Warning,
            Self::NotBound | Self::Rejected { .. } => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotBound => ErrorCode::new(4, 1),
            Self::AlreadyBound => ErrorCode::new(4, 2),
            Self::NotReady => ErrorCode::new(4, 3),
            Self::NothingToServe { .. } => ErrorCode::new(4, 4),
            Self::Rejected { .. } => ErrorCode::new(4, 5),
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A field holds an invalid value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// A node id string could not be parsed.
    #[error("Invalid node id '{node_id}': {reason}")]
    InvalidNodeId {
        /// The node id text.
        node_id: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The file extension is not a known format.
    #[error("Unsupported configuration format: {extension}")]
    UnsupportedFormat {
        /// The extension.
        extension: String,
    },

    /// The content could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// Parser message.
        message: String,
    },

    /// Reading the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {message}")]
    Logging {
        /// Error message.
        message: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid node id error.
    pub fn invalid_node_id(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidValue { .. } => ErrorCode::new(5, 1),
            Self::InvalidNodeId { .. } => ErrorCode::new(5, 2),
            Self::FileNotFound { .. } => ErrorCode::new(5, 3),
            Self::UnsupportedFormat { .. } => ErrorCode::new(5, 4),
            Self::Parse { .. } => ErrorCode::new(5, 5),
            Self::Io { .. } => ErrorCode::new(5, 6),
            Self::Logging { .. } => ErrorCode::new(5, 7),
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, no action needed.
    Info,
    /// The operation was refused but the node model is intact.
    Warning,
    /// The operation failed.
    Error,
    /// The component cannot start.
    Critical,
}

impl ErrorSeverity {
    /// Converts to a tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code, rendered as `UN-CCNN`.
///
/// Categories:
/// - 1: Conversion
/// - 2: Context
/// - 3: Index
/// - 4: Server
/// - 5: Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-5).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UN-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A Result type with NodeError.
pub type NodeResult<T> = Result<T, NodeError>;

/// A Result type with ConversionError.
pub type ConversionResult<T> = Result<T, ConversionError>;

// =============================================================================
// Error Context Extension
// =============================================================================

/// Extension trait for attaching node context to error logs.
pub trait NodeErrorContext<T> {
    /// Logs the error together with the node it concerns.
    fn with_node(self, node_id: &str) -> NodeResult<T>;
}

impl<T> NodeErrorContext<T> for NodeResult<T> {
    fn with_node(self, node_id: &str) -> NodeResult<T> {
        self.map_err(|e| {
            tracing::debug!(node_id = node_id, error = %e, "node operation failed");
            e
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        let code = ErrorCode::new(3, 1);
        assert_eq!(code.to_string(), "UN-0301");
        assert_eq!(code.as_u16(), 0x0301);
    }

    #[test]
    fn test_index_error_maps_to_status() {
        let error = NodeError::index(IndexError::already_registered("ns=1;s=A"));
        assert_eq!(error.status_code(), StatusCode::BAD_NODE_ID_EXISTS);
        assert_eq!(error.error_code(), ErrorCode::new(3, 1));

        let error = NodeError::not_registered("ns=1;s=B");
        assert_eq!(error.status_code(), StatusCode::BAD_NODE_ID_UNKNOWN);
    }

    #[test]
    fn test_server_rejection_keeps_status() {
        let error = NodeError::server(ServerError::rejected(
            "addObjectNode",
            "ns=1;s=Obj",
            StatusCode::BAD_PARENT_NODE_ID_INVALID,
        ));
        assert_eq!(error.status_code(), StatusCode::BAD_PARENT_NODE_ID_INVALID);
        assert!(error.to_string().contains("addObjectNode"));
    }

    #[test]
    fn test_retryable_only_when_not_ready() {
        assert!(NodeError::server(ServerError::NotReady).is_retryable());
        assert!(!NodeError::server_not_bound().is_retryable());
        assert!(!NodeError::from(ConversionError::type_mismatch("Int32", "String")).is_retryable());
    }

    #[test]
    fn test_severity_and_category() {
        let error = NodeError::context(ContextError::not_parented("ns=1;s=X"));
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.category(), "context");
        assert_eq!(error.tracing_level(), Level::WARN);

        let error = NodeError::configuration(ConfigurationError::parse("bad yaml"));
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_argument_out_of_range_message() {
        let error = ContextError::argument_out_of_range("input", 2, 2);
        let text = error.to_string();
        assert!(text.contains("input"));
        assert!(text.contains("count 2"));
    }

    #[test]
    fn test_with_node_passes_error_through() {
        let result: NodeResult<()> = Err(NodeError::not_registered("ns=1;i=7"));
        let result = result.with_node("ns=1;i=7");
        assert!(matches!(result, Err(NodeError::Index(IndexError::NotRegistered { .. }))));
    }
}
