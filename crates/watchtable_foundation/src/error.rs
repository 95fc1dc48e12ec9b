//! Error types for the Watchtable containers.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Watchtable operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Shorthand for attaching a container/operation context.
    #[must_use]
    pub fn during(self, container: &'static str, operation: &'static str) -> Self {
        self.with_context(
            ErrorContext::new()
                .with_container(container)
                .with_operation(operation),
        )
    }

    /// Creates a key not found error.
    #[must_use]
    pub fn key_not_found(key: &impl fmt::Debug) -> Self {
        Self::new(ErrorKind::KeyNotFound(format!("{key:?}")))
    }

    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key(key: &impl fmt::Debug) -> Self {
        Self::new(ErrorKind::DuplicateKey(format!("{key:?}")))
    }

    /// Creates an index out of range error.
    #[must_use]
    pub fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfRange { index, length })
    }

    /// Creates an invalid update kind error.
    #[must_use]
    pub fn invalid_update_kind(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUpdateKind(what.into()))
    }

    /// Creates a storage unresolved error.
    #[must_use]
    pub fn storage_unresolved(store: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnresolved(store.into()))
    }

    /// Creates an invalid enum choice error.
    #[must_use]
    pub fn invalid_choice(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidChoice {
            type_name: type_name.into(),
            value: value.into(),
        })
    }

    /// Creates a listener failure error.
    ///
    /// Listeners return this (or any other [`Error`]) to abort a dispatch.
    #[must_use]
    pub fn listener(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Listener(message.into()))
    }

    /// Returns true if this is a [`ErrorKind::KeyNotFound`] error.
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::KeyNotFound(_))
    }

    /// Returns true if this is a [`ErrorKind::DuplicateKey`] error.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self.kind, ErrorKind::DuplicateKey(_))
    }

    /// Returns true if this is a [`ErrorKind::IndexOutOfRange`] error.
    #[must_use]
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self.kind, ErrorKind::IndexOutOfRange { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// No element is associated with the key.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An add-style operation found the key already present.
    #[error("key already exists: {0}")]
    DuplicateKey(String),

    /// Positional access outside `[0, length)`.
    #[error("index out of range: {index} (length {length})")]
    IndexOutOfRange {
        /// The index that was accessed.
        index: usize,
        /// The length of the sequence at the time of access.
        length: usize,
    },

    /// An update kind the operation does not support, or an unrecognized raw value.
    #[error("invalid update kind: {0}")]
    InvalidUpdateKind(String),

    /// A deferred storage binding could not produce its store.
    #[error("storage not available: {0}")]
    StorageUnresolved(String),

    /// A string-backed enum choice no longer names a valid variant.
    #[error("invalid {type_name} choice: {value:?}")]
    InvalidChoice {
        /// The enum type the string was parsed as.
        type_name: String,
        /// The stored string.
        value: String,
    },

    /// No configuration table is registered for the row type.
    #[error("configuration not registered: {0}")]
    ConfigNotRegistered(String),

    /// A configuration table is already registered for the row type.
    #[error("configuration already registered: {0}")]
    DuplicateConfig(String),

    /// A listener callback failed.
    #[error("listener failed: {0}")]
    Listener(String),

    /// Serialized data could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Container type name, e.g. `IdList`.
    pub container: Option<&'static str>,
    /// Operation name, e.g. `remove`.
    pub operation: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container name.
    #[must_use]
    pub fn with_container(mut self, container: &'static str) -> Self {
        self.container = Some(container);
        self
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.container, self.operation) {
            (Some(container), Some(operation)) => write!(f, "in {container}::{operation}"),
            (Some(container), None) => write!(f, "in {container}"),
            (None, Some(operation)) => write!(f, "in {operation}"),
            (None, None) => Ok(()),
        }
    }
}

/// Result type alias using the Watchtable error type.
pub type Result<T> = std::result::Result<T, Error>;
