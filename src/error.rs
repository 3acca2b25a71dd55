//! Error types for sequence operations.
//!
//! Every failure raised by a cursor, an operator, or a compiled lambda is a
//! [`SeqError`]. None of the operators swallow or retry: an error raised while
//! pulling an element propagates straight to the caller of the terminal
//! operation that triggered the pull.

use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`SeqError`], handy for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArgumentNull,
    Argument,
    Format,
    ArgumentOutOfRange,
    InvalidOperation,
    MultipleElements,
    KeyNotFound,
    Unsupported,
    Json,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ArgumentNull => "argument-null",
            Self::Argument => "argument",
            Self::Format => "format",
            Self::ArgumentOutOfRange => "argument-out-of-range",
            Self::InvalidOperation => "invalid-operation",
            Self::MultipleElements => "multiple-elements",
            Self::KeyNotFound => "key-not-found",
            Self::Unsupported => "unsupported",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building or driving a sequence.
#[derive(Debug, Error)]
pub enum SeqError {
    /// A required callable or expression was not supplied.
    #[error("value cannot be null: {param}")]
    ArgumentNull { param: &'static str },

    /// A value cannot be interpreted as a callable or as a valid target.
    #[error("invalid argument: {message}")]
    Argument { message: String },

    /// Lexical error in lambda source text.
    #[error("malformed expression at offset {position}: {message}")]
    Format { message: String, position: usize },

    /// A count or index is outside the accepted range.
    #[error("argument out of range: {param} = {value}")]
    ArgumentOutOfRange { param: &'static str, value: String },

    /// The operation is not valid in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    /// `single` found more than one matching element.
    #[error("sequence contains more than one matching element (second match at index {index})")]
    MultipleElements { index: usize },

    /// A key was absent, or was duplicated where uniqueness is required.
    #[error("key not found or not unique: {key}")]
    KeyNotFound { key: String },

    /// The cursor does not support the requested capability.
    #[error("unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeqError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    #[cfg_attr(not(feature = "lambda"), allow(dead_code))]
    pub(crate) fn format(message: impl Into<String>, position: usize) -> Self {
        Self::Format {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub(crate) fn out_of_range(param: &'static str, value: impl fmt::Display) -> Self {
        Self::ArgumentOutOfRange {
            param,
            value: value.to_string(),
        }
    }

    pub(crate) fn key_not_found(key: impl fmt::Debug) -> Self {
        Self::KeyNotFound {
            key: format!("{key:?}"),
        }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    pub(crate) fn no_elements() -> Self {
        Self::invalid("sequence contains no elements")
    }

    /// The classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentNull { .. } => ErrorKind::ArgumentNull,
            Self::Argument { .. } => ErrorKind::Argument,
            Self::Format { .. } => ErrorKind::Format,
            Self::ArgumentOutOfRange { .. } => ErrorKind::ArgumentOutOfRange,
            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Self::MultipleElements { .. } => ErrorKind::MultipleElements,
            Self::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    #[must_use]
    pub const fn is_argument_null(&self) -> bool {
        matches!(self.kind(), ErrorKind::ArgumentNull)
    }

    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::ArgumentOutOfRange)
    }

    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidOperation)
    }

    #[must_use]
    pub const fn is_multiple_elements(&self) -> bool {
        matches!(self.kind(), ErrorKind::MultipleElements)
    }
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, SeqError>;
