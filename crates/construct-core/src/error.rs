//! Error types for construct operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a [`Construct`].
///
/// Every variant is a contract violation by the caller. Nothing here is
/// transient and nothing is retried.
///
/// [`Construct`]: crate::Construct
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// The key is not a non-empty string or symbol.
    #[error("invalid key: {key} (keys must be non-empty strings or symbols)")]
    InvalidKey { key: String },

    /// The key has neither an explicit value nor a schema default.
    #[error("undeclared key: {key}")]
    UndeclaredKey { key: String },

    /// A nested construct was requested but the value is something else.
    #[error("value at {key} is not a construct")]
    NotAConstruct { key: String },

    /// An attribute call received the wrong number of arguments.
    #[error("wrong number of arguments for {name}: expected {expected}, got {given}")]
    Arity {
        name: String,
        expected: usize,
        given: usize,
    },
}

/// Convenience type alias for construct operations.
pub type Result<T> = std::result::Result<T, ConstructError>;
