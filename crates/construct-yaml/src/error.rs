//! Error types for the YAML codec.

use construct_core::ConstructError;
use thiserror::Error;

/// Errors produced while encoding or decoding constructs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid YAML.
    #[error("parse error: {0}")]
    Parse(String),

    /// The emitter rejected the document.
    #[error("emit error: {0}")]
    Emit(String),

    /// The top-level document must be a mapping (or empty).
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },

    /// Applying the decoded entries to a construct failed.
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

/// Convenience type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
