use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid archive name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("unknown archive format: {0}")]
    UnknownFormat(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
