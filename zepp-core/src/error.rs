//! Error types for typed property access.

use thiserror::Error;

/// Errors produced when reading a property as a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    /// The key is not present on the object.
    #[error("key `{0}` is not present")]
    MissingKey(String),

    /// The key is present but holds a value of another kind.
    #[error("key `{key}` holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ReactiveError>;
