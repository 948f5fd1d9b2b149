//! # Error Types — Configuration and Value Validation
//!
//! `thiserror` provides the `Display`/`Error` derive, matching the rest of
//! the workspace.
//!
//! `ConfigError` messages are fixed strings required verbatim by the
//! original specification for cross-implementation test compatibility —
//! do not reword them, even to make them more fluent.

use thiserror::Error;

/// Eager validation failure at engine construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("database_name cannot be empty")]
    EmptyDatabaseName,

    #[error("database_host cannot be empty")]
    EmptyDatabaseHost,

    #[error("database_port must be between 1 and 65535")]
    InvalidPort,

    #[error("pool_size must be greater than 0")]
    ZeroPoolSize,

    #[error("pool_size exceeds reasonable maximum")]
    PoolSizeTooLarge,

    #[error("{field} cannot be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("{field} must start with a letter or underscore")]
    IdentifierBadStart { field: &'static str },

    #[error("invalid character {ch:?} in {field}: {value}")]
    IdentifierBadChar {
        field: &'static str,
        value: String,
        ch: char,
    },
}

/// A JSON value outside the variant set this registry can canonicalise.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BadValue {
    #[error("non-finite float cannot be canonicalised: {0}")]
    NonFiniteFloat(f64),

    #[error("integer value does not fit in a signed 64-bit identifier")]
    IntegerOutOfRange,
}
