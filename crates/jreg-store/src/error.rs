//! # Error Taxonomy — Init, Store, and Operation Failures
//!
//! Three layers, matching where each can occur:
//!
//! - [`InitError`]: only during [`crate::engine::Engine::connect`] — the
//!   pool could not be opened.
//! - [`StoreError`]: a query against an already-open pool failed, or the
//!   engine has been torn down and refuses further work.
//! - [`OperationError`]: what `register_object`/`register_batch_objects`
//!   return — either the caller handed in a value this registry cannot
//!   canonicalise, or the store itself failed.

use thiserror::Error;

use jreg_core::BadValue;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("failed to connect to registry store: {0}")]
    Connect(#[source] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("registry store query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("engine has been torn down and accepts no further operations")]
    Torn,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err)
    }
}

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    BadValue(#[from] BadValue),

    #[error(transparent)]
    Store(#[from] StoreError),
}
