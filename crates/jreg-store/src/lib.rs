//! # jreg-store — The Registry Engine
//!
//! Wires the closed `Value`/canonicalisation layer from `jreg-core` and
//! the bounded identifier cache from `jreg-cache` to a Postgres-backed
//! store, exposing a single [`Engine`] type as the crate's public
//! surface.
//!
//! ## Crate Policy
//!
//! - The caller owns schema: `Engine::connect` never creates or migrates
//!   the backing table. It must already exist with a unique constraint
//!   on its jsonb column.
//! - Every upsert goes through `jreg_core::canonicalise` first — there is
//!   no path from a `Value` to a stored row that skips it.
//! - No HTTP surface, no CLI binary. This crate is a library engine
//!   meant to be embedded in a caller's own process.

pub mod engine;
pub mod error;
pub mod pool;

pub use engine::Engine;
pub use error::{InitError, OperationError, StoreError};
