//! # jreg-core — Foundational Types for the JSON Object Registry
//!
//! This crate is the bedrock of the registry: the closed JSON value variant
//! that stands in for whatever dynamic representation a host program uses,
//! the deterministic canonical-byte serializer built on top of it, and the
//! eager configuration validator that proves table/column identifiers are
//! safe to interpolate into SQL text without escaping.
//!
//! ## Key Design Principles
//!
//! 1. **`Value` is the sole input to canonicalisation.** Unlike
//!    `serde_json::Value`, it keeps `Integer` and `Float` as distinct
//!    variants and can represent a non-finite float right up until
//!    [`canonical::canonicalise`] rejects it — `serde_json::Value` cannot
//!    hold `NaN` at all, so catching it has to happen one layer up, at the
//!    boundary where a host's dynamic value is mapped into this enum.
//!
//! 2. **`canonicalise()` is the only path to a `Cval`.** There is no
//!    alternate "fast path" that skips escaping or key sorting.
//!
//! 3. **`Configuration::new()` is the only way to get a `Configuration`.**
//!    Construction is fallible and proves the identifier-safety invariant
//!    once, at startup, so call sites never re-validate or re-escape.
//!
//! ## Crate Policy
//!
//! - No dependencies on other internal crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod error;
pub mod value;

pub use canonical::canonicalise;
pub use config::Configuration;
pub use error::{BadValue, ConfigError};
pub use value::Value;

/// A positive, store-assigned identifier. Monotonic per table, never reused.
///
/// Matches the `BIGSERIAL` / `BIGINT` type sqlx maps to `i64` for Postgres;
/// a plain `i64` rather than a `NonZeroI64` newtype is enough here because
/// positivity is guaranteed by the store's sequence, not by anything this
/// crate constructs.
pub type Id = i64;

/// The canonical byte representation of a [`Value`]. Two JSON values are
/// equivalent iff their `Cval`s are byte-equal.
pub type Cval = Vec<u8>;
