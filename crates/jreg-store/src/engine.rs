//! # Registry Engine — C5
//!
//! [`Engine`] is the public surface of the crate: open a connection pool,
//! register single or batched JSON values, and get back store-assigned
//! [`Id`]s. Two states only, matching the original design's state
//! machine — `Ready` while the pool is open and serving, `Torn` once
//! [`Engine::close`] has run. There is no `Connecting` state because
//! [`Engine::connect`] either returns a `Ready` engine or an [`InitError`]
//! — nothing in between is ever observable to a caller.
//!
//! A single `AtomicBool` is enough to carry that two-state machine; the
//! teacher crate's typestate pattern for richer lifecycles (several
//! states, several legal transitions) would be solving a problem this
//! engine doesn't have.

use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::PgPool;

use jreg_cache::IdCache;
use jreg_core::{canonicalise, Configuration, Cval, Id, Value};

use crate::error::{InitError, OperationError, StoreError};

/// Unresolved batch entries larger than this are split into chunks before
/// being sent to the store in a single statement. Keeps the parameter
/// count (and the server-side work of a single `UNNEST` + upsert) within
/// a sane bound regardless of how large a caller's batch is.
const MAX_BATCH_CHUNK: usize = 1000;

/// The registry engine: an open pool, a bounded identifier cache, and a
/// frozen [`Configuration`] naming the backing table/columns.
pub struct Engine {
    pool: PgPool,
    config: Configuration,
    cache: IdCache,
    ready: AtomicBool,
}

impl Engine {
    /// Open a connection pool against `config` and return a `Ready`
    /// engine. The table named by `config` must already exist with a
    /// unique constraint on its jsonb column — this engine never creates
    /// or migrates schema.
    pub async fn connect(config: Configuration) -> Result<Self, InitError> {
        let pool = crate::pool::connect(&config).await?;
        let cache = IdCache::new(config.lru_cache_size());
        Ok(Self {
            pool,
            config,
            cache,
            ready: AtomicBool::new(true),
        })
    }

    /// Tear the engine down. Idempotent; further operations fail with
    /// [`StoreError::Torn`] rather than silently reconnecting.
    pub fn close(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    fn check_ready(&self) -> Result<(), StoreError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Torn)
        }
    }

    /// Register a single value, returning its store-assigned identifier.
    /// Registering an equal value twice returns the same identifier both
    /// times.
    pub async fn register_object(&self, value: &Value) -> Result<Id, OperationError> {
        self.check_ready()?;
        let cval = canonicalise(value)?;

        if let Some(id) = self.cache.probe(&cval) {
            return Ok(id);
        }

        let sql = format!(
            "INSERT INTO {table} ({jsonb_col}) VALUES ($1) \
             ON CONFLICT ({jsonb_col}) DO UPDATE SET {jsonb_col} = EXCLUDED.{jsonb_col} \
             RETURNING {id_col}",
            table = self.config.table_name(),
            jsonb_col = self.config.jsonb_column(),
            id_col = self.config.id_column(),
        );

        let json_text =
            std::str::from_utf8(&cval).expect("canonicalise() always produces valid UTF-8");
        let value_json: serde_json::Value =
            serde_json::from_str(json_text).expect("canonicalise() always produces valid JSON");

        let row: (Id,) = sqlx::query_as(&sql)
            .bind(sqlx::types::Json(value_json))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "register_object upsert failed");
                StoreError::from(err)
            })?;

        self.cache.insert(cval, row.0);
        Ok(row.0)
    }

    /// Register a batch of values, preserving input order in the
    /// returned identifiers. Duplicate values — whether duplicated
    /// within the batch or already known to the store — resolve to the
    /// same identifier without issuing more than one upsert per distinct
    /// value.
    pub async fn register_batch_objects(
        &self,
        values: &[Value],
    ) -> Result<Vec<Id>, OperationError> {
        self.check_ready()?;

        let cvals: Vec<Cval> = values
            .iter()
            .map(canonicalise)
            .collect::<Result<_, _>>()?;

        let mut ids: Vec<Option<Id>> = vec![None; cvals.len()];

        // First pass: satisfy every position the cache already knows
        // about, and collect the distinct unresolved Cvals in first-seen
        // order so we upsert each one exactly once.
        let mut unresolved: Vec<Cval> = Vec::new();
        let mut unresolved_positions: std::collections::HashMap<Cval, Vec<usize>> =
            std::collections::HashMap::new();

        for (i, cval) in cvals.iter().enumerate() {
            if let Some(id) = self.cache.probe(cval) {
                ids[i] = Some(id);
                continue;
            }
            unresolved_positions
                .entry(cval.clone())
                .or_insert_with(|| {
                    unresolved.push(cval.clone());
                    Vec::new()
                })
                .push(i);
        }

        for chunk in unresolved.chunks(MAX_BATCH_CHUNK) {
            let resolved = self.upsert_chunk(chunk).await?;
            for (cval, id) in resolved {
                self.cache.insert(cval.clone(), id);
                if let Some(positions) = unresolved_positions.get(&cval) {
                    for &pos in positions {
                        ids[pos] = Some(id);
                    }
                }
            }
        }

        ids.into_iter()
            .map(|id| id.ok_or_else(|| StoreError::Query(sqlx::Error::RowNotFound).into()))
            .collect()
    }

    /// Upsert one chunk of distinct, unresolved Cvals and return their
    /// resolved `(Cval, Id)` pairs.
    ///
    /// Postgres's `jsonb` column does not preserve the exact byte layout
    /// of the text it was given — whitespace and number formatting can
    /// be rewritten on the way in, and object keys may come back in a
    /// different order. So the `jsonb` text this query returns cannot be
    /// matched against our original Cvals by byte equality. Instead we
    /// re-parse what the store handed back and run it through
    /// `canonicalise()` again: two representations of the same JSON
    /// value always canonicalise to the same bytes, so the recovered
    /// Cval matches the one we sent even though the wire bytes differ.
    async fn upsert_chunk(&self, chunk: &[Cval]) -> Result<Vec<(Cval, Id)>, OperationError> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<sqlx::types::Json<serde_json::Value>> = chunk
            .iter()
            .map(|cval| {
                let text = std::str::from_utf8(cval).expect("Cval is always valid UTF-8");
                sqlx::types::Json(serde_json::from_str(text).expect("Cval is always valid JSON"))
            })
            .collect();

        let sql = format!(
            "INSERT INTO {table} ({jsonb_col}) \
             SELECT * FROM UNNEST($1::jsonb[]) \
             ON CONFLICT ({jsonb_col}) DO UPDATE SET {jsonb_col} = EXCLUDED.{jsonb_col} \
             RETURNING {id_col}, {jsonb_col}",
            table = self.config.table_name(),
            jsonb_col = self.config.jsonb_column(),
            id_col = self.config.id_column(),
        );

        let rows: Vec<(Id, sqlx::types::Json<serde_json::Value>)> = sqlx::query_as(&sql)
            .bind(values)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, chunk_size = chunk.len(), "batch upsert chunk failed");
                StoreError::from(err)
            })?;

        rows.into_iter()
            .map(|(id, jsonb)| {
                let value = Value::try_from(jsonb.0)?;
                let cval = canonicalise(&value)?;
                Ok((cval, id))
            })
            .collect()
    }
}
