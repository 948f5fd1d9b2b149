//! Integration tests against a real Postgres instance.
//!
//! Gated with `#[ignore]`: these need a reachable database and a
//! pre-created test table, matching the original binding's own
//! `pytest.skip`-on-missing-database behaviour — CI opts in explicitly
//! with `cargo test -- --ignored` once a database is available, rather
//! than these silently failing on every contributor's machine.
//!
//! Connection parameters come from individual `JREG_TEST_*` environment
//! variables (falling back to sane localhost defaults) rather than a
//! single DSN, since `Configuration` itself takes discrete fields.
//!
//! Run against a throwaway database with:
//! ```text
//! CREATE TABLE json_objects_test (
//!     id BIGSERIAL PRIMARY KEY,
//!     json_object JSONB UNIQUE NOT NULL
//! );
//! ```

use jreg_core::config::ConfigurationParams;
use jreg_core::{Configuration, Value};
use jreg_store::Engine;
use tracing_subscriber::EnvFilter;

/// Mirrors the subscriber setup in `msez-cli`'s `main.rs`: env-filtered
/// `fmt` output so a failing test's `tracing::warn!`s from `jreg-store`
/// show up alongside the assertion failure. `try_init` rather than
/// `init` because every test in this binary calls it and only the first
/// call may succeed.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn test_config() -> Configuration {
    Configuration::new(ConfigurationParams {
        database_name: env_or("JREG_TEST_DB_NAME", "json_register_test"),
        database_host: env_or("JREG_TEST_DB_HOST", "localhost"),
        database_user: env_or("JREG_TEST_DB_USER", "postgres"),
        database_password: env_or("JREG_TEST_DB_PASSWORD", "postgres"),
        database_port: env_or("JREG_TEST_DB_PORT", "5432")
            .parse()
            .expect("JREG_TEST_DB_PORT must be a u16"),
        pool_size: 5,
        lru_cache_size: 1000,
        table_name: "json_objects_test".into(),
        id_column: "id".into(),
        jsonb_column: "json_object".into(),
    })
    .expect("hardcoded test config is valid")
}

fn obj(pairs: &[(&str, Value)]) -> Value {
    Value::Object(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

#[tokio::test]
#[ignore]
async fn register_object_is_idempotent() {
    init_tracing();
    let engine = Engine::connect(test_config()).await.expect("connect");

    let a = obj(&[("a", Value::Integer(1)), ("b", Value::Integer(2))]);
    let id1 = engine.register_object(&a).await.expect("first register");
    let id2 = engine.register_object(&a).await.expect("second register");
    assert_eq!(id1, id2);

    let different = obj(&[("a", Value::Integer(1)), ("b", Value::Integer(3))]);
    let id3 = engine
        .register_object(&different)
        .await
        .expect("register different");
    assert_ne!(id1, id3);
}

#[tokio::test]
#[ignore]
async fn register_batch_objects_dedups_and_preserves_order() {
    init_tracing();
    let engine = Engine::connect(test_config()).await.expect("connect");

    let objs = vec![
        obj(&[("a", Value::Integer(1))]),
        obj(&[("b", Value::Integer(2))]),
        obj(&[("a", Value::Integer(1))]),
    ];
    let ids = engine
        .register_batch_objects(&objs)
        .await
        .expect("register batch");

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], ids[2]);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
#[ignore]
async fn register_batch_objects_preserves_order_across_calls() {
    init_tracing();
    let engine = Engine::connect(test_config()).await.expect("connect");

    let first: Vec<Value> = (0..100)
        .map(|i| obj(&[("k", Value::Integer(i))]))
        .collect();
    let ids = engine
        .register_batch_objects(&first)
        .await
        .expect("register first batch");
    assert_eq!(ids.len(), 100);
    assert_eq!(
        ids.iter().collect::<std::collections::HashSet<_>>().len(),
        100
    );

    let second: Vec<Value> = (50..150)
        .map(|i| obj(&[("k", Value::Integer(i))]))
        .collect();
    let ids2 = engine
        .register_batch_objects(&second)
        .await
        .expect("register second batch");

    assert_eq!(ids2.len(), 100);
    assert_eq!(ids2[..50], ids[50..]);
}

#[tokio::test]
#[ignore]
async fn distinct_types_never_collide() {
    init_tracing();
    let engine = Engine::connect(test_config()).await.expect("connect");

    let id_int = engine
        .register_object(&obj(&[("a", Value::Integer(1))]))
        .await
        .unwrap();
    let id_str = engine
        .register_object(&obj(&[("a", Value::String("1".into()))]))
        .await
        .unwrap();
    assert_ne!(id_int, id_str);

    let id_true = engine
        .register_object(&obj(&[("a", Value::Bool(true))]))
        .await
        .unwrap();
    let id_false = engine
        .register_object(&obj(&[("a", Value::Bool(false))]))
        .await
        .unwrap();
    assert_ne!(id_true, id_false);

    let id_null = engine
        .register_object(&obj(&[("a", Value::Null)]))
        .await
        .unwrap();
    let id_empty_array = engine
        .register_object(&obj(&[("a", Value::Array(vec![]))]))
        .await
        .unwrap();
    assert_ne!(id_null, id_empty_array);
}

#[tokio::test]
#[ignore]
async fn concurrent_registration_of_equal_values_converges_on_one_id() {
    init_tracing();
    use std::sync::Arc;

    let engine = Arc::new(Engine::connect(test_config()).await.expect("connect"));
    let value = obj(&[("shared", Value::Integer(42))]);

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        let value = value.clone();
        tasks.push(tokio::spawn(
            async move { engine.register_object(&value).await },
        ));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("task panicked").expect("register"));
    }

    assert!(ids.iter().all(|id| *id == ids[0]));
}

#[tokio::test]
#[ignore]
async fn closed_engine_rejects_further_operations() {
    init_tracing();
    let engine = Engine::connect(test_config()).await.expect("connect");
    engine.close();

    let result = engine
        .register_object(&obj(&[("a", Value::Integer(1))]))
        .await;
    assert!(result.is_err());
}
