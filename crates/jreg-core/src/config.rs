//! # Configuration — Eager Validation at Construction
//!
//! [`Configuration`] is a frozen record: the only way to get one is through
//! [`Configuration::new`], which validates every field once, at
//! construction, and returns a [`ConfigError`] naming the first violation
//! it finds. Nothing downstream re-validates or re-escapes — table and
//! column names are proven identifier-safe here so they can be
//! interpolated into SQL text as bare identifiers later.
//!
//! "Identifier-safe" means: first character is a letter or underscore;
//! remaining characters are letters, digits, or underscores. No quoting,
//! no whitespace, no punctuation.

use crate::error::ConfigError;

const MAX_POOL_SIZE: u32 = 10_000;

/// Raw, unvalidated construction parameters. Pass this to
/// [`Configuration::new`] to validate and freeze it.
#[derive(Debug, Clone)]
pub struct ConfigurationParams {
    pub database_name: String,
    pub database_host: String,
    pub database_user: String,
    pub database_password: String,
    pub database_port: u16,
    pub pool_size: u32,
    pub lru_cache_size: usize,
    pub table_name: String,
    pub id_column: String,
    pub jsonb_column: String,
}

impl Default for ConfigurationParams {
    fn default() -> Self {
        Self {
            database_name: String::new(),
            database_host: String::new(),
            database_user: String::from("postgres"),
            database_password: String::new(),
            database_port: 5432,
            pool_size: 10,
            lru_cache_size: 1000,
            table_name: String::from("json_objects"),
            id_column: String::from("id"),
            jsonb_column: String::from("jsonb"),
        }
    }
}

/// A validated, immutable set of connection and identifier parameters.
///
/// Lives from engine construction until teardown. No setter is exposed —
/// mutation would require constructing a new `Configuration`, which would
/// re-run validation anyway.
#[derive(Debug, Clone)]
pub struct Configuration {
    database_name: String,
    database_host: String,
    database_user: String,
    database_password: String,
    database_port: u16,
    pool_size: u32,
    lru_cache_size: usize,
    table_name: String,
    id_column: String,
    jsonb_column: String,
}

impl Configuration {
    /// Validate `params` and freeze them into a `Configuration`.
    ///
    /// `lru_cache_size == 0` is not an error — it is silently promoted to
    /// 1, matching the original binding's behaviour of treating "no cache"
    /// requests as "a cache of one" rather than refusing to start.
    pub fn new(params: ConfigurationParams) -> Result<Self, ConfigError> {
        if params.database_name.is_empty() {
            return Err(ConfigError::EmptyDatabaseName);
        }
        if params.database_host.is_empty() {
            return Err(ConfigError::EmptyDatabaseHost);
        }
        if params.database_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if params.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if params.pool_size > MAX_POOL_SIZE {
            return Err(ConfigError::PoolSizeTooLarge);
        }

        validate_identifier("table_name", &params.table_name)?;
        validate_identifier("id_column", &params.id_column)?;
        validate_identifier("jsonb_column", &params.jsonb_column)?;

        Ok(Self {
            database_name: params.database_name,
            database_host: params.database_host,
            database_user: params.database_user,
            database_password: params.database_password,
            database_port: params.database_port,
            pool_size: params.pool_size,
            lru_cache_size: params.lru_cache_size.max(1),
            table_name: params.table_name,
            id_column: params.id_column,
            jsonb_column: params.jsonb_column,
        })
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn database_host(&self) -> &str {
        &self.database_host
    }

    pub fn database_user(&self) -> &str {
        &self.database_user
    }

    pub fn database_password(&self) -> &str {
        &self.database_password
    }

    pub fn database_port(&self) -> u16 {
        self.database_port
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size
    }

    pub fn lru_cache_size(&self) -> usize {
        self.lru_cache_size
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn jsonb_column(&self) -> &str {
        &self.jsonb_column
    }
}

/// Proves a name is a bare SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_identifier(field: &'static str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyIdentifier { field });
    }

    let mut chars = name.chars();
    let first = chars.next().expect("checked non-empty above");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ConfigError::IdentifierBadStart { field });
    }

    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(ConfigError::IdentifierBadChar {
                field,
                value: name.to_owned(),
                ch,
            });
        }
    }

    Ok(())
}
