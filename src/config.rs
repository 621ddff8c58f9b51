use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{MemoryCache, MetadataCache};
use crate::connection::ConnectionDescriptor;
use crate::error::SqlDialectError;
use crate::literal::{MySqlSerializer, PostgresSerializer, SqliteSerializer, ValueSerializer};
use crate::query::{MySqlShaper, PostgresShaper, QueryShaper, SqliteShaper};
use crate::schema::{MySqlSchema, PostgresSchema, SchemaNormalizer, SchemaProvider, SqliteSchema};
use crate::types::Dialect;

/// Delimiters used when formatting dates and timestamps.
///
/// Each serializer receives its own copy at construction time.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let delims = DateDelimiters::default();
/// assert_eq!((delims.date.as_str(), delims.time.as_str(), delims.join.as_str()), ("-", ":", " "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateDelimiters {
    /// Between year, month and day
    pub date: String,
    /// Between hour, minute and second
    pub time: String,
    /// Between the date part and the time part
    pub join: String,
}

impl Default for DateDelimiters {
    fn default() -> Self {
        Self {
            date: "-".to_string(),
            time: ":".to_string(),
            join: " ".to_string(),
        }
    }
}

impl DateDelimiters {
    #[must_use]
    pub fn new(date: impl Into<String>, time: impl Into<String>, join: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            join: join.into(),
        }
    }
}

/// Settings for the schema metadata cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaCacheConfig {
    /// Entry lifetime in seconds; `0` or absent keeps entries forever.
    pub lifetime_secs: Option<u64>,
    /// Capacity of the in-memory backend.
    pub max_entries: Option<u64>,
}

impl SchemaCacheConfig {
    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Dialect selection plus the knobs the per-dialect strategies take.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let config = DialectConfig::from_json(r#"{"dialect": "sqlite", "delimiters": {"date": "/"}}"#)?;
/// assert_eq!(config.dialect, Dialect::Sqlite);
/// assert_eq!(config.delimiters.time, ":");
/// assert_eq!(config.shaper().apply_pagination("SELECT 1", Some(5), None)?, "SELECT 1 LIMIT 5");
/// # Ok::<(), SqlDialectError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    pub dialect: Dialect,
    #[serde(default)]
    pub delimiters: DateDelimiters,
    #[serde(default)]
    pub cache: SchemaCacheConfig,
}

impl DialectConfig {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            delimiters: DateDelimiters::default(),
            cache: SchemaCacheConfig::default(),
        }
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: DateDelimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: SchemaCacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` for invalid JSON or an unknown dialect.
    pub fn from_json(json: &str) -> Result<Self, SqlDialectError> {
        serde_json::from_str(json)
            .map_err(|e| SqlDialectError::ConfigError(format!("invalid dialect config: {e}")))
    }

    /// Pick the dialect named by a parsed connection string.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` if the driver is not a known dialect.
    pub fn for_descriptor(desc: &ConnectionDescriptor) -> Result<Self, SqlDialectError> {
        desc.dialect().map(Self::new).ok_or_else(|| {
            SqlDialectError::ConfigError(format!("no dialect for driver {}", desc.driver))
        })
    }

    #[must_use]
    pub fn serializer(&self) -> Box<dyn ValueSerializer> {
        let delimiters = self.delimiters.clone();
        match self.dialect {
            Dialect::MySql => Box::new(MySqlSerializer::new(delimiters)),
            Dialect::Sqlite => Box::new(SqliteSerializer::new(delimiters)),
            Dialect::Postgres => Box::new(PostgresSerializer::new(delimiters)),
        }
    }

    #[must_use]
    pub fn shaper(&self) -> Box<dyn QueryShaper> {
        let delimiters = self.delimiters.clone();
        match self.dialect {
            Dialect::MySql => Box::new(MySqlShaper::new(delimiters)),
            Dialect::Sqlite => Box::new(SqliteShaper::new(delimiters)),
            Dialect::Postgres => Box::new(PostgresShaper::new(delimiters)),
        }
    }

    #[must_use]
    pub fn normalizer(&self) -> Box<dyn SchemaNormalizer> {
        match self.dialect {
            Dialect::MySql => Box::new(MySqlSchema::new()),
            Dialect::Sqlite => Box::new(SqliteSchema::new()),
            Dialect::Postgres => Box::new(PostgresSchema::new()),
        }
    }

    /// Wrap `provider` in a [`MetadataCache`] over an in-memory backend sized and
    /// timed by [`Self::cache`].
    pub fn cached<P: SchemaProvider>(&self, provider: P) -> MetadataCache<P> {
        let backend = match self.cache.max_entries {
            Some(max) => MemoryCache::new(max),
            None => MemoryCache::default(),
        };
        MetadataCache::new(provider, Arc::new(backend)).with_lifetime(self.cache.lifetime())
    }
}
