//! Read-through schema cache.
//!
//! [`MetadataCache`] decorates any [`SchemaProvider`]: hits are returned exactly as
//! stored, misses are computed by the wrapped provider and written through before
//! returning. Backend failures surface as errors; a failed read is never treated
//! as an empty schema.

mod backend;
mod error;
mod key;
mod memory;

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use backend::CacheBackend;
pub use error::CacheError;
pub use key::CacheKey;
pub use memory::MemoryCache;

use crate::error::SqlDialectError;
use crate::schema::{Column, SchemaProvider, Table};

/// Caching decorator over a [`SchemaProvider`].
pub struct MetadataCache<P> {
    inner: P,
    backend: Arc<dyn CacheBackend>,
    keys: CacheKey,
    lifetime: Option<Duration>,
    /// Every key this cache has read or written since the last `invalidate_all`.
    touched: Mutex<BTreeSet<String>>,
}

impl<P> std::fmt::Debug for MetadataCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("backend", &self.backend.backend_name())
            .field("keys", &self.keys)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl<P: SchemaProvider> MetadataCache<P> {
    #[must_use]
    pub fn new(inner: P, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            inner,
            backend,
            keys: CacheKey::default(),
            lifetime: None,
            touched: Mutex::new(BTreeSet::new()),
        }
    }

    /// Entry lifetime; `None` or a zero duration means entries never expire.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.lifetime = lifetime.filter(|d| !d.is_zero());
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: CacheKey) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    #[must_use]
    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    fn touched(&self) -> Result<std::sync::MutexGuard<'_, BTreeSet<String>>, SqlDialectError> {
        self.touched.lock().map_err(|e| {
            SqlDialectError::CacheBackendFailure(format!("cache key registry poisoned: {e}"))
        })
    }

    async fn read_through<T, F, Fut>(&self, key: &str, load: F) -> Result<T, SqlDialectError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, SqlDialectError>> + Send,
    {
        if self.backend.has(key).await?
            && let Some(bytes) = self.backend.get(key).await?
        {
            tracing::debug!(key, backend = self.backend.backend_name(), "schema cache hit");
            self.touched()?.insert(key.to_string());
            return decode(key, &bytes);
        }

        tracing::debug!(key, backend = self.backend.backend_name(), "schema cache miss");
        let value = load().await?;
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| CacheError::Serialization(format!("{key}: {e}")))?;
        if !self.backend.set(key, bytes, self.lifetime).await? {
            return Err(SqlDialectError::CacheBackendFailure(format!(
                "{} backend refused write for {key}",
                self.backend.backend_name()
            )));
        }
        self.touched()?.insert(key.to_string());
        tracing::debug!(key, lifetime = ?self.lifetime, "schema cache write-through");
        Ok(value)
    }

    /// Drop the cached columns of one table.
    ///
    /// # Errors
    /// Returns `SqlDialectError::CacheBackendFailure` if the backend fails.
    pub async fn invalidate_table(&self, table: &str) -> Result<bool, SqlDialectError> {
        let key = self.keys.columns(table);
        self.touched()?.remove(&key);
        Ok(self.backend.delete(&key).await?)
    }

    /// Drop the cached table list, the column entries of every table it names and
    /// every column entry this cache has served, even without a table list.
    ///
    /// # Errors
    /// Returns `SqlDialectError::CacheBackendFailure` if the backend fails or the
    /// cached table list cannot be decoded.
    pub async fn invalidate_all(&self) -> Result<(), SqlDialectError> {
        let tables_key = self.keys.tables();
        let mut doomed = std::mem::take(&mut *self.touched()?);
        if let Some(bytes) = self.backend.get(&tables_key).await? {
            let tables: Vec<Table> = decode(&tables_key, &bytes)?;
            doomed.extend(tables.iter().map(|t| self.keys.columns(&t.name)));
        }
        doomed.insert(tables_key);
        for key in &doomed {
            self.backend.delete(key).await?;
        }
        tracing::debug!(entries = doomed.len(), "schema cache cleared");
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, SqlDialectError> {
    serde_json::from_slice(bytes)
        .map_err(|e| CacheError::Serialization(format!("{key}: {e}")).into())
}

#[async_trait]
impl<P: SchemaProvider> SchemaProvider for MetadataCache<P> {
    async fn get_tables(&self) -> Result<Vec<Table>, SqlDialectError> {
        let key = self.keys.tables();
        self.read_through(&key, || self.inner.get_tables()).await
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<Column>, SqlDialectError> {
        let key = self.keys.columns(table);
        self.read_through(&key, || self.inner.get_columns(table)).await
    }
}
