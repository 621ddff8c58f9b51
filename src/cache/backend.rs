//! Cache backend trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// Storage the schema cache writes through to.
///
/// Each call is a single round trip; implementations must not retry internally
/// and must report failures instead of pretending a key is missing.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Check if a key exists in the cache
    async fn has(&self, key: &str) -> Result<bool, CacheError>;

    /// Get a value from the cache
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value; `ttl` of `None` means no expiry.
    ///
    /// Returns `false` if the backend declined the write.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<bool, CacheError>;

    /// Delete a key, returning whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
