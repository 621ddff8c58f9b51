use thiserror::Error;

use crate::cache::CacheError;
use crate::types::Dialect;

#[derive(Debug, Error)]
pub enum SqlDialectError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Malformed connection string: {0}")]
    MalformedConnectionString(String),

    #[error("Unsupported {dialect} type: {type_name}")]
    UnsupportedType { dialect: Dialect, type_name: String },

    #[error("Invalid value shape: {0}")]
    InvalidValueShape(String),

    #[error("Cache backend failure: {0}")]
    CacheBackendFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl From<CacheError> for SqlDialectError {
    fn from(err: CacheError) -> Self {
        SqlDialectError::CacheBackendFailure(err.to_string())
    }
}
