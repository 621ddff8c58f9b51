//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::aliases::{IntWidth, TypeCategory, category_of};
pub use crate::cache::{CacheBackend, CacheError, CacheKey, MemoryCache, MetadataCache};
pub use crate::config::{DateDelimiters, DialectConfig, SchemaCacheConfig};
pub use crate::connection::ConnectionDescriptor;
pub use crate::error::SqlDialectError;
pub use crate::literal::{
    CalendarFields, MySqlSerializer, PostgresSerializer, SqliteSerializer, Temporal,
    ValueSerializer,
};
pub use crate::query::{MySqlShaper, PostgresShaper, QueryShaper, SqliteShaper};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::schema::{
    Column, ColumnRows, IndexRows, IntrospectionDriver, IntrospectionQuery, Introspector,
    MySqlSchema, PostgresSchema, QueryKind, SchemaNormalizer, SchemaProvider, SqliteSchema,
    Table, TypeSignature, parse_type_signature,
};
pub use crate::types::{Dialect, RowValues, Sentinel, SqlValue};

#[cfg(feature = "postgres")]
pub use crate::drivers::PostgresDriver;
#[cfg(feature = "sqlite")]
pub use crate::drivers::SqliteDriver;
