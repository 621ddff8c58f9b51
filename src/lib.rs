//! Dialect normalization for MySQL, SQLite and PostgreSQL.
//!
//! - [`connection`] parses URL-like connection strings into [`ConnectionDescriptor`]s.
//! - [`aliases`] maps vendor type spellings onto canonical [`TypeCategory`]s.
//! - [`schema`] turns introspection rows into [`Table`]/[`Column`] records, and
//!   [`cache::MetadataCache`] caches them.
//! - [`literal`] renders values as SQL literals; [`query`] shapes pagination,
//!   counting and column aliases.

pub mod aliases;
pub mod cache;
pub mod config;
pub mod connection;
pub mod drivers;
pub mod error;
pub mod literal;
pub mod prelude;
pub mod query;
pub mod results;
pub mod schema;
#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;
pub mod types;

pub use aliases::{IntWidth, TypeCategory, category_of};
pub use config::{DateDelimiters, DialectConfig};
pub use connection::ConnectionDescriptor;
pub use error::SqlDialectError;
pub use results::{CustomDbRow, ResultSet};
pub use schema::{Column, Table};
pub use types::{Dialect, RowValues, Sentinel, SqlValue};
