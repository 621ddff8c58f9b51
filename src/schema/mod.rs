//! Schema introspection: normalizes vendor catalog rows into [`Table`] and [`Column`] records.
//!
//! Normalizers never talk to a database. They name the queries they need
//! ([`IntrospectionQuery`]) and turn the rows an [`IntrospectionDriver`] hands back
//! into the canonical model. [`Introspector`] glues the two together.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SqlDialectError;
use crate::results::{CustomDbRow, ResultSet};
use crate::types::Dialect;

mod introspector;
mod mysql;
mod postgres;
mod signature;
mod sqlite;

pub use introspector::Introspector;
pub use mysql::MySqlSchema;
pub use postgres::PostgresSchema;
pub use signature::{TypeSignature, parse_type_signature};
pub use sqlite::SqliteSchema;

/// One column of a table, normalized across dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Base type in the dialect's own spelling (`int`, `enum`, `decimal`, ...)
    pub base_type: String,
    pub max_length: Option<i64>,
    pub scale: Option<i64>,
    pub unsigned: Option<bool>,
    pub binary: bool,
    /// Never set for binary columns.
    pub default: Option<String>,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique_key: bool,
    pub auto_increment: bool,
    pub comment: Option<String>,
}

impl Column {
    /// Start a column from its parsed type signature; every flag defaults to off.
    #[must_use]
    pub fn from_signature(name: impl Into<String>, signature: TypeSignature, binary: bool) -> Self {
        Self {
            name: name.into(),
            base_type: signature.base_type,
            max_length: signature.max_length,
            scale: signature.scale,
            unsigned: signature.unsigned,
            binary,
            default: None,
            not_null: false,
            primary_key: false,
            unique_key: false,
            auto_increment: false,
            comment: None,
        }
    }

    /// Apply the default-surfacing rule: binary columns, empty defaults and a literal
    /// `NULL` default are all reported as "no default".
    #[must_use]
    pub fn with_default(mut self, raw_default: Option<String>) -> Self {
        self.default = if self.binary {
            None
        } else {
            raw_default.filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("NULL"))
        };
        self
    }
}

/// A table with its columns in ordinal order.
///
/// `columns` behaves as an insertion-ordered map keyed by `Column::name`: fill it
/// through [`Table::insert_column`] or [`Table::set_columns`] to keep names unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<Column>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            name: name.into(),
            comment,
            columns: Vec::new(),
        }
    }

    /// Insert `column`, replacing a same-named column in place.
    ///
    /// Returns the replaced column, if any.
    pub fn insert_column(&mut self, column: Column) -> Option<Column> {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => Some(std::mem::replace(existing, column)),
            None => {
                self.columns.push(column);
                None
            }
        }
    }

    /// Replace every column; a later duplicate name overwrites the earlier one.
    pub fn set_columns(&mut self, columns: impl IntoIterator<Item = Column>) {
        self.columns.clear();
        for column in columns {
            self.insert_column(column);
        }
    }

    /// Look a column up by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Which introspection step a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Tables,
    Columns,
    IndexList,
    IndexInfo,
}

/// A named introspection query for the external driver to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionQuery {
    pub kind: QueryKind,
    pub sql: String,
}

impl IntrospectionQuery {
    #[must_use]
    pub fn new(kind: QueryKind, sql: impl Into<String>) -> Self {
        Self {
            kind,
            sql: sql.into(),
        }
    }
}

/// One index from an index listing together with the columns it covers.
#[derive(Debug, Clone)]
pub struct IndexRows {
    pub list_row: CustomDbRow,
    pub info: ResultSet,
}

/// Everything a normalizer needs to describe the columns of one table.
///
/// `indexes` is only populated for dialects whose column listing cannot report
/// uniqueness on its own (`SQLite`).
#[derive(Debug, Clone, Default)]
pub struct ColumnRows {
    pub columns: ResultSet,
    pub indexes: Vec<IndexRows>,
}

impl From<ResultSet> for ColumnRows {
    fn from(columns: ResultSet) -> Self {
        Self {
            columns,
            indexes: Vec::new(),
        }
    }
}

/// Per-dialect parsing of catalog rows.
pub trait SchemaNormalizer: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Query listing the tables (and views, where the dialect has them).
    fn tables_query(&self) -> IntrospectionQuery;

    /// Query describing the columns of `table`.
    fn columns_query(&self, table: &str) -> IntrospectionQuery;

    /// Query listing the indexes of `table`, for dialects that need a separate index pass.
    fn index_list_query(&self, _table: &str) -> Option<IntrospectionQuery> {
        None
    }

    /// Query listing the columns covered by `index`.
    fn index_info_query(&self, _index: &str) -> Option<IntrospectionQuery> {
        None
    }

    /// Turn the rows of [`Self::tables_query`] into tables without columns.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ExecutionError` if a row carries no table name.
    fn list_tables(&self, rows: &ResultSet) -> Result<Vec<Table>, SqlDialectError>;

    /// Turn the rows of [`Self::columns_query`] (plus any index rows) into columns.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ExecutionError` if a row carries no column name.
    fn describe_columns(
        &self,
        rows: &ColumnRows,
        table: &str,
    ) -> Result<Vec<Column>, SqlDialectError>;
}

impl<T: SchemaNormalizer + ?Sized> SchemaNormalizer for Box<T> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn tables_query(&self) -> IntrospectionQuery {
        (**self).tables_query()
    }

    fn columns_query(&self, table: &str) -> IntrospectionQuery {
        (**self).columns_query(table)
    }

    fn index_list_query(&self, table: &str) -> Option<IntrospectionQuery> {
        (**self).index_list_query(table)
    }

    fn index_info_query(&self, index: &str) -> Option<IntrospectionQuery> {
        (**self).index_info_query(index)
    }

    fn list_tables(&self, rows: &ResultSet) -> Result<Vec<Table>, SqlDialectError> {
        (**self).list_tables(rows)
    }

    fn describe_columns(
        &self,
        rows: &ColumnRows,
        table: &str,
    ) -> Result<Vec<Column>, SqlDialectError> {
        (**self).describe_columns(rows, table)
    }
}

/// Runs introspection queries on behalf of a normalizer.
#[async_trait]
pub trait IntrospectionDriver: Send + Sync {
    /// Execute `query` and return its rows.
    ///
    /// # Errors
    /// Returns whatever error the underlying driver reports.
    async fn fetch(&self, query: &IntrospectionQuery) -> Result<ResultSet, SqlDialectError>;
}

/// Anything that can answer "which tables" and "which columns".
///
/// Implemented by [`Introspector`] and by the caching decorator
/// [`crate::cache::MetadataCache`].
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// All tables, each with its columns filled in.
    async fn get_tables(&self) -> Result<Vec<Table>, SqlDialectError>;

    /// Columns of a single table.
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>, SqlDialectError>;
}

pub(crate) fn required_text(
    row: &CustomDbRow,
    column: &str,
    what: &str,
) -> Result<String, SqlDialectError> {
    row.text(column)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SqlDialectError::ExecutionError(format!("{what} row without {column}")))
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(base: &str) -> TypeSignature {
        TypeSignature {
            base_type: base.to_string(),
            max_length: None,
            scale: None,
            unsigned: None,
        }
    }

    #[test]
    fn binary_columns_never_surface_defaults() {
        let col = Column::from_signature("data", signature("blob"), true)
            .with_default(Some("abc".into()));
        assert_eq!(col.default, None);
    }

    #[test]
    fn null_and_empty_defaults_are_dropped() {
        for raw in ["NULL", "null", ""] {
            let col = Column::from_signature("c", signature("text"), false)
                .with_default(Some(raw.into()));
            assert_eq!(col.default, None, "default {raw:?}");
        }
        let col = Column::from_signature("c", signature("text"), false)
            .with_default(Some("nullable".into()));
        assert_eq!(col.default.as_deref(), Some("nullable"));
    }

    #[test]
    fn table_column_lookup() {
        let mut table = Table::new("users", None);
        table.insert_column(Column::from_signature("id", signature("int"), false));
        table.insert_column(Column::from_signature("email", signature("varchar"), false));
        assert_eq!(table.column("email").unwrap().base_type, "varchar");
        assert!(table.column("missing").is_none());
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["id", "email"]);
    }

    #[test]
    fn duplicate_column_names_keep_one_entry() {
        let mut table = Table::new("users", None);
        table.set_columns([
            Column::from_signature("id", signature("int"), false),
            Column::from_signature("email", signature("varchar"), false),
            Column::from_signature("id", signature("bigint"), false),
        ]);
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["id", "email"]);
        assert_eq!(table.column("id").unwrap().base_type, "bigint");

        let email = Column::from_signature("email", signature("text"), false);
        let replaced = table.insert_column(email);
        assert_eq!(replaced.unwrap().base_type, "varchar");
        assert_eq!(table.columns.len(), 2);
    }
}
