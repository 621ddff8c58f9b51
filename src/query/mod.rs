//! Dialect-specific query shapes: pagination, row counting and column aliasing.

use crate::aliases::{IntWidth, TypeCategory, category_of};
use crate::error::SqlDialectError;
use crate::literal::{Temporal, ValueSerializer};
use crate::types::{Dialect, SqlValue};

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySqlShaper;
pub use postgres::PostgresShaper;
pub use sqlite::SqliteShaper;

/// Assembles SQL clauses whose syntax differs per dialect.
///
/// ```rust
/// use sql_dialect::prelude::*;
///
/// let mysql = MySqlShaper::default();
/// assert_eq!(
///     mysql.apply_pagination("SELECT * FROM t", Some(20), Some(10))?,
///     "SELECT * FROM t LIMIT 10,20"
/// );
/// let sqlite = SqliteShaper::default();
/// assert_eq!(
///     sqlite.apply_pagination("SELECT * FROM t", Some(20), Some(10))?,
///     "SELECT * FROM t LIMIT 20 OFFSET 10"
/// );
/// # Ok::<(), SqlDialectError>(())
/// ```
pub trait QueryShaper: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Serializer used for the numeric parts of generated clauses.
    fn serializer(&self) -> &dyn ValueSerializer;

    /// Append a LIMIT/OFFSET clause. With neither bound the SQL is returned as is.
    ///
    /// # Errors
    /// Propagates serializer failures for the limit or offset literal.
    fn apply_pagination(
        &self,
        sql: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<String, SqlDialectError>;

    /// Count the rows `sql` would return.
    fn wrap_count(&self, sql: &str) -> String {
        format!("SELECT COUNT(*) FROM ({}) AS X", trim_statement(sql))
    }

    /// Quote an alias identifier.
    fn quote_alias(&self, alias: &str) -> String {
        format!("\"{}\"", alias.replace('"', "\"\""))
    }

    /// Render a temporal column as text.
    fn format_temporal(&self, expr: &str, kind: Temporal) -> String;

    /// `expr AS alias`, wrapping date and timestamp columns in the dialect's
    /// to-text function first. The alias defaults to `expr` itself.
    fn column_expression(
        &self,
        expr: &str,
        category: Option<TypeCategory>,
        alias: Option<&str>,
    ) -> String {
        let rendered = match category.and_then(Temporal::from_category) {
            Some(kind) => self.format_temporal(expr, kind),
            None => expr.to_string(),
        };
        format!("{rendered} AS {}", self.quote_alias(alias.unwrap_or(expr)))
    }

    /// [`Self::column_expression`] for a raw column type.
    ///
    /// # Errors
    /// Returns `SqlDialectError::UnsupportedType` if `type_name` does not resolve.
    fn column_expression_for_type(
        &self,
        expr: &str,
        type_name: &str,
        alias: Option<&str>,
    ) -> Result<String, SqlDialectError> {
        let category = category_of(self.dialect(), type_name)?;
        Ok(self.column_expression(expr, Some(category), alias))
    }
}

/// Strip trailing whitespace and statement terminators.
pub(crate) fn trim_statement(sql: &str) -> &str {
    sql.trim_end().trim_end_matches(';').trim_end()
}

/// Render a LIMIT/OFFSET operand through the serializer's integer path.
pub(crate) fn count_literal(
    serializer: &dyn ValueSerializer,
    value: u64,
) -> Result<String, SqlDialectError> {
    let value = match i64::try_from(value) {
        Ok(v) => SqlValue::Int(v),
        Err(_) => SqlValue::Text(value.to_string()),
    };
    serializer.literal_for(&value, TypeCategory::Int(IntWidth::Big))
}
