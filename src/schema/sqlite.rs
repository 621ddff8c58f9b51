use std::collections::HashMap;

use super::{
    Column, ColumnRows, IndexRows, IntrospectionQuery, QueryKind, SchemaNormalizer, Table,
    parse_type_signature, required_text,
};
use crate::error::SqlDialectError;
use crate::results::ResultSet;
use crate::types::Dialect;

/// `sqlite_master` / `PRAGMA` based introspection.
///
/// `PRAGMA table_info` has no notion of uniqueness, so describing columns takes an
/// extra pass: `PRAGMA index_list` for the table, then `PRAGMA index_info` for each
/// index, joined back onto the column rows by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteSchema;

impl SqliteSchema {
    pub const TABLES_QUERY: &'static str =
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map of column name -> single-column UNIQUE index covering it.
fn unique_columns(indexes: &[IndexRows]) -> HashMap<String, &IndexRows> {
    let mut by_column = HashMap::new();
    for index in indexes {
        let unique = index.list_row.flag("unique");
        // the implicit index behind a non-rowid PRIMARY KEY is not a unique key
        let from_primary_key = index
            .list_row
            .text("origin")
            .is_some_and(|origin| origin == "pk");
        if !unique || from_primary_key || index.info.len() != 1 {
            continue;
        }
        if let Some(column) = index.info.results[0].text("name") {
            by_column.insert(column, index);
        }
    }
    by_column
}

/// Defaults come back as SQL text; unwrap plain string literals.
fn unquote_default(raw: String) -> String {
    match raw
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
    {
        Some(inner) if !inner.replace("''", "").contains('\'') => inner.replace("''", "'"),
        _ => raw,
    }
}

impl SchemaNormalizer for SqliteSchema {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn tables_query(&self) -> IntrospectionQuery {
        IntrospectionQuery::new(QueryKind::Tables, Self::TABLES_QUERY)
    }

    fn columns_query(&self, table: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            QueryKind::Columns,
            format!("PRAGMA table_info({})", quote_identifier(table)),
        )
    }

    fn index_list_query(&self, table: &str) -> Option<IntrospectionQuery> {
        Some(IntrospectionQuery::new(
            QueryKind::IndexList,
            format!("PRAGMA index_list({})", quote_identifier(table)),
        ))
    }

    fn index_info_query(&self, index: &str) -> Option<IntrospectionQuery> {
        Some(IntrospectionQuery::new(
            QueryKind::IndexInfo,
            format!("PRAGMA index_info({})", quote_identifier(index)),
        ))
    }

    fn list_tables(&self, rows: &ResultSet) -> Result<Vec<Table>, SqlDialectError> {
        rows.results
            .iter()
            .map(|row| Ok(Table::new(required_text(row, "name", "table")?, None)))
            .collect()
    }

    fn describe_columns(
        &self,
        rows: &ColumnRows,
        table: &str,
    ) -> Result<Vec<Column>, SqlDialectError> {
        let unique = unique_columns(&rows.indexes);
        let pk_count = rows
            .columns
            .results
            .iter()
            .filter(|row| row.flag("pk"))
            .count();
        tracing::trace!(table, unique = unique.len(), pk_count, "sqlite column pass");

        rows.columns
            .results
            .iter()
            .map(|row| {
                let name = required_text(row, "name", "column")?;
                let signature =
                    parse_type_signature(Dialect::Sqlite, &row.text("type").unwrap_or_default());
                let binary = signature.base_type.to_ascii_lowercase().contains("blob");
                let primary_key = row.flag("pk");
                // INTEGER PRIMARY KEY aliases the rowid
                let auto_increment = primary_key
                    && pk_count == 1
                    && signature.base_type.eq_ignore_ascii_case("integer");

                let mut column = Column::from_signature(name, signature, binary)
                    .with_default(row.text("dflt_value").map(unquote_default));
                column.not_null = row.flag("notnull");
                column.primary_key = primary_key;
                column.unique_key = unique.contains_key(&column.name);
                column.auto_increment = auto_increment;
                Ok(column)
            })
            .collect()
    }
}
