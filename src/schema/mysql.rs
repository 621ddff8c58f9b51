use super::{
    Column, ColumnRows, IntrospectionQuery, QueryKind, SchemaNormalizer, Table, non_empty,
    parse_type_signature, required_text,
};
use crate::error::SqlDialectError;
use crate::results::ResultSet;
use crate::types::Dialect;

/// `SHOW TABLE STATUS` / `SHOW FULL COLUMNS` based introspection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlSchema;

impl MySqlSchema {
    pub const TABLES_QUERY: &'static str = "SHOW TABLE STATUS";

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

impl SchemaNormalizer for MySqlSchema {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn tables_query(&self) -> IntrospectionQuery {
        IntrospectionQuery::new(QueryKind::Tables, Self::TABLES_QUERY)
    }

    fn columns_query(&self, table: &str) -> IntrospectionQuery {
        IntrospectionQuery::new(
            QueryKind::Columns,
            format!("SHOW FULL COLUMNS FROM {}", quote_identifier(table)),
        )
    }

    fn list_tables(&self, rows: &ResultSet) -> Result<Vec<Table>, SqlDialectError> {
        rows.results
            .iter()
            .map(|row| {
                // `SHOW TABLES` only has a `Tables_in_<db>` column
                let name = row
                    .text("Name")
                    .or_else(|| row.get_by_index(0).and_then(|v| v.to_text()))
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        SqlDialectError::ExecutionError("table row without Name".to_string())
                    })?;
                Ok(Table::new(name, non_empty(row.text("Comment"))))
            })
            .collect()
    }

    fn describe_columns(
        &self,
        rows: &ColumnRows,
        _table: &str,
    ) -> Result<Vec<Column>, SqlDialectError> {
        rows.columns
            .results
            .iter()
            .map(|row| {
                let name = required_text(row, "Field", "column")?;
                let signature =
                    parse_type_signature(Dialect::MySql, &row.text("Type").unwrap_or_default());
                let binary = signature.base_type.to_ascii_lowercase().contains("blob");
                let key = row.text("Key").unwrap_or_default();
                let extra = row.text("Extra").unwrap_or_default();

                let mut column = Column::from_signature(name, signature, binary)
                    .with_default(row.text("Default"));
                column.not_null = row
                    .text("Null")
                    .is_some_and(|null| null.eq_ignore_ascii_case("NO"));
                column.primary_key = key.eq_ignore_ascii_case("PRI");
                column.unique_key = key.eq_ignore_ascii_case("UNI");
                column.auto_increment = extra.to_ascii_lowercase().contains("auto_increment");
                column.comment = non_empty(row.text("Comment"));
                Ok(column)
            })
            .collect()
    }
}
