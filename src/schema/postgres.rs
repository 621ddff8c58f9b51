use super::{
    Column, ColumnRows, IntrospectionQuery, QueryKind, SchemaNormalizer, Table, non_empty,
    parse_type_signature, required_text,
};
use crate::error::SqlDialectError;
use crate::results::ResultSet;
use crate::types::Dialect;

/// `pg_catalog` based introspection over the current schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresSchema;

impl PostgresSchema {
    pub const TABLES_QUERY: &'static str = "\
SELECT t.tablename::text AS name, \
obj_description(format('%I.%I', t.schemaname, t.tablename)::regclass, 'pg_class') AS comment \
FROM pg_tables t WHERE t.schemaname = current_schema() \
UNION ALL \
SELECT v.viewname::text AS name, \
obj_description(format('%I.%I', v.schemaname, v.viewname)::regclass, 'pg_class') AS comment \
FROM pg_views v WHERE v.schemaname = current_schema() \
ORDER BY name";

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn regclass_literal(table: &str) -> String {
    let identifier = format!("\"{}\"", table.replace('"', "\"\""));
    format!("'{}'::regclass", identifier.replace('\'', "''"))
}

impl SchemaNormalizer for PostgresSchema {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn tables_query(&self) -> IntrospectionQuery {
        IntrospectionQuery::new(QueryKind::Tables, Self::TABLES_QUERY)
    }

    fn columns_query(&self, table: &str) -> IntrospectionQuery {
        let sql = format!(
            "SELECT a.attname::text AS name, \
format_type(a.atttypid, a.atttypmod) AS type, \
a.attnotnull AS notnull, \
pg_get_expr(d.adbin, d.adrelid) AS \"default\", \
a.attidentity::text AS identity, \
col_description(a.attrelid, a.attnum) AS comment, \
COALESCE(bool_or(i.indisprimary), false) AS primary_key, \
COALESCE(bool_or(i.indisunique AND NOT i.indisprimary AND i.indnatts = 1), false) AS unique_key \
FROM pg_attribute a \
LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum \
LEFT JOIN pg_index i ON i.indrelid = a.attrelid AND a.attnum = ANY(i.indkey) \
WHERE a.attrelid = {} AND a.attnum > 0 AND NOT a.attisdropped \
GROUP BY a.attrelid, a.attnum, a.attname, a.atttypid, a.atttypmod, a.attnotnull, a.attidentity, d.adbin, d.adrelid \
ORDER BY a.attnum",
            regclass_literal(table)
        );
        IntrospectionQuery::new(QueryKind::Columns, sql)
    }

    fn list_tables(&self, rows: &ResultSet) -> Result<Vec<Table>, SqlDialectError> {
        rows.results
            .iter()
            .map(|row| {
                Ok(Table::new(
                    required_text(row, "name", "table")?,
                    non_empty(row.text("comment")),
                ))
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
                let name = required_text(row, "name", "column")?;
                let signature =
                    parse_type_signature(Dialect::Postgres, &row.text("type").unwrap_or_default());
                let binary = signature.base_type.eq_ignore_ascii_case("bytea")
                    || signature.base_type.eq_ignore_ascii_case("blob");
                let default = row.text("default");
                let identity = row.text("identity").unwrap_or_default();
                let auto_increment = default
                    .as_deref()
                    .is_some_and(|d| d.starts_with("nextval("))
                    || matches!(identity.as_str(), "a" | "d");

                let mut column =
                    Column::from_signature(name, signature, binary).with_default(default);
                column.not_null = row.flag("notnull");
                column.primary_key = row.flag("primary_key");
                column.unique_key = row.flag("unique_key");
                column.auto_increment = auto_increment;
                column.comment = non_empty(row.text("comment"));
                Ok(column)
            })
            .collect()
    }
}
