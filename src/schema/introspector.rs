use async_trait::async_trait;

use super::{
    Column, ColumnRows, IndexRows, IntrospectionDriver, IntrospectionQuery, SchemaNormalizer,
    SchemaProvider, Table,
};
use crate::error::SqlDialectError;
use crate::results::ResultSet;

/// Pairs a dialect normalizer with a driver that can run its queries.
pub struct Introspector<N, D> {
    normalizer: N,
    driver: D,
}

impl<N: SchemaNormalizer, D: IntrospectionDriver> Introspector<N, D> {
    #[must_use]
    pub fn new(normalizer: N, driver: D) -> Self {
        Self { normalizer, driver }
    }

    #[must_use]
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    async fn run(&self, query: &IntrospectionQuery) -> Result<ResultSet, SqlDialectError> {
        tracing::debug!(
            dialect = %self.normalizer.dialect(),
            kind = ?query.kind,
            sql = %query.sql,
            "running introspection query"
        );
        self.driver.fetch(query).await
    }

    async fn column_rows(&self, table: &str) -> Result<ColumnRows, SqlDialectError> {
        let mut indexes = Vec::new();
        if let Some(list_query) = self.normalizer.index_list_query(table) {
            let list = self.run(&list_query).await?;
            for list_row in list.results {
                let Some(index_name) = list_row.text("name") else {
                    continue;
                };
                let Some(info_query) = self.normalizer.index_info_query(&index_name) else {
                    continue;
                };
                let info = self.run(&info_query).await?;
                indexes.push(IndexRows { list_row, info });
            }
        }

        let columns = self.run(&self.normalizer.columns_query(table)).await?;
        Ok(ColumnRows { columns, indexes })
    }
}

#[async_trait]
impl<N: SchemaNormalizer, D: IntrospectionDriver> SchemaProvider for Introspector<N, D> {
    async fn get_tables(&self) -> Result<Vec<Table>, SqlDialectError> {
        let rows = self.run(&self.normalizer.tables_query()).await?;
        let mut tables = self.normalizer.list_tables(&rows)?;
        for table in &mut tables {
            let columns = self.get_columns(&table.name).await?;
            table.set_columns(columns);
        }
        Ok(tables)
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<Column>, SqlDialectError> {
        let rows = self.column_rows(table).await?;
        self.normalizer.describe_columns(&rows, table)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::schema::{QueryKind, SqliteSchema};
    use crate::types::RowValues;

    /// Answers pragma queries from canned rows and records what was asked.
    #[derive(Default)]
    struct CannedSqlite {
        seen: Mutex<Vec<QueryKind>>,
    }

    fn text(s: &str) -> RowValues {
        RowValues::Text(s.to_string())
    }

    #[async_trait]
    impl IntrospectionDriver for CannedSqlite {
        async fn fetch(&self, query: &IntrospectionQuery) -> Result<ResultSet, SqlDialectError> {
            self.seen.lock().unwrap().push(query.kind);
            let rs = match query.kind {
                QueryKind::Tables => ResultSet::from_rows(&["name"], vec![vec![text("users")]]),
                QueryKind::IndexList => ResultSet::from_rows(
                    &["seq", "name", "unique", "origin", "partial"],
                    vec![
                        vec![
                            RowValues::Int(0),
                            text("sqlite_autoindex_users_1"),
                            RowValues::Int(1),
                            text("u"),
                            RowValues::Int(0),
                        ],
                        vec![
                            RowValues::Int(1),
                            text("idx_users_name"),
                            RowValues::Int(0),
                            text("c"),
                            RowValues::Int(0),
                        ],
                    ],
                ),
                QueryKind::IndexInfo if query.sql.contains("autoindex") => ResultSet::from_rows(
                    &["seqno", "cid", "name"],
                    vec![vec![RowValues::Int(0), RowValues::Int(1), text("email")]],
                ),
                QueryKind::IndexInfo => ResultSet::from_rows(
                    &["seqno", "cid", "name"],
                    vec![vec![RowValues::Int(0), RowValues::Int(2), text("name")]],
                ),
                QueryKind::Columns => ResultSet::from_rows(
                    &["cid", "name", "type", "notnull", "dflt_value", "pk"],
                    vec![
                        vec![
                            RowValues::Int(0),
                            text("id"),
                            text("INTEGER"),
                            RowValues::Int(0),
                            RowValues::Null,
                            RowValues::Int(1),
                        ],
                        vec![
                            RowValues::Int(1),
                            text("email"),
                            text("TEXT"),
                            RowValues::Int(1),
                            RowValues::Null,
                            RowValues::Int(0),
                        ],
                        vec![
                            RowValues::Int(2),
                            text("name"),
                            text("TEXT"),
                            RowValues::Int(0),
                            RowValues::Null,
                            RowValues::Int(0),
                        ],
                    ],
                ),
            };
            Ok(rs)
        }
    }

    #[tokio::test]
    async fn sqlite_columns_run_the_index_join_first() {
        let introspector = Introspector::new(SqliteSchema, CannedSqlite::default());
        let cols = introspector.get_columns("users").await.unwrap();

        assert_eq!(
            *introspector.driver().seen.lock().unwrap(),
            [
                QueryKind::IndexList,
                QueryKind::IndexInfo,
                QueryKind::IndexInfo,
                QueryKind::Columns
            ]
        );
        assert!(cols[0].primary_key && cols[0].auto_increment);
        assert!(cols[1].unique_key);
        assert!(!cols[2].unique_key);
    }

    #[tokio::test]
    async fn tables_come_back_with_columns() {
        let introspector = Introspector::new(SqliteSchema, CannedSqlite::default());
        let tables = introspector.get_tables().await.unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].columns.len(), 3);
        assert_eq!(
            introspector.driver().seen.lock().unwrap().first(),
            Some(&QueryKind::Tables)
        );
    }
}
