use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use deadpool_postgres::Config as PgConfig;
use tokio_postgres::{Client, NoTls};

use crate::connection::ConnectionDescriptor;
use crate::error::SqlDialectError;
use crate::results::ResultSet;
use crate::schema::{IntrospectionDriver, IntrospectionQuery};
use crate::types::RowValues;

/// Runs introspection queries on a connected `tokio-postgres` client.
pub struct PostgresDriver {
    client: Client,
}

impl PostgresDriver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect without TLS to the server a `postgres://` descriptor names.
    ///
    /// The connection task is spawned on the current tokio runtime.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` for a non-postgres descriptor or one
    /// `deadpool-postgres` rejects, and `SqlDialectError::PostgresError` if connecting fails.
    pub async fn connect(desc: &ConnectionDescriptor) -> Result<Self, SqlDialectError> {
        let pg_config = PgConfig::try_from(desc)?
            .get_pg_config()
            .map_err(|e| SqlDialectError::ConfigError(format!("postgres config: {e}")))?;
        let (client, connection) = pg_config.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection closed with error");
            }
        });
        Ok(Self::new(client))
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl IntrospectionDriver for PostgresDriver {
    async fn fetch(&self, query: &IntrospectionQuery) -> Result<ResultSet, SqlDialectError> {
        let rows = self.client.query(query.sql.as_str(), &[]).await?;
        build_result_set_from_rows(&rows)
    }
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, SqlDialectError> {
    let type_info = row.columns()[idx].type_();

    Ok(match type_info.name() {
        "int2" => row
            .try_get::<_, Option<i16>>(idx)?
            .map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)?
            .map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)?
            .map_or(RowValues::Null, RowValues::Int),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)?
            .map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)?
            .map_or(RowValues::Null, RowValues::Float),
        "bool" => row
            .try_get::<_, Option<bool>>(idx)?
            .map_or(RowValues::Null, RowValues::Bool),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map_or(RowValues::Null, RowValues::Timestamp),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)?
            .map_or(RowValues::Null, RowValues::Blob),
        // text, varchar, name, bpchar and anything cast to text
        _ => row
            .try_get::<_, Option<String>>(idx)?
            .map_or(RowValues::Null, RowValues::Text),
    })
}

fn build_result_set_from_rows(rows: &[tokio_postgres::Row]) -> Result<ResultSet, SqlDialectError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
