//! Throwaway `PostgreSQL` servers for integration tests.

use postgresql_embedded::PostgreSQL;

use crate::connection::ConnectionDescriptor;
use crate::drivers::PostgresDriver;

/// A running embedded `PostgreSQL` instance and a descriptor pointing at its test database.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub descriptor: ConnectionDescriptor,
}

impl EmbeddedPostgres {
    /// Open an introspection driver on the test database.
    ///
    /// # Errors
    /// Returns an error if the server refuses the connection.
    pub async fn driver(&self) -> Result<PostgresDriver, Box<dyn std::error::Error>> {
        Ok(PostgresDriver::connect(&self.descriptor).await?)
    }
}

/// Set up and start an embedded server and create `db_name` on it.
///
/// # Errors
/// Returns an error if the server cannot be set up or started, the database cannot
/// be created, or the post-start connectivity check fails.
pub async fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;
    postgresql.create_database(db_name).await?;

    let settings = postgresql.settings();
    let port = settings.port;
    let descriptor = ConnectionDescriptor {
        driver: "postgres".to_string(),
        username: Some(settings.username.clone()),
        password: Some(settings.password.clone()),
        hostname: Some(settings.host.clone()),
        port: Some(port.to_string()),
        database: Some(db_name.to_string()),
        options: Default::default(),
    };
    tracing::debug!(port, database = db_name, "embedded postgres started");

    let embedded = EmbeddedPostgres {
        postgresql,
        port,
        descriptor,
    };
    embedded.driver().await?.client().execute("SELECT 1", &[]).await?;
    Ok(embedded)
}

/// Stop a previously started embedded server.
pub async fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    let _ = postgresql.stop().await;
}
