use deadpool_postgres::Config as PgConfig;

use super::ConnectionDescriptor;
use crate::error::SqlDialectError;
use crate::types::Dialect;

impl TryFrom<&ConnectionDescriptor> for PgConfig {
    type Error = SqlDialectError;

    /// Hand a parsed descriptor to `deadpool-postgres`.
    ///
    /// # Errors
    /// Returns `SqlDialectError::ConfigError` if the driver is not a Postgres driver or the
    /// port is not numeric.
    fn try_from(desc: &ConnectionDescriptor) -> Result<Self, Self::Error> {
        if desc.dialect() != Some(Dialect::Postgres) {
            return Err(SqlDialectError::ConfigError(format!(
                "driver {} is not a postgres driver",
                desc.driver
            )));
        }

        let port = desc
            .port
            .as_deref()
            .map(str::parse::<u16>)
            .transpose()
            .map_err(|e| SqlDialectError::ConfigError(format!("invalid port: {e}")))?;

        let mut cfg = PgConfig::new();
        cfg.host = desc.hostname.clone();
        cfg.port = port;
        cfg.user = desc.username.clone();
        cfg.password = desc.password.clone();
        cfg.dbname = desc.database.clone();
        cfg.application_name = desc.options.get("application_name").cloned();
        cfg.options = desc.options.get("options").cloned();
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_descriptor_fields() {
        let desc = ConnectionDescriptor::parse(
            "postgresql://testuser:pw@10.3.0.201:5432/testing?application_name=probe",
        )
        .unwrap();
        let cfg = PgConfig::try_from(&desc).unwrap();
        assert_eq!(cfg.host.as_deref(), Some("10.3.0.201"));
        assert_eq!(cfg.port, Some(5432));
        assert_eq!(cfg.user.as_deref(), Some("testuser"));
        assert_eq!(cfg.password.as_deref(), Some("pw"));
        assert_eq!(cfg.dbname.as_deref(), Some("testing"));
        assert_eq!(cfg.application_name.as_deref(), Some("probe"));
    }

    #[test]
    fn rejects_bad_port_and_foreign_driver() {
        let bad_port = ConnectionDescriptor::parse("postgres://h:http/db").unwrap();
        assert!(matches!(
            PgConfig::try_from(&bad_port),
            Err(SqlDialectError::ConfigError(_))
        ));

        let mysql = ConnectionDescriptor::parse("mysql://h/db").unwrap();
        assert!(PgConfig::try_from(&mysql).is_err());
    }
}
