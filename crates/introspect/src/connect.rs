//! Provider construction from configuration

use std::sync::Arc;
use std::time::Duration;

use crudkit_core::ConnectionConfig;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;

use crate::driver::Driver;
use crate::error::{SchemaError, SchemaResult};
use crate::mysql::MySqlSchema;
use crate::postgres::PostgresSchema;
use crate::provider::SchemaProvider;
use crate::sqlite::SqliteSchema;
use crate::sqlsrv::{config_from_url, SqlServerSchema};
use crate::unsupported::UnsupportedSchema;

const ACQUIRE_TIMEOUT_SECONDS: u64 = 10;

/// Open a connection for the configured driver and wrap it in the matching provider.
///
/// Unknown driver tags produce an [`UnsupportedSchema`] instead of an error.
pub async fn connect(config: &ConnectionConfig) -> SchemaResult<Arc<dyn SchemaProvider>> {
    let driver = Driver::from_tag(&config.driver);
    let max_connections = config.max_connections.max(1);
    let acquire_timeout = Duration::from_secs(ACQUIRE_TIMEOUT_SECONDS);

    tracing::debug!("Connecting to {} database", driver);

    let provider: Arc<dyn SchemaProvider> = match driver {
        Driver::MySql => {
            let pool = MySqlPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&config.url)
                .await
                .map_err(|e| {
                    SchemaError::connection(format!("Failed to create MySQL pool: {}", e))
                })?;
            Arc::new(MySqlSchema::new(pool))
        }
        Driver::PostgreSql => {
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&config.url)
                .await
                .map_err(|e| {
                    SchemaError::connection(format!("Failed to create PostgreSQL pool: {}", e))
                })?;
            Arc::new(PostgresSchema::new(pool, config.schema.clone()))
        }
        Driver::Sqlite => {
            let pool = SqlitePoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&config.url)
                .await
                .map_err(|e| {
                    SchemaError::connection(format!("Failed to open SQLite database: {}", e))
                })?;
            Arc::new(SqliteSchema::new(pool))
        }
        Driver::SqlServer => {
            let tds = config_from_url(&config.url)?;
            Arc::new(SqlServerSchema::connect(tds).await?)
        }
        Driver::Unsupported(tag) => Arc::new(UnsupportedSchema::new(tag)),
    };

    Ok(provider)
}
