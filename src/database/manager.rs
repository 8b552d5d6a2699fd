use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{is_valid_identifier, DatabaseConfig};

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid schema name: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the single process-wide connection pool.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the pool and verify the database answers before serving traffic.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if !is_valid_identifier(&config.schema) {
            return Err(DatabaseError::InvalidSchema(config.schema.clone()));
        }

        let target = Self::redacted_url(&config.url)?;
        info!("Connecting to database: {}", target);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        info!("Database connection successful ({} max connections)", config.max_connections);
        Ok(pool)
    }

    /// Connection string safe for logs: the password is masked.
    pub fn redacted_url(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
