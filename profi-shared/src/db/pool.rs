/// Database connection pool management
///
/// ProFi stores everything in a single SQLite file. This module builds a
/// sqlx pool over it, creating the file on first start, and exposes a health
/// check used at startup and by the `/health` endpoint.
///
/// SQLite is single-writer: concurrency control is whatever the engine gives
/// a single statement, which is why every mutating store operation is
/// expressed as one atomic statement rather than read-then-write.
///
/// # Example
///
/// ```no_run
/// use profi_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://profi.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     let row: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
///     assert_eq!(row.0, 1);
///     Ok(())
/// }
/// ```
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. `sqlite://profi.db` or `sqlite::memory:`)
    pub url: String,

    /// Maximum number of connections in the pool
    ///
    /// SQLite serializes writers, so a small pool is enough.
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// Create the database file if it does not exist yet
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            connect_timeout_seconds: 30,
            create_if_missing: true,
        }
    }
}

/// Creates and initializes the SQLite connection pool
///
/// Enforces foreign keys on every connection (the admins table references
/// users) and performs a health check before returning.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the file cannot be opened or
/// created, or the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// # Errors
///
/// Returns an error if the check query fails or returns an unexpected value.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
///
/// Called during shutdown so the SQLite file is released cleanly.
pub async fn close_pool(pool: SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_seconds, 30);
        assert!(config.create_if_missing);
    }

    #[tokio::test]
    async fn test_create_pool_in_memory() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        };

        let pool = create_pool(config).await.expect("pool should be created");
        health_check(&pool).await.expect("health check should pass");
        close_pool(pool).await;
    }

    #[tokio::test]
    async fn test_create_pool_invalid_url() {
        let config = DatabaseConfig {
            url: "not-a-url".to_string(),
            ..Default::default()
        };

        assert!(create_pool(config).await.is_err());
    }
}
