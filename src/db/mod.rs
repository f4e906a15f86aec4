//! PostgreSQL access for the engine.
//!
//! One pool is shared by every manager and the facade. Multi-step writes
//! (cascades, the reverse/write/apply sequence) begin transactions against
//! this pool so a failure anywhere rolls the whole call back.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::time::Duration;

/// Connection settings for [`Database::new`].
///
/// The engine's workload is short synchronous read/write bursts from the
/// admin console, so only the URL, pool ceiling, and acquire timeout are
/// configurable; everything else uses the driver defaults.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Seconds to wait for a free connection before giving up
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Read settings from the environment: `DATABASE_URL` (required),
    /// `DB_MAX_CONNECTIONS` (default 10), `DB_ACQUIRE_TIMEOUT` (default 10)
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is not set
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            acquire_timeout_secs: env::var("DB_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DB_ACQUIRE_TIMEOUT must be a valid u64"),
        }
    }

    /// Local development defaults against `tourney_db`
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/tourney_db".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tourney_core::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), sqlx::Error> {
    ///     let db = Database::new(&DatabaseConfig::from_env()).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_targets_local_postgres() {
        let config = DatabaseConfig::development();
        assert!(config.database_url.ends_with("/tourney_db"));
        assert_eq!(config.max_connections, 10);
    }
}
