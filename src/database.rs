// Database - SQLite connection pool and schema bootstrap
// Constraint enforcement is left to the store; this layer only connects and creates tables.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::schemas::create_schema_registry;

/// Handle to the relational store. Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct SocialDatabase {
    pool: SqlitePool,
}

impl SocialDatabase {
    /// Connect to a SQLite database URL, creating the file if needed
    pub async fn new(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(url, max_connections, "connected to database");
        Ok(Self { pool })
    }

    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        Self::new(&config.url, config.max_connections).await
    }

    /// Fresh in-memory database with all tables created
    pub async fn new_in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // Each connection to :memory: is its own database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// Create every registered table and index that does not exist yet
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) -> AppResult<()> {
        let registry = create_schema_registry();
        registry
            .validate()
            .map_err(|errors| AppError::Validation(errors.join("; ")))?;

        for statement in registry.create_statements() {
            sqlx::query(&statement).execute(&self.pool).await?;
        }

        tracing::info!(tables = registry.tables().len(), "schema initialized");
        Ok(())
    }

    /// Health check to verify database connectivity
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Names of the user tables currently present, sorted
    pub async fn table_names(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
