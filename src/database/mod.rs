// ABOUTME: Database connection management and schema migrations
// ABOUTME: Wraps a SQLite pool with per-domain operation modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Database Module
//!
//! Connection pooling and schema setup. Each domain (users, scores, surveys,
//! crime, ZIP areas, regression parameters, news, scoring) contributes an
//! `impl Database` block in its own file; this module owns the pool and runs
//! the migrations in order.

mod crime;
mod news;
mod regression;
mod scores;
mod scoring;
mod surveys;
mod users;
mod zip_areas;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::environment::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database connection pool and operations
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or a migration statement
    /// cannot be applied
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let connection_string = match url {
            DatabaseUrl::SQLite { .. } | DatabaseUrl::Memory => url.to_connection_string(),
            DatabaseUrl::PostgreSQL { .. } => {
                return Err(AppError::config(
                    "This build supports SQLite only; set DATABASE_URL to a sqlite: location",
                ))
            }
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        // An in-memory database exists per connection, so the pool must keep
        // exactly one open forever; reclaiming it would drop the schema
        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;

        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    /// Shared pool handle for the domain operation modules
    pub(crate) const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verify the pool can execute a statement
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply all schema migrations
    async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_scores().await?;
        self.migrate_surveys().await?;
        self.migrate_crime().await?;
        self.migrate_zip_areas().await?;
        self.migrate_regression().await?;
        self.migrate_news().await?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_keeps_schema_across_checkouts() {
        let database = Database::new(&DatabaseUrl::Memory).await.unwrap();

        // Every checkout must land on the one pinned connection that holds
        // the migrated schema
        for _ in 0..3 {
            sqlx::query("SELECT COUNT(*) FROM users")
                .execute(database.pool())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_postgres_url_is_rejected() {
        let url = DatabaseUrl::PostgreSQL {
            connection_string: "postgresql://localhost/happy_map".into(),
        };
        assert!(Database::new(&url).await.is_err());
    }
}
