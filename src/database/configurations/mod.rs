// ABOUTME: Configurations toolkit database: users, access grants, training and config hierarchy
// ABOUTME: Owns the sqlx pool and runs the schema migrations for every configurations table

//! Storage for the configurations toolkit.
//!
//! Operations are grouped by concern into `impl ConfigurationsDatabase`
//! blocks in the sibling modules.

mod access;
mod compliance;
mod hierarchy;
mod settings;
mod training;
mod users;

use std::path::Path;
use std::time::Instant;

use sqlx::SqlitePool;

use super::open_pool;
use crate::errors::AppResult;
use crate::logging::AppLogger;

/// Configurations database handle
#[derive(Clone)]
pub struct ConfigurationsDatabase {
    pool: SqlitePool,
}

impl ConfigurationsDatabase {
    /// Open (or create) the database at `path` and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a migration fails
    pub async fn open(path: &Path) -> AppResult<Self> {
        let pool = open_pool(path).await?;
        Self::new(pool).await
    }

    /// Wrap an existing pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails
    pub async fn new(pool: SqlitePool) -> AppResult<Self> {
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        let started = Instant::now();

        self.migrate_hierarchy().await?;
        self.migrate_users().await?;
        self.migrate_access().await?;
        self.migrate_training().await?;
        self.migrate_settings().await?;

        AppLogger::log_database_operation(
            "migrate",
            "configurations",
            true,
            started.elapsed().as_millis() as u64,
        );
        Ok(())
    }
}
