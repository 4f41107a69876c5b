// ABOUTME: Requirements toolkit database: clients, programs, requirements, stories and UAT tests
// ABOUTME: Owns the sqlx pool and runs the requirements schema migrations

//! Storage for the requirements toolkit.
//!
//! The tools only read from this database; the `create_*` operations exist
//! for importers, the demo seeder and tests.

mod clients;
mod reports;
mod stories;
mod test_cases;

use std::path::Path;
use std::time::Instant;

use sqlx::SqlitePool;

use super::open_pool;
use crate::errors::AppResult;
use crate::logging::AppLogger;

/// Requirements database handle
#[derive(Clone)]
pub struct RequirementsDatabase {
    pool: SqlitePool,
}

impl RequirementsDatabase {
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

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS clients (
                client_id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                description TEXT,
                primary_contact TEXT,
                contact_email TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                program_id TEXT PRIMARY KEY,
                client_id TEXT NOT NULL REFERENCES clients(client_id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                prefix TEXT NOT NULL UNIQUE,
                program_type TEXT,
                description TEXT,
                source_file TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS requirements (
                requirement_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                title TEXT,
                description TEXT,
                priority TEXT,
                source TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_stories (
                story_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                requirement_id TEXT REFERENCES requirements(requirement_id) ON DELETE SET NULL,
                title TEXT,
                user_story TEXT,
                acceptance_criteria TEXT,
                success_metrics TEXT,
                priority TEXT,
                category TEXT,
                category_full TEXT,
                status TEXT NOT NULL DEFAULT 'Draft',
                version INTEGER NOT NULL DEFAULT 1,
                approved_date TEXT,
                approved_by TEXT,
                created_date TEXT,
                updated_date TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS uat_test_cases (
                test_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                story_id TEXT REFERENCES user_stories(story_id) ON DELETE SET NULL,
                title TEXT,
                test_type TEXT,
                test_status TEXT NOT NULL DEFAULT 'Not Run',
                test_steps TEXT,
                expected_results TEXT,
                tested_by TEXT,
                tested_date TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_programs_client ON programs(client_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_stories_program ON user_stories(program_id, status)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_stories_requirement ON user_stories(requirement_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tests_story ON uat_test_cases(story_id)")
            .execute(&self.pool)
            .await?;

        AppLogger::log_database_operation(
            "migrate",
            "requirements",
            true,
            started.elapsed().as_millis() as u64,
        );
        Ok(())
    }
}

/// Order `(status, count)` pairs by a standard workflow, unknown statuses last
/// in alphabetical order
pub(crate) fn order_by_workflow(
    mut counts: Vec<(String, i64)>,
    workflow: &[&str],
) -> Vec<(String, i64)> {
    counts.sort_by(|(a, _), (b, _)| {
        let rank = |status: &str| {
            workflow
                .iter()
                .position(|known| *known == status)
                .unwrap_or(workflow.len())
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    counts
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0
pub(crate) fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::workflow::STORY_STATUSES;

    #[test]
    fn test_order_by_workflow_appends_unknown_statuses() {
        let counts = vec![
            ("Zeta".to_owned(), 1),
            ("Approved".to_owned(), 3),
            ("Blocked".to_owned(), 2),
            ("Draft".to_owned(), 4),
        ];
        let ordered: Vec<String> = order_by_workflow(counts, &STORY_STATUSES)
            .into_iter()
            .map(|(status, _)| status)
            .collect();
        assert_eq!(ordered, vec!["Draft", "Approved", "Blocked", "Zeta"]);
    }

    #[test]
    fn test_percent_handles_empty_denominator() {
        assert!((percent(1, 3) - 33.333).abs() < 0.01);
        assert!(percent(5, 0).abs() < f64::EPSILON);
    }
}
