// ABOUTME: Training record database operations
// ABOUTME: Records training, reports each user's effective status and lists lapsed training

use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

use super::ConfigurationsDatabase;
use crate::database::format_date;
use crate::errors::AppResult;
use crate::models::access::{ExpiredTraining, NewTraining, TrainingRecord, TrainingStatus};

impl ConfigurationsDatabase {
    pub(super) async fn migrate_training(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_training (
                training_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                training_type TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (status IN ('Pending', 'Current', 'Expired')),
                assigned_date TEXT,
                completed_date TEXT,
                expires_date TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_training_user ON user_training(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a training assignment or completion
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails
    pub async fn add_training(&self, training: &NewTraining<'_>) -> AppResult<String> {
        let training_id = Uuid::new_v4().to_string();
        sqlx::query(
            r"
            INSERT INTO user_training (
                training_id, user_id, training_type, status, assigned_date, completed_date, expires_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&training_id)
        .bind(training.user_id)
        .bind(training.training_type)
        .bind(training.status.as_str())
        .bind(format_date(training.assigned_date))
        .bind(training.completed_date.map(format_date))
        .bind(training.expires_date.map(format_date))
        .execute(&self.pool)
        .await?;
        Ok(training_id)
    }

    /// Training records of a user with their effective status as of `today`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is unknown
    pub async fn get_training_status(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> AppResult<Vec<TrainingRecord>> {
        let rows = sqlx::query(
            r"
            SELECT training_id, user_id, training_type, status, assigned_date, completed_date, expires_date
            FROM user_training
            WHERE user_id = $1
            ORDER BY training_type, assigned_date
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> AppResult<TrainingRecord> {
                let stored: TrainingStatus = row.get::<String, _>("status").parse()?;
                let expires_date: Option<String> = row.get("expires_date");
                Ok(TrainingRecord {
                    training_id: row.get("training_id"),
                    user_id: row.get("user_id"),
                    training_type: row.get("training_type"),
                    status: TrainingRecord::effective_status(
                        stored,
                        expires_date.as_deref(),
                        today,
                    ),
                    assigned_date: row.get("assigned_date"),
                    completed_date: row.get("completed_date"),
                    expires_date,
                })
            })
            .collect()
    }

    /// Expired training held by active users, soonest expiry first
    ///
    /// Includes `Current` records whose expiry date has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_expired_training(&self, today: NaiveDate) -> AppResult<Vec<ExpiredTraining>> {
        let rows = sqlx::query(
            r"
            SELECT u.name, u.email, t.training_type, t.expires_date
            FROM user_training t
            JOIN users u ON u.user_id = t.user_id
            WHERE u.status = 'Active'
              AND (t.status = 'Expired'
                   OR (t.status = 'Current' AND t.expires_date IS NOT NULL AND t.expires_date < $1))
            ORDER BY t.expires_date, u.name
            ",
        )
        .bind(format_date(today))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ExpiredTraining {
                user_name: row.get("name"),
                user_email: row.get("email"),
                training_type: row.get("training_type"),
                expires_date: row.get("expires_date"),
            })
            .collect())
    }
}
