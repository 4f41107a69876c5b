// ABOUTME: Access grant and access review database operations
// ABOUTME: Grants, revocations, scope queries and the annual review schedule

use chrono::{Duration, NaiveDate};
use tracing::warn;
use uuid::Uuid;

use super::ConfigurationsDatabase;
use crate::constants::defaults::REVIEW_INTERVAL_DAYS;
use crate::database::{days_after, format_date, parse_date};
use crate::errors::{AppError, AppResult};
use crate::models::access::{AccessGrant, NewAccessGrant, ReviewDue};

/// Access grant joined with user, program, clinic and location names
pub(super) const GRANT_SELECT: &str = r"
    SELECT a.access_id, a.user_id, u.name AS user_name, u.email, u.status, u.organization,
           a.program_id, p.name AS program_name,
           a.clinic_id, c.name AS clinic_name,
           a.location_id, l.name AS location_name,
           a.role, a.granted_date, a.granted_by, a.next_review_due, a.is_active,
           a.revoked_date, a.revoked_reason
    FROM user_access a
    JOIN users u ON u.user_id = a.user_id
    JOIN programs p ON p.program_id = a.program_id
    LEFT JOIN clinics c ON c.clinic_id = a.clinic_id
    LEFT JOIN locations l ON l.location_id = a.location_id
";

impl ConfigurationsDatabase {
    pub(super) async fn migrate_access(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_access (
                access_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                clinic_id TEXT REFERENCES clinics(clinic_id),
                location_id TEXT REFERENCES locations(location_id),
                role TEXT NOT NULL,
                granted_date TEXT NOT NULL,
                granted_by TEXT,
                next_review_due TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                revoked_date TEXT,
                revoked_reason TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS access_reviews (
                review_id TEXT PRIMARY KEY,
                access_id TEXT NOT NULL REFERENCES user_access(access_id) ON DELETE CASCADE,
                review_date TEXT NOT NULL,
                reviewed_by TEXT,
                outcome TEXT,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_access_user ON user_access(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_access_scope ON user_access(program_id, clinic_id, location_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_access_reviews_access ON access_reviews(access_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Grant access and schedule its first review a year out
    ///
    /// # Errors
    ///
    /// Returns an error if the user or scope does not exist
    pub async fn grant_access(&self, grant: &NewAccessGrant<'_>) -> AppResult<String> {
        let access_id = Uuid::new_v4().to_string();
        let next_review = grant.granted_date + Duration::days(REVIEW_INTERVAL_DAYS);

        sqlx::query(
            r"
            INSERT INTO user_access (
                access_id, user_id, program_id, clinic_id, location_id, role,
                granted_date, granted_by, next_review_due, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1)
            ",
        )
        .bind(&access_id)
        .bind(grant.user_id)
        .bind(grant.program_id)
        .bind(grant.clinic_id)
        .bind(grant.location_id)
        .bind(grant.role)
        .bind(format_date(grant.granted_date))
        .bind(grant.granted_by)
        .bind(format_date(next_review))
        .execute(&self.pool)
        .await?;

        Ok(access_id)
    }

    /// Deactivate a grant
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the grant does not exist
    pub async fn revoke_access(
        &self,
        access_id: &str,
        revoked_date: NaiveDate,
        reason: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE user_access
            SET is_active = 0, revoked_date = $1, revoked_reason = $2
            WHERE access_id = $3
            ",
        )
        .bind(format_date(revoked_date))
        .bind(reason)
        .bind(access_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Access grant {access_id}")));
        }
        Ok(())
    }

    /// Record a completed review and push the next one a year out
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the grant does not exist
    pub async fn record_review(
        &self,
        access_id: &str,
        review_date: NaiveDate,
        reviewed_by: Option<&str>,
        outcome: &str,
        notes: Option<&str>,
    ) -> AppResult<String> {
        let review_id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE user_access SET next_review_due = $1 WHERE access_id = $2")
            .bind(format_date(review_date + Duration::days(REVIEW_INTERVAL_DAYS)))
            .bind(access_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Access grant {access_id}")));
        }

        sqlx::query(
            r"
            INSERT INTO access_reviews (review_id, access_id, review_date, reviewed_by, outcome, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&review_id)
        .bind(access_id)
        .bind(format_date(review_date))
        .bind(reviewed_by)
        .bind(outcome)
        .bind(notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review_id)
    }

    /// Date of the most recent review of a grant
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn last_review_date(&self, access_id: &str) -> AppResult<Option<String>> {
        let date = sqlx::query_scalar::<_, Option<String>>(
            "SELECT MAX(review_date) FROM access_reviews WHERE access_id = $1",
        )
        .bind(access_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(date)
    }

    /// Grants held by a user, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_access(
        &self,
        user_id: &str,
        active_only: bool,
    ) -> AppResult<Vec<AccessGrant>> {
        let sql = format!(
            "{GRANT_SELECT} WHERE a.user_id = $1 AND ($2 = 0 OR a.is_active = 1) \
             ORDER BY a.is_active DESC, p.name, a.granted_date DESC"
        );
        let grants = sqlx::query_as::<_, AccessGrant>(&sql)
            .bind(user_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(grants)
    }

    /// Grants whose own scope columns match every given filter
    ///
    /// Each filter compares the grant's own column, so a clinic filter keeps
    /// that clinic's clinic- and location-level grants but not program-wide
    /// ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_access_by_scope(
        &self,
        program_id: Option<&str>,
        clinic_id: Option<&str>,
        location_id: Option<&str>,
        active_only: bool,
    ) -> AppResult<Vec<AccessGrant>> {
        let sql = format!(
            "{GRANT_SELECT} WHERE ($1 IS NULL OR a.program_id = $1) \
             AND ($2 IS NULL OR a.clinic_id = $2) \
             AND ($3 IS NULL OR a.location_id = $3) \
             AND ($4 = 0 OR a.is_active = 1) \
             ORDER BY u.name, p.name, a.role"
        );
        let grants = sqlx::query_as::<_, AccessGrant>(&sql)
            .bind(program_id)
            .bind(clinic_id)
            .bind(location_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(grants)
    }

    /// Active grants whose review falls due within `window_days` of `today`
    ///
    /// Overdue grants (due before today) are included, ordered by due date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_reviews_due(
        &self,
        program_id: Option<&str>,
        today: NaiveDate,
        window_days: i64,
    ) -> AppResult<Vec<ReviewDue>> {
        let cutoff = days_after(today, window_days)?;
        let sql = format!(
            "{GRANT_SELECT} WHERE a.is_active = 1 AND a.next_review_due <= $1 \
             AND ($2 IS NULL OR a.program_id = $2) \
             ORDER BY a.next_review_due, u.name"
        );
        let grants = sqlx::query_as::<_, AccessGrant>(&sql)
            .bind(format_date(cutoff))
            .bind(program_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(grants
            .into_iter()
            .filter_map(|grant| {
                let Some(due) = parse_date(&grant.next_review_due) else {
                    warn!(
                        access_id = %grant.access_id,
                        next_review_due = %grant.next_review_due,
                        "Skipping access grant with unparseable review date"
                    );
                    return None;
                };
                let days_overdue = (today - due).num_days();
                Some(ReviewDue {
                    access_id: grant.access_id,
                    user_name: grant.user_name,
                    email: grant.email,
                    program_name: grant.program_name,
                    role: grant.role,
                    next_review_due: due,
                    is_overdue: due < today,
                    days_overdue: days_overdue.max(0),
                })
            })
            .collect())
    }
}
