// ABOUTME: User management database operations
// ABOUTME: Handles user creation, lookup by email and filtered listing with access counts

use chrono::NaiveDate;
use uuid::Uuid;

use super::ConfigurationsDatabase;
use crate::database::format_date;
use crate::errors::{AppError, AppResult};
use crate::models::access::{NewUser, User, UserFilter, UserStatus, UserSummary};

#[derive(sqlx::FromRow)]
struct UserRow {
    #[sqlx(flatten)]
    user: User,
    active_access_count: i64,
}

impl ConfigurationsDatabase {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                organization TEXT DEFAULT 'Internal',
                is_business_associate INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'Active'
                    CHECK (status IN ('Active', 'Inactive', 'Terminated')),
                created_date TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_status ON users(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a user and return the new id
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the email is already registered
    pub async fn create_user(&self, user: &NewUser, today: NaiveDate) -> AppResult<String> {
        if self.get_user(&user.email).await?.is_some() {
            return Err(AppError::already_exists(format!(
                "User already exists with email: {}",
                user.email
            )));
        }

        let user_id = Uuid::new_v4().to_string();
        sqlx::query(
            r"
            INSERT INTO users (user_id, name, email, organization, is_business_associate, status, created_date)
            VALUES ($1, $2, $3, $4, $5, 'Active', $6)
            ",
        )
        .bind(&user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.organization)
        .bind(user.is_business_associate)
        .bind(format_date(today))
        .execute(&self.pool)
        .await?;

        Ok(user_id)
    }

    /// Look a user up by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT user_id, name, email, organization, is_business_associate, status, created_date
            FROM users WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Change a user's lifecycle status
    ///
    /// Access grants are left untouched; the terminated user audit reports
    /// users whose grants were not revoked.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no user has this id
    pub async fn set_user_status(&self, user_id: &str, status: UserStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET status = $1 WHERE user_id = $2")
            .bind(status.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        Ok(())
    }

    /// List users ordered by name
    ///
    /// The program filter keeps users holding an active grant in that
    /// program; status matches exactly; organization is a case-insensitive
    /// substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_users(&self, filter: &UserFilter<'_>) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT u.user_id, u.name, u.email, u.organization, u.is_business_associate,
                   u.status, u.created_date,
                   (SELECT COUNT(*) FROM user_access a
                    WHERE a.user_id = u.user_id AND a.is_active = 1) AS active_access_count
            FROM users u
            WHERE ($1 IS NULL OR EXISTS (
                      SELECT 1 FROM user_access a
                      WHERE a.user_id = u.user_id AND a.program_id = $1 AND a.is_active = 1))
              AND ($2 IS NULL OR u.status = $2)
              AND ($3 IS NULL OR instr(LOWER(COALESCE(u.organization, '')), LOWER($3)) > 0)
            ORDER BY u.name
            ",
        )
        .bind(filter.program_id)
        .bind(filter.status)
        .bind(filter.organization)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                user: row.user,
                active_access_count: filter
                    .include_access_count
                    .then_some(row.active_access_count),
            })
            .collect())
    }

    /// Total number of users
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn user_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
