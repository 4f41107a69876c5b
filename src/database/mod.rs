// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Database Management
//!
//! The server fronts two SQLite databases:
//!
//! - [`ConfigurationsDatabase`]: users, access grants, reviews, training and
//!   the program → clinic → location configuration hierarchy
//! - [`RequirementsDatabase`]: clients, programs, requirements, user stories
//!   and UAT test cases
//!
//! Both are opened through [`open_pool`] and run `CREATE TABLE IF NOT EXISTS`
//! migrations on open, so a fresh path yields an empty but usable database.

/// Configurations toolkit storage
pub mod configurations;
/// Requirements toolkit storage
pub mod requirements;
/// Demo data for both databases
pub mod seed;

pub use configurations::ConfigurationsDatabase;
pub use requirements::RequirementsDatabase;

use std::path::Path;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::environment::expand_home;
use crate::errors::{AppError, AppResult};

/// Storage format of every date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Path value that opens a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Parse a `YYYY-MM-DD` column value; anything after the date is ignored
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Format a date for storage
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `today` moved forward by `days`, rejecting windows past the calendar range
///
/// # Errors
///
/// Returns an invalid input error when the result overflows `NaiveDate`
pub fn days_after(today: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| {
            AppError::invalid_input(format!("Review window of {days} days is out of range"))
        })
}

/// Open a connection pool for a SQLite file, creating it when missing
///
/// `~` is expanded to the home directory and missing parent directories are
/// created. [`IN_MEMORY`] keeps a single connection alive for the lifetime of
/// the pool so the schema survives between queries.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or `SQLite`
/// refuses the connection
pub async fn open_pool(path: &Path) -> AppResult<SqlitePool> {
    if path == Path::new(IN_MEMORY) {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        return Ok(pool);
    }

    let file = path.to_str().map_or_else(|| path.to_path_buf(), expand_home);
    ensure_parent_dir(&file)?;
    debug!(path = %file.display(), "Opening SQLite database");

    let options = SqliteConnectOptions::new()
        .filename(&file)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to open {}: {e}", file.display())).with_source(e)
        })
}

fn ensure_parent_dir(file: &Path) -> AppResult<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
                .with_source(e)
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_date("2025-03-14"), expected);
        assert_eq!(parse_date("2025-03-14 09:30:00"), expected);
        assert_eq!(parse_date("14/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_days_after_rejects_overflow() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(days_after(today, 30).unwrap(), NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(
            days_after(today, 200_000_000).unwrap_err().code,
            crate::errors::ErrorCode::InvalidInput
        );
        assert!(days_after(today, i64::MAX).is_err());
    }

    #[tokio::test]
    async fn test_open_pool_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("test.db");
        let pool = open_pool(&path).await.unwrap();
        sqlx::query("SELECT 1").execute(&pool).await.unwrap();
        assert!(path.exists());
    }
}
