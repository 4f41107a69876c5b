// ABOUTME: Compliance report queries over access, reviews and training
// ABOUTME: Access list, review status, training compliance, terminated audit and business associates

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sqlx::Row;

use super::access::GRANT_SELECT;
use super::ConfigurationsDatabase;
use crate::database::{days_after, format_date};
use crate::errors::AppResult;
use crate::models::access::{
    AccessGrant, AccessListReport, BusinessAssociateReport, ReviewStatusSummary,
    TerminatedViolation, TrainingComplianceSummary, TrainingRecord, TrainingStatus, User,
};

/// Per-user compliance outcome for one required training type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequirementState {
    Current,
    Expired,
    Missing,
}

impl ConfigurationsDatabase {
    /// Active grants, optionally within one program, ordered by user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn access_list_report(&self, program_id: Option<&str>) -> AppResult<AccessListReport> {
        let sql = format!(
            "{GRANT_SELECT} WHERE a.is_active = 1 AND ($1 IS NULL OR a.program_id = $1) \
             ORDER BY u.name, u.user_id, p.name, a.role"
        );
        let grants = sqlx::query_as::<_, AccessGrant>(&sql)
            .bind(program_id)
            .fetch_all(&self.pool)
            .await?;

        let total_users = grants
            .iter()
            .map(|grant| grant.user_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(AccessListReport {
            total_users,
            total_access_grants: grants.len(),
            grants,
        })
    }

    /// Active grants bucketed by review due date
    ///
    /// Overdue: due before `today`. Due soon: within `window_days`.
    /// Current: due after the window.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn review_status_report(
        &self,
        program_id: Option<&str>,
        today: NaiveDate,
        window_days: i64,
    ) -> AppResult<ReviewStatusSummary> {
        let cutoff = days_after(today, window_days)?;
        let row = sqlx::query(
            r"
            SELECT
                COALESCE(SUM(CASE WHEN next_review_due < $1 THEN 1 ELSE 0 END), 0) AS overdue_count,
                COALESCE(SUM(CASE WHEN next_review_due >= $1 AND next_review_due <= $2 THEN 1 ELSE 0 END), 0) AS due_soon_count,
                COALESCE(SUM(CASE WHEN next_review_due > $2 THEN 1 ELSE 0 END), 0) AS current_count
            FROM user_access
            WHERE is_active = 1 AND ($3 IS NULL OR program_id = $3)
            ",
        )
        .bind(format_date(today))
        .bind(format_date(cutoff))
        .bind(program_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReviewStatusSummary {
            current: row.get::<i64, _>("current_count") as usize,
            due_soon: row.get::<i64, _>("due_soon_count") as usize,
            overdue: row.get::<i64, _>("overdue_count") as usize,
        })
    }

    /// Required-training compliance across active users
    ///
    /// A user is compliant when every required type is effectively
    /// `Current`. Any expired required type counts the user as expired;
    /// otherwise a required type without a current record counts the user as
    /// missing training.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is unknown
    pub async fn training_compliance_report(
        &self,
        required_types: &[String],
        today: NaiveDate,
    ) -> AppResult<TrainingComplianceSummary> {
        let user_ids: Vec<String> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE status = 'Active' ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        let rows = sqlx::query(
            r"
            SELECT t.user_id, t.training_type, t.status, t.expires_date
            FROM user_training t
            JOIN users u ON u.user_id = t.user_id
            WHERE u.status = 'Active'
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut records: HashMap<String, Vec<(String, TrainingStatus)>> = HashMap::new();
        for row in rows {
            let stored: TrainingStatus = row.get::<String, _>("status").parse()?;
            let expires: Option<String> = row.get("expires_date");
            let effective = TrainingRecord::effective_status(stored, expires.as_deref(), today);
            records
                .entry(row.get("user_id"))
                .or_default()
                .push((row.get("training_type"), effective));
        }

        let mut summary = TrainingComplianceSummary {
            total_users: user_ids.len(),
            compliant: 0,
            missing_training: 0,
            expired_training: 0,
        };

        for user_id in &user_ids {
            let held = records.get(user_id).map_or(&[][..], Vec::as_slice);
            let states: Vec<RequirementState> = required_types
                .iter()
                .map(|required| requirement_state(held, required))
                .collect();

            if states.contains(&RequirementState::Expired) {
                summary.expired_training += 1;
            } else if states.contains(&RequirementState::Missing) {
                summary.missing_training += 1;
            } else {
                summary.compliant += 1;
            }
        }

        Ok(summary)
    }

    /// Terminated users who still hold active grants
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn terminated_user_audit(&self) -> AppResult<Vec<TerminatedViolation>> {
        let violations = sqlx::query_as::<_, TerminatedViolation>(
            r"
            SELECT u.user_id, u.name AS user_name, u.email, COUNT(a.access_id) AS active_grants
            FROM users u
            JOIN user_access a ON a.user_id = u.user_id AND a.is_active = 1
            WHERE u.status = 'Terminated'
            GROUP BY u.user_id, u.name, u.email
            ORDER BY u.name
            ",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(violations)
    }

    /// Every user flagged as a HIPAA business associate
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn business_associate_report(&self) -> AppResult<BusinessAssociateReport> {
        let associates = sqlx::query_as::<_, User>(
            r"
            SELECT user_id, name, email, organization, is_business_associate, status, created_date
            FROM users
            WHERE is_business_associate = 1
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let active = associates
            .iter()
            .filter(|user| user.status == "Active")
            .count();

        Ok(BusinessAssociateReport {
            total: associates.len(),
            active,
            associates,
        })
    }
}

fn requirement_state(held: &[(String, TrainingStatus)], required: &str) -> RequirementState {
    let matching = || {
        held.iter()
            .filter(move |(training_type, _)| training_type.eq_ignore_ascii_case(required))
            .map(|(_, status)| *status)
    };

    if matching().any(|status| status == TrainingStatus::Current) {
        RequirementState::Current
    } else if matching().any(|status| status == TrainingStatus::Expired) {
        RequirementState::Expired
    } else {
        RequirementState::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_state_prefers_current_record() {
        let held = vec![
            ("HIPAA".to_owned(), TrainingStatus::Expired),
            ("hipaa".to_owned(), TrainingStatus::Current),
        ];
        assert_eq!(requirement_state(&held, "HIPAA"), RequirementState::Current);
    }

    #[test]
    fn test_requirement_state_pending_counts_as_missing() {
        let held = vec![("Cybersecurity".to_owned(), TrainingStatus::Pending)];
        assert_eq!(
            requirement_state(&held, "Cybersecurity"),
            RequirementState::Missing
        );
        assert_eq!(requirement_state(&held, "HIPAA"), RequirementState::Missing);
    }
}
