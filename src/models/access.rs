// ABOUTME: Data models for the configurations toolkit: users, access grants, training, hierarchy
// ABOUTME: Includes the config inheritance chain and compliance report summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Lifecycle status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    /// Working user
    Active,
    /// Temporarily inactive
    Inactive,
    /// Left the organization; must hold no active access
    Terminated,
}

impl UserStatus {
    /// Database and display value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a training record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingStatus {
    /// Assigned, not completed
    Pending,
    /// Completed and in date
    Current,
    /// Past its expiry date
    Expired,
}

impl TrainingStatus {
    /// Database and display value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Current => "Current",
            Self::Expired => "Expired",
        }
    }
}

impl FromStr for TrainingStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Current" => Ok(Self::Current),
            "Expired" => Ok(Self::Expired),
            other => Err(AppError::invalid_input(format!(
                "Unknown training status: {other}"
            ))),
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// UUID text
    pub user_id: String,
    /// Full name
    pub name: String,
    /// Unique email (case-insensitive)
    pub email: String,
    /// Employer, `Internal` for staff
    pub organization: Option<String>,
    /// External party requiring a HIPAA BAA
    pub is_business_associate: bool,
    /// Active, Inactive or Terminated
    pub status: String,
    /// Creation date (`YYYY-MM-DD`)
    pub created_date: Option<String>,
}

/// User row plus the number of active access grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// The user
    pub user: User,
    /// Active grants, when requested
    pub active_access_count: Option<i64>,
}

/// Input for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    /// Full name
    pub name: String,
    /// Email address, must be unique
    pub email: String,
    /// Employer
    pub organization: String,
    /// External party requiring a HIPAA BAA
    pub is_business_associate: bool,
}

/// Filters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter<'a> {
    /// Only users holding an active grant in this program id
    pub program_id: Option<&'a str>,
    /// Exact status match
    pub status: Option<&'a str>,
    /// Case-insensitive organization substring
    pub organization: Option<&'a str>,
    /// Compute active grant counts
    pub include_access_count: bool,
}

/// Access grant joined with user, program, clinic and location names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AccessGrant {
    /// UUID text
    pub access_id: String,
    /// Grantee
    pub user_id: String,
    /// Grantee name
    pub user_name: String,
    /// Grantee email
    pub email: String,
    /// Grantee status
    pub status: String,
    /// Grantee organization
    pub organization: Option<String>,
    /// Program scope
    pub program_id: String,
    /// Program name
    pub program_name: String,
    /// Optional clinic scope
    pub clinic_id: Option<String>,
    /// Clinic name
    pub clinic_name: Option<String>,
    /// Optional location scope
    pub location_id: Option<String>,
    /// Location name
    pub location_name: Option<String>,
    /// Role within the scope
    pub role: String,
    /// Grant date (`YYYY-MM-DD`)
    pub granted_date: String,
    /// Who granted it
    pub granted_by: Option<String>,
    /// Next review date (`YYYY-MM-DD`)
    pub next_review_due: String,
    /// False once revoked
    pub is_active: bool,
    /// Revocation date
    pub revoked_date: Option<String>,
    /// Revocation reason
    pub revoked_reason: Option<String>,
}

/// Input for granting access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessGrant<'a> {
    /// Grantee
    pub user_id: &'a str,
    /// Program scope
    pub program_id: &'a str,
    /// Optional clinic scope
    pub clinic_id: Option<&'a str>,
    /// Optional location scope
    pub location_id: Option<&'a str>,
    /// Role within the scope
    pub role: &'a str,
    /// Grant date
    pub granted_date: NaiveDate,
    /// Who granted it
    pub granted_by: Option<&'a str>,
}

/// Active grant with a review due within the window or overdue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDue {
    /// The grant
    pub access_id: String,
    /// Grantee name
    pub user_name: String,
    /// Grantee email
    pub email: String,
    /// Program name
    pub program_name: String,
    /// Role
    pub role: String,
    /// Due date
    pub next_review_due: NaiveDate,
    /// Due date is before today
    pub is_overdue: bool,
    /// Days past due, 0 when not overdue
    pub days_overdue: i64,
}

/// Training record with its effective status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingRecord {
    /// UUID text
    pub training_id: String,
    /// Trainee
    pub user_id: String,
    /// Training type (e.g. HIPAA)
    pub training_type: String,
    /// Effective status
    pub status: TrainingStatus,
    /// Assignment date
    pub assigned_date: Option<String>,
    /// Completion date
    pub completed_date: Option<String>,
    /// Expiry date
    pub expires_date: Option<String>,
}

impl TrainingRecord {
    /// A `Current` record whose expiry date has passed counts as `Expired`
    #[must_use]
    pub fn effective_status(
        stored: TrainingStatus,
        expires: Option<&str>,
        today: NaiveDate,
    ) -> TrainingStatus {
        let lapsed = expires
            .and_then(crate::database::parse_date)
            .is_some_and(|date| date < today);
        match stored {
            TrainingStatus::Current if lapsed => TrainingStatus::Expired,
            other => other,
        }
    }
}

/// Expired training joined with the trainee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredTraining {
    /// Trainee name
    pub user_name: String,
    /// Trainee email
    pub user_email: String,
    /// Training type
    pub training_type: String,
    /// Expiry date
    pub expires_date: Option<String>,
}

/// Input for recording training
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraining<'a> {
    /// Trainee
    pub user_id: &'a str,
    /// Training type
    pub training_type: &'a str,
    /// Stored status
    pub status: TrainingStatus,
    /// Assignment date
    pub assigned_date: NaiveDate,
    /// Completion date
    pub completed_date: Option<NaiveDate>,
    /// Expiry date
    pub expires_date: Option<NaiveDate>,
}

/// Location within a clinic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LocationNode {
    /// UUID text
    pub location_id: String,
    /// Display name
    pub name: String,
    /// Short code
    pub code: Option<String>,
    /// Status
    pub status: String,
}

/// Clinic within a program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicNode {
    /// UUID text
    pub clinic_id: String,
    /// Display name
    pub name: String,
    /// Short code
    pub code: Option<String>,
    /// Status
    pub status: String,
    /// Locations ordered by name
    pub locations: Vec<LocationNode>,
}

/// Program with its clinics and locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramNode {
    /// UUID text
    pub program_id: String,
    /// Display name
    pub name: String,
    /// Short prefix (e.g. P4M)
    pub prefix: String,
    /// Program type
    pub program_type: Option<String>,
    /// Status
    pub status: String,
    /// Clinics ordered by name
    pub clinics: Vec<ClinicNode>,
}

/// Clinic located by name or code across all programs
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ClinicMatch {
    /// Clinic id
    pub clinic_id: String,
    /// Owning program id
    pub program_id: String,
    /// Clinic name
    pub name: String,
}

/// Level of the configuration hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConfigLevel {
    /// Definition default
    Default,
    /// Set for the program
    Program,
    /// Set for a clinic
    Clinic,
    /// Set for a location
    Location,
}

impl ConfigLevel {
    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Program => "program",
            Self::Clinic => "clinic",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for ConfigLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One level of an inheritance chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritanceLevel {
    /// Level
    pub level: ConfigLevel,
    /// Value set exactly at this level
    pub value: Option<String>,
    /// Most specific level with a value
    pub is_effective: bool,
    /// Has a value while a less specific level also has one
    pub is_override: bool,
}

/// Configuration value with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigResolution {
    /// Key
    pub config_key: String,
    /// Effective value
    pub value: String,
    /// Level the effective value is set at
    pub effective_level: ConfigLevel,
    /// Effective value overrides an inherited one
    pub is_override: bool,
    /// Levels from least to most specific
    pub chain: Vec<InheritanceLevel>,
}

impl ConfigResolution {
    /// Resolve a chain of `(level, value)` pairs ordered least specific first
    #[must_use]
    pub fn from_levels(
        config_key: &str,
        levels: Vec<(ConfigLevel, Option<String>)>,
    ) -> Option<Self> {
        let effective_index = levels.iter().rposition(|(_, value)| value.is_some())?;

        let mut seen_value = false;
        let chain: Vec<InheritanceLevel> = levels
            .into_iter()
            .enumerate()
            .map(|(index, (level, value))| {
                let is_override = value.is_some() && seen_value;
                seen_value |= value.is_some();
                InheritanceLevel {
                    level,
                    value,
                    is_effective: index == effective_index,
                    is_override,
                }
            })
            .collect();

        let effective = &chain[effective_index];
        Some(Self {
            config_key: config_key.to_owned(),
            value: effective.value.clone().unwrap_or_default(),
            effective_level: effective.level,
            is_override: effective.is_override,
            chain,
        })
    }
}

/// Access list report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessListReport {
    /// Distinct users holding active grants
    pub total_users: usize,
    /// Active grants
    pub total_access_grants: usize,
    /// Grants ordered by user name
    pub grants: Vec<AccessGrant>,
}

/// Review status counts over active grants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewStatusSummary {
    /// Due after the window
    pub current: usize,
    /// Due within the window
    pub due_soon: usize,
    /// Due before today
    pub overdue: usize,
}

/// Training compliance counts over active users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrainingComplianceSummary {
    /// Active users considered
    pub total_users: usize,
    /// Every required type current
    pub compliant: usize,
    /// Some required type missing or pending, none expired
    pub missing_training: usize,
    /// Some required type expired
    pub expired_training: usize,
}

/// Terminated user still holding active access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TerminatedViolation {
    /// User id
    pub user_id: String,
    /// User name
    pub user_name: String,
    /// User email
    pub email: String,
    /// Active grants still held
    pub active_grants: i64,
}

/// Business associate report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessAssociateReport {
    /// Business associates on file
    pub total: usize,
    /// Of which active
    pub active: usize,
    /// Ordered by name
    pub associates: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(level: ConfigLevel, value: Option<&str>) -> (ConfigLevel, Option<String>) {
        (level, value.map(str::to_owned))
    }

    #[test]
    fn test_clinic_override_of_program_value() {
        let resolution = ConfigResolution::from_levels(
            "helpdesk_phone",
            vec![
                level(ConfigLevel::Default, None),
                level(ConfigLevel::Program, Some("555-0100")),
                level(ConfigLevel::Clinic, Some("555-0199")),
            ],
        )
        .unwrap();

        assert_eq!(resolution.value, "555-0199");
        assert_eq!(resolution.effective_level, ConfigLevel::Clinic);
        assert!(resolution.is_override);
        assert!(!resolution.chain[1].is_override);
        assert!(resolution.chain[2].is_effective);
    }

    #[test]
    fn test_default_only_is_not_override() {
        let resolution = ConfigResolution::from_levels(
            "hours_open",
            vec![
                level(ConfigLevel::Default, Some("8-5")),
                level(ConfigLevel::Program, None),
            ],
        )
        .unwrap();
        assert_eq!(resolution.effective_level, ConfigLevel::Default);
        assert!(!resolution.is_override);
    }

    #[test]
    fn test_no_values_resolves_to_none() {
        assert!(ConfigResolution::from_levels(
            "missing",
            vec![level(ConfigLevel::Default, None)]
        )
        .is_none());
    }

    #[test]
    fn test_effective_training_status() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            TrainingRecord::effective_status(TrainingStatus::Current, Some("2025-05-31"), today),
            TrainingStatus::Expired
        );
        assert_eq!(
            TrainingRecord::effective_status(TrainingStatus::Current, Some("2025-06-01"), today),
            TrainingStatus::Current
        );
        assert_eq!(
            TrainingRecord::effective_status(TrainingStatus::Pending, Some("2020-01-01"), today),
            TrainingStatus::Pending
        );
    }
}
