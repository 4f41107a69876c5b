// ABOUTME: User management tools for the configurations toolkit.
// ABOUTME: Implements list_users, get_user, add_user and export_annual_review.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # User Tools
//!
//! - `ListUsersTool` - list users, optionally scoped to a program, clinic or location
//! - `GetUserTool` - profile, access grants and training of one user
//! - `AddUserTool` - create a user
//! - `ExportAnnualReviewTool` - write the annual access review spreadsheet

use std::collections::HashMap;
use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::scope::{resolve_program, resolve_scope};
use crate::config::environment::expand_home;
use crate::constants::defaults::ORGANIZATION;
use crate::database::format_date;
use crate::errors::AppResult;
use crate::export::{export_file_stem, write_review_export, AccessReviewRow, ExportFormat};
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::access::{AccessGrant, NewUser, UserFilter};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

const NO_USERS: &str = "No users found matching the criteria.";

// ============================================================================
// list_users
// ============================================================================

/// A user seen through one or more scoped grants
struct ScopedUser<'a> {
    grant: &'a AccessGrant,
    roles: Vec<&'a str>,
    clinics: Vec<&'a str>,
}

fn push_unique<'a>(values: &mut Vec<&'a str>, value: Option<&'a str>) {
    if let Some(value) = value {
        if !values.contains(&value) {
            values.push(value);
        }
    }
}

/// Merge grants into one entry per user, keeping first-seen order
fn group_by_user(grants: &[AccessGrant]) -> Vec<ScopedUser<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut users: Vec<ScopedUser<'_>> = Vec::new();
    for grant in grants {
        let position = *index.entry(grant.user_id.as_str()).or_insert_with(|| {
            users.push(ScopedUser {
                grant,
                roles: Vec::new(),
                clinics: Vec::new(),
            });
            users.len() - 1
        });
        let user = &mut users[position];
        push_unique(&mut user.roles, Some(grant.role.as_str()));
        push_unique(&mut user.clinics, grant.clinic_name.as_deref());
    }
    users
}

/// List users from the configurations database
pub struct ListUsersTool;

impl ListUsersTool {
    async fn list_scoped(
        ctx: &ToolExecutionContext,
        filters: [(&str, Option<&str>); 5],
    ) -> AppResult<String> {
        let [(_, program), (_, status), (_, organization), (_, clinic), (_, location)] = filters;
        let db = ctx.configurations();

        let scope = match resolve_scope(db, program, clinic, location).await? {
            Ok(scope) => scope,
            Err(miss) => return Ok(miss.to_string()),
        };

        let grants: Vec<AccessGrant> = db
            .get_access_by_scope(
                scope.program_id.as_deref(),
                scope.clinic_id.as_deref(),
                scope.location_id.as_deref(),
                true,
            )
            .await?
            .into_iter()
            .filter(|grant| status.is_none_or(|status| grant.status == status))
            .filter(|grant| {
                organization.is_none_or(|org| {
                    grant
                        .organization
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase()
                        .contains(&org.to_lowercase())
                })
            })
            .collect();

        if grants.is_empty() {
            return Ok(NO_USERS.to_owned());
        }

        let labels = [
            ("program", program),
            ("clinic", clinic),
            ("location", location),
            ("status", status),
            ("org", organization),
        ];
        let applied: Vec<String> = labels
            .iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}={v}")))
            .collect();
        let filter_str = if applied.is_empty() {
            String::new()
        } else {
            format!(" [{}]", applied.join(", "))
        };

        let users = group_by_user(&grants);
        let mut out = format!("Found {} user(s){filter_str}:\n\n", users.len());
        for user in &users {
            let _ = writeln!(out, "• {} ({})", user.grant.user_name, user.grant.email);
            let _ = write!(out, "  Status: {}", user.grant.status);
            if let Some(org) = user.grant.organization.as_deref().filter(|o| !o.is_empty()) {
                let _ = write!(out, " | Org: {org}");
            }
            out.push('\n');
            if !user.roles.is_empty() {
                let _ = writeln!(out, "  Roles: {}", user.roles.join(", "));
            }
            if !user.clinics.is_empty() {
                let _ = writeln!(out, "  Clinics: {}", user.clinics.join(", "));
            }
        }
        Ok(out)
    }

    async fn list_plain(
        ctx: &ToolExecutionContext,
        program: Option<&str>,
        status: Option<&str>,
        organization: Option<&str>,
    ) -> AppResult<String> {
        let db = ctx.configurations();
        let program_id = match resolve_program(db, program).await? {
            Ok(program_id) => program_id,
            Err(miss) => return Ok(miss.to_string()),
        };

        let users = db
            .list_users(&UserFilter {
                program_id: program_id.as_deref(),
                status,
                organization,
                include_access_count: true,
            })
            .await?;

        if users.is_empty() {
            return Ok(NO_USERS.to_owned());
        }

        let mut out = format!("Found {} user(s):\n\n", users.len());
        for summary in &users {
            let user = &summary.user;
            let _ = writeln!(out, "• {} ({})", user.name, user.email);
            let _ = write!(out, "  Status: {}", user.status);
            if let Some(org) = user.organization.as_deref().filter(|o| !o.is_empty()) {
                let _ = write!(out, " | Org: {org}");
            }
            if let Some(count) = summary.active_access_count {
                let _ = write!(out, " | Access grants: {count}");
            }
            out.push('\n');
        }
        Ok(out)
    }
}

#[async_trait]
impl McpTool for ListUsersTool {
    fn name(&self) -> &'static str {
        "list_users"
    }

    fn description(&self) -> &'static str {
        "List users from the Propel Health database. Filter by program, status \
         (Active, Inactive, Terminated), organization, clinic (name or code) or \
         location (requires a clinic)."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("program", PropertySchema::string("Program name or prefix (e.g. Prevention4ME, P4M)")),
                (
                    "status",
                    PropertySchema::string("User status").one_of(&["Active", "Inactive", "Terminated"]),
                ),
                ("organization", PropertySchema::string("Organization name or part of it")),
                ("clinic", PropertySchema::string("Clinic name or code (e.g. Franz, FRANZ)")),
                ("location", PropertySchema::string("Location name or code (e.g. Richland)")),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error listing users"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let program = args.optional_str("program")?;
        let status = args.optional_str("status")?;
        let organization = args.optional_str("organization")?;
        let clinic = args.optional_str("clinic")?;
        let location = args.optional_str("location")?;

        let text = if clinic.is_some() || location.is_some() {
            Self::list_scoped(
                ctx,
                [
                    ("program", program),
                    ("status", status),
                    ("organization", organization),
                    ("clinic", clinic),
                    ("location", location),
                ],
            )
            .await?
        } else {
            Self::list_plain(ctx, program, status, organization).await?
        };
        Ok(ToolResult::text(text))
    }
}

// ============================================================================
// get_user
// ============================================================================

/// Get detailed information about a specific user
pub struct GetUserTool;

#[async_trait]
impl McpTool for GetUserTool {
    fn name(&self) -> &'static str {
        "get_user"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific user: status, organization, \
         access grants and training records."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("email", PropertySchema::string("User's email address"))],
            &["email"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error getting user"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let email = ToolArgs::new(self.name(), &args).required_str("email")?;
        let db = ctx.configurations();

        let Some(user) = db.get_user(email).await? else {
            return Ok(ToolResult::text(format!("User not found: {email}")));
        };
        let grants = db.get_user_access(&user.user_id, false).await?;
        let training = db.get_training_status(&user.user_id, ctx.today()).await?;

        let mut out = String::new();
        let _ = writeln!(out, "User: {}", user.name);
        let _ = writeln!(out, "Email: {}", user.email);
        let _ = writeln!(out, "Status: {}", user.status);
        let _ = writeln!(
            out,
            "Organization: {}",
            user.organization.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(
            out,
            "Business Associate: {}",
            if user.is_business_associate { "Yes" } else { "No" }
        );
        let _ = writeln!(out, "User ID: {}", user.user_id);

        if !grants.is_empty() {
            let _ = writeln!(out, "\nAccess Grants ({}):", grants.len());
            for grant in grants.iter().filter(|g| g.is_active) {
                let _ = write!(out, "  • {} - {}", grant.program_name, grant.role);
                if let Some(clinic) = &grant.clinic_name {
                    let _ = write!(out, " ({clinic})");
                }
                out.push('\n');
            }
        }

        if !training.is_empty() {
            let _ = writeln!(out, "\nTraining Records ({}):", training.len());
            for record in &training {
                let _ = write!(out, "  • {}: {}", record.training_type, record.status);
                if let Some(expires) = &record.expires_date {
                    let _ = write!(out, " (expires: {expires})");
                }
                out.push('\n');
            }
        }

        Ok(ToolResult::text(out))
    }
}

// ============================================================================
// add_user
// ============================================================================

/// Create a new user
pub struct AddUserTool;

#[async_trait]
impl McpTool for AddUserTool {
    fn name(&self) -> &'static str {
        "add_user"
    }

    fn description(&self) -> &'static str {
        "Create a new user in the system. Email must be unique. Mark external \
         parties requiring a HIPAA BAA as business associates."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("name", PropertySchema::string("Full name (e.g. John Smith)")),
                ("email", PropertySchema::string("Email address (must be unique)")),
                (
                    "organization",
                    PropertySchema::string("Organization name").with_default(ORGANIZATION),
                ),
                (
                    "is_business_associate",
                    PropertySchema::boolean("True if external party requiring HIPAA BAA")
                        .with_default(false),
                ),
            ],
            &["name", "email"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::WRITES_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error creating user"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let new_user = NewUser {
            name: args.required_str("name")?.trim().to_owned(),
            email: args.required_str("email")?.trim().to_owned(),
            organization: args.str_or("organization", ORGANIZATION)?.to_owned(),
            is_business_associate: args.bool_or("is_business_associate", false)?,
        };

        let db = ctx.configurations();
        if db.get_user(&new_user.email).await?.is_some() {
            return Ok(ToolResult::text(format!(
                "User already exists with email: {}",
                new_user.email
            )));
        }

        let user_id = db.create_user(&new_user, ctx.today()).await?;

        let mut out = String::from("User created successfully!\n");
        let _ = writeln!(out, "  Name: {}", new_user.name);
        let _ = writeln!(out, "  Email: {}", new_user.email);
        let _ = writeln!(out, "  User ID: {user_id}");
        let _ = writeln!(out, "  Organization: {}", new_user.organization);
        if new_user.is_business_associate {
            out.push_str("  Business Associate: Yes (HIPAA BAA required)\n");
        }
        Ok(ToolResult::text(out))
    }
}

// ============================================================================
// export_annual_review
// ============================================================================

/// Count occurrences keeping first-seen order
fn count_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

/// Generate the annual access review spreadsheet for clinic managers
pub struct ExportAnnualReviewTool;

#[async_trait]
impl McpTool for ExportAnnualReviewTool {
    fn name(&self) -> &'static str {
        "export_annual_review"
    }

    fn description(&self) -> &'static str {
        "Generate an annual access review export for clinic managers (HIPAA annual \
         access review). Requires a program or clinic. Writes a CSV or XLSX file \
         and returns its path with summary statistics."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("program", PropertySchema::string("Program name or prefix")),
                ("clinic", PropertySchema::string("Clinic name or code")),
                ("location", PropertySchema::string("Location name or code (requires clinic)")),
                (
                    "output_format",
                    PropertySchema::string("Output format")
                        .one_of(&["csv", "xlsx"])
                        .with_default("csv"),
                ),
                (
                    "output_dir",
                    PropertySchema::string("Directory to save the file (default: ~/Downloads)"),
                ),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
            | ToolCapabilities::WRITES_FILES
            | ToolCapabilities::CONFIGURATIONS
            | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error generating export"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let program = args.optional_str("program")?;
        let clinic = args.optional_str("clinic")?;
        let location = args.optional_str("location")?;
        let format = ExportFormat::from_str_param(args.str_or("output_format", "csv")?);
        let output_dir = args.optional_str("output_dir")?;
        let db = ctx.configurations();

        let scope = match resolve_scope(db, program, clinic, location).await? {
            Ok(scope) => scope,
            Err(miss) => return Ok(ToolResult::text(miss.to_string())),
        };
        let Some(program_id) = scope.program_id.as_deref() else {
            return Ok(ToolResult::text(
                "Please specify at least a program or clinic filter.",
            ));
        };

        let grants = db
            .get_access_by_scope(
                Some(program_id),
                scope.clinic_id.as_deref(),
                scope.location_id.as_deref(),
                true,
            )
            .await?;
        if grants.is_empty() {
            return Ok(ToolResult::text(NO_USERS));
        }

        if !format.is_available() {
            return Ok(ToolResult::text(
                "Excel export requires a build with the xlsx feature \
                 (cargo build --features xlsx)\nAlternatively, use output_format='csv'",
            ));
        }

        let program_name = db.program_name(program_id).await?;
        let mut rows = Vec::with_capacity(grants.len());
        for grant in &grants {
            let last_review = db.last_review_date(&grant.access_id).await?;
            rows.push(AccessReviewRow::from_grant(grant, last_review));
        }

        let today = ctx.today();
        let stem = export_file_stem(scope.clinic_name.as_deref(), Some(&program_name), today);
        let dir = output_dir.map_or_else(|| ctx.config().export_dir.clone(), expand_home);
        let path = write_review_export(&dir, &stem, format, &rows).await?;

        let mut out = String::from("Annual Access Review Export Generated\n");
        let _ = writeln!(out, "{}\n", "=".repeat(50));
        let _ = writeln!(out, "File: {}", path.display());
        let _ = writeln!(out, "Format: {format}");
        let _ = writeln!(out, "Generated: {}\n", format_date(today));

        out.push_str("Scope:\n");
        let _ = writeln!(out, "  Program: {program_name}");
        if let Some(clinic_name) = &scope.clinic_name {
            let _ = writeln!(out, "  Clinic: {clinic_name}");
        }
        if let Some(location) = location {
            let _ = writeln!(out, "  Location: {location}");
        }

        out.push_str("\nStatistics:\n");
        let _ = writeln!(out, "  Total Users: {}", rows.len());
        out.push_str("  By Status:\n");
        for (status, count) in count_in_order(rows.iter().map(|r| r.status.as_str())) {
            let _ = writeln!(out, "    • {status}: {count}");
        }
        out.push_str("  By Role:\n");
        for (role, count) in count_in_order(rows.iter().map(|r| r.role.as_str())) {
            let _ = writeln!(out, "    • {role}: {count}");
        }

        out.push_str("\nWorkflow:\n");
        out.push_str("  1. Share this file with the clinic manager\n");
        out.push_str("  2. Manager reviews each user and fills in 'Review Action' column\n");
        out.push_str("  3. Collect marked-up spreadsheet and process changes\n");

        Ok(ToolResult::text(out))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all user tools for registration
#[must_use]
pub fn create_user_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(ListUsersTool),
        Box::new(GetUserTool),
        Box::new(AddUserTool),
        Box::new(ExportAnnualReviewTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_in_order_keeps_first_seen_order() {
        let counts = count_in_order(["Nurse", "Admin", "Nurse"].into_iter());
        assert_eq!(counts, vec![("Nurse", 2), ("Admin", 1)]);
    }
}
