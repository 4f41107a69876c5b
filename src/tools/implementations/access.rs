// ABOUTME: Access grant tools for the configurations toolkit.
// ABOUTME: Implements list_access and get_reviews_due.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Access Tools
//!
//! - `ListAccessTool` - active grants by user or program
//! - `GetReviewsDueTool` - overdue and upcoming access reviews

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::scope::resolve_program;
use crate::database::format_date;
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::access::{AccessGrant, User};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Render grants; `user` is shown once as a header for user queries
fn format_grants(grants: &[AccessGrant], user: Option<&User>) -> String {
    let mut out = format!("Found {} access grant(s):\n\n", grants.len());
    if let Some(user) = user {
        let _ = writeln!(out, "User: {} ({})\n", user.name, user.email);
    }

    for grant in grants {
        if user.is_none() {
            let _ = writeln!(out, "• {} ({})", grant.user_name, grant.email);
        }
        let status = if grant.is_active { "Active" } else { "Revoked" };
        let _ = writeln!(
            out,
            "  Program: {} | Role: {} | Status: {status}",
            grant.program_name, grant.role
        );
        if let Some(clinic) = &grant.clinic_name {
            let _ = write!(out, "  Scope: {clinic}");
            if let Some(location) = &grant.location_name {
                let _ = write!(out, " > {location}");
            }
            out.push('\n');
        }
        if !grant.next_review_due.is_empty() {
            let _ = writeln!(out, "  Next review: {}", grant.next_review_due);
        }
        out.push('\n');
    }
    out
}

/// List active access grants
pub struct ListAccessTool;

#[async_trait]
impl McpTool for ListAccessTool {
    fn name(&self) -> &'static str {
        "list_access"
    }

    fn description(&self) -> &'static str {
        "List active access grants, optionally filtered by user email or program. \
         Shows role, scope (clinic / location) and next review date."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("user_email", PropertySchema::string("Filter by user's email address")),
                ("program", PropertySchema::string("Filter by program name or prefix")),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error listing access"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let user_email = args.optional_str("user_email")?;
        let program = args.optional_str("program")?;
        let db = ctx.configurations();

        let user = match user_email {
            Some(email) => match db.get_user(email).await? {
                Some(user) => Some(user),
                None => return Ok(ToolResult::text(format!("User not found: {email}"))),
            },
            None => None,
        };

        let program_id = match resolve_program(db, program).await? {
            Ok(program_id) => program_id,
            Err(miss) => return Ok(ToolResult::text(miss.to_string())),
        };

        let grants = match &user {
            Some(user) => db
                .get_user_access(&user.user_id, true)
                .await?
                .into_iter()
                .filter(|grant| {
                    program_id
                        .as_deref()
                        .is_none_or(|id| grant.program_id == id)
                })
                .collect(),
            None => {
                db.get_access_by_scope(program_id.as_deref(), None, None, true)
                    .await?
            }
        };

        if grants.is_empty() {
            return Ok(ToolResult::text(
                "No access grants found matching the criteria.",
            ));
        }
        Ok(ToolResult::text(format_grants(&grants, user.as_ref())))
    }
}

/// Access reviews that are overdue or due within the review window
pub struct GetReviewsDueTool;

#[async_trait]
impl McpTool for GetReviewsDueTool {
    fn name(&self) -> &'static str {
        "get_reviews_due"
    }

    fn description(&self) -> &'static str {
        "Get access reviews that are overdue or due soon, optionally for one program."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("program", PropertySchema::string("Filter by program name or prefix"))],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error getting reviews"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let program = ToolArgs::new(self.name(), &args).optional_str("program")?;
        let db = ctx.configurations();

        let program_id = match resolve_program(db, program).await? {
            Ok(program_id) => program_id,
            Err(miss) => return Ok(ToolResult::text(miss.to_string())),
        };

        let reviews = db
            .get_reviews_due(
                program_id.as_deref(),
                ctx.today(),
                ctx.config().review_window_days,
            )
            .await?;
        if reviews.is_empty() {
            return Ok(ToolResult::text(
                "No reviews are currently due. All access reviews are up to date!",
            ));
        }

        let (overdue, due_soon): (Vec<_>, Vec<_>) =
            reviews.iter().partition(|review| review.is_overdue);

        let mut out = format!("Access Reviews Due: {} total\n\n", reviews.len());
        if !overdue.is_empty() {
            let _ = writeln!(out, "OVERDUE ({}):", overdue.len());
            for review in &overdue {
                let _ = writeln!(
                    out,
                    "  • {} - {} ({})",
                    review.user_name, review.program_name, review.role
                );
                let _ = writeln!(
                    out,
                    "    Due: {} | Days overdue: {}",
                    format_date(review.next_review_due),
                    review.days_overdue
                );
            }
            out.push('\n');
        }
        if !due_soon.is_empty() {
            let _ = writeln!(out, "Due Soon ({}):", due_soon.len());
            for review in &due_soon {
                let _ = writeln!(
                    out,
                    "  • {} - {} ({})",
                    review.user_name, review.program_name, review.role
                );
                let _ = writeln!(out, "    Due: {}", format_date(review.next_review_due));
            }
        }

        Ok(ToolResult::text(out))
    }
}

/// Create all access tools for registration
#[must_use]
pub fn create_access_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(ListAccessTool), Box::new(GetReviewsDueTool)]
}
