// ABOUTME: Training tools for the configurations toolkit.
// ABOUTME: Implements get_training_status and get_expired_training.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::access::{TrainingRecord, TrainingStatus};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn with_status(records: &[TrainingRecord], status: TrainingStatus) -> Vec<&TrainingRecord> {
    records.iter().filter(|r| r.status == status).collect()
}

/// Training records of one user grouped by effective status
pub struct GetTrainingStatusTool;

#[async_trait]
impl McpTool for GetTrainingStatusTool {
    fn name(&self) -> &'static str {
        "get_training_status"
    }

    fn description(&self) -> &'static str {
        "Get training status for a specific user, grouped into current, pending \
         and expired training."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("user_email", PropertySchema::string("User's email address"))],
            &["user_email"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error getting training status"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let email = ToolArgs::new(self.name(), &args).required_str("user_email")?;
        let db = ctx.configurations();

        let Some(user) = db.get_user(email).await? else {
            return Ok(ToolResult::text(format!("User not found: {email}")));
        };
        let records = db.get_training_status(&user.user_id, ctx.today()).await?;
        if records.is_empty() {
            return Ok(ToolResult::text(format!(
                "No training records found for {}.",
                user.name
            )));
        }

        let mut out = format!("Training Status for {}:\n\n", user.name);

        let current = with_status(&records, TrainingStatus::Current);
        if !current.is_empty() {
            let _ = writeln!(out, "Current ({}):", current.len());
            for record in current {
                let _ = write!(out, "  • {}", record.training_type);
                if let Some(expires) = &record.expires_date {
                    let _ = write!(out, " (expires: {expires})");
                }
                out.push('\n');
            }
            out.push('\n');
        }

        let pending = with_status(&records, TrainingStatus::Pending);
        if !pending.is_empty() {
            let _ = writeln!(out, "Pending ({}):", pending.len());
            for record in pending {
                let _ = writeln!(
                    out,
                    "  • {} (assigned: {})",
                    record.training_type,
                    record.assigned_date.as_deref().unwrap_or("N/A")
                );
            }
            out.push('\n');
        }

        let expired = with_status(&records, TrainingStatus::Expired);
        if !expired.is_empty() {
            let _ = writeln!(out, "Expired ({}):", expired.len());
            for record in expired {
                let _ = writeln!(
                    out,
                    "  • {} (expired: {})",
                    record.training_type,
                    record.expires_date.as_deref().unwrap_or("N/A")
                );
            }
        }

        Ok(ToolResult::text(out))
    }
}

/// Expired training across active users
pub struct GetExpiredTrainingTool;

#[async_trait]
impl McpTool for GetExpiredTrainingTool {
    fn name(&self) -> &'static str {
        "get_expired_training"
    }

    fn description(&self) -> &'static str {
        "Get all active users with expired training that needs renewal."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error getting expired training"
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let expired = ctx.configurations().get_expired_training(ctx.today()).await?;
        if expired.is_empty() {
            return Ok(ToolResult::text(
                "No expired training found. All training is current!",
            ));
        }

        let mut out = format!("Expired Training: {} record(s)\n\n", expired.len());
        for record in &expired {
            let _ = writeln!(out, "• {} ({})", record.user_name, record.user_email);
            let _ = writeln!(out, "  Training: {}", record.training_type);
            let _ = writeln!(
                out,
                "  Expired: {}\n",
                record.expires_date.as_deref().unwrap_or("N/A")
            );
        }
        Ok(ToolResult::text(out))
    }
}

/// Create all training tools for registration
#[must_use]
pub fn create_training_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(GetTrainingStatusTool), Box::new(GetExpiredTrainingTool)]
}
