// ABOUTME: Compliance reporting tool for the configurations toolkit.
// ABOUTME: Implements get_compliance_report with five report types.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Compliance Reports
//!
//! `get_compliance_report` renders one of:
//! - `access_list` - who has access to what
//! - `review_status` - whether access reviews are current
//! - `training_compliance` - required training completion
//! - `terminated_audit` - terminated users still holding access
//! - `business_associates` - external parties under a HIPAA BAA

use std::collections::HashSet;
use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::scope::resolve_program;
use crate::constants::limits::ACCESS_REPORT_ROWS;
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::access::{
    AccessListReport, BusinessAssociateReport, ReviewStatusSummary, TerminatedViolation,
    TrainingComplianceSummary,
};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Compliance report kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportType {
    AccessList,
    ReviewStatus,
    TrainingCompliance,
    TerminatedAudit,
    BusinessAssociates,
}

impl ReportType {
    const ALL: [Self; 5] = [
        Self::AccessList,
        Self::ReviewStatus,
        Self::TrainingCompliance,
        Self::TerminatedAudit,
        Self::BusinessAssociates,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::AccessList => "access_list",
            Self::ReviewStatus => "review_status",
            Self::TrainingCompliance => "training_compliance",
            Self::TerminatedAudit => "terminated_audit",
            Self::BusinessAssociates => "business_associates",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.into_iter().map(Self::as_str).collect()
    }
}

fn titled(title: &str) -> String {
    format!("{title}\n{}\n\n", "=".repeat(title.chars().count()))
}

fn format_access_list(report: &AccessListReport) -> String {
    let mut out = titled("Access List Report");
    let _ = writeln!(out, "Total Users: {}", report.total_users);
    let _ = writeln!(out, "Total Access Grants: {}\n", report.total_access_grants);

    let mut seen: HashSet<&str> = HashSet::new();
    for grant in report.grants.iter().take(ACCESS_REPORT_ROWS) {
        if seen.insert(grant.user_id.as_str()) {
            let _ = writeln!(out, "• {} ({})", grant.user_name, grant.email);
        }
        let _ = writeln!(out, "  - {}: {}", grant.program_name, grant.role);
    }

    if report.grants.len() > ACCESS_REPORT_ROWS {
        let _ = writeln!(
            out,
            "\n... and {} more access grants",
            report.grants.len() - ACCESS_REPORT_ROWS
        );
    }
    out
}

fn format_review_status(summary: &ReviewStatusSummary) -> String {
    let mut out = titled("Access Review Status");
    let _ = writeln!(out, "Current: {}", summary.current);
    let _ = writeln!(out, "Due Soon: {}", summary.due_soon);
    let _ = writeln!(out, "Overdue: {}", summary.overdue);
    if summary.overdue > 0 {
        let _ = writeln!(out, "\nAction Required: {} overdue reviews", summary.overdue);
    }
    out
}

fn format_training_compliance(summary: &TrainingComplianceSummary) -> String {
    let mut out = titled("Training Compliance Report");
    let _ = writeln!(out, "Total Users: {}", summary.total_users);
    let _ = writeln!(out, "Fully Compliant: {}", summary.compliant);
    let _ = writeln!(out, "Missing Training: {}", summary.missing_training);
    let _ = writeln!(out, "Expired Training: {}", summary.expired_training);
    out
}

fn format_terminated_audit(violations: &[TerminatedViolation]) -> String {
    let mut out = titled("Terminated User Audit");
    if violations.is_empty() {
        out.push_str("No issues found. All terminated users have had access revoked.\n");
        return out;
    }
    let _ = writeln!(out, "VIOLATIONS FOUND: {}\n", violations.len());
    for violation in violations {
        let _ = writeln!(
            out,
            "• {} - still has {} active grant(s)",
            violation.user_name, violation.active_grants
        );
    }
    out
}

fn format_business_associates(report: &BusinessAssociateReport) -> String {
    let mut out = titled("Business Associates Report");
    let _ = writeln!(out, "Total Business Associates: {}", report.total);
    let _ = writeln!(out, "Active: {}\n", report.active);
    for associate in &report.associates {
        let _ = writeln!(
            out,
            "• {} ({})",
            associate.name,
            associate.organization.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(
            out,
            "  Email: {} | Status: {}\n",
            associate.email, associate.status
        );
    }
    out
}

/// Generate a compliance report
pub struct GetComplianceReportTool;

#[async_trait]
impl McpTool for GetComplianceReportTool {
    fn name(&self) -> &'static str {
        "get_compliance_report"
    }

    fn description(&self) -> &'static str {
        "Generate a compliance report: access_list (who has access to what), \
         review_status (are access reviews current), training_compliance \
         (required training completion), terminated_audit (terminated users \
         with access) or business_associates (HIPAA business associates)."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "report_type",
                    PropertySchema::string("Type of report").one_of(&ReportType::names()),
                ),
                ("program", PropertySchema::string("Filter by program name or prefix")),
            ],
            &["report_type"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
            | ToolCapabilities::CONFIGURATIONS
            | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error generating report"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let Some(report_type) = ReportType::parse(args.required_str("report_type")?) else {
            return Ok(ToolResult::text(format!(
                "Invalid report type. Choose from: {}",
                ReportType::names().join(", ")
            )));
        };

        let db = ctx.configurations();
        let program_id = match resolve_program(db, args.optional_str("program")?).await? {
            Ok(program_id) => program_id,
            Err(miss) => return Ok(ToolResult::text(miss.to_string())),
        };

        let text = match report_type {
            ReportType::AccessList => {
                format_access_list(&db.access_list_report(program_id.as_deref()).await?)
            }
            ReportType::ReviewStatus => format_review_status(
                &db.review_status_report(
                    program_id.as_deref(),
                    ctx.today(),
                    ctx.config().review_window_days,
                )
                .await?,
            ),
            ReportType::TrainingCompliance => format_training_compliance(
                &db.training_compliance_report(&ctx.config().required_training, ctx.today())
                    .await?,
            ),
            ReportType::TerminatedAudit => {
                format_terminated_audit(&db.terminated_user_audit().await?)
            }
            ReportType::BusinessAssociates => {
                format_business_associates(&db.business_associate_report().await?)
            }
        };
        Ok(ToolResult::text(text))
    }
}

/// Create all compliance tools for registration
#[must_use]
pub fn create_compliance_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(GetComplianceReportTool)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_names_round_trip() {
        for kind in ReportType::ALL {
            assert_eq!(ReportType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReportType::parse("Access_List"), None);
    }

    #[test]
    fn test_review_status_flags_overdue() {
        let text = format_review_status(&ReviewStatusSummary {
            current: 4,
            due_soon: 1,
            overdue: 2,
        });
        assert!(text.starts_with("Access Review Status\n====================\n\n"));
        assert!(text.ends_with("\nAction Required: 2 overdue reviews\n"));
    }

    #[test]
    fn test_terminated_audit_without_violations() {
        let text = format_terminated_audit(&[]);
        assert!(text.contains("No issues found."));
    }
}
