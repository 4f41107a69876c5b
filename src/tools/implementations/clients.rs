// ABOUTME: Client and program tools for the requirements toolkit.
// ABOUTME: Implements list_clients, get_client_programs and get_program_by_prefix.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::program_or_message;
use crate::constants::workflow::APPROVED;
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::requirements::{Client, Program, ProgramSummary};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

const DEFAULT_CLIENT_STATUS: &str = "Active";

fn format_clients(clients: &[Client]) -> String {
    let mut out = format!("Found {} client(s):\n\n", clients.len());
    for client in clients {
        let _ = writeln!(out, "• {}", client.name);
        let _ = writeln!(out, "  ID: {} | Status: {}", client.client_id, client.status);
        if let Some(description) = client.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  Description: {description}");
        }
        if let Some(contact) = client.primary_contact.as_deref().filter(|c| !c.is_empty()) {
            let _ = write!(out, "  Contact: {contact}");
            if let Some(email) = client.contact_email.as_deref().filter(|e| !e.is_empty()) {
                let _ = write!(out, " ({email})");
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn push_breakdown(out: &mut String, title: &str, counts: &[(String, i64)]) {
    if counts.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}:");
    for (status, count) in counts {
        let _ = writeln!(out, "  • {status}: {count}");
    }
}

fn format_program_details(program: &Program, summary: &ProgramSummary) -> String {
    let mut out = format!("Program: {} [{}]\n", program.name, program.prefix);
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(out, "ID: {}", program.program_id);
    let _ = writeln!(out, "Status: {}", program.status);
    for (label, value) in [
        ("Type", &program.program_type),
        ("Description", &program.description),
        ("Source", &program.source_file),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "{label}: {value}");
        }
    }

    out.push_str("\nStatistics:\n");
    let _ = writeln!(out, "  Requirements: {}", summary.requirement_count);
    let _ = writeln!(out, "  User Stories: {}", summary.story_count);
    let _ = writeln!(out, "  Test Cases: {}", summary.test_count);

    push_breakdown(&mut out, "Stories by Status", &summary.stories_by_status);
    push_breakdown(&mut out, "Tests by Status", &summary.tests_by_status);

    if let Some(coverage) = &summary.coverage {
        out.push_str("\nCoverage:\n");
        let _ = writeln!(
            out,
            "  Full: {}% | Partial: {}% | None: {}%",
            coverage.full_pct, coverage.partial_pct, coverage.none_pct
        );
    }
    out
}

/// Clients in the requirements database
pub struct ListClientsTool;

#[async_trait]
impl McpTool for ListClientsTool {
    fn name(&self) -> &'static str {
        "list_clients"
    }

    fn description(&self) -> &'static str {
        "List clients in the requirements database. Defaults to active clients; \
         pass status 'all' (or null) to list every client."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![(
                "status",
                PropertySchema::string("Client status filter: Active, Inactive or all")
                    .with_default(DEFAULT_CLIENT_STATUS),
            )],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error listing clients"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let status = if args.is_explicit_null("status") {
            None
        } else {
            Some(args.str_or("status", DEFAULT_CLIENT_STATUS)?)
                .filter(|status| !status.eq_ignore_ascii_case("all"))
        };

        let clients = ctx.requirements().list_clients(status).await?;
        if clients.is_empty() {
            return Ok(ToolResult::text("No clients found."));
        }
        Ok(ToolResult::text(format_clients(&clients)))
    }
}

/// Programs of one client with story, test and requirement counts
pub struct GetClientProgramsTool;

#[async_trait]
impl McpTool for GetClientProgramsTool {
    fn name(&self) -> &'static str {
        "get_client_programs"
    }

    fn description(&self) -> &'static str {
        "Get all programs for a specific client with story, test and requirement counts."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("client_name", PropertySchema::string("Name of the client"))],
            &["client_name"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error getting programs"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let client_name = ToolArgs::new(self.name(), &args).required_str("client_name")?;
        let db = ctx.requirements();

        let Some(client) = db.get_client_by_name(client_name).await? else {
            return Ok(ToolResult::text(format!("Client not found: {client_name}")));
        };
        let programs = db.list_programs(&client.client_id, None).await?;
        if programs.is_empty() {
            return Ok(ToolResult::text(format!(
                "No programs found for {client_name}."
            )));
        }

        let mut out = format!("Programs for {client_name}:\n\n");
        for program in &programs {
            let summary = db.get_program_summary(&program.program_id).await?;
            let _ = writeln!(out, "[{}] {}", program.prefix, program.name);
            let _ = write!(out, "  Status: {}", program.status);
            if let Some(program_type) = program.program_type.as_deref().filter(|t| !t.is_empty()) {
                let _ = write!(out, " | Type: {program_type}");
            }
            out.push('\n');
            let _ = writeln!(
                out,
                "  Stories: {} | Tests: {} | Requirements: {}",
                summary.story_count, summary.test_count, summary.requirement_count
            );
            if !summary.stories_by_status.is_empty() {
                let _ = writeln!(
                    out,
                    "  Approved stories: {}",
                    summary.stories_with_status(APPROVED)
                );
            }
            out.push('\n');
        }
        Ok(ToolResult::text(out))
    }
}

/// Program details, statistics and coverage
pub struct GetProgramByPrefixTool;

#[async_trait]
impl McpTool for GetProgramByPrefixTool {
    fn name(&self) -> &'static str {
        "get_program_by_prefix"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a program by its prefix (e.g. PROP, GRX): \
         details, story and test breakdowns, and requirement coverage."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("prefix", PropertySchema::string("Program prefix (e.g. PROP, GRX)"))],
            &["prefix"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error getting program"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let prefix = ToolArgs::new(self.name(), &args).required_str("prefix")?;
        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(_) => {
                return Ok(ToolResult::text(format!(
                    "Program not found with prefix: {prefix}"
                )))
            }
        };
        let summary = ctx
            .requirements()
            .get_program_summary(&program.program_id)
            .await?;
        Ok(ToolResult::text(format_program_details(&program, &summary)))
    }
}

/// Create all client tools for registration
#[must_use]
pub fn create_client_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(ListClientsTool),
        Box::new(GetClientProgramsTool),
        Box::new(GetProgramByPrefixTool),
    ]
}
