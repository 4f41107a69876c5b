// ABOUTME: Reporting tools for the requirements toolkit.
// ABOUTME: Implements get_program_health, get_client_tree, search_stories and get_coverage_gaps.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Requirements Reporting Tools
//!
//! - `GetProgramHealthTool` - weighted health score with grade and recommendations
//! - `GetClientTreeTool` - client → program hierarchy with counts
//! - `SearchStoriesTool` - keyword search across every program
//! - `GetCoverageGapsTool` - requirements without stories, approved stories without tests

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::{program_or_message, truncate_chars};
use crate::constants::limits::{COVERAGE_GAP_ROWS, REQUIREMENT_DESCRIPTION_CHARS};
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::requirements::{ClientNode, Requirement, StorySearchHit, UserStory};
use crate::reporting::ProgramHealth;
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn program_prefix_schema() -> JsonSchema {
    JsonSchema::object(
        vec![("program_prefix", PropertySchema::string("Program prefix (e.g. PROP)"))],
        &["program_prefix"],
    )
}

fn heading(title: &str) -> String {
    format!("{title}\n{}\n\n", "=".repeat(50))
}

fn format_health(program_name: &str, health: &ProgramHealth) -> String {
    let mut out = heading(&format!("Program Health: {program_name}"));
    let _ = writeln!(
        out,
        "Overall Score: {}/100 (Grade: {})\n",
        health.score, health.grade
    );

    out.push_str("Component Scores:\n");
    for component in &health.components {
        let _ = writeln!(
            out,
            "  {}: {} {}% (weight: {}%)",
            component.name,
            component.bar(),
            component.score,
            component.weight_percent()
        );
    }

    if !health.recommendations.is_empty() {
        out.push_str("\nRecommendations:\n");
        for recommendation in &health.recommendations {
            let _ = writeln!(out, "  • {recommendation}");
        }
    }
    out
}

fn format_client_tree(tree: &[ClientNode]) -> String {
    let mut out = heading("Client/Program Hierarchy:");
    for client in tree {
        let _ = writeln!(out, "📁 {}", client.name);
        if client.programs.is_empty() {
            out.push_str("   (no programs)\n");
        }
        let last = client.programs.len().saturating_sub(1);
        for (index, program) in client.programs.iter().enumerate() {
            let branch = if index == last { "└──" } else { "├──" };
            let _ = writeln!(out, "   {branch} [{}] {}", program.prefix, program.name);
            let _ = writeln!(
                out,
                "       Stories: {} ({} approved) | Tests: {}",
                program.story_count, program.approved_count, program.test_count
            );
        }
        out.push('\n');
    }
    out
}

fn format_search(keyword: &str, hits: &[StorySearchHit]) -> String {
    let mut out = format!("Search Results for '{keyword}':\n");
    let _ = writeln!(out, "Found {} matching story(ies)\n", hits.len());
    for hit in hits {
        let _ = writeln!(
            out,
            "[{}] {}",
            hit.story_id,
            hit.title.as_deref().unwrap_or("Untitled")
        );
        let _ = writeln!(
            out,
            "  Program: {} [{}] | Client: {}",
            hit.program_name, hit.prefix, hit.client_name
        );
        let _ = writeln!(
            out,
            "  Status: {} | Priority: {}\n",
            hit.status,
            hit.priority.as_deref().unwrap_or("N/A")
        );
    }
    out
}

/// Requirement label: its title, else the start of its description
fn requirement_label(requirement: &Requirement) -> &str {
    requirement
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| {
            truncate_chars(
                requirement.description.as_deref().unwrap_or_default(),
                REQUIREMENT_DESCRIPTION_CHARS,
            )
        })
}

fn push_more(out: &mut String, total: usize) {
    if total > COVERAGE_GAP_ROWS {
        let _ = writeln!(out, "  ... and {} more", total - COVERAGE_GAP_ROWS);
    }
}

fn format_gaps(program_name: &str, orphans: &[Requirement], untested: &[UserStory]) -> String {
    let mut out = heading(&format!("Coverage Gaps for {program_name}:"));

    let _ = writeln!(out, "Requirements without Stories ({}):", orphans.len());
    if orphans.is_empty() {
        out.push_str("  None - all requirements have stories!\n");
    }
    for requirement in orphans.iter().take(COVERAGE_GAP_ROWS) {
        let _ = writeln!(
            out,
            "  • [{}] {}",
            requirement.requirement_id,
            requirement_label(requirement)
        );
    }
    push_more(&mut out, orphans.len());

    let _ = writeln!(out, "\nApproved Stories without Tests ({}):", untested.len());
    if untested.is_empty() {
        out.push_str("  None - all approved stories have tests!\n");
    }
    for story in untested.iter().take(COVERAGE_GAP_ROWS) {
        let _ = writeln!(
            out,
            "  • [{}] {}",
            story.story_id,
            story.title.as_deref().unwrap_or("Untitled")
        );
    }
    push_more(&mut out, untested.len());
    out
}

/// Health score and recommendations for a program
pub struct GetProgramHealthTool;

#[async_trait]
impl McpTool for GetProgramHealthTool {
    fn name(&self) -> &'static str {
        "get_program_health"
    }

    fn description(&self) -> &'static str {
        "Get the health score (0-100), letter grade, component breakdown and \
         recommendations for a program."
    }

    fn input_schema(&self) -> JsonSchema {
        program_prefix_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error getting health score"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let prefix = ToolArgs::new(self.name(), &args).required_str("program_prefix")?;
        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };
        let inputs = ctx
            .requirements()
            .get_health_inputs(&program.program_id)
            .await?;
        let health = ProgramHealth::score(&inputs);
        Ok(ToolResult::text(format_health(&program.name, &health)))
    }
}

/// Clients and their programs as a tree
pub struct GetClientTreeTool;

#[async_trait]
impl McpTool for GetClientTreeTool {
    fn name(&self) -> &'static str {
        "get_client_tree"
    }

    fn description(&self) -> &'static str {
        "Get a hierarchical view of all clients and their programs with story \
         and test counts."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error getting client tree"
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let tree = ctx.requirements().get_client_program_tree().await?;
        if tree.is_empty() {
            return Ok(ToolResult::text("No clients found in the database."));
        }
        Ok(ToolResult::text(format_client_tree(&tree)))
    }
}

/// Keyword search over every program's stories
pub struct SearchStoriesTool;

#[async_trait]
impl McpTool for SearchStoriesTool {
    fn name(&self) -> &'static str {
        "search_stories"
    }

    fn description(&self) -> &'static str {
        "Search stories across all programs by keyword in the title, story text \
         or acceptance criteria."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("keyword", PropertySchema::string("Search term"))],
            &["keyword"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error searching stories"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let keyword = ToolArgs::new(self.name(), &args).required_str("keyword")?;
        let hits = ctx.requirements().search_stories_global(keyword).await?;
        if hits.is_empty() {
            return Ok(ToolResult::text(format!(
                "No stories found matching: {keyword}"
            )));
        }
        Ok(ToolResult::text(format_search(keyword, &hits)))
    }
}

/// Requirements without stories and approved stories without tests
pub struct GetCoverageGapsTool;

#[async_trait]
impl McpTool for GetCoverageGapsTool {
    fn name(&self) -> &'static str {
        "get_coverage_gaps"
    }

    fn description(&self) -> &'static str {
        "Find requirements without stories and approved stories without tests."
    }

    fn input_schema(&self) -> JsonSchema {
        program_prefix_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS | ToolCapabilities::REPORTING
    }

    fn error_label(&self) -> &'static str {
        "Error getting coverage gaps"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let prefix = ToolArgs::new(self.name(), &args).required_str("program_prefix")?;
        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };
        let db = ctx.requirements();
        let orphans = db.get_orphan_requirements(&program.program_id).await?;
        let untested = db.get_stories_without_tests(&program.program_id).await?;
        Ok(ToolResult::text(format_gaps(&program.name, &orphans, &untested)))
    }
}

/// Create all reporting tools for registration
#[must_use]
pub fn create_reporting_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(GetProgramHealthTool),
        Box::new(GetClientTreeTool),
        Box::new(SearchStoriesTool),
        Box::new(GetCoverageGapsTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirements::ProgramTreeEntry;

    #[test]
    fn test_client_tree_branches() {
        let entry = |prefix: &str| ProgramTreeEntry {
            prefix: prefix.to_owned(),
            name: format!("{prefix} program"),
            story_count: 3,
            approved_count: 1,
            test_count: 2,
        };
        let tree = vec![
            ClientNode {
                client_id: "c1".to_owned(),
                name: "Propel Health".to_owned(),
                programs: vec![entry("P4M"), entry("PROP")],
            },
            ClientNode {
                client_id: "c2".to_owned(),
                name: "Legacy Care Group".to_owned(),
                programs: Vec::new(),
            },
        ];
        let text = format_client_tree(&tree);
        assert!(text.contains("   ├── [P4M] P4M program\n"));
        assert!(text.contains("   └── [PROP] PROP program\n"));
        assert!(text.contains("       Stories: 3 (1 approved) | Tests: 2\n"));
        assert!(text.contains("📁 Legacy Care Group\n   (no programs)\n"));
    }

    #[test]
    fn test_requirement_label_falls_back_to_description() {
        let requirement = Requirement {
            requirement_id: "PROP-REQ-004".to_owned(),
            program_id: "p".to_owned(),
            title: None,
            description: Some("x".repeat(80)),
            priority: None,
            source: None,
        };
        assert_eq!(requirement_label(&requirement), "x".repeat(50));
    }
}
