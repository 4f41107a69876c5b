// ABOUTME: User story tools for the requirements toolkit.
// ABOUTME: Implements list_stories, get_story and get_approval_pipeline.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::{program_or_message, truncate_chars};
use crate::constants::limits::{PIPELINE_ROWS_PER_STATUS, PIPELINE_TITLE_CHARS, STORY_LIST_ROWS};
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::requirements::{StoryBrief, UserStory};
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

/// Numbered acceptance criteria; blank lines keep their number
fn format_story(story: &UserStory) -> String {
    let mut out = format!("Story: {}\n", story.story_id);
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(out, "Title: {}", story.title.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Status: {} | Version: {}", story.status, story.version);
    let _ = writeln!(out, "Priority: {}", story.priority.as_deref().unwrap_or("N/A"));
    if let Some(category) = story.category.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(out, "Category: {category}");
        if let Some(full) = story.category_full.as_deref().filter(|c| !c.is_empty()) {
            let _ = write!(out, " ({full})");
        }
        out.push('\n');
    }

    if let Some(text) = story.user_story.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "\nUser Story:\n{text}");
    }

    if let Some(criteria) = story.acceptance_criteria.as_deref().filter(|c| !c.is_empty()) {
        out.push_str("\nAcceptance Criteria:\n");
        for (index, line) in criteria.split('\n').enumerate() {
            let line = line.trim();
            if !line.is_empty() {
                let _ = writeln!(out, "  {}. {line}", index + 1);
            }
        }
    }

    if let Some(metrics) = story.success_metrics.as_deref().filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "\nSuccess Metrics: {metrics}");
    }

    if let Some(approved) = story.approved_date.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\nApproved: {approved}");
        if let Some(by) = story.approved_by.as_deref().filter(|b| !b.is_empty()) {
            let _ = write!(out, " by {by}");
        }
        out.push('\n');
    }
    out
}

fn format_pipeline(program_name: &str, pipeline: &[(String, Vec<StoryBrief>)]) -> String {
    let mut out = format!("Approval Pipeline for {program_name}:\n");
    let _ = writeln!(out, "{}\n", "=".repeat(50));

    for (status, stories) in pipeline {
        let _ = writeln!(out, "{status} ({}):", stories.len());
        if stories.is_empty() {
            out.push_str("  (none)\n");
        }
        for story in stories.iter().take(PIPELINE_ROWS_PER_STATUS) {
            let _ = writeln!(
                out,
                "  • [{}] {}",
                story.story_id,
                truncate_chars(&story.title, PIPELINE_TITLE_CHARS)
            );
        }
        if stories.len() > PIPELINE_ROWS_PER_STATUS {
            let _ = writeln!(
                out,
                "  ... and {} more",
                stories.len() - PIPELINE_ROWS_PER_STATUS
            );
        }
        out.push('\n');
    }
    out
}

/// User stories of a program
pub struct ListStoriesTool;

#[async_trait]
impl McpTool for ListStoriesTool {
    fn name(&self) -> &'static str {
        "list_stories"
    }

    fn description(&self) -> &'static str {
        "List user stories for a program, optionally filtered by status \
         (Draft, Internal Review, Pending Client Review, Approved, Needs Discussion) \
         or category."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("program_prefix", PropertySchema::string("Program prefix (e.g. PROP)")),
                ("status", PropertySchema::string("Filter by story status")),
                ("category", PropertySchema::string("Filter by category")),
            ],
            &["program_prefix"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error listing stories"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let prefix = args.required_str("program_prefix")?;
        let status = args.optional_str("status")?;
        let category = args.optional_str("category")?;

        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };

        let stories = ctx
            .requirements()
            .get_stories(&program.program_id, status, category)
            .await?;

        if stories.is_empty() {
            let filters: Vec<String> = [("status", status), ("category", category)]
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| format!("{label}={v}")))
                .collect();
            let filter_str = if filters.is_empty() {
                String::new()
            } else {
                format!(" (filters: {})", filters.join(", "))
            };
            return Ok(ToolResult::text(format!(
                "No stories found for {prefix}{filter_str}."
            )));
        }

        let mut out = format!("User Stories for {} [{prefix}]:\n", program.name);
        let _ = writeln!(out, "Found {} story(ies)\n", stories.len());
        for story in stories.iter().take(STORY_LIST_ROWS) {
            let _ = writeln!(
                out,
                "[{}] {}",
                story.story_id,
                story.title.as_deref().unwrap_or("Untitled")
            );
            let _ = write!(
                out,
                "  Status: {} | Priority: {}",
                story.status,
                story.priority.as_deref().unwrap_or("N/A")
            );
            if let Some(category) = story.category.as_deref().filter(|c| !c.is_empty()) {
                let _ = write!(out, " | Category: {category}");
            }
            out.push('\n');
        }
        if stories.len() > STORY_LIST_ROWS {
            let _ = writeln!(out, "\n... and {} more stories", stories.len() - STORY_LIST_ROWS);
        }

        Ok(ToolResult::text(out))
    }
}

/// Full details of one user story
pub struct GetStoryTool;

#[async_trait]
impl McpTool for GetStoryTool {
    fn name(&self) -> &'static str {
        "get_story"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific user story, including numbered \
         acceptance criteria and approval details."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("story_id", PropertySchema::string("Story ID (e.g. PROP-AUTH-001)"))],
            &["story_id"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error getting story"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let story_id = ToolArgs::new(self.name(), &args).required_str("story_id")?;
        Ok(ToolResult::text(
            match ctx.requirements().get_story(story_id).await? {
                Some(story) => format_story(&story),
                None => format!("Story not found: {story_id}"),
            },
        ))
    }
}

/// Stories grouped by workflow status
pub struct GetApprovalPipelineTool;

#[async_trait]
impl McpTool for GetApprovalPipelineTool {
    fn name(&self) -> &'static str {
        "get_approval_pipeline"
    }

    fn description(&self) -> &'static str {
        "Get a Kanban-style view of story workflow status for a program."
    }

    fn input_schema(&self) -> JsonSchema {
        program_prefix_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error getting pipeline"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let prefix = ToolArgs::new(self.name(), &args).required_str("program_prefix")?;
        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };
        let pipeline = ctx
            .requirements()
            .get_approval_pipeline(&program.program_id)
            .await?;
        Ok(ToolResult::text(format_pipeline(&program.name, &pipeline)))
    }
}

/// Create all story tools for registration
#[must_use]
pub fn create_story_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(ListStoriesTool),
        Box::new(GetStoryTool),
        Box::new(GetApprovalPipelineTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(criteria: &str) -> UserStory {
        UserStory {
            story_id: "PROP-AUTH-001".to_owned(),
            program_id: "prog".to_owned(),
            requirement_id: None,
            title: Some("Patient login".to_owned()),
            user_story: None,
            acceptance_criteria: Some(criteria.to_owned()),
            success_metrics: None,
            priority: Some("High".to_owned()),
            category: Some("AUTH".to_owned()),
            category_full: Some("Authentication".to_owned()),
            status: "Approved".to_owned(),
            version: 2,
            approved_date: Some("2026-01-05".to_owned()),
            approved_by: Some("Dana Lee".to_owned()),
            created_date: None,
            updated_date: None,
        }
    }

    #[test]
    fn test_criteria_numbering_skips_blank_lines() {
        let text = format_story(&story("Email and password\n\n  Lockout after 5 tries "));
        assert!(text.contains("  1. Email and password\n"));
        assert!(text.contains("  3. Lockout after 5 tries\n"));
        assert!(!text.contains("  2."));
        assert!(text.contains("Category: AUTH (Authentication)\n"));
        assert!(text.ends_with("Approved: 2026-01-05 by Dana Lee\n"));
    }

    #[test]
    fn test_pipeline_truncates_and_caps() {
        let briefs: Vec<StoryBrief> = (1..=7)
            .map(|n| StoryBrief {
                story_id: format!("PROP-X-{n:03}"),
                title: "A".repeat(60),
                status: "Draft".to_owned(),
            })
            .collect();
        let text = format_pipeline(
            "Portal",
            &[("Draft".to_owned(), briefs), ("Approved".to_owned(), Vec::new())],
        );
        assert!(text.contains("Draft (7):\n"));
        assert!(text.contains(&format!("  • [PROP-X-001] {}\n", "A".repeat(40))));
        assert!(!text.contains("PROP-X-006"));
        assert!(text.contains("  ... and 2 more\n"));
        assert!(text.contains("Approved (0):\n  (none)\n"));
    }
}
