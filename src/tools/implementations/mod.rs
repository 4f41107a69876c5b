// ABOUTME: Module containing all MCP tool implementations organized by category.
// ABOUTME: Each submodule corresponds to a tool category with feature flag support.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Implementations
//!
//! Configurations toolkit:
//! - `users` - user listing, lookup, creation and the annual review export
//! - `access` - access grants and reviews due
//! - `training` - training status and expired training
//! - `compliance` - compliance reports
//! - `configuration` - program hierarchy and inherited configuration values
//!
//! Requirements toolkit:
//! - `clients` - clients and their programs
//! - `stories` - user stories and the approval pipeline
//! - `test_cases` - UAT test cases and execution summary
//! - `reporting` - health score, client tree, search and coverage gaps
//!
//! `diagnostics` is always compiled in.

// Connection check: hello_propel
pub mod diagnostics;

// Program, clinic and location argument resolution shared by user tools
#[cfg(any(feature = "tools-users", feature = "tools-access", feature = "tools-compliance"))]
mod scope;

// User tools: list_users, get_user, add_user, export_annual_review
#[cfg(feature = "tools-users")]
pub mod users;

// Access tools: list_access, get_reviews_due
#[cfg(feature = "tools-access")]
pub mod access;

// Training tools: get_training_status, get_expired_training
#[cfg(feature = "tools-training")]
pub mod training;

// Compliance tools: get_compliance_report
#[cfg(feature = "tools-compliance")]
pub mod compliance;

// Configuration tools: list_programs, get_config
#[cfg(feature = "tools-config")]
pub mod configuration;

// Client tools: list_clients, get_client_programs, get_program_by_prefix
#[cfg(feature = "tools-clients")]
pub mod clients;

// Story tools: list_stories, get_story, get_approval_pipeline
#[cfg(feature = "tools-stories")]
pub mod stories;

// Test tools: list_test_cases, get_test_summary
#[cfg(feature = "tools-tests")]
pub mod test_cases;

// Reporting tools: get_program_health, get_client_tree, search_stories, get_coverage_gaps
#[cfg(feature = "tools-reporting")]
pub mod reporting;

#[cfg(any(
    feature = "tools-clients",
    feature = "tools-stories",
    feature = "tools-tests",
    feature = "tools-reporting"
))]
/// Requirements-side program by prefix, or the not-found message to show
async fn program_or_message(
    ctx: &crate::tools::context::ToolExecutionContext,
    prefix: &str,
) -> crate::errors::AppResult<Result<crate::models::requirements::Program, String>> {
    Ok(ctx
        .requirements()
        .get_program_by_prefix(prefix)
        .await?
        .ok_or_else(|| format!("Program not found: {prefix}")))
}

#[cfg(any(feature = "tools-stories", feature = "tools-reporting"))]
/// First `max_chars` characters of `text`
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(index, _)| &text[..index])
}
