// ABOUTME: Data models for the requirements toolkit: clients, programs, requirements, stories, tests
// ABOUTME: Includes program summaries, coverage statistics and test execution breakdowns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;

/// Client organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Client {
    /// UUID text
    pub client_id: String,
    /// Unique name (case-insensitive)
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
    /// Primary contact name
    pub primary_contact: Option<String>,
    /// Primary contact email
    pub contact_email: Option<String>,
    /// Active or Inactive
    pub status: String,
}

/// Program delivered for a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Program {
    /// UUID text
    pub program_id: String,
    /// Owning client
    pub client_id: String,
    /// Display name
    pub name: String,
    /// Unique short prefix (e.g. PROP)
    pub prefix: String,
    /// Program type
    pub program_type: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Requirements document the program was imported from
    pub source_file: Option<String>,
    /// Status
    pub status: String,
}

/// Requirement imported from a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Requirement {
    /// Requirement id (e.g. PROP-REQ-001)
    pub requirement_id: String,
    /// Owning program
    pub program_id: String,
    /// Short title
    pub title: Option<String>,
    /// Full text
    pub description: Option<String>,
    /// Priority
    pub priority: Option<String>,
    /// Where it came from
    pub source: Option<String>,
}

/// User story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserStory {
    /// Story id (e.g. PROP-AUTH-001)
    pub story_id: String,
    /// Owning program
    pub program_id: String,
    /// Requirement the story implements
    pub requirement_id: Option<String>,
    /// Short title
    pub title: Option<String>,
    /// "As a ..., I want ..." text
    pub user_story: Option<String>,
    /// Newline-separated criteria
    pub acceptance_criteria: Option<String>,
    /// How success is measured
    pub success_metrics: Option<String>,
    /// Priority
    pub priority: Option<String>,
    /// Category code
    pub category: Option<String>,
    /// Category long name
    pub category_full: Option<String>,
    /// Workflow status
    pub status: String,
    /// Revision number
    pub version: i64,
    /// Approval date
    pub approved_date: Option<String>,
    /// Approver
    pub approved_by: Option<String>,
    /// Creation date
    pub created_date: Option<String>,
    /// Last update date
    pub updated_date: Option<String>,
}

/// UAT test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TestCase {
    /// Test id (e.g. PROP-AUTH-001-TC01)
    pub test_id: String,
    /// Owning program
    pub program_id: String,
    /// Story under test
    pub story_id: Option<String>,
    /// Short title
    pub title: Option<String>,
    /// happy_path, negative, validation, edge_case
    pub test_type: Option<String>,
    /// Not Run, Pass, Fail, Blocked, Skipped
    pub test_status: String,
    /// Steps
    pub test_steps: Option<String>,
    /// Expected results
    pub expected_results: Option<String>,
    /// Tester
    pub tested_by: Option<String>,
    /// Test date
    pub tested_date: Option<String>,
}

/// Story line in the approval pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoryBrief {
    /// Story id
    pub story_id: String,
    /// Title
    pub title: String,
    /// Workflow status
    pub status: String,
}

/// Requirement coverage by stories and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoverageStats {
    /// Requirements whose stories all have tests
    pub full: i64,
    /// Requirements with stories, some without tests
    pub partial: i64,
    /// Requirements without stories
    pub none: i64,
    /// Share of full coverage
    pub full_pct: f64,
    /// Share of partial coverage
    pub partial_pct: f64,
    /// Share without coverage
    pub none_pct: f64,
}

/// Program statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramSummary {
    /// Requirements
    pub requirement_count: i64,
    /// Stories
    pub story_count: i64,
    /// Test cases
    pub test_count: i64,
    /// Story counts in workflow order, statuses with stories only
    pub stories_by_status: Vec<(String, i64)>,
    /// Test counts by status, statuses with tests only
    pub tests_by_status: Vec<(String, i64)>,
    /// Requirement coverage, absent without requirements
    pub coverage: Option<CoverageStats>,
}

impl ProgramSummary {
    /// Stories in the given status
    #[must_use]
    pub fn stories_with_status(&self, status: &str) -> i64 {
        self.stories_by_status
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, count)| *count)
    }
}

/// Test results for one test type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestTypeBreakdown {
    /// Test type
    pub test_type: String,
    /// Tests of this type
    pub total: i64,
    /// Passing
    pub passed: i64,
    /// Failing
    pub failed: i64,
}

/// Test execution summary for a program
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestExecutionSummary {
    /// Tests
    pub total: i64,
    /// Tests that ran to Pass or Fail
    pub executed: i64,
    /// Passing tests
    pub passed: i64,
    /// executed / total, percent with one decimal
    pub execution_rate: f64,
    /// passed / executed, percent with one decimal
    pub pass_rate: f64,
    /// Counts for every standard status, then any other status found
    pub by_status: Vec<(String, i64)>,
    /// Per test type, ordered by type
    pub by_type: Vec<TestTypeBreakdown>,
}

/// Program line in the client tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProgramTreeEntry {
    /// Prefix
    pub prefix: String,
    /// Name
    pub name: String,
    /// Stories
    pub story_count: i64,
    /// Approved stories
    pub approved_count: i64,
    /// Test cases
    pub test_count: i64,
}

/// Client with its programs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientNode {
    /// Client id
    pub client_id: String,
    /// Client name
    pub name: String,
    /// Programs ordered by name
    pub programs: Vec<ProgramTreeEntry>,
}

/// Story matched by a keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StorySearchHit {
    /// Story id
    pub story_id: String,
    /// Title
    pub title: Option<String>,
    /// Workflow status
    pub status: String,
    /// Priority
    pub priority: Option<String>,
    /// Program name
    pub program_name: String,
    /// Program prefix
    pub prefix: String,
    /// Client name
    pub client_name: String,
}

/// Counts feeding the program health score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthInputs {
    /// Stories
    pub story_count: i64,
    /// Approved stories
    pub approved_stories: i64,
    /// Stories with at least one test
    pub stories_with_tests: i64,
    /// Tests
    pub test_count: i64,
    /// Tests that ran to Pass or Fail
    pub executed_tests: i64,
    /// Passing tests
    pub passed_tests: i64,
    /// Requirements
    pub requirement_count: i64,
    /// Requirements with at least one story
    pub covered_requirements: i64,
}
