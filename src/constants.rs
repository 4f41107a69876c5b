// ABOUTME: Application constants and environment variable names
// ABOUTME: Defines server identity, default paths, display limits and report thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Centralizes values shared across the server so that tools, reports and
//! configuration agree on names, defaults and limits.

/// Server identity reported during `initialize`
pub mod server {
    /// MCP server name
    pub const SERVER_NAME: &str = "propel-health";
    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Environment variable names
pub mod env_config {
    /// Configurations toolkit database path
    pub const PROPEL_DB_PATH: &str = "PROPEL_DB_PATH";
    /// Requirements toolkit database path
    pub const REQUIREMENTS_DB_PATH: &str = "REQUIREMENTS_DB_PATH";
    /// Directory for annual review exports
    pub const PROPEL_EXPORT_DIR: &str = "PROPEL_EXPORT_DIR";
    /// Days ahead that an access review counts as due soon
    pub const PROPEL_REVIEW_WINDOW_DAYS: &str = "PROPEL_REVIEW_WINDOW_DAYS";
    /// Comma-separated training types every active user must hold
    pub const PROPEL_REQUIRED_TRAINING: &str = "PROPEL_REQUIRED_TRAINING";
    /// Hide and refuse tools that write data or files
    pub const PROPEL_READ_ONLY: &str = "PROPEL_READ_ONLY";
}

/// Default configuration values
pub mod defaults {
    /// Configurations database, relative to the home directory
    pub const CONFIGURATIONS_DB: &str = "~/projects/data/client_product_database.db";
    /// Requirements database, relative to the home directory
    pub const REQUIREMENTS_DB: &str =
        "~/projects/requirements_toolkit/data/client_product_database.db";
    /// Review due-soon window in days
    pub const REVIEW_WINDOW_DAYS: i64 = 30;
    /// Largest accepted review window, ten years
    pub const MAX_REVIEW_WINDOW_DAYS: i64 = 3650;
    /// Required training types
    pub const REQUIRED_TRAINING: &str = "HIPAA,Cybersecurity";
    /// Days between an access grant and its first review
    pub const REVIEW_INTERVAL_DAYS: i64 = 365;
    /// Organization assigned to users created without one
    pub const ORGANIZATION: &str = "Internal";
}

/// Display limits for tool output
pub mod limits {
    /// Access grants shown in the access list report
    pub const ACCESS_REPORT_ROWS: usize = 50;
    /// Stories shown by `list_stories`
    pub const STORY_LIST_ROWS: usize = 50;
    /// Test cases shown by `list_test_cases`
    pub const TEST_LIST_ROWS: usize = 30;
    /// Stories shown per status in the approval pipeline
    pub const PIPELINE_ROWS_PER_STATUS: usize = 5;
    /// Title characters shown in the approval pipeline
    pub const PIPELINE_TITLE_CHARS: usize = 40;
    /// Entries shown per coverage gap list
    pub const COVERAGE_GAP_ROWS: usize = 10;
    /// Requirement description characters shown when a requirement has no title
    pub const REQUIREMENT_DESCRIPTION_CHARS: usize = 50;
    /// Widest spreadsheet column in annual review exports
    pub const EXPORT_MAX_COLUMN_WIDTH: usize = 50;
}

/// Story workflow and test status vocabularies
pub mod workflow {
    /// Story statuses in workflow order
    pub const STORY_STATUSES: [&str; 5] = [
        "Draft",
        "Internal Review",
        "Pending Client Review",
        "Approved",
        "Needs Discussion",
    ];
    /// Story status that counts as approved
    pub const APPROVED: &str = "Approved";
    /// UAT test statuses
    pub const TEST_STATUSES: [&str; 5] = ["Not Run", "Pass", "Fail", "Blocked", "Skipped"];
    /// Test status for a passing run
    pub const PASS: &str = "Pass";
    /// Test status for a failing run
    pub const FAIL: &str = "Fail";
    /// Test status before any run
    pub const NOT_RUN: &str = "Not Run";
}
