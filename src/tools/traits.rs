// ABOUTME: Defines the McpTool trait and ToolCapabilities for the pluggable tools architecture.
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # MCP Tool Trait and Capabilities
//!
//! This module defines the core abstraction for MCP tools. All tools implement
//! the `McpTool` trait which provides:
//! - Tool metadata (name, description, input schema)
//! - Capability flags for filtering and read-only enforcement
//! - Async execution with context

use async_trait::async_trait;
use bitflags::bitflags;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;

use super::context::ToolExecutionContext;
use super::result::ToolResult;

bitflags! {
    /// Capabilities that tools can declare for filtering and discovery.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u16 {
        /// Tool reads from one of the toolkit databases
        const READS_DATA = 0b0000_0001;
        /// Tool inserts or modifies database rows
        const WRITES_DATA = 0b0000_0010;
        /// Tool writes files on the host
        const WRITES_FILES = 0b0000_0100;
        /// Tool is backed by the configurations database
        const CONFIGURATIONS = 0b0000_1000;
        /// Tool is backed by the requirements database
        const REQUIREMENTS = 0b0001_0000;
        /// Tool aggregates data into a report or score
        const REPORTING = 0b0010_0000;
        /// Connection checks and other diagnostics
        const DIAGNOSTICS = 0b0100_0000;
    }
}

impl ToolCapabilities {
    /// Check if tool reads data
    #[must_use]
    pub const fn reads_data(self) -> bool {
        self.contains(Self::READS_DATA)
    }

    /// Check if tool writes data
    #[must_use]
    pub const fn writes_data(self) -> bool {
        self.contains(Self::WRITES_DATA)
    }

    /// Check if tool has any side effect a read-only server must refuse
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        self.intersects(Self::WRITES_DATA.union(Self::WRITES_FILES))
    }

    /// Get a description of all enabled capabilities for logging
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [
            (Self::READS_DATA, "reads_data"),
            (Self::WRITES_DATA, "writes_data"),
            (Self::WRITES_FILES, "writes_files"),
            (Self::CONFIGURATIONS, "configurations"),
            (Self::REQUIREMENTS, "requirements"),
            (Self::REPORTING, "reporting"),
            (Self::DIAGNOSTICS, "diagnostics"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
        .collect();

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// The main trait that all MCP tools must implement.
///
/// Tools are registered with the `ToolRegistry` and are looked up by name
/// when a `tools/call` request arrives.
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use propel_health_mcp::tools::{McpTool, ToolCapabilities, ToolResult, ToolExecutionContext};
/// use propel_health_mcp::mcp::schema::JsonSchema;
/// use propel_health_mcp::errors::AppResult;
/// use serde_json::Value;
///
/// struct CountClinicsTool;
///
/// #[async_trait]
/// impl McpTool for CountClinicsTool {
///     fn name(&self) -> &'static str {
///         "count_clinics"
///     }
///
///     fn description(&self) -> &'static str {
///         "Count clinics across all programs"
///     }
///
///     fn input_schema(&self) -> JsonSchema {
///         JsonSchema::empty()
///     }
///
///     fn capabilities(&self) -> ToolCapabilities {
///         ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
///     }
///
///     async fn execute(&self, _args: Value, _context: &ToolExecutionContext) -> AppResult<ToolResult> {
///         Ok(ToolResult::text("3 clinics"))
///     }
/// }
/// ```
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique identifier for the tool (e.g., `list_users`)
    fn name(&self) -> &'static str;

    /// Human-readable description for LLM consumption
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters, returned in tools/list responses
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags for filtering and validation
    fn capabilities(&self) -> ToolCapabilities;

    /// Prefix shown before the message when execution fails
    /// (e.g. `Error listing users`)
    fn error_label(&self) -> &'static str {
        "Error executing tool"
    }

    /// Execute the tool with given arguments and context
    ///
    /// # Errors
    ///
    /// Returns `AppError` for parameter validation failures, database
    /// errors or file system errors
    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutating_capabilities() {
        assert!(ToolCapabilities::WRITES_DATA.is_mutating());
        assert!((ToolCapabilities::READS_DATA | ToolCapabilities::WRITES_FILES).is_mutating());
        assert!(!(ToolCapabilities::READS_DATA | ToolCapabilities::REPORTING).is_mutating());
    }

    #[test]
    fn test_describe() {
        let caps = ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS;
        assert_eq!(caps.describe(), "reads_data, requirements");
        assert_eq!(ToolCapabilities::empty().describe(), "none");
    }
}
