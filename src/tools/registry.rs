// ABOUTME: Central registry for MCP tools with capability-based filtering and execution.
// ABOUTME: Provides tool discovery, read-only filtering, and feature-flag-based registration.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Registry
//!
//! Central registry for MCP tools, providing:
//! - Tool registration and lookup
//! - Capability-based filtering (read-only servers hide write tools)
//! - Feature-flag-based conditional registration
//! - Schema generation for MCP tools/list responses

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::mcp::schema::ToolSchema;

use super::context::ToolExecutionContext;
use super::decorators::AuditedTool;
use super::errors::ToolError;
use super::result::ToolResult;
use super::traits::{McpTool, ToolCapabilities};

/// Central registry for MCP tools.
///
/// Built once at startup and then used immutably for tool lookups. All
/// registered tools are `Arc`-wrapped for sharing across async tasks.
///
/// # Example
///
/// ```
/// use propel_health_mcp::tools::registry::ToolRegistry;
///
/// let mut registry = ToolRegistry::new();
/// registry.register_builtin_tools();
///
/// assert!(registry.contains("hello_propel"));
/// ```
pub struct ToolRegistry {
    /// Registered tools by name
    tools: HashMap<String, Arc<dyn McpTool>>,
    /// Tool categories for organization
    categories: HashMap<String, Vec<String>>,
    /// Hide and refuse tools that write data or files
    read_only: bool,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
            read_only: false,
        }
    }

    /// Enable or disable read-only mode
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Register a tool in the registry
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if a tool with the same name exists
    pub fn register(&mut self, tool: Arc<dyn McpTool>) -> bool {
        let name = tool.name().to_owned();

        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }

        debug!(
            "Registering tool '{}' with capabilities: {}",
            name,
            tool.capabilities().describe()
        );
        self.tools.insert(name, tool);
        true
    }

    /// Register a tool and categorize it
    pub fn register_with_category(&mut self, tool: Arc<dyn McpTool>, category: &str) {
        let name = tool.name().to_owned();
        if self.register(tool) {
            self.categories
                .entry(category.to_owned())
                .or_default()
                .push(name);
        }
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpTool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// List all categories, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    fn is_visible(&self, tool: &Arc<dyn McpTool>) -> bool {
        !(self.read_only && tool.capabilities().is_mutating())
    }

    /// List schemas for every tool the server currently exposes, sorted by name
    #[must_use]
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .filter(|tool| self.is_visible(tool))
            .map(|tool| ToolSchema {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Filter tools by capabilities
    #[must_use]
    pub fn filter_by_capabilities(&self, required: ToolCapabilities) -> Vec<&Arc<dyn McpTool>> {
        self.tools
            .values()
            .filter(|tool| tool.capabilities().contains(required))
            .collect()
    }

    /// Get tools that modify data or files
    #[must_use]
    pub fn write_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tools
            .iter()
            .filter(|(_, tool)| tool.capabilities().is_mutating())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Execute a tool by name
    ///
    /// A write tool called on a read-only server answers with an error result
    /// rather than an `Err`, so the client sees the refusal as tool output.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the tool is not found or its execution fails
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
        context: &ToolExecutionContext,
    ) -> AppResult<ToolResult> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;

        if !self.is_visible(tool) {
            warn!(tool = %name, "Refusing write tool in read-only mode");
            return Ok(ToolResult::error(ToolError::read_only(name).to_string()));
        }

        tool.execute(args, context).await
    }

    /// Register all built-in tools based on feature flags
    pub fn register_builtin_tools(&mut self) {
        info!("Registering built-in tools...");

        #[cfg(feature = "tools-users")]
        self.register_category(super::implementations::users::create_user_tools(), "users");

        #[cfg(feature = "tools-access")]
        self.register_category(
            super::implementations::access::create_access_tools(),
            "access",
        );

        #[cfg(feature = "tools-training")]
        self.register_category(
            super::implementations::training::create_training_tools(),
            "training",
        );

        #[cfg(feature = "tools-compliance")]
        self.register_category(
            super::implementations::compliance::create_compliance_tools(),
            "compliance",
        );

        #[cfg(feature = "tools-config")]
        self.register_category(
            super::implementations::configuration::create_configuration_tools(),
            "configuration",
        );

        #[cfg(feature = "tools-clients")]
        self.register_category(
            super::implementations::clients::create_client_tools(),
            "clients",
        );

        #[cfg(feature = "tools-stories")]
        self.register_category(
            super::implementations::stories::create_story_tools(),
            "stories",
        );

        #[cfg(feature = "tools-tests")]
        self.register_category(
            super::implementations::test_cases::create_test_case_tools(),
            "tests",
        );

        #[cfg(feature = "tools-reporting")]
        self.register_category(
            super::implementations::reporting::create_reporting_tools(),
            "reporting",
        );

        // Always available, no feature flag
        self.register_category(
            super::implementations::diagnostics::create_diagnostic_tools(),
            "diagnostics",
        );

        info!("Registered {} built-in tools", self.len());
    }

    /// Register a category of tools, each wrapped in the audit decorator
    fn register_category(&mut self, tools: Vec<Box<dyn McpTool>>, category: &str) {
        debug!(
            "Registering {} tools (registry has {} tools)",
            category,
            self.tools.len()
        );

        for tool in tools {
            let audited = AuditedTool::new(Arc::from(tool));
            self.register_with_category(Arc::new(audited), category);
        }

        info!(
            "Registered {} tools (registry now has {} tools)",
            category,
            self.tools.len()
        );
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.tool_names())
            .field("categories", &self.categories())
            .field("read_only", &self.read_only)
            .finish()
    }
}
