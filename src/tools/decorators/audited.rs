// ABOUTME: Audit decorator for MCP tools that logs every tool execution with timing.
// ABOUTME: Gives a compliance trail of which toolkit data was read or changed.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Audited Tool Decorator
//!
//! Wraps any `McpTool` implementation with audit logging. Logs tool
//! invocations with the request id, capabilities and duration.
//!
//! Arguments are never logged since emails and names are personal data.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::mcp::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Audit decorator for MCP tools.
pub struct AuditedTool {
    inner: Arc<dyn McpTool>,
}

impl AuditedTool {
    /// Wrap a tool with audit logging
    #[must_use]
    pub fn new(inner: Arc<dyn McpTool>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl McpTool for AuditedTool {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn input_schema(&self) -> JsonSchema {
        self.inner.input_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        self.inner.capabilities()
    }

    fn error_label(&self) -> &'static str {
        self.inner.error_label()
    }

    #[instrument(
        skip(self, args, context),
        fields(
            tool = %self.name(),
            request_id = ?context.request_id,
        )
    )]
    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult> {
        let start = Instant::now();
        let tool_name = self.name();
        let mutating = self.capabilities().is_mutating();

        info!(tool = %tool_name, mutating = %mutating, "Tool execution started");

        let result = self.inner.execute(args, context).await;
        let duration = start.elapsed();

        match &result {
            Ok(tool_result) => {
                info!(
                    tool = %tool_name,
                    duration_ms = %duration.as_millis(),
                    is_error = %tool_result.is_error,
                    response_bytes = %tool_result.content.len(),
                    "Tool execution completed"
                );
            }
            Err(error) => {
                warn!(
                    tool = %tool_name,
                    duration_ms = %duration.as_millis(),
                    error_code = ?error.code,
                    error_message = %error.message,
                    "Tool execution failed"
                );
            }
        }
        AppLogger::log_mcp_tool_call(
            tool_name,
            result.as_ref().is_ok_and(|r| !r.is_error),
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        );

        result
    }
}
