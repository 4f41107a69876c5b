// ABOUTME: Defines ToolResult, the text payload returned by tool execution.
// ABOUTME: Bridges tool implementations with the MCP tools/call response format.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Result Types
//!
//! Every Propel Health tool answers with human-readable text for the model to
//! read. `ToolResult` carries that text plus the MCP `isError` flag.

use crate::mcp::schema::{Content, ToolResponse};

/// Result returned by tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Text content returned to the client
    pub content: String,
    /// Whether this result represents an error condition
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: false,
        }
    }

    /// Create an error result
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }

    /// Convert into the MCP wire representation
    #[must_use]
    pub fn into_response(self) -> ToolResponse {
        ToolResponse {
            content: vec![Content::Text {
                text: self.content,
            }],
            is_error: self.is_error,
        }
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::text(String::new())
    }
}

impl From<String> for ToolResult {
    fn from(message: String) -> Self {
        Self::text(message)
    }
}
