// ABOUTME: Defines tool-specific error types for the pluggable tools architecture.
// ABOUTME: Provides structured errors that integrate with the main AppError system.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Error Types
//!
//! `ToolError` covers failures that belong to the tool layer rather than to
//! the databases: registry lookups, argument validation and read-only
//! refusals. Each variant converts into an [`AppError`] with a matching code.

use std::error::Error;
use std::fmt;

use crate::errors::{AppError, ErrorCode};

/// Errors specific to tool operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Tool was not found in the registry
    NotFound {
        /// Name of the requested tool
        tool_name: String,
    },
    /// Tool parameter validation failed
    InvalidParameter {
        /// Name of the tool
        tool_name: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Reason the parameter is invalid
        reason: String,
    },
    /// Required parameter is missing
    MissingParameter {
        /// Name of the tool
        tool_name: String,
        /// Name of the missing parameter
        parameter: String,
    },
    /// Tool writes data or files and the server runs read-only
    ReadOnly {
        /// Name of the refused tool
        tool_name: String,
    },
}

impl ToolError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::NotFound {
            tool_name: tool_name.into(),
        }
    }

    /// Create an "invalid parameter" error
    #[must_use]
    pub fn invalid_parameter(
        tool_name: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            tool_name: tool_name.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a "missing parameter" error
    #[must_use]
    pub fn missing_parameter(tool_name: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            tool_name: tool_name.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a read-only refusal
    #[must_use]
    pub fn read_only(tool_name: impl Into<String>) -> Self {
        Self::ReadOnly {
            tool_name: tool_name.into(),
        }
    }

    /// Get the tool name associated with this error
    #[must_use]
    pub fn tool_name(&self) -> &str {
        match self {
            Self::NotFound { tool_name }
            | Self::InvalidParameter { tool_name, .. }
            | Self::MissingParameter { tool_name, .. }
            | Self::ReadOnly { tool_name } => tool_name,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { tool_name } => write!(f, "Unknown tool: {tool_name}"),
            Self::InvalidParameter {
                tool_name,
                parameter,
                reason,
            } => write!(
                f,
                "Invalid parameter '{parameter}' for tool '{tool_name}': {reason}"
            ),
            Self::MissingParameter {
                tool_name,
                parameter,
            } => write!(
                f,
                "Missing required parameter '{parameter}' for tool '{tool_name}'"
            ),
            Self::ReadOnly { tool_name } => write!(
                f,
                "Tool '{tool_name}' is disabled because the server is running in read-only mode"
            ),
        }
    }
}

impl Error for ToolError {}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        let code = match &error {
            ToolError::NotFound { .. } => ErrorCode::ResourceNotFound,
            ToolError::InvalidParameter { .. } => ErrorCode::InvalidInput,
            ToolError::MissingParameter { .. } => ErrorCode::MissingRequiredField,
            ToolError::ReadOnly { .. } => ErrorCode::PermissionDenied,
        };
        Self::new(code, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_conversion() {
        let error: AppError = ToolError::missing_parameter("get_user", "email").into();
        assert_eq!(error.code, ErrorCode::MissingRequiredField);
        assert_eq!(
            error.message,
            "Missing required parameter 'email' for tool 'get_user'"
        );
    }

    #[test]
    fn test_read_only_is_permission_denied() {
        let error = ToolError::read_only("add_user");
        assert_eq!(error.tool_name(), "add_user");
        let app: AppError = error.into();
        assert_eq!(app.code, ErrorCode::PermissionDenied);
    }
}
