// ABOUTME: MCP tool layer: trait, registry, execution context and implementations.
// ABOUTME: Tools are grouped by toolkit category and registered behind feature flags.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pluggable tool architecture for the Propel Health MCP Server
//!
//! Every tool is a type implementing [`McpTool`]. The [`registry::ToolRegistry`]
//! collects them at startup, wraps each one in an audit decorator and hides
//! write tools when the server runs read-only.

/// Typed accessors over JSON tool arguments
pub mod args;
/// Execution context handed to every tool
pub mod context;
/// Cross-cutting tool wrappers
pub mod decorators;
/// Tool-level error type
pub mod errors;
/// Tool implementations by category
pub mod implementations;
/// Tool registry
pub mod registry;
/// Tool results
pub mod result;
/// The `McpTool` trait and capability flags
pub mod traits;

pub use context::ToolExecutionContext;
pub use result::ToolResult;
pub use traits::{McpTool, ToolCapabilities};
