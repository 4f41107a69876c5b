// ABOUTME: Decorator module for MCP tools providing cross-cutting concerns.
// ABOUTME: Includes auditing and other transparent tool wrappers.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Decorators
//!
//! Decorators wrap tools with additional behaviour without modifying the
//! underlying tool logic:
//!
//! - `AuditedTool` - Logs tool executions with timing

mod audited;

pub use audited::AuditedTool;
