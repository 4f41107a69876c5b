// ABOUTME: Main library entry point for the Propel Health MCP server
// ABOUTME: Exposes the configurations and requirements toolkits to MCP clients over stdio
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Propel Health MCP Server
//!
//! A Model Context Protocol (MCP) server that lets an AI assistant query two
//! SQLite databases used by the Propel Health operations team:
//!
//! - **Configurations toolkit**: users, access grants, access reviews,
//!   training records, compliance reports and the program → clinic →
//!   location configuration hierarchy
//! - **Requirements toolkit**: clients, programs, requirements, user stories
//!   and UAT test cases, with health scoring and coverage reports
//!
//! ## Architecture
//!
//! - **Transport**: newline-delimited JSON-RPC 2.0 over stdin/stdout
//! - **Protocol**: `initialize`, `tools/list`, `tools/call` and friends
//! - **Tools**: one type per tool behind the [`tools::McpTool`] trait,
//!   registered by feature flag
//! - **Storage**: `sqlx` over SQLite, one handle per database
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use propel_health_mcp::config::ServerConfig;
//! use propel_health_mcp::database::{ConfigurationsDatabase, RequirementsDatabase};
//! use propel_health_mcp::mcp::{McpRequestProcessor, ServerResources, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let configurations = ConfigurationsDatabase::open(&config.configurations_db_path).await?;
//!     let requirements = RequirementsDatabase::open(&config.requirements_db_path).await?;
//!
//!     let resources = Arc::new(ServerResources::new(
//!         configurations,
//!         requirements,
//!         Arc::new(config),
//!     ));
//!     let processor = Arc::new(McpRequestProcessor::new(resources));
//!     StdioTransport::stdio(processor).run().await?;
//!     Ok(())
//! }
//! ```

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// SQLite storage for both toolkits
pub mod database;

/// Unified error handling
pub mod errors;

/// Annual access review file export
pub mod export;

/// JSON-RPC 2.0 message types
pub mod jsonrpc;

/// Structured logging to stderr
pub mod logging;

/// Model Context Protocol server implementation
pub mod mcp;

/// Domain models for both toolkits
pub mod models;

/// Program health scoring
pub mod reporting;

/// MCP tools
pub mod tools;
