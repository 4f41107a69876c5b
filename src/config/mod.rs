// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Propel Health MCP Server
//!
//! - **Environment**: database paths, export directory, review window,
//!   required training and read-only mode, read from environment variables
//!   and overridden by command line flags in the binary.

/// Environment and server configuration
pub mod environment;

pub use environment::ServerConfig;
