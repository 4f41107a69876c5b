// ABOUTME: Model Context Protocol (MCP) implementation for AI assistant integration
// ABOUTME: Stdio MCP server exposing the Propel Health toolkits to MCP clients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Protocol version negotiation
pub mod protocol;
/// Request routing and tool dispatch
pub mod request_processor;
/// Shared databases, configuration and tool registry
pub mod resources;
/// MCP wire types
pub mod schema;
/// Newline-delimited JSON-RPC over async streams
pub mod transport;

pub use request_processor::McpRequestProcessor;
pub use resources::ServerResources;
pub use transport::StdioTransport;
