// ABOUTME: MCP request processing and protocol handling for the stdio server
// ABOUTME: Validates, routes, and executes MCP protocol requests with proper error handling
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::protocol::negotiate_version;
use super::resources::ServerResources;
use super::schema::{InitializeRequest, InitializeResponse, ToolCall};
use crate::constants::server::{SERVER_NAME, SERVER_VERSION};
use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;

/// Processes MCP protocol requests with validation, routing, and execution
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
}

impl McpRequestProcessor {
    /// Create a new MCP request processor
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Shared resources
    #[must_use]
    pub fn resources(&self) -> &Arc<ServerResources> {
        &self.resources
    }

    /// Handle an MCP request; notifications and messages without an id produce no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let start_time = Instant::now();
        debug!(method = %request.method, id = ?request.id, "Received MCP request");

        if request.method.starts_with("notifications/") {
            debug!(method = %request.method, "Notification acknowledged");
            return None;
        }

        if let Err(response) = Self::validate_request(&request) {
            return Some(response);
        }
        let response = self.route(&request).await;

        // A valid message without an id is a notification whatever its method
        if request.is_notification() {
            debug!(method = %request.method, "Request without id handled as notification");
            return None;
        }

        debug!(
            method = %request.method,
            elapsed_ms = %start_time.elapsed().as_millis(),
            is_error = response.is_error(),
            "MCP request completed"
        );
        Some(response)
    }

    /// Validate JSON-RPC envelope fields
    fn validate_request(request: &JsonRpcRequest) -> Result<(), JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INVALID_REQUEST,
                format!(
                    "Invalid JSON-RPC version: got '{}', expected '{JSONRPC_VERSION}'",
                    request.jsonrpc
                ),
            ));
        }
        if request.method.is_empty() {
            return Err(JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INVALID_REQUEST,
                "Missing method",
            ));
        }
        Ok(())
    }

    async fn route(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match request.method.as_str() {
            "initialize" => Self::handle_initialize(request),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => JsonRpcResponse::success(id, json!({ "resources": [] })),
            "prompts/list" => JsonRpcResponse::success(id, json!({ "prompts": [] })),
            method => {
                warn!(method = %method, "Unknown MCP method");
                JsonRpcResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {method}"),
                )
            }
        }
    }

    /// Handle MCP initialize request
    fn handle_initialize(request: &JsonRpcRequest) -> JsonRpcResponse {
        let requested = request
            .params
            .clone()
            .and_then(|params| serde_json::from_value::<InitializeRequest>(params).ok());
        let version = negotiate_version(requested.as_ref().map(|r| r.protocol_version.as_str()));

        if let Some(client) = requested.as_ref().and_then(|r| r.client_info.as_ref()) {
            debug!(client = %client.name, client_version = %client.version, "Client connected");
        }

        let init = InitializeResponse::new(
            version.to_owned(),
            SERVER_NAME.to_owned(),
            SERVER_VERSION.to_owned(),
        );
        Self::serialize_result(request.id.clone(), &init)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = self.resources.tool_registry.list_schemas();
        debug!(count = tools.len(), "Listing tools");
        Self::serialize_result(request.id.clone(), &json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let call = match request
            .params
            .clone()
            .map(serde_json::from_value::<ToolCall>)
        {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call parameters: {e}"),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters for tools/call",
                )
            }
        };

        let registry = &self.resources.tool_registry;
        let Some(tool) = registry.get(&call.name) else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", call.name),
            );
        };

        let mut context = ToolExecutionContext::new(Arc::clone(&self.resources));
        if let Some(request_id) = &id {
            context = context.with_request_id(request_id.clone());
        }

        let args = call.arguments.unwrap_or_else(|| json!({}));
        let result = match registry.execute(&call.name, args, &context).await {
            Ok(result) => result,
            Err(e) => Self::tool_failure(tool.error_label(), &e),
        };

        Self::serialize_result(id, &result.into_response())
    }

    fn tool_failure(label: &str, error: &AppError) -> ToolResult {
        error!(code = ?error.code, message = %error.message, "Tool returned an error");
        ToolResult::error(format!("{label}: {}", error.message))
    }

    fn serialize_result(id: Option<Value>, result: &impl serde::Serialize) -> JsonRpcResponse {
        match Self::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, e.code.jsonrpc_code(), e.message),
        }
    }

    fn to_value(result: &impl serde::Serialize) -> AppResult<Value> {
        Ok(serde_json::to_value(result)?)
    }
}
