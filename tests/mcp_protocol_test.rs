// ABOUTME: MCP protocol compliance tests for the request processor
// ABOUTME: Covers initialize negotiation, tools/list, tools/call errors and notifications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use propel_health_mcp::jsonrpc::{error_codes, JsonRpcRequest};
use propel_health_mcp::mcp::protocol::LATEST_PROTOCOL_VERSION;
use propel_health_mcp::tools::implementations::diagnostics::HELLO_MESSAGE;
use serde_json::json;

#[tokio::test]
async fn test_initialize_echoes_supported_version() {
    let server = common::seeded_server().await;
    let response = server
        .request(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "clientInfo": { "name": "test-client", "version": "0.1.0" },
                "capabilities": {},
            })),
        )
        .await;

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "propel-health");
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(response.id, Some(json!(1)));
}

#[tokio::test]
async fn test_initialize_falls_back_to_latest_version() {
    let server = common::seeded_server().await;
    let response = server
        .request("initialize", Some(json!({ "protocolVersion": "1999-01-01" })))
        .await;
    assert_eq!(
        response.result.unwrap()["protocolVersion"],
        LATEST_PROTOCOL_VERSION
    );

    let no_params = server.request("initialize", None).await;
    assert_eq!(
        no_params.result.unwrap()["protocolVersion"],
        LATEST_PROTOCOL_VERSION
    );
}

#[tokio::test]
async fn test_tools_list_exposes_every_tool() {
    let server = common::seeded_server().await;
    let names = server.tool_names().await;

    assert_eq!(names.len(), 24, "{names:?}");
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "tools/list is sorted by name");
    for expected in [
        "hello_propel",
        "list_users",
        "add_user",
        "export_annual_review",
        "get_compliance_report",
        "get_config",
        "get_program_health",
        "get_coverage_gaps",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    let response = server.request("tools/list", None).await;
    let tools = response.result.unwrap()["tools"].clone();
    let get_story = tools
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "get_story")
        .unwrap()
        .clone();
    assert_eq!(get_story["inputSchema"]["type"], "object");
    assert_eq!(get_story["inputSchema"]["required"], json!(["story_id"]));
}

#[tokio::test]
async fn test_hello_propel() {
    let server = common::empty_server().await;
    let text = server.call_tool("hello_propel", json!({})).await;
    assert_eq!(text, HELLO_MESSAGE);
}

#[tokio::test]
async fn test_unknown_method_and_tool() {
    let server = common::seeded_server().await;

    let method = server.request("sampling/createMessage", None).await;
    assert_eq!(method.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

    let tool = server
        .request(
            "tools/call",
            Some(json!({ "name": "delete_everything", "arguments": {} })),
        )
        .await;
    let error = tool.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
    assert!(error.message.contains("delete_everything"));

    let missing = server.request("tools/call", None).await;
    assert_eq!(missing.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_invalid_jsonrpc_version() {
    let server = common::seeded_server().await;
    let mut request = JsonRpcRequest::new("ping", None);
    request.jsonrpc = "1.0".to_owned();
    let response = server.processor.handle_request(request).await.unwrap();
    assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let server = common::seeded_server().await;
    let response = server
        .processor
        .handle_request(JsonRpcRequest::notification(
            "notifications/initialized",
            None,
        ))
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_requests_without_id_get_no_response() {
    let server = common::seeded_server().await;
    for method in ["ping", "tools/list", "no/such/method"] {
        let response = server
            .processor
            .handle_request(JsonRpcRequest::notification(method, None))
            .await;
        assert!(response.is_none(), "{method} without an id was answered");
    }

    let mut bad_version = JsonRpcRequest::notification("ping", None);
    bad_version.jsonrpc = "1.0".to_owned();
    let response = server.processor.handle_request(bad_version).await.unwrap();
    assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_ping_and_empty_listings() {
    let server = common::seeded_server().await;
    assert_eq!(server.request("ping", None).await.result, Some(json!({})));
    assert_eq!(
        server.request("resources/list", None).await.result.unwrap()["resources"],
        json!([])
    );
    assert_eq!(
        server.request("prompts/list", None).await.result.unwrap()["prompts"],
        json!([])
    );
}

#[tokio::test]
async fn test_tool_error_is_reported_in_result() {
    let server = common::seeded_server().await;
    let response = server
        .request(
            "tools/call",
            Some(json!({ "name": "get_story", "arguments": {} })),
        )
        .await;
    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error getting story:"), "{text}");
}

#[tokio::test]
async fn test_empty_databases_answer_with_messages() {
    let server = common::empty_server().await;
    assert_eq!(
        server.call_tool("list_programs", json!({})).await,
        "No programs found in the database."
    );
    assert_eq!(
        server.call_tool("get_client_tree", json!({})).await,
        "No clients found in the database."
    );
    assert_eq!(
        server.call_tool("list_clients", json!({})).await,
        "No clients found."
    );
}
