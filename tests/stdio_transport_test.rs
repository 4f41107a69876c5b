// ABOUTME: Tests for the newline-delimited JSON-RPC transport
// ABOUTME: Feeds scripted client input through the transport and inspects the written lines
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use propel_health_mcp::jsonrpc::error_codes;
use propel_health_mcp::mcp::StdioTransport;
use serde_json::Value;
use tokio::io::BufReader;

/// Run the transport over `input` and return each response line as JSON
async fn run_session(server: &common::TestServer, input: impl AsRef<[u8]>) -> Vec<Value> {
    let reader = BufReader::new(input.as_ref());
    let mut output: Vec<u8> = Vec::new();
    StdioTransport::new(reader, &mut output, Arc::clone(&server.processor))
        .run()
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_session_answers_requests_in_order() {
    let server = common::seeded_server().await;
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":"two","method":"tools/call","params":{"name":"hello_propel","arguments":{}}}"#,
        "\n",
    );

    let responses = run_session(&server, input).await;
    assert_eq!(responses.len(), 2, "notification and blank line produce no output");
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(responses[1]["id"], "two");
    assert_eq!(responses[1]["result"]["isError"], false);
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let server = common::seeded_server().await;
    let responses = run_session(
        &server,
        "{not json\n{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"ping\"}\n",
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], error_codes::PARSE_ERROR);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 5, "the session continues after a bad line");
}

#[tokio::test]
async fn test_invalid_utf8_is_a_parse_error() {
    let server = common::seeded_server().await;
    let mut input = b"\xff\xfe\n".to_vec();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":6,\"method\":\"ping\"}\n");

    let responses = run_session(&server, input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], error_codes::PARSE_ERROR);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 6);
    assert_eq!(responses[1]["result"], serde_json::json!({}));
}

#[tokio::test]
async fn test_request_without_id_is_not_answered() {
    let server = common::seeded_server().await;
    let input = concat!(
        r#"{"jsonrpc":"2.0","method":"ping"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#,
        "\n",
    );
    let responses = run_session(&server, input).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 7);
}

#[tokio::test]
async fn test_non_request_object_is_invalid() {
    let server = common::seeded_server().await;
    let responses = run_session(&server, "{\"id\":9,\"method\":42}\n").await;
    assert_eq!(responses[0]["error"]["code"], error_codes::INVALID_REQUEST);
    assert_eq!(responses[0]["id"], 9);
}

#[tokio::test]
async fn test_missing_method_is_invalid() {
    let server = common::seeded_server().await;
    let responses = run_session(&server, "{\"jsonrpc\":\"2.0\",\"id\":3}\n").await;
    assert_eq!(responses[0]["error"]["code"], error_codes::INVALID_REQUEST);
}
