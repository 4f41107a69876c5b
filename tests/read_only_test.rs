// ABOUTME: Tests for read-only mode, which hides and refuses the write tools
// ABOUTME: Verifies tools/list filtering, capability queries and the refusal results
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use propel_health_mcp::tools::ToolCapabilities;
use serde_json::json;

#[tokio::test]
async fn test_read_only_hides_write_tools() {
    let server = common::read_only_server().await;
    let names = server.tool_names().await;

    assert!(!names.iter().any(|n| n == "add_user"));
    assert!(!names.iter().any(|n| n == "export_annual_review"));
    assert!(names.iter().any(|n| n == "list_users"));
    assert_eq!(names.len(), 22);

    assert_eq!(
        server.resources.tool_registry.write_tools(),
        vec!["add_user", "export_annual_review"]
    );
}

#[tokio::test]
async fn test_read_only_refuses_add_user() {
    let server = common::read_only_server().await;
    let (text, is_error) = server
        .call_tool_raw(
            "add_user",
            json!({ "name": "Grace Kim", "email": "grace.kim@partner.example" }),
        )
        .await;
    assert!(is_error);
    assert_eq!(
        text,
        "Tool 'add_user' is disabled because the server is running in read-only mode"
    );

    let lookup = server
        .call_tool("get_user", json!({ "email": "grace.kim@partner.example" }))
        .await;
    assert_eq!(lookup, "User not found: grace.kim@partner.example");
}

#[tokio::test]
async fn test_read_only_refuses_export() {
    let server = common::read_only_server().await;
    let (_, is_error) = server
        .call_tool_raw("export_annual_review", json!({ "program": "P4M" }))
        .await;
    assert!(is_error);
    assert!(!server.export_dir.exists());
}

#[tokio::test]
async fn test_filter_by_capabilities() {
    let server = common::read_only_server().await;
    let registry = &server.resources.tool_registry;

    let mut reporting: Vec<&str> = registry
        .filter_by_capabilities(ToolCapabilities::REQUIREMENTS | ToolCapabilities::REPORTING)
        .into_iter()
        .map(|tool| tool.name())
        .collect();
    reporting.sort_unstable();
    assert_eq!(
        reporting,
        vec![
            "get_client_tree",
            "get_coverage_gaps",
            "get_program_health",
            "search_stories"
        ]
    );

    let file_writers: Vec<&str> = registry
        .filter_by_capabilities(ToolCapabilities::WRITES_FILES)
        .into_iter()
        .map(|tool| tool.name())
        .collect();
    assert_eq!(file_writers, vec!["export_annual_review"]);
}
