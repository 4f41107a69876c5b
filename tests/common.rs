// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds seeded temp-file databases and a request processor with a fixed clock
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `propel_health_mcp`
//!
//! Every test server gets its own temp directory holding both databases and
//! the export directory, so tests never touch the user's real data.

use std::path::PathBuf;
use std::sync::{Arc, Once};

use chrono::NaiveDate;
use propel_health_mcp::{
    config::ServerConfig,
    database::{
        seed::{seed_configurations, seed_requirements},
        ConfigurationsDatabase, RequirementsDatabase,
    },
    jsonrpc::{JsonRpcRequest, JsonRpcResponse},
    mcp::{McpRequestProcessor, ServerResources},
};
use serde_json::{json, Value};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Reference date used by every seeded test server
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// A running server over seeded databases in a private temp directory
pub struct TestServer {
    pub processor: Arc<McpRequestProcessor>,
    pub resources: Arc<ServerResources>,
    pub export_dir: PathBuf,
    _dir: TempDir,
}

/// Open both databases in `dir`, seeded unless `empty`
async fn open_databases(
    dir: &TempDir,
    empty: bool,
) -> (ConfigurationsDatabase, RequirementsDatabase, ServerConfig) {
    let config = ServerConfig {
        configurations_db_path: dir.path().join("configurations.db"),
        requirements_db_path: dir.path().join("requirements.db"),
        export_dir: dir.path().join("exports"),
        ..ServerConfig::default()
    };

    let configurations = ConfigurationsDatabase::open(&config.configurations_db_path)
        .await
        .unwrap();
    let requirements = RequirementsDatabase::open(&config.requirements_db_path)
        .await
        .unwrap();

    if !empty {
        seed_configurations(&configurations, today()).await.unwrap();
        seed_requirements(&requirements, today()).await.unwrap();
    }
    (configurations, requirements, config)
}

async fn build_server(empty: bool, configure: impl FnOnce(&mut ServerConfig)) -> TestServer {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let (configurations, requirements, mut config) = open_databases(&dir, empty).await;
    configure(&mut config);
    let export_dir = config.export_dir.clone();

    let resources = Arc::new(
        ServerResources::new(configurations, requirements, Arc::new(config)).with_today(today()),
    );
    TestServer {
        processor: Arc::new(McpRequestProcessor::new(Arc::clone(&resources))),
        resources,
        export_dir,
        _dir: dir,
    }
}

/// Server over the demo dataset
pub async fn seeded_server() -> TestServer {
    build_server(false, |_| {}).await
}

/// Server over the demo dataset with adjusted configuration; `validate` is
/// not applied
pub async fn seeded_server_with(configure: impl FnOnce(&mut ServerConfig)) -> TestServer {
    build_server(false, configure).await
}

/// Read-only server over the demo dataset
pub async fn read_only_server() -> TestServer {
    build_server(false, |config| config.read_only = true).await
}

/// Server over freshly migrated, empty databases
pub async fn empty_server() -> TestServer {
    build_server(true, |_| {}).await
}

impl TestServer {
    /// Send one request and return its response
    pub async fn request(&self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.processor
            .handle_request(JsonRpcRequest::new(method, params))
            .await
            .expect("request should produce a response")
    }

    /// Call a tool; returns its text and `isError` flag
    pub async fn call_tool_raw(&self, name: &str, arguments: Value) -> (String, bool) {
        let response = self
            .request(
                "tools/call",
                Some(json!({ "name": name, "arguments": arguments })),
            )
            .await;
        assert!(
            response.error.is_none(),
            "tools/call {name} failed: {:?}",
            response.error
        );
        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap().to_owned();
        (text, result["isError"].as_bool().unwrap())
    }

    /// Call a tool expecting a successful text result
    pub async fn call_tool(&self, name: &str, arguments: Value) -> String {
        let (text, is_error) = self.call_tool_raw(name, arguments).await;
        assert!(!is_error, "{name} reported an error: {text}");
        text
    }

    /// Names from `tools/list`
    pub async fn tool_names(&self) -> Vec<String> {
        let response = self.request("tools/list", None).await;
        response.result.unwrap()["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap().to_owned())
            .collect()
    }
}
