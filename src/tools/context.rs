// ABOUTME: Defines ToolExecutionContext which provides tools with access to databases and configuration.
// ABOUTME: Carries the request id for tracing and the clock used for date-relative reports.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Execution Context
//!
//! Provides a unified context object for tool execution, containing:
//! - Access to shared server resources (both toolkit databases, configuration)
//! - Request tracing information
//! - The reference date for overdue and expiry calculations
//!
//! The clock is part of the context so that review and training reports can
//! be computed against a fixed date in tests.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::config::environment::ServerConfig;
use crate::database::configurations::ConfigurationsDatabase;
use crate::database::requirements::RequirementsDatabase;
use crate::mcp::resources::ServerResources;

/// Context provided to every tool execution.
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Request ID for tracing/logging
    pub request_id: Option<Value>,
    /// Access to all server resources
    pub resources: Arc<ServerResources>,
    /// Fixed reference date; `None` means the local calendar date
    today_override: Option<NaiveDate>,
}

impl ToolExecutionContext {
    /// Create a new context over the shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self {
            request_id: None,
            resources,
            today_override: None,
        }
    }

    /// Set request ID for tracing
    #[must_use]
    pub fn with_request_id(mut self, request_id: Value) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Pin the reference date
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }

    /// Reference date for overdue, due-soon and expiry checks
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today_override
            .or(self.resources.today_override)
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Configurations toolkit database
    #[must_use]
    pub fn configurations(&self) -> &ConfigurationsDatabase {
        &self.resources.configurations
    }

    /// Requirements toolkit database
    #[must_use]
    pub fn requirements(&self) -> &RequirementsDatabase {
        &self.resources.requirements
    }

    /// Server configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.resources.config
    }
}

impl fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("request_id", &self.request_id)
            .field("today_override", &self.today_override)
            .field("resources", &"<ServerResources>")
            .finish()
    }
}
