// ABOUTME: Centralized resource container shared by the request processor and every tool
// ABOUTME: Holds both toolkit databases, the server configuration and the tool registry
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources Module
//!
//! Built once at startup and shared behind an `Arc`. Database handles wrap
//! `sqlx` pools and are cheap to clone.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::environment::ServerConfig;
use crate::database::{ConfigurationsDatabase, RequirementsDatabase};
use crate::tools::registry::ToolRegistry;

/// Centralized resource container for dependency injection
pub struct ServerResources {
    /// Users, access, training and clinic configuration
    pub configurations: ConfigurationsDatabase,
    /// Clients, programs, stories and test cases
    pub requirements: RequirementsDatabase,
    /// Resolved server configuration
    pub config: Arc<ServerConfig>,
    /// Registered tools
    pub tool_registry: Arc<ToolRegistry>,
    /// Fixed reference date for every tool call; `None` uses the local date
    pub today_override: Option<NaiveDate>,
}

impl ServerResources {
    /// Create resources with the built-in tools registered
    ///
    /// The registry honours `config.read_only`.
    #[must_use]
    pub fn new(
        configurations: ConfigurationsDatabase,
        requirements: RequirementsDatabase,
        config: Arc<ServerConfig>,
    ) -> Self {
        let mut registry = ToolRegistry::new().with_read_only(config.read_only);
        registry.register_builtin_tools();

        Self {
            configurations,
            requirements,
            config,
            tool_registry: Arc::new(registry),
            today_override: None,
        }
    }

    /// Pin the reference date for every tool call
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }
}
