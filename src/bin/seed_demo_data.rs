// ABOUTME: Demo data seeder for the Propel Health MCP server
// ABOUTME: Creates both SQLite databases and fills them with a small, consistent demo dataset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Demo data seeder for the Propel Health MCP Server.
//!
//! Dates are relative to today, so reviews due, expired training and the
//! like stay meaningful whenever the seeder runs.
//!
//! Usage:
//! ```bash
//! # Seed the databases named by PROPEL_DB_PATH / REQUIREMENTS_DB_PATH
//! cargo run --bin propel-seed-demo
//!
//! # Seed scratch databases
//! cargo run --bin propel-seed-demo -- --db-path /tmp/config.db --requirements-db-path /tmp/req.db
//!
//! # Delete existing database files first
//! cargo run --bin propel-seed-demo -- --reset
//! ```

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use propel_health_mcp::config::environment::{expand_home, ServerConfig};
use propel_health_mcp::database::seed::{seed_configurations, seed_requirements, SeedSummary};
use propel_health_mcp::database::{ConfigurationsDatabase, RequirementsDatabase};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "propel-seed-demo",
    about = "Propel Health MCP Server Demo Data Seeder",
    long_about = "Populate the configurations and requirements databases with demo data"
)]
struct SeedArgs {
    /// Configurations database path override
    #[arg(long)]
    db_path: Option<String>,

    /// Requirements database path override
    #[arg(long)]
    requirements_db_path: Option<String>,

    /// Delete the database files before seeding
    #[arg(long)]
    reset: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
        info!("Removed {}", path.display());
    }
    Ok(())
}

fn log_summary(label: &str, summary: &SeedSummary) {
    info!("{label}:");
    for (table, count) in &summary.rows {
        info!("  {table}: {count}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    dotenvy::dotenv().ok();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("=== Propel Health Demo Data Seeder ===");

    let config = ServerConfig::from_env()?;
    let configurations_path = args
        .db_path
        .as_deref()
        .map_or(config.configurations_db_path, expand_home);
    let requirements_path = args
        .requirements_db_path
        .as_deref()
        .map_or(config.requirements_db_path, expand_home);

    if args.reset {
        info!("Resetting databases...");
        remove_if_exists(&configurations_path)?;
        remove_if_exists(&requirements_path)?;
    }

    let today = Local::now().date_naive();

    info!("Step 1: Configurations database {}", configurations_path.display());
    let configurations = ConfigurationsDatabase::open(&configurations_path).await?;
    if configurations.user_count().await? > 0 {
        warn!("  Already contains users, skipping (use --reset to reseed)");
    } else {
        log_summary("  Seeded", &seed_configurations(&configurations, today).await?);
    }

    info!("Step 2: Requirements database {}", requirements_path.display());
    let requirements = RequirementsDatabase::open(&requirements_path).await?;
    if requirements.list_clients(None).await?.is_empty() {
        log_summary("  Seeded", &seed_requirements(&requirements, today).await?);
    } else {
        warn!("  Already contains clients, skipping (use --reset to reseed)");
    }

    info!("=== Demo data ready ===");
    Ok(())
}
