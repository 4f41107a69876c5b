// ABOUTME: Stdio MCP server binary for the Propel Health toolkits
// ABOUTME: Loads configuration, opens both databases and serves JSON-RPC on stdin/stdout
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Propel Health MCP Server Binary
//!
//! Launched by an MCP client as a subprocess. Stdout carries protocol
//! traffic only; all logging goes to stderr.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use propel_health_mcp::{
    config::environment::{expand_home, ServerConfig},
    database::{ConfigurationsDatabase, RequirementsDatabase},
    logging,
    mcp::{McpRequestProcessor, ServerResources, StdioTransport},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "propel-health-mcp")]
#[command(about = "Propel Health MCP Server - configurations and requirements toolkits over stdio")]
pub struct Args {
    /// Configurations database path (overrides `PROPEL_DB_PATH`)
    #[arg(long)]
    db_path: Option<String>,

    /// Requirements database path (overrides `REQUIREMENTS_DB_PATH`)
    #[arg(long)]
    requirements_db_path: Option<String>,

    /// Default export directory (overrides `PROPEL_EXPORT_DIR`)
    #[arg(long)]
    export_dir: Option<String>,

    /// Hide and refuse tools that write data or files
    #[arg(long)]
    read_only: bool,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(path) = self.db_path {
            config.configurations_db_path = expand_home(&path);
        }
        if let Some(path) = self.requirements_db_path {
            config.requirements_db_path = expand_home(&path);
        }
        if let Some(dir) = self.export_dir {
            config.export_dir = expand_home(&dir);
        }
        config.read_only |= self.read_only;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env is fine
    dotenvy::dotenv().ok();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    args.apply(&mut config);
    info!("{}", config.summary());

    let configurations = ConfigurationsDatabase::open(&config.configurations_db_path).await?;
    let requirements = RequirementsDatabase::open(&config.requirements_db_path).await?;
    info!("Databases opened");

    let resources = Arc::new(ServerResources::new(
        configurations,
        requirements,
        Arc::new(config),
    ));
    info!(
        tools = resources.tool_registry.len(),
        "Propel Health MCP Server ready on stdio"
    );

    let processor = Arc::new(McpRequestProcessor::new(resources));
    if let Err(e) = StdioTransport::stdio(processor).run().await {
        error!("Transport error: {}", e);
        return Err(e.into());
    }

    info!("Client closed the connection, shutting down");
    Ok(())
}
