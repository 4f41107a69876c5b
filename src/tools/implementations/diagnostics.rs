// ABOUTME: Connection check tool registered regardless of feature flags
// ABOUTME: Lets an MCP client confirm the server is reachable

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Greeting returned by `hello_propel`
pub const HELLO_MESSAGE: &str = "Hello from Propel Health MCP Server! Connection successful.";

/// Verify the MCP server is working
pub struct HelloPropelTool;

#[async_trait]
impl McpTool for HelloPropelTool {
    fn name(&self) -> &'static str {
        "hello_propel"
    }

    fn description(&self) -> &'static str {
        "Test function to verify MCP server is working."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::DIAGNOSTICS
    }

    async fn execute(&self, _args: Value, _ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        Ok(ToolResult::text(HELLO_MESSAGE))
    }
}

/// Create the diagnostic tools
#[must_use]
pub fn create_diagnostic_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(HelloPropelTool)]
}
