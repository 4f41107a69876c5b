// ABOUTME: UAT test case tools for the requirements toolkit.
// ABOUTME: Implements list_test_cases and get_test_summary.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use super::program_or_message;
use crate::constants::limits::TEST_LIST_ROWS;
use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::requirements::TestExecutionSummary;
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn format_summary(program_name: &str, summary: &TestExecutionSummary) -> String {
    let mut out = format!("Test Execution Summary for {program_name}:\n");
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(out, "Total Tests: {}", summary.total);
    let _ = writeln!(out, "Execution Rate: {:.1}%", summary.execution_rate);
    let _ = writeln!(out, "Pass Rate: {:.1}%\n", summary.pass_rate);

    out.push_str("By Status:\n");
    for (status, count) in &summary.by_status {
        let _ = writeln!(out, "  • {status}: {count}");
    }

    if !summary.by_type.is_empty() {
        out.push_str("\nBy Test Type:\n");
        for breakdown in &summary.by_type {
            let _ = write!(out, "  {}: {} total", breakdown.test_type, breakdown.total);
            if breakdown.passed > 0 {
                let _ = write!(out, ", {} passed", breakdown.passed);
            }
            if breakdown.failed > 0 {
                let _ = write!(out, ", {} failed", breakdown.failed);
            }
            out.push('\n');
        }
    }
    out
}

/// UAT test cases of a program
pub struct ListTestCasesTool;

#[async_trait]
impl McpTool for ListTestCasesTool {
    fn name(&self) -> &'static str {
        "list_test_cases"
    }

    fn description(&self) -> &'static str {
        "List UAT test cases for a program, optionally filtered by status \
         (Not Run, Pass, Fail, Blocked, Skipped) or test type \
         (happy_path, negative, validation, edge_case)."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("program_prefix", PropertySchema::string("Program prefix (e.g. PROP)")),
                ("status", PropertySchema::string("Filter by test status")),
                ("test_type", PropertySchema::string("Filter by test type")),
            ],
            &["program_prefix"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error listing tests"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let prefix = args.required_str("program_prefix")?;
        let status = args.optional_str("status")?;
        let test_type = args.optional_str("test_type")?;

        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };

        let tests = ctx
            .requirements()
            .get_test_cases(&program.program_id, status, test_type)
            .await?;
        if tests.is_empty() {
            return Ok(ToolResult::text(format!(
                "No test cases found for {prefix}."
            )));
        }

        let mut out = format!("Test Cases for {} [{prefix}]:\n", program.name);
        let _ = writeln!(out, "Found {} test(s)\n", tests.len());
        for test in tests.iter().take(TEST_LIST_ROWS) {
            let _ = writeln!(
                out,
                "[{}] {}",
                test.test_id,
                test.title.as_deref().unwrap_or("Untitled")
            );
            let _ = writeln!(
                out,
                "  Status: {} | Type: {}",
                test.test_status,
                test.test_type.as_deref().unwrap_or("N/A")
            );
        }
        if tests.len() > TEST_LIST_ROWS {
            let _ = writeln!(out, "\n... and {} more tests", tests.len() - TEST_LIST_ROWS);
        }

        Ok(ToolResult::text(out))
    }
}

/// Execution and pass rates of a program's tests
pub struct GetTestSummaryTool;

#[async_trait]
impl McpTool for GetTestSummaryTool {
    fn name(&self) -> &'static str {
        "get_test_summary"
    }

    fn description(&self) -> &'static str {
        "Get the test execution summary for a program: execution rate, pass rate, \
         and breakdowns by status and test type."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![("program_prefix", PropertySchema::string("Program prefix (e.g. PROP)"))],
            &["program_prefix"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::REQUIREMENTS
    }

    fn error_label(&self) -> &'static str {
        "Error getting test summary"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let prefix = ToolArgs::new(self.name(), &args).required_str("program_prefix")?;
        let program = match program_or_message(ctx, prefix).await? {
            Ok(program) => program,
            Err(message) => return Ok(ToolResult::text(message)),
        };
        let summary = ctx
            .requirements()
            .get_test_execution_summary(&program.program_id)
            .await?;
        Ok(ToolResult::text(format_summary(&program.name, &summary)))
    }
}

/// Create all test case tools for registration
#[must_use]
pub fn create_test_case_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(ListTestCasesTool), Box::new(GetTestSummaryTool)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirements::TestTypeBreakdown;

    #[test]
    fn test_summary_shows_one_decimal_rates() {
        let summary = TestExecutionSummary {
            total: 5,
            executed: 3,
            passed: 2,
            execution_rate: 60.0,
            pass_rate: 66.7,
            by_status: vec![("Not Run".to_owned(), 1), ("Pass".to_owned(), 2)],
            by_type: vec![TestTypeBreakdown {
                test_type: "negative".to_owned(),
                total: 1,
                passed: 0,
                failed: 1,
            }],
        };
        let text = format_summary("Portal", &summary);
        assert!(text.contains("Execution Rate: 60.0%\n"));
        assert!(text.contains("Pass Rate: 66.7%\n"));
        assert!(text.contains("  negative: 1 total, 1 failed\n"));
    }
}
