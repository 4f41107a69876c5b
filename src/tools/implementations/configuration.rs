// ABOUTME: Configuration tools for the configurations toolkit.
// ABOUTME: Implements list_programs and get_config with inheritance details.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Configuration Tools
//!
//! Configuration values are inherited down the hierarchy
//! default → program → clinic → location; the most specific level with a
//! value wins.

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::models::access::{ConfigResolution, ProgramNode};
use crate::tools::args::ToolArgs;
use crate::tools::context::ToolExecutionContext;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn push_code(out: &mut String, code: Option<&str>) {
    if let Some(code) = code.filter(|c| !c.is_empty()) {
        let _ = write!(out, " [{code}]");
    }
}

fn format_programs(programs: &[ProgramNode]) -> String {
    let mut out = String::from("Programs:\n=========\n\n");
    for program in programs {
        let _ = writeln!(out, "[{}] {}", program.prefix, program.name);
        let _ = writeln!(
            out,
            "   Type: {} | Status: {}",
            program.program_type.as_deref().unwrap_or("N/A"),
            program.status
        );
        for clinic in &program.clinics {
            let _ = write!(out, "   +-- {}", clinic.name);
            push_code(&mut out, clinic.code.as_deref());
            out.push('\n');
            for location in &clinic.locations {
                let _ = write!(out, "       +-- {}", location.name);
                push_code(&mut out, location.code.as_deref());
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

fn format_resolution(resolution: &ConfigResolution) -> String {
    let mut out = format!("Configuration: {}\n", resolution.config_key);
    let _ = writeln!(out, "{}\n", "=".repeat(40));
    let _ = writeln!(out, "Effective Value: {}", resolution.value);
    let _ = writeln!(out, "Set At: {}", resolution.effective_level);
    let _ = writeln!(
        out,
        "Is Override: {}",
        if resolution.is_override { "Yes" } else { "No" }
    );

    if !resolution.chain.is_empty() {
        out.push_str("\nInheritance Chain:\n");
        for level in &resolution.chain {
            let marker = if level.is_effective { ">" } else { " " };
            let overridden = if level.is_override { "*" } else { "" };
            let _ = writeln!(
                out,
                "  {marker} {}: {}{overridden}",
                level.level,
                level.value.as_deref().unwrap_or("(inherited)")
            );
        }
    }
    out
}

/// Program, clinic and location hierarchy
pub struct ListProgramsTool;

#[async_trait]
impl McpTool for ListProgramsTool {
    fn name(&self) -> &'static str {
        "list_programs"
    }

    fn description(&self) -> &'static str {
        "List all programs with their clinic and location hierarchy."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error listing programs"
    }

    async fn execute(&self, _args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let programs = ctx.configurations().list_programs().await?;
        if programs.is_empty() {
            return Ok(ToolResult::text("No programs found in the database."));
        }
        Ok(ToolResult::text(format_programs(&programs)))
    }
}

/// Effective configuration value with its inheritance chain
pub struct GetConfigTool;

#[async_trait]
impl McpTool for GetConfigTool {
    fn name(&self) -> &'static str {
        "get_config"
    }

    fn description(&self) -> &'static str {
        "Get a configuration value with inheritance information: effective value, \
         the level it is set at, whether it overrides an inherited value, and the \
         full default → program → clinic → location chain."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "config_key",
                    PropertySchema::string("Configuration key (e.g. helpdesk_phone, hours_open)"),
                ),
                ("program", PropertySchema::string("Program prefix (e.g. P4M)")),
                ("clinic", PropertySchema::string("Clinic name or code")),
                ("location", PropertySchema::string("Location name or code (requires clinic)")),
            ],
            &["config_key", "program"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::CONFIGURATIONS
    }

    fn error_label(&self) -> &'static str {
        "Error getting config"
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::new(self.name(), &args);
        let config_key = args.required_str("config_key")?;
        let program = args.required_str("program")?;
        let clinic = args.optional_str("clinic")?;
        let location = args.optional_str("location")?;
        let db = ctx.configurations();

        let Some(program_id) = db.get_program_id(program).await? else {
            return Ok(ToolResult::text(format!("Program not found: {program}")));
        };

        let clinic_id = match clinic {
            Some(clinic) => match db.get_clinic_id(&program_id, clinic).await? {
                Some(id) => Some(id),
                None => return Ok(ToolResult::text(format!("Clinic not found: {clinic}"))),
            },
            None => None,
        };

        let location_id = match (location, clinic_id.as_deref()) {
            (Some(_), None) => {
                return Ok(ToolResult::text("Location requires clinic to be specified"))
            }
            (Some(location), Some(clinic_id)) => {
                match db.get_location_id(clinic_id, location).await? {
                    Some(id) => Some(id),
                    None => {
                        return Ok(ToolResult::text(format!("Location not found: {location}")))
                    }
                }
            }
            (None, _) => None,
        };

        let resolution = db
            .resolve_with_inheritance(
                config_key,
                &program_id,
                clinic_id.as_deref(),
                location_id.as_deref(),
            )
            .await?;

        Ok(ToolResult::text(resolution.map_or_else(
            || format!("Configuration not found: {config_key}"),
            |resolution| format_resolution(&resolution),
        )))
    }
}

/// Create all configuration tools for registration
#[must_use]
pub fn create_configuration_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(ListProgramsTool), Box::new(GetConfigTool)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::access::ConfigLevel;

    #[test]
    fn test_format_resolution_marks_effective_override() {
        let resolution = ConfigResolution::from_levels(
            "appointment_reminder_days",
            vec![
                (ConfigLevel::Default, Some("2".to_owned())),
                (ConfigLevel::Program, Some("3".to_owned())),
                (ConfigLevel::Clinic, None),
            ],
        )
        .unwrap();

        let text = format_resolution(&resolution);
        assert!(text.contains("Effective Value: 3\n"));
        assert!(text.contains("Set At: program\n"));
        assert!(text.contains("Is Override: Yes\n"));
        assert!(text.contains("  > program: 3*\n"));
        assert!(text.contains("    clinic: (inherited)\n"));
    }
}
