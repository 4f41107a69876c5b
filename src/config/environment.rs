// ABOUTME: Environment configuration management for the stdio server
// ABOUTME: Resolves database paths, export directory and compliance settings from env and CLI
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management

use crate::constants::{defaults, env_config};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Configurations toolkit database (users, access, training, hierarchy)
    pub configurations_db_path: PathBuf,
    /// Requirements toolkit database (clients, programs, stories, tests)
    pub requirements_db_path: PathBuf,
    /// Default directory for annual access review exports
    pub export_dir: PathBuf,
    /// Days ahead that an access review counts as due soon
    pub review_window_days: i64,
    /// Training types every active user must hold
    pub required_training: Vec<String>,
    /// Hide and refuse write tools
    pub read_only: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            configurations_db_path: expand_home(defaults::CONFIGURATIONS_DB),
            requirements_db_path: expand_home(defaults::REQUIREMENTS_DB),
            export_dir: default_export_dir(),
            review_window_days: defaults::REVIEW_WINDOW_DAYS,
            required_training: parse_list(defaults::REQUIRED_TRAINING),
            read_only: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let fallback = Self::default();
        let config = Self {
            configurations_db_path: env::var(env_config::PROPEL_DB_PATH)
                .map_or(fallback.configurations_db_path, |p| expand_home(&p)),
            requirements_db_path: env::var(env_config::REQUIREMENTS_DB_PATH)
                .map_or(fallback.requirements_db_path, |p| expand_home(&p)),
            export_dir: env::var(env_config::PROPEL_EXPORT_DIR)
                .map_or(fallback.export_dir, |p| expand_home(&p)),
            review_window_days: env_var_or(
                env_config::PROPEL_REVIEW_WINDOW_DAYS,
                &defaults::REVIEW_WINDOW_DAYS.to_string(),
            )
            .parse()
            .context("Invalid PROPEL_REVIEW_WINDOW_DAYS value")?,
            required_training: parse_list(&env_var_or(
                env_config::PROPEL_REQUIRED_TRAINING,
                defaults::REQUIRED_TRAINING,
            )),
            read_only: parse_flag(&env_var_or(env_config::PROPEL_READ_ONLY, "false"))
                .context("Invalid PROPEL_READ_ONLY value")?,
        };

        config.validate()?;
        debug!("{}", config.summary());
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for a review window outside `0..=3650` days or an
    /// empty training list
    pub fn validate(&self) -> Result<()> {
        if !(0..=defaults::MAX_REVIEW_WINDOW_DAYS).contains(&self.review_window_days) {
            return Err(anyhow::anyhow!(
                "PROPEL_REVIEW_WINDOW_DAYS must be between 0 and {}",
                defaults::MAX_REVIEW_WINDOW_DAYS
            ));
        }
        if self.required_training.is_empty() {
            return Err(anyhow::anyhow!(
                "PROPEL_REQUIRED_TRAINING must name at least one training type"
            ));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Propel Health MCP Server Configuration:\n\
             - Configurations DB: {}\n\
             - Requirements DB: {}\n\
             - Export Directory: {}\n\
             - Review Window: {} days\n\
             - Required Training: {}\n\
             - Read Only: {}",
            self.configurations_db_path.display(),
            self.requirements_db_path.display(),
            self.export_dir.display(),
            self.review_window_days,
            self.required_training.join(", "),
            self.read_only,
        )
    }
}

/// Expand a leading `~` to the user's home directory
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches(['/', '\\'])),
        _ => PathBuf::from(path),
    }
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a comma-separated list
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("expected true or false, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" HIPAA, Cybersecurity ,,"),
            vec!["HIPAA".to_owned(), "Cybersecurity".to_owned()]
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_expand_home() {
        let absolute = expand_home("/var/data/config.db");
        assert_eq!(absolute, PathBuf::from("/var/data/config.db"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/data/x.db"), home.join("data/x.db"));
        }
    }

    #[test]
    fn test_validate_rejects_empty_training() {
        let config = ServerConfig {
            required_training: Vec::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_review_window() {
        let too_large = ServerConfig {
            review_window_days: 200_000_000,
            ..ServerConfig::default()
        };
        assert!(too_large.validate().is_err());

        let ten_years = ServerConfig {
            review_window_days: defaults::MAX_REVIEW_WINDOW_DAYS,
            ..ServerConfig::default()
        };
        assert!(ten_years.validate().is_ok());
    }
}
