// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Runs serially since each test mutates process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use propel_health_mcp::config::ServerConfig;
use propel_health_mcp::constants::env_config;
use serial_test::serial;

const ALL_VARS: [&str; 6] = [
    env_config::PROPEL_DB_PATH,
    env_config::REQUIREMENTS_DB_PATH,
    env_config::PROPEL_EXPORT_DIR,
    env_config::PROPEL_REVIEW_WINDOW_DAYS,
    env_config::PROPEL_REQUIRED_TRAINING,
    env_config::PROPEL_READ_ONLY,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.review_window_days, 30);
    assert_eq!(
        config.required_training,
        vec!["HIPAA".to_owned(), "Cybersecurity".to_owned()]
    );
    assert!(!config.read_only);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_config::PROPEL_DB_PATH, "/srv/propel/configurations.db");
    env::set_var(env_config::REQUIREMENTS_DB_PATH, "/srv/propel/requirements.db");
    env::set_var(env_config::PROPEL_EXPORT_DIR, "/srv/propel/exports");
    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "45");
    env::set_var(env_config::PROPEL_REQUIRED_TRAINING, "HIPAA, Privacy");
    env::set_var(env_config::PROPEL_READ_ONLY, "yes");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(
        config.configurations_db_path,
        PathBuf::from("/srv/propel/configurations.db")
    );
    assert_eq!(
        config.requirements_db_path,
        PathBuf::from("/srv/propel/requirements.db")
    );
    assert_eq!(config.export_dir, PathBuf::from("/srv/propel/exports"));
    assert_eq!(config.review_window_days, 45);
    assert_eq!(
        config.required_training,
        vec!["HIPAA".to_owned(), "Privacy".to_owned()]
    );
    assert!(config.read_only);
    assert!(config.summary().contains("Review Window: 45 days"));
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "soon");
    assert!(ServerConfig::from_env().is_err());

    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "-1");
    assert!(ServerConfig::from_env().is_err());

    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "200000000");
    assert!(ServerConfig::from_env().is_err());

    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "3650");
    assert_eq!(ServerConfig::from_env().unwrap().review_window_days, 3650);

    env::set_var(env_config::PROPEL_REVIEW_WINDOW_DAYS, "30");
    env::set_var(env_config::PROPEL_READ_ONLY, "sometimes");
    assert!(ServerConfig::from_env().is_err());

    env::set_var(env_config::PROPEL_READ_ONLY, "false");
    env::set_var(env_config::PROPEL_REQUIRED_TRAINING, " , ");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}
