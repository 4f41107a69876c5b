// ABOUTME: Integration tests for the configurations toolkit over seeded databases
// ABOUTME: Covers users, access, reviews, training, compliance reports and config inheritance
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use propel_health_mcp::models::access::{NewAccessGrant, NewUser};
use serde_json::json;

#[tokio::test]
async fn test_list_users_scoped_to_clinic_groups_grants() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("list_users", json!({ "clinic": "Franz" }))
        .await;

    assert!(text.starts_with("Found 2 user(s) [clinic=Franz]:"), "{text}");
    assert!(text.contains("• Brian Ortiz (brian.ortiz@franzclinic.example)"));
    assert!(text.contains("  Roles: Clinic Manager, Coordinator\n"));
    assert!(text.contains("  Clinics: Franz Clinic\n"));
    assert!(!text.contains("Locations:"));
    assert!(!text.contains("Frank Moore"), "revoked grants are not listed");
}

#[tokio::test]
async fn test_list_users_plain_includes_access_counts() {
    let server = common::seeded_server().await;
    let text = server.call_tool("list_users", json!({})).await;

    assert!(text.starts_with("Found 6 user(s):"), "{text}");
    assert!(text.contains("• Alice Nguyen (alice.nguyen@propelhealth.example)"));
    assert!(text.contains("Access grants: 2"));
}

#[tokio::test]
async fn test_list_users_unknown_program_is_plain_text() {
    let server = common::seeded_server().await;
    let (text, is_error) = server
        .call_tool_raw("list_users", json!({ "program": "NOPE" }))
        .await;
    assert!(!is_error);
    assert_eq!(text, "Program not found: NOPE");
}

#[tokio::test]
async fn test_get_user_shows_grants_and_training() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_user", json!({ "email": "derek.shaw@labvendor.example" }))
        .await;

    assert!(text.contains("User: Derek Shaw\n"));
    assert!(text.contains("Status: Active\n"));
    assert!(text.contains("Access Grants (1):"));
    assert!(text.contains("Training Records (2):"));

    let missing = server
        .call_tool("get_user", json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(missing, "User not found: nobody@example.com");
}

#[tokio::test]
async fn test_add_user_rejects_duplicate_email() {
    let server = common::seeded_server().await;
    let created = server
        .call_tool(
            "add_user",
            json!({
                "name": "Grace Kim",
                "email": "grace.kim@partner.example",
                "organization": "Partner Labs",
                "is_business_associate": true,
            }),
        )
        .await;
    assert!(created.starts_with("User created successfully!\n"));
    assert!(created.contains("  Organization: Partner Labs\n"));
    assert!(created.contains("Business Associate: Yes (HIPAA BAA required)"));

    let duplicate = server
        .call_tool(
            "add_user",
            json!({ "name": "Grace Kim", "email": "grace.kim@partner.example" }),
        )
        .await;
    assert_eq!(
        duplicate,
        "User already exists with email: grace.kim@partner.example"
    );

    let fetched = server
        .call_tool("get_user", json!({ "email": "grace.kim@partner.example" }))
        .await;
    assert!(fetched.contains("Business Associate: Yes"));
}

#[tokio::test]
async fn test_add_user_requires_name() {
    let server = common::seeded_server().await;
    let (text, is_error) = server
        .call_tool_raw("add_user", json!({ "email": "x@example.com" }))
        .await;
    assert!(is_error);
    assert!(text.starts_with("Error creating user:"), "{text}");
    assert!(text.contains("name"));
}

#[tokio::test]
async fn test_list_access_for_user() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "list_access",
            json!({ "user_email": "brian.ortiz@franzclinic.example" }),
        )
        .await;
    assert!(text.starts_with("Found 2 access grant(s):"), "{text}");
    assert!(text.contains("User: Brian Ortiz (brian.ortiz@franzclinic.example)"));
}

#[tokio::test]
async fn test_get_reviews_due_orders_overdue_first() {
    let server = common::seeded_server().await;
    let text = server.call_tool("get_reviews_due", json!({})).await;

    assert!(text.starts_with("Access Reviews Due: 3 total\n"), "{text}");
    assert!(text.contains("OVERDUE (2):"));
    assert!(text.contains("Due Soon (1):"));
    assert!(text.contains("Days overdue: 35"));

    let alice = text.find("Alice Nguyen").unwrap();
    let carla = text.find("Carla Diaz").unwrap();
    let brian = text.find("Brian Ortiz").unwrap();
    assert!(alice < carla && carla < brian);
}

#[tokio::test]
async fn test_training_status_sections() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "get_training_status",
            json!({ "user_email": "carla.diaz@mercyhealth.example" }),
        )
        .await;
    assert!(text.starts_with("Training Status for Carla Diaz:"));
    assert!(text.contains("Pending (1):"));
    assert!(!text.contains("Current ("));
}

#[tokio::test]
async fn test_expired_training_lists_oldest_first() {
    let server = common::seeded_server().await;
    let text = server.call_tool("get_expired_training", json!({})).await;

    assert!(text.starts_with("Expired Training: 2 record(s)"), "{text}");
    let derek = text.find("Derek Shaw").unwrap();
    let brian = text.find("Brian Ortiz").unwrap();
    assert!(derek < brian);
}

#[tokio::test]
async fn test_compliance_reports() {
    let server = common::seeded_server().await;

    let review = server
        .call_tool("get_compliance_report", json!({ "report_type": "review_status" }))
        .await;
    assert!(review.contains("Current: 4\n"));
    assert!(review.contains("Due Soon: 1\n"));
    assert!(review.contains("Overdue: 2\n"));
    assert!(review.contains("Action Required: 2 overdue reviews"));

    let training = server
        .call_tool(
            "get_compliance_report",
            json!({ "report_type": "training_compliance" }),
        )
        .await;
    assert!(training.contains("Total Users: 4\n"));
    assert!(training.contains("Fully Compliant: 1\n"));
    assert!(training.contains("Missing Training: 1\n"));
    assert!(training.contains("Expired Training: 2\n"));

    let terminated = server
        .call_tool(
            "get_compliance_report",
            json!({ "report_type": "terminated_audit" }),
        )
        .await;
    assert!(terminated.contains("VIOLATIONS FOUND: 1"));
    assert!(terminated.contains("• Erin Walsh - still has 1 active grant(s)"));

    let associates = server
        .call_tool(
            "get_compliance_report",
            json!({ "report_type": "business_associates" }),
        )
        .await;
    assert!(associates.contains("Total Business Associates: 2\n"));
    assert!(associates.contains("Active: 1\n"));
}

#[tokio::test]
async fn test_unknown_report_type_names_valid_types() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_compliance_report", json!({ "report_type": "bogus" }))
        .await;
    assert!(text.starts_with("Invalid report type. Choose from: access_list"));
    assert!(text.contains("business_associates"));
}

#[tokio::test]
async fn test_list_programs_hierarchy() {
    let server = common::seeded_server().await;
    let text = server.call_tool("list_programs", json!({})).await;
    assert!(text.starts_with("Programs:\n=========\n\n"));
    assert!(text.contains("[P4M] Prevention4ME\n"));
    assert!(text.contains("   +-- Franz Clinic [FRANZ]\n"));
    assert!(text.contains("       +-- Richland [RICH]\n"));
}

#[tokio::test]
async fn test_get_config_most_specific_level_wins() {
    let server = common::seeded_server().await;

    let location = server
        .call_tool(
            "get_config",
            json!({
                "config_key": "appointment_reminder_days",
                "program": "P4M",
                "clinic": "FRANZ",
                "location": "Richland",
            }),
        )
        .await;
    assert!(location.contains("Effective Value: 7\n"), "{location}");
    assert!(location.contains("Set At: location\n"));
    assert!(location.contains("Is Override: Yes\n"));

    let program = server
        .call_tool(
            "get_config",
            json!({ "config_key": "appointment_reminder_days", "program": "P4M" }),
        )
        .await;
    assert!(program.contains("Effective Value: 3\n"), "{program}");
    assert!(program.contains("Set At: program\n"));

    let untouched = server
        .call_tool(
            "get_config",
            json!({ "config_key": "portal_theme", "program": "PROP" }),
        )
        .await;
    assert!(untouched.contains("Effective Value: standard\n"), "{untouched}");
    assert!(untouched.contains("Is Override: No\n"));
}

#[tokio::test]
async fn test_get_config_location_needs_clinic() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "get_config",
            json!({
                "config_key": "appointment_reminder_days",
                "program": "P4M",
                "location": "Richland",
            }),
        )
        .await;
    assert_eq!(text, "Location requires clinic to be specified");
}

#[tokio::test]
async fn test_access_list_report_caps_grants_at_fifty() {
    let server = common::empty_server().await;
    let db = &server.resources.configurations;
    let program_id = db
        .create_program("Prevention4ME", "P4M", None)
        .await
        .unwrap();

    for n in 1..=60 {
        let user_id = db
            .create_user(
                &NewUser {
                    name: format!("Staff {n:02}"),
                    email: format!("staff{n:02}@franzclinic.example"),
                    organization: "Franz Clinic".to_owned(),
                    is_business_associate: false,
                },
                common::today(),
            )
            .await
            .unwrap();
        db.grant_access(&NewAccessGrant {
            user_id: &user_id,
            program_id: &program_id,
            clinic_id: None,
            location_id: None,
            role: "Coordinator",
            granted_date: common::today(),
            granted_by: Some("Dana Lee"),
        })
        .await
        .unwrap();
    }

    let text = server
        .call_tool("get_compliance_report", json!({ "report_type": "access_list" }))
        .await;
    assert!(text.contains("Total Users: 60\n"), "{text}");
    assert!(text.contains("Total Access Grants: 60\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("  - ")).count(), 50);
    assert!(text.contains("• Staff 50 (staff50@franzclinic.example)\n"));
    assert!(!text.contains("Staff 51"));
    assert!(text.ends_with("\n... and 10 more access grants\n"));
}

#[tokio::test]
async fn test_out_of_range_review_window_is_a_tool_error() {
    let server = common::seeded_server_with(|config| config.review_window_days = 200_000_000).await;

    let (text, is_error) = server.call_tool_raw("get_reviews_due", json!({})).await;
    assert!(is_error);
    assert!(text.contains("Review window of 200000000 days is out of range"), "{text}");

    let (_, is_error) = server
        .call_tool_raw("get_compliance_report", json!({ "report_type": "review_status" }))
        .await;
    assert!(is_error);

    let still_serving = server.call_tool("list_programs", json!({})).await;
    assert!(still_serving.starts_with("Programs:"));
}
