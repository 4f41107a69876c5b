// ABOUTME: Integration tests for the requirements toolkit over seeded databases
// ABOUTME: Covers clients, programs, stories, test cases, health scoring and coverage gaps
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use propel_health_mcp::models::requirements::{Requirement, TestCase, UserStory};
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_clients_defaults_to_active() {
    let server = common::seeded_server().await;

    let active = server.call_tool("list_clients", json!({})).await;
    assert!(active.starts_with("Found 2 client(s):"), "{active}");
    assert!(active.contains("• Mercy Health Partners\n"));
    assert!(active.contains("  Contact: Dana Lee (dana.lee@propelhealth.example)\n"));
    assert!(!active.contains("Legacy Care Group"));

    let all = server
        .call_tool("list_clients", json!({ "status": "all" }))
        .await;
    assert!(all.starts_with("Found 3 client(s):"));

    let explicit_null = server
        .call_tool("list_clients", json!({ "status": Value::Null }))
        .await;
    assert!(explicit_null.contains("Legacy Care Group"));

    let inactive = server
        .call_tool("list_clients", json!({ "status": "Inactive" }))
        .await;
    assert!(inactive.starts_with("Found 1 client(s):"));
}

#[tokio::test]
async fn test_get_client_programs_counts() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_client_programs", json!({ "client_name": "Propel Health" }))
        .await;
    assert!(text.starts_with("Programs for Propel Health:"));
    assert!(text.contains("[PROP] Propel Patient Portal\n"));
    assert!(text.contains("  Stories: 6 | Tests: 5 | Requirements: 4\n"));
    assert!(text.contains("  Approved stories: 2\n"));

    let missing = server
        .call_tool("get_client_programs", json!({ "client_name": "Nobody" }))
        .await;
    assert_eq!(missing, "Client not found: Nobody");

    let empty = server
        .call_tool("get_client_programs", json!({ "client_name": "Legacy Care Group" }))
        .await;
    assert_eq!(empty, "No programs found for Legacy Care Group.");
}

#[tokio::test]
async fn test_get_program_by_prefix_details() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_program_by_prefix", json!({ "prefix": "prop" }))
        .await;
    assert!(text.starts_with("Program: Propel Patient Portal [PROP]\n"), "{text}");
    assert!(text.contains("Source: PROP_requirements.docx\n"));
    assert!(text.contains("  Requirements: 4\n"));
    assert!(text.contains("Stories by Status:"));

    let missing = server
        .call_tool("get_program_by_prefix", json!({ "prefix": "ZZZ" }))
        .await;
    assert_eq!(missing, "Program not found with prefix: ZZZ");
}

#[tokio::test]
async fn test_list_stories_filters() {
    let server = common::seeded_server().await;

    let all = server
        .call_tool("list_stories", json!({ "program_prefix": "PROP" }))
        .await;
    assert!(all.contains("Found 6 story(ies)"), "{all}");

    let approved = server
        .call_tool(
            "list_stories",
            json!({ "program_prefix": "PROP", "status": "Approved" }),
        )
        .await;
    assert!(approved.contains("Found 2 story(ies)"));
    assert!(approved.contains("[PROP-AUTH-001]"));
    assert!(!approved.contains("PROP-SCHED"));

    let none = server
        .call_tool(
            "list_stories",
            json!({ "program_prefix": "PROP", "status": "Approved", "category": "LAB" }),
        )
        .await;
    assert_eq!(
        none,
        "No stories found for PROP (filters: status=Approved, category=LAB)."
    );
}

#[tokio::test]
async fn test_get_story_numbers_criteria() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_story", json!({ "story_id": "PROP-AUTH-001" }))
        .await;
    assert!(text.starts_with("Story: PROP-AUTH-001\n"));
    assert!(text.contains("Status: Approved | Version: 2\n"));
    assert!(text.contains("  1. Feature is reachable from the portal home page\n"));
    assert!(text.contains("  3. Action is recorded in the audit log\n"));
    assert!(!text.contains("  2. "));
    assert!(text.contains("by Dana Lee"));

    let missing = server
        .call_tool("get_story", json!({ "story_id": "PROP-NOPE-001" }))
        .await;
    assert_eq!(missing, "Story not found: PROP-NOPE-001");
}

#[tokio::test]
async fn test_approval_pipeline_lists_every_status() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_approval_pipeline", json!({ "program_prefix": "PROP" }))
        .await;
    assert!(text.starts_with("Approval Pipeline for Propel Patient Portal:"));
    assert!(text.contains("Approved (2):"));
    assert!(text.contains("Draft (1):"));
    assert!(text.contains("Needs Discussion (0):\n  (none)\n"));
}

#[tokio::test]
async fn test_test_cases_and_summary() {
    let server = common::seeded_server().await;

    let listed = server
        .call_tool(
            "list_test_cases",
            json!({ "program_prefix": "PROP", "status": "Pass" }),
        )
        .await;
    assert!(listed.contains("Found 2 test(s)"), "{listed}");
    assert!(listed.contains("Status: Pass | Type: happy_path"));

    let summary = server
        .call_tool("get_test_summary", json!({ "program_prefix": "PROP" }))
        .await;
    assert!(summary.contains("Total Tests: 5\n"), "{summary}");
    assert!(summary.contains("Execution Rate: 60.0%\n"));
    assert!(summary.contains("Pass Rate: 66.7%\n"));
    assert!(summary.contains("  negative: 1 total, 1 failed\n"));

    let empty = server
        .call_tool("list_test_cases", json!({ "program_prefix": "P4M" }))
        .await;
    assert_eq!(empty, "No test cases found for P4M.");
}

#[tokio::test]
async fn test_program_health_grade() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_program_health", json!({ "program_prefix": "PROP" }))
        .await;
    assert!(text.starts_with("Program Health: Propel Patient Portal\n"));
    assert!(text.contains("Overall Score: 52/100 (Grade: F)"), "{text}");
    assert!(text.contains("Component Scores:"));
    assert!(text.contains("Recommendations:"));
}

#[tokio::test]
async fn test_client_tree_orders_programs_by_name() {
    let server = common::seeded_server().await;
    let text = server.call_tool("get_client_tree", json!({})).await;
    assert!(text.contains("📁 Propel Health\n"));
    assert!(text.contains("   ├── [P4M] Prevention4ME\n"));
    assert!(text.contains("   └── [PROP] Propel Patient Portal\n"));
    assert!(text.contains("📁 Legacy Care Group\n   (no programs)\n"));
}

#[tokio::test]
async fn test_search_stories_across_programs() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("search_stories", json!({ "keyword": "appointment" }))
        .await;
    assert!(text.starts_with("Search Results for 'appointment':"));
    assert!(text.contains("[PROP-SCHED-001]"));
    assert!(text.contains("[PROP-SCHED-002]"));
    assert!(text.contains("Client: Propel Health"));

    let none = server
        .call_tool("search_stories", json!({ "keyword": "zebra" }))
        .await;
    assert_eq!(none, "No stories found matching: zebra");
}

#[tokio::test]
async fn test_coverage_gaps() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool("get_coverage_gaps", json!({ "program_prefix": "PROP" }))
        .await;
    assert!(text.contains("Requirements without Stories (1):"), "{text}");
    assert!(text.contains("  • [PROP-REQ-004] Patients can export their records as PDF for shari\n"));
    assert!(text.contains("Approved Stories without Tests (1):"));
    assert!(text.contains("  • [PROP-AUTH-002] Password reset via email link\n"));
}

#[tokio::test]
async fn test_unknown_prefix_is_plain_text() {
    let server = common::seeded_server().await;
    for tool in ["list_stories", "get_test_summary", "get_program_health", "get_coverage_gaps"] {
        let (text, is_error) = server
            .call_tool_raw(tool, json!({ "program_prefix": "ZZZ" }))
            .await;
        assert!(!is_error, "{tool}");
        assert_eq!(text, "Program not found: ZZZ", "{tool}");
    }
}

/// Fill the empty GRX program past every display limit: 55 approved stories
/// without tests, 12 requirements without stories and 35 test cases
async fn fill_genomics_program(server: &common::TestServer) {
    let db = &server.resources.requirements;
    let program_id = db
        .get_program_by_prefix("GRX")
        .await
        .unwrap()
        .unwrap()
        .program_id;

    for n in 1..=55 {
        db.create_story(&UserStory {
            story_id: format!("GRX-BULK-{n:03}"),
            program_id: program_id.clone(),
            requirement_id: None,
            title: Some(format!("Variant report {n}")),
            user_story: None,
            acceptance_criteria: None,
            success_metrics: None,
            priority: Some("Medium".to_owned()),
            category: Some("BULK".to_owned()),
            category_full: None,
            status: "Approved".to_owned(),
            version: 1,
            approved_date: None,
            approved_by: None,
            created_date: None,
            updated_date: None,
        })
        .await
        .unwrap();
    }
    for n in 1..=12 {
        db.create_requirement(&Requirement {
            requirement_id: format!("GRX-REQ-{n:03}"),
            program_id: program_id.clone(),
            title: Some(format!("Genomics requirement {n}")),
            description: None,
            priority: None,
            source: None,
        })
        .await
        .unwrap();
    }
    for n in 1..=35 {
        db.create_test_case(&TestCase {
            test_id: format!("GRX-TC-{n:03}"),
            program_id: program_id.clone(),
            story_id: None,
            title: Some(format!("Report check {n}")),
            test_type: Some("validation".to_owned()),
            test_status: "Not Run".to_owned(),
            test_steps: None,
            expected_results: None,
            tested_by: None,
            tested_date: None,
        })
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_list_stories_caps_output_at_fifty() {
    let server = common::seeded_server().await;
    fill_genomics_program(&server).await;

    let text = server
        .call_tool("list_stories", json!({ "program_prefix": "GRX" }))
        .await;
    assert!(text.contains("Found 55 story(ies)\n"), "{text}");
    assert_eq!(text.lines().filter(|l| l.starts_with("[GRX-BULK-")).count(), 50);
    assert!(text.contains("[GRX-BULK-050] Variant report 50\n"));
    assert!(!text.contains("GRX-BULK-051"));
    assert!(text.ends_with("\n... and 5 more stories\n"));
}

#[tokio::test]
async fn test_list_test_cases_caps_output_at_thirty() {
    let server = common::seeded_server().await;
    fill_genomics_program(&server).await;

    let text = server
        .call_tool("list_test_cases", json!({ "program_prefix": "GRX" }))
        .await;
    assert!(text.contains("Found 35 test(s)\n"), "{text}");
    assert_eq!(text.lines().filter(|l| l.starts_with("[GRX-TC-")).count(), 30);
    assert!(!text.contains("GRX-TC-031"));
    assert!(text.ends_with("\n... and 5 more tests\n"));
}

#[tokio::test]
async fn test_coverage_gaps_cap_each_list_at_ten() {
    let server = common::seeded_server().await;
    fill_genomics_program(&server).await;

    let text = server
        .call_tool("get_coverage_gaps", json!({ "program_prefix": "GRX" }))
        .await;
    assert!(text.contains("Requirements without Stories (12):\n"), "{text}");
    assert!(text.contains("Approved Stories without Tests (55):\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("  • [GRX-REQ-")).count(), 10);
    assert_eq!(text.lines().filter(|l| l.starts_with("  • [GRX-BULK-")).count(), 10);
    assert!(text.contains("  • [GRX-REQ-010] Genomics requirement 10\n  ... and 2 more\n"));
    assert!(text.ends_with("  ... and 45 more\n"));
}
