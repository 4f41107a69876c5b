// ABOUTME: Tests for the annual access review export tool
// ABOUTME: Checks file naming, CSV content, scope validation and the xlsx feature gate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use serde_json::json;

#[tokio::test]
async fn test_export_clinic_review_to_csv() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "export_annual_review",
            json!({ "program": "P4M", "clinic": "Franz" }),
        )
        .await;

    let expected = server
        .export_dir
        .join("Franz_Clinic_access_review_2026-03-02.csv");
    assert!(text.contains(&format!("File: {}\n", expected.display())), "{text}");
    assert!(text.contains("Format: CSV\n"));
    assert!(text.contains("  Clinic: Franz Clinic\n"));
    assert!(text.contains("  Total Users: 3\n"));
    assert!(text.contains("    • Clinic Manager: 1\n"));
    assert!(text.contains("    • Coordinator: 2\n"));

    let mut reader = csv::Reader::from_path(&expected).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "Review Action"));
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows
        .iter()
        .any(|row| row.iter().any(|field| field == "Erin Walsh")));
}

#[tokio::test]
async fn test_export_to_custom_directory() {
    let server = common::seeded_server().await;
    let target = tempfile::TempDir::new().unwrap();
    let nested = target.path().join("reviews/2026");

    let text = server
        .call_tool(
            "export_annual_review",
            json!({ "program": "PROP", "output_dir": nested.to_str().unwrap() }),
        )
        .await;
    assert!(text.contains("  Program: Propel Analytics\n"), "{text}");
    assert!(nested
        .join("Propel_Analytics_access_review_2026-03-02.csv")
        .exists());
}

#[tokio::test]
async fn test_export_requires_scope() {
    let server = common::seeded_server().await;
    let text = server.call_tool("export_annual_review", json!({})).await;
    assert_eq!(text, "Please specify at least a program or clinic filter.");
    assert!(!server.export_dir.exists());
}

#[tokio::test]
async fn test_export_location_without_clinic() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "export_annual_review",
            json!({ "program": "P4M", "location": "Richland" }),
        )
        .await;
    assert_eq!(text, "Location filter requires a clinic to be specified.");
}

#[cfg(not(feature = "xlsx"))]
#[tokio::test]
async fn test_xlsx_needs_feature() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "export_annual_review",
            json!({ "program": "P4M", "output_format": "xlsx" }),
        )
        .await;
    assert!(text.starts_with("Excel export requires a build with the xlsx feature"));
    assert!(!server.export_dir.exists());
}

#[cfg(feature = "xlsx")]
#[tokio::test]
async fn test_xlsx_export_writes_workbook() {
    let server = common::seeded_server().await;
    let text = server
        .call_tool(
            "export_annual_review",
            json!({ "program": "P4M", "output_format": "xlsx" }),
        )
        .await;
    assert!(text.contains("Format: XLSX\n"), "{text}");
    assert!(server
        .export_dir
        .join("Prevention4ME_access_review_2026-03-02.xlsx")
        .exists());
}
