// ABOUTME: Annual access review export rows, file naming and format dispatch
// ABOUTME: CSV is always available, XLSX when the crate is built with the xlsx feature
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Annual Access Review Export
//!
//! Produces the spreadsheet a clinic manager fills in during the yearly
//! HIPAA access review. The last two columns are left blank for the
//! reviewer.

mod csv;
#[cfg(feature = "xlsx")]
mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::database::format_date;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::access::AccessGrant;

/// Column headers, in file order
pub const REVIEW_COLUMNS: [&str; 12] = [
    "Name",
    "Email",
    "Status",
    "Role",
    "Program",
    "Clinic",
    "Location",
    "Access Granted",
    "Last Review Date",
    "Next Review Due",
    "Review Action",
    "Notes",
];

/// Spreadsheet format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// Parse the tool parameter (case-insensitive); anything but `xlsx` is CSV
    #[must_use]
    pub fn from_str_param(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Self::Xlsx,
            _ => Self::Csv,
        }
    }

    /// File extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Whether this build can write the format
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Csv => true,
            Self::Xlsx => cfg!(feature = "xlsx"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        })
    }
}

/// One line of the review spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessReviewRow {
    /// User name
    pub name: String,
    /// User email
    pub email: String,
    /// User status
    pub status: String,
    /// Granted role
    pub role: String,
    /// Program name
    pub program: String,
    /// Clinic name, blank for program-wide grants
    pub clinic: String,
    /// Location name, blank unless location-scoped
    pub location: String,
    /// Grant date
    pub access_granted: String,
    /// Most recent review, blank if never reviewed
    pub last_review_date: String,
    /// Next review date
    pub next_review_due: String,
}

impl AccessReviewRow {
    /// Build a row from a grant and its most recent review date
    #[must_use]
    pub fn from_grant(grant: &AccessGrant, last_review_date: Option<String>) -> Self {
        Self {
            name: grant.user_name.clone(),
            email: grant.email.clone(),
            status: grant.status.clone(),
            role: grant.role.clone(),
            program: grant.program_name.clone(),
            clinic: grant.clinic_name.clone().unwrap_or_default(),
            location: grant.location_name.clone().unwrap_or_default(),
            access_granted: grant.granted_date.clone(),
            last_review_date: last_review_date.unwrap_or_default(),
            next_review_due: grant.next_review_due.clone(),
        }
    }

    /// Cell values in [`REVIEW_COLUMNS`] order
    #[must_use]
    pub fn cells(&self) -> [&str; 12] {
        [
            &self.name,
            &self.email,
            &self.status,
            &self.role,
            &self.program,
            &self.clinic,
            &self.location,
            &self.access_granted,
            &self.last_review_date,
            &self.next_review_due,
            "",
            "",
        ]
    }
}

/// File name without extension, from the clinic name, else the program
/// name, else a generic stem
#[must_use]
pub fn export_file_stem(
    clinic_name: Option<&str>,
    program_name: Option<&str>,
    today: NaiveDate,
) -> String {
    let date = format_date(today);
    match clinic_name.or(program_name) {
        Some(name) => format!(
            "{}_access_review_{date}",
            name.replace(' ', "_").replace('/', "-")
        ),
        None => format!("access_review_{date}"),
    }
}

/// Write `rows` to `<dir>/<stem>.<ext>`, creating `dir` if needed
///
/// The spreadsheet is written on the blocking thread pool.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written, or if the
/// format is not available in this build
pub async fn write_review_export(
    dir: &Path,
    stem: &str,
    format: ExportFormat,
    rows: &[AccessReviewRow],
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{stem}.{}", format.extension()));

    let target = path.clone();
    let owned_rows = rows.to_vec();
    tokio::task::spawn_blocking(move || write_file(&target, format, &owned_rows))
        .await
        .map_err(|e| AppError::internal(format!("Export writer task failed: {e}")))??;

    AppLogger::log_export(&path.display().to_string(), format.extension(), rows.len());
    Ok(path)
}

fn write_file(path: &Path, format: ExportFormat, rows: &[AccessReviewRow]) -> AppResult<()> {
    match format {
        ExportFormat::Csv => csv::write(path, rows),
        #[cfg(feature = "xlsx")]
        ExportFormat::Xlsx => xlsx::write(path, rows),
        #[cfg(not(feature = "xlsx"))]
        ExportFormat::Xlsx => Err(AppError::invalid_input(
            "Excel export is not available in this build",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_file_stem_prefers_clinic() {
        assert_eq!(
            export_file_stem(Some("Franz Clinic"), Some("Prevention4ME"), today()),
            "Franz_Clinic_access_review_2025-03-14"
        );
        assert_eq!(
            export_file_stem(None, Some("Lab / Imaging"), today()),
            "Lab_-_Imaging_access_review_2025-03-14"
        );
        assert_eq!(
            export_file_stem(None, None, today()),
            "access_review_2025-03-14"
        );
    }

    #[test]
    fn test_format_param() {
        assert_eq!(ExportFormat::from_str_param("XLSX"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_str_param("csv"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str_param("pdf"), ExportFormat::Csv);
        assert_eq!(ExportFormat::Xlsx.to_string(), "XLSX");
    }

    #[tokio::test]
    async fn test_write_review_export_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reviews").join("2025");
        let row = AccessReviewRow {
            name: "Erin Walsh".to_owned(),
            email: "erin.walsh@franzclinic.example".to_owned(),
            status: "Active".to_owned(),
            role: "Coordinator".to_owned(),
            program: "Prevention4ME".to_owned(),
            clinic: "Franz Clinic".to_owned(),
            location: String::new(),
            access_granted: "2024-03-01".to_owned(),
            last_review_date: String::new(),
            next_review_due: "2025-03-01".to_owned(),
        };

        let path = write_review_export(&target, "franz", ExportFormat::Csv, &[row])
            .await
            .unwrap();
        assert_eq!(path, target.join("franz.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Erin Walsh"));
    }
}
