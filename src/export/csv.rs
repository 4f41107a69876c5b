// ABOUTME: CSV writer for the annual access review export
// ABOUTME: Header row followed by one record per grant

use std::path::Path;

use super::{AccessReviewRow, REVIEW_COLUMNS};
use crate::errors::AppResult;

pub(super) fn write(path: &Path, rows: &[AccessReviewRow]) -> AppResult<()> {
    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(REVIEW_COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_blank_review_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.csv");
        let row = AccessReviewRow {
            name: "Brian Ortiz".into(),
            email: "brian@example.com".into(),
            status: "Active".into(),
            role: "Coordinator, Lead".into(),
            program: "Prevention4ME".into(),
            clinic: "Franz Clinic".into(),
            location: String::new(),
            access_granted: "2024-05-01".into(),
            last_review_date: String::new(),
            next_review_due: "2025-05-01".into(),
        };

        write(&path, &[row]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), REVIEW_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "Brian Ortiz,brian@example.com,Active,\"Coordinator, Lead\",Prevention4ME,Franz Clinic,,2024-05-01,,2025-05-01,,"
        );
    }
}
