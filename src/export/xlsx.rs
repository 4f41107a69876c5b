// ABOUTME: Excel writer for the annual access review export
// ABOUTME: Styled header row, fitted column widths and a review-action hint cell

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use super::{AccessReviewRow, REVIEW_COLUMNS};
use crate::constants::limits::EXPORT_MAX_COLUMN_WIDTH;
use crate::errors::{AppError, AppResult};

const HEADER_FILL: u32 = 0x0044_72C4;
const REVIEW_HINT: &str = "Review Actions: Keep / Remove / Modify";

impl From<XlsxError> for AppError {
    fn from(error: XlsxError) -> Self {
        Self::storage(format!("XLSX write failed: {error}")).with_source(error)
    }
}

pub(super) fn write(path: &Path, rows: &[AccessReviewRow]) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Access Review")?;

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);

    let mut widths: Vec<usize> = REVIEW_COLUMNS.iter().map(|h| h.chars().count()).collect();
    for (col, title) in REVIEW_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        for (col, value) in row.cells().iter().enumerate() {
            sheet.write_string(line, col as u16, *value)?;
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let fitted = (width + 2).min(EXPORT_MAX_COLUMN_WIDTH);
        sheet.set_column_width(col as u16, fitted as f64)?;
    }

    if !rows.is_empty() {
        sheet.write_string(0, REVIEW_COLUMNS.len() as u16, REVIEW_HINT)?;
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.xlsx");
        let row = AccessReviewRow {
            name: "Carla Diaz".into(),
            email: "carla@example.com".into(),
            status: "Active".into(),
            role: "Nurse".into(),
            program: "Prevention4ME".into(),
            clinic: "Mercy Health".into(),
            location: "Downtown".into(),
            access_granted: "2024-01-02".into(),
            last_review_date: String::new(),
            next_review_due: "2025-01-02".into(),
        };

        write(&path, &[row]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
