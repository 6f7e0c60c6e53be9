//! Spreadsheet export of stored feedback
//!
//! Records are first laid out as plain rows of cells, then rendered into an
//! in-memory xlsx workbook. Each export renders its own buffer, so concurrent
//! downloads never share a file on disk.

use crate::error::Result;
use crate::types::FeedbackRecord;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::debug;

/// Column headers, in export order
pub const EXPORT_COLUMNS: [&str; 5] = [
    "respondent_name",
    "attendant_name",
    "rating",
    "comment",
    "timestamp",
];

/// Suggested file name for downloads
pub const EXPORT_FILENAME: &str = "feedback_export.xlsx";

/// MIME type of the rendered workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Feedback";

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn optional(value: Option<&str>) -> Self {
        match value {
            Some(text) => Cell::Text(text.to_string()),
            None => Cell::Empty,
        }
    }
}

/// Header row followed by one row per record, in the order given
pub fn sheet_rows(records: &[FeedbackRecord]) -> Vec<Vec<Cell>> {
    let header = EXPORT_COLUMNS
        .iter()
        .map(|name| Cell::Text(name.to_string()))
        .collect();

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(header);

    for record in records {
        rows.push(vec![
            Cell::optional(record.respondent_name.as_deref()),
            Cell::Text(record.attendant_name.clone()),
            Cell::Number(record.rating as f64),
            Cell::optional(record.comment.as_deref()),
            Cell::Text(record.timestamp.clone()),
        ]);
    }

    rows
}

/// Render records into xlsx bytes
pub fn render_xlsx(records: &[FeedbackRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row_idx, row) in sheet_rows(records).iter().enumerate() {
        let row_num = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                Cell::Text(text) if row_num == 0 => {
                    worksheet.write_string_with_format(row_num, col_num, text, &header_format)?
                }
                Cell::Text(text) => worksheet.write_string(row_num, col_num, text)?,
                Cell::Number(number) => worksheet.write_number(row_num, col_num, *number)?,
                Cell::Empty => continue,
            };
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!("Rendered export: {} records, {} bytes", records.len(), bytes.len());
    Ok(bytes)
}

/// Render records and write the workbook to `path`
pub fn write_xlsx<P: AsRef<Path>>(records: &[FeedbackRecord], path: P) -> Result<()> {
    let bytes = render_xlsx(records)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackId;

    fn records() -> Vec<FeedbackRecord> {
        vec![
            FeedbackRecord {
                id: FeedbackId(1),
                respondent_name: None,
                attendant_name: "Ana".to_string(),
                rating: 5,
                comment: Some("great".to_string()),
                timestamp: "2024-03-01 09:15:00".to_string(),
            },
            FeedbackRecord {
                id: FeedbackId(2),
                respondent_name: Some("Joe".to_string()),
                attendant_name: "Ana".to_string(),
                rating: 3,
                comment: None,
                timestamp: "2024-03-01 09:20:00".to_string(),
            },
        ]
    }

    #[test]
    fn test_sheet_rows_layout() {
        let rows = sheet_rows(&records());
        assert_eq!(rows.len(), 3);

        let header: Vec<_> = rows[0]
            .iter()
            .map(|cell| match cell {
                Cell::Text(text) => text.as_str(),
                _ => panic!("header cells are text"),
            })
            .collect();
        assert_eq!(header, EXPORT_COLUMNS);

        assert_eq!(rows[1][0], Cell::Empty);
        assert_eq!(rows[1][2], Cell::Number(5.0));
        assert_eq!(rows[2][0], Cell::Text("Joe".to_string()));
        assert_eq!(rows[2][3], Cell::Empty);
        assert_eq!(rows[2][4], Cell::Text("2024-03-01 09:20:00".to_string()));
    }

    #[test]
    fn test_sheet_rows_empty() {
        let rows = sheet_rows(&[]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_render_xlsx_produces_zip_container() {
        let bytes = render_xlsx(&records()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_write_xlsx_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(EXPORT_FILENAME);

        write_xlsx(&records(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
