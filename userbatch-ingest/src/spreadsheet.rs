//! Spreadsheet reader
//!
//! Reads the first worksheet of an `.xlsx`, `.xls`, `.xlsb` or `.ods` file.
//! The first row is the header; every following row becomes a
//! [`RawInputRow`] keyed by trimmed header text. Empty cells are left out of
//! the row and rows with no cells at all are skipped. Date-formatted cells
//! keep their serial as [`CellValue::Date`].

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, info};

use crate::error::{IngestError, IngestResult};
use crate::row::{CellValue, RawInputRow};

/// Read the data rows of the first worksheet in `path`
pub fn read_workbook(path: &Path) -> IngestResult<Vec<RawInputRow>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Parse(format!("{} has no worksheets", path.display())))??;

    let rows = rows_from_range(&range);
    info!(
        "Read {} data rows from sheet {:?} of {}",
        rows.len(),
        sheet_name,
        path.display()
    );

    Ok(rows)
}

/// Convert a worksheet range to header-keyed rows
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawInputRow> {
    let mut lines = range.rows();

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<Option<String>> = header_line
        .iter()
        .map(|cell| {
            cell_value(cell)
                .map(|value| value.to_text().trim().to_string())
                .filter(|header| !header.is_empty())
        })
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        let mut row = RawInputRow::new();
        for (header, cell) in headers.iter().zip(line.iter()) {
            let (Some(header), Some(value)) = (header, cell_value(cell)) else {
                continue;
            };
            // Duplicate headers: the leftmost column wins
            if !row.contains_key(header) {
                row.insert(header.clone(), value);
            }
        }

        if row.is_empty() {
            debug!("Skipping empty spreadsheet row");
            continue;
        }
        rows.push(row);
    }

    rows
}

/// Map one cell; `None` for empty and error cells
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Text(b.to_string().to_uppercase())),
        Data::DateTime(dt) => Some(CellValue::Date(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}
