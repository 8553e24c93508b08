use crate::domain::ports::SpreadsheetReader;
use crate::utils::error::{CatalogError, Result};
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets};
use chrono::NaiveTime;
use std::io::Cursor;

/// Workbook opened over a borrowed byte buffer. Several readers may share one
/// buffer; each owns its own document state.
pub struct CalamineReader<'a> {
    location: String,
    workbook: Sheets<Cursor<&'a [u8]>>,
}

impl<'a> CalamineReader<'a> {
    pub fn open(location: &str, bytes: &'a [u8]) -> Result<Self> {
        let workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| CatalogError::OpenError {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            location: location.to_string(),
            workbook,
        })
    }
}

impl SpreadsheetReader for CalamineReader<'_> {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let Some(name) = self.resolve_sheet(sheet) else {
            return Err(CatalogError::SheetNotFound {
                attempted: vec![sheet.to_string()],
            });
        };

        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| CatalogError::RowReadError {
                sheet: format!("{} in {}", name, self.location),
                reason: e.to_string(),
            })?;

        Ok(range_to_rows(&range))
    }
}

/// Rows counted from the first sheet row, each starting at column A, with
/// trailing empty cells and trailing empty rows removed.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); start_col as usize];
        row.extend(cells.iter().map(cell_text));
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        rows.push(row);
    }

    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows
}

pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => datetime_text(dt),
        Data::Error(e) => e.to_string(),
    }
}

/// Calendar text for date cells, `YYYY-MM-DD` with the time appended when it
/// is not midnight. Durations and out-of-range serials keep the raw serial.
fn datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return dt.as_f64().to_string();
    }
    match dt.as_datetime() {
        Some(value) if value.time() == NaiveTime::MIN => value.format("%Y-%m-%d").to_string(),
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}
