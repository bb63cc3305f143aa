#![cfg(feature = "excel")]

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};

use crate::error::IngestionResult;
use crate::types::{CellValue, RawRow, RawTable};

/// Read the first sheet of an Excel workbook file (`.xlsx`, `.xls`) into a [`RawTable`].
pub fn read_first_sheet_from_path(path: impl AsRef<Path>) -> IngestionResult<RawTable> {
    let bytes = std::fs::read(path)?;
    read_first_sheet(&bytes)
}

/// Read the first sheet of an in-memory workbook into a [`RawTable`].
///
/// Behavior:
/// - The workbook format (xls/xlsx/xlsb/ods) is sniffed from the bytes
/// - The first non-empty row is the header row; no banner scanning is done
/// - Rows with no non-empty cell are skipped
/// - Date cells become `YYYY-MM-DD` text; numbers stay numeric
pub fn read_first_sheet(bytes: &[u8]) -> IngestionResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(RawTable::default()),
    };

    Ok(sheet_range_to_table(&range))
}

fn sheet_range_to_table(range: &calamine::Range<Data>) -> RawTable {
    let mut rows_iter = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_header_string).collect(),
        None => return RawTable::default(),
    };

    let rows: Vec<RawRow> = rows_iter
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(convert_cell).unwrap_or(CellValue::Blank))
                .collect::<RawRow>()
        })
        .filter(|row| row.iter().any(|c| !c.is_blank()))
        .collect();

    RawTable::new(headers, rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => convert_cell(other).to_text(),
    }
}

fn convert_cell(c: &Data) -> CellValue {
    match c {
        Data::Empty | Data::Error(_) => CellValue::Blank,
        Data::String(s) if s.is_empty() => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convert an Excel serial day number (1900 date system) into a calendar date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once the fictitious 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_dates_convert() {
        assert_eq!(
            excel_serial_to_date(46027.0),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(
            excel_serial_to_date(46027.75),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(excel_serial_to_date(-1.0), None);
    }

    #[test]
    fn cells_convert_to_raw_values() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Blank);
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Blank);
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            convert_cell(&Data::String("Enabled".to_string())),
            CellValue::Text("Enabled".to_string())
        );
        assert_eq!(cell_to_header_string(&Data::Float(3.0)), "3");
    }

    #[test]
    fn garbage_bytes_are_an_excel_error() {
        assert!(read_first_sheet(b"definitely not a workbook").is_err());
    }
}
