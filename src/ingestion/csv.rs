//! Delimited-text (CSV/TSV) ingestion.

use crate::error::IngestionResult;
use crate::types::{CellValue, RawRow, RawTable};

use super::decode::{self, DecodeOptions};

/// Read decoded export text into a [`RawTable`].
///
/// Rules:
///
/// - A leading BOM and embedded NULs are stripped; blank lines are dropped.
/// - The header is the first line (within `options.header_scan_lines`) that looks like an ads
///   header; anything above it is discarded. Without a match, the first line is the header.
/// - The delimiter (comma or tab) is detected from the header line.
/// - Short rows are padded with blanks; extra trailing cells are ignored.
///   Rows of empty cells (`,,`) are kept; only empty lines are dropped.
pub fn read_delimited_text(text: &str, options: &DecodeOptions) -> IngestionResult<RawTable> {
    let cleaned = decode::clean_text(text);
    let lines = decode::data_lines(&cleaned);
    if lines.is_empty() {
        return Ok(RawTable::default());
    }

    let header_idx = decode::find_header_line(&lines, options.header_scan_lines).unwrap_or(0);
    let delimiter = decode::detect_delimiter(lines[header_idx]);
    tracing::debug!(
        header_line = header_idx,
        delimiter = %(delimiter as char).escape_default(),
        "located export header"
    );

    let body = lines[header_idx..].join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(body.as_bytes());

    read_delimited_from_reader(&mut rdr)
}

/// Read rows from an existing CSV reader configured with headers.
pub fn read_delimited_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<RawTable> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows: Vec<RawRow> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: RawRow = (0..headers.len())
            .map(|idx| match record.get(idx) {
                Some(raw) if !raw.is_empty() => CellValue::Text(raw.to_string()),
                _ => CellValue::Blank,
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}
