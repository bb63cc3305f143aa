//! Total (never-failing) coercion of raw cells into numbers, dates and statuses.
//!
//! A malformed cell degrades to `0`, its own trimmed text, or the optimistic status rather than
//! failing the whole file.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::types::{CellValue, CreativeStatus};

/// Placeholder strings exports use for "no value".
const NULL_TOKENS: [&str; 4] = ["", "--", " --", "N/A"];

const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%a, %b %d, %Y",
    "%A, %B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// US short dates with a two-digit year; `%y` maps 00-68 to 20xx and 69-99 to 19xx.
const SHORT_YEAR_FORMATS: [&str; 2] = ["%m/%d/%y", "%m-%d-%y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Coerce a cell into a number. Never fails; anything unparseable is `0`.
pub fn coerce_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Blank => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => coerce_number_str(s),
    }
}

/// Coerce locale-formatted text such as `"$1,234.50"` or `"12%"` into a number.
pub fn coerce_number_str(raw: &str) -> f64 {
    if NULL_TOKENS.contains(&raw) {
        return 0.0;
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',' | '%' | '"') && !c.is_whitespace())
        .collect();

    parse_float_prefix(&cleaned).unwrap_or(0.0)
}

/// Parse the longest leading decimal literal of `s` (`"12.5x"` -> `12.5`).
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Only take an exponent when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a cell into a `YYYY-MM-DD` date string.
///
/// Blank cells give an empty string; text that does not parse as a calendar date is returned
/// trimmed and otherwise unchanged.
pub fn coerce_date(cell: &CellValue) -> String {
    match cell {
        CellValue::Blank => String::new(),
        CellValue::Number(_) => cell.to_text(),
        CellValue::Text(s) => coerce_date_str(s),
    }
}

pub fn coerce_date_str(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }
    match parse_calendar_date(s) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => s.to_string(),
    }
}

/// Best-effort calendar date parsing over the layouts ad platforms export.
///
/// `%Y` layouts only count when the year has four digits; otherwise `1/5/26` would read as
/// year 1. Two-digit years are tried last, as US month/day/year.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let full_year = |d: &NaiveDate| d.year() >= 1000;
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(full_year)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(full_year)
        })
        .or_else(|| {
            SHORT_YEAR_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

/// Coerce a status cell. Unknown values are optimistically `Running`.
pub fn coerce_status(cell: &CellValue) -> CreativeStatus {
    let s = cell.to_text().trim().to_lowercase();
    if s.is_empty() {
        return CreativeStatus::Running;
    }
    if s.contains("enabled") || s == "active" || s == "running" || s.contains("eligible") {
        return CreativeStatus::Running;
    }
    if s.contains("paused") || s.contains("removed") || s.contains("deleted") {
        return CreativeStatus::Paused;
    }
    CreativeStatus::Running
}

/// Round to 2 decimal places (currency precision).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn number_strips_currency_and_separators() {
        assert_eq!(coerce_number(&text("$1,234.50")), 1234.5);
        assert_eq!(coerce_number(&text("€ 2.000,00")), 2.0);
        assert_eq!(coerce_number(&text("£15")), 15.0);
        assert_eq!(coerce_number(&text("\"3,400\"")), 3400.0);
        assert_eq!(coerce_number(&text("12%")), 12.0);
        assert_eq!(coerce_number(&text("  7.25  ")), 7.25);
    }

    #[test]
    fn number_placeholders_are_zero() {
        assert_eq!(coerce_number(&text("--")), 0.0);
        assert_eq!(coerce_number(&text(" --")), 0.0);
        assert_eq!(coerce_number(&text("N/A")), 0.0);
        assert_eq!(coerce_number(&text("")), 0.0);
        assert_eq!(coerce_number(&CellValue::Blank), 0.0);
        assert_eq!(coerce_number(&text("not a number")), 0.0);
        assert_eq!(coerce_number(&text("-")), 0.0);
    }

    #[test]
    fn number_passthrough_and_prefix() {
        assert_eq!(coerce_number(&CellValue::Number(42.0)), 42.0);
        assert_eq!(coerce_number(&text("12.5x")), 12.5);
        assert_eq!(coerce_number(&text("-3")), -3.0);
        assert_eq!(coerce_number(&text("1e3")), 1000.0);
        assert_eq!(coerce_number(&text("2e")), 2.0);
        assert_eq!(coerce_number(&text(".5")), 0.5);
    }

    #[test]
    fn date_normalizes_common_layouts() {
        assert_eq!(coerce_date(&text("2026-01-05")), "2026-01-05");
        assert_eq!(coerce_date(&text("2026/1/5")), "2026-01-05");
        assert_eq!(coerce_date(&text("1/5/2026")), "2026-01-05");
        assert_eq!(coerce_date(&text("Jan 5, 2026")), "2026-01-05");
        assert_eq!(coerce_date(&text("Mon, Jan 5, 2026")), "2026-01-05");
        assert_eq!(coerce_date(&text("January 5, 2026")), "2026-01-05");
        assert_eq!(coerce_date(&text("2026-01-05T10:30:00Z")), "2026-01-05");
        assert_eq!(coerce_date(&text("2026-01-05 23:59:59")), "2026-01-05");
    }

    #[test]
    fn date_two_digit_years_are_month_day_year() {
        assert_eq!(coerce_date_str("1/5/26"), "2026-01-05");
        assert_eq!(coerce_date_str("12/30/25"), "2025-12-30");
        assert_eq!(coerce_date_str("01-05-26"), "2026-01-05");
        assert_eq!(coerce_date_str("3/4/99"), "1999-03-04");
        assert_eq!(parse_calendar_date("0001-05-26"), None);
        // Still four-digit layouts first.
        assert_eq!(coerce_date_str("01-05-2026"), "2026-01-05");
    }

    #[test]
    fn date_blank_and_passthrough() {
        assert_eq!(coerce_date(&CellValue::Blank), "");
        assert_eq!(coerce_date(&text("   ")), "");
        assert_eq!(coerce_date(&text("  Week 3  ")), "Week 3");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(coerce_status(&CellValue::Blank), CreativeStatus::Running);
        assert_eq!(coerce_status(&text("Enabled")), CreativeStatus::Running);
        assert_eq!(coerce_status(&text("ACTIVE")), CreativeStatus::Running);
        assert_eq!(coerce_status(&text("Eligible (limited)")), CreativeStatus::Running);
        assert_eq!(coerce_status(&text("Campaign paused")), CreativeStatus::Paused);
        assert_eq!(coerce_status(&text("Removed")), CreativeStatus::Paused);
        assert_eq!(coerce_status(&text("deleted")), CreativeStatus::Paused);
        assert_eq!(coerce_status(&text("Pending review")), CreativeStatus::Running);
    }

    #[test]
    fn round2_currency() {
        assert_eq!(round2(5.0), 5.0);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.675_1), 2.68);
    }
}
