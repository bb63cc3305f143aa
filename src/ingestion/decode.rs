//! Byte-level and line-level heuristics for delimited exports.
//!
//! Every step is a pure function over bytes or lines so the thresholds in [`DecodeOptions`] can be
//! tuned without touching the row parser.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Tunable thresholds for text decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How many leading non-blank lines are scanned for the real header row.
    pub header_scan_lines: usize,
    /// How many leading bytes are checked for the UTF-16 "every second byte is zero" pattern.
    pub utf16_probe_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            header_scan_lines: 10,
            utf16_probe_bytes: 10,
        }
    }
}

/// Text encodings exports are known to arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::Utf16Be => UTF_16BE,
        }
    }
}

/// Detect the encoding of raw file bytes.
///
/// A UTF-16 byte-order mark wins. Without one, the file is treated as UTF-16 when it is longer than
/// `probe` bytes and every second byte in the first `probe` bytes is `0x00` (ASCII text encoded as
/// UTF-16). Everything else is UTF-8.
pub fn detect_encoding(bytes: &[u8], probe: usize) -> TextEncoding {
    match bytes {
        [0xFF, 0xFE, ..] => return TextEncoding::Utf16Le,
        [0xFE, 0xFF, ..] => return TextEncoding::Utf16Be,
        _ => {}
    }

    if probe >= 2 && bytes.len() > probe {
        let window = &bytes[..probe];
        if window.iter().skip(1).step_by(2).all(|b| *b == 0) {
            return TextEncoding::Utf16Le;
        }
        if window.iter().step_by(2).all(|b| *b == 0) {
            return TextEncoding::Utf16Be;
        }
    }

    TextEncoding::Utf8
}

/// Decode raw bytes into text using [`detect_encoding`]. Invalid sequences become U+FFFD.
pub fn decode_text(bytes: &[u8], options: &DecodeOptions) -> String {
    let detected = detect_encoding(bytes, options.utf16_probe_bytes);
    tracing::debug!(encoding = ?detected, bytes = bytes.len(), "detected text encoding");
    let (text, had_errors) = detected.encoding().decode_with_bom_removal(bytes);
    if had_errors {
        tracing::debug!(encoding = ?detected, "replaced malformed sequences while decoding");
    }
    text.into_owned()
}

/// Strip a leading byte-order mark and every embedded NUL.
pub fn clean_text(text: &str) -> String {
    text.strip_prefix('\u{FEFF}')
        .unwrap_or(text)
        .replace('\0', "")
}

/// Split text into trimmed, non-blank lines.
pub fn data_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Returns `true` if a line looks like the column header of an ads export.
pub fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    let campaign_header = lower.contains("campaign")
        && ["impressions", "impr", "cost", "clicks", "status"]
            .iter()
            .any(|k| lower.contains(k));
    let daily_header = lower.contains("date") && (lower.contains("impr") || lower.contains("clicks"));
    campaign_header || daily_header
}

/// Index of the header line among the first `window` lines, if any matches.
///
/// Lines before it are export titles, generated-on stamps and date-range banners.
pub fn find_header_line(lines: &[&str], window: usize) -> Option<usize> {
    lines.iter().take(window).position(|l| is_header_line(l))
}

/// Tab when the header has strictly more tabs than commas, else comma.
pub fn detect_delimiter(header: &str) -> u8 {
    let tabs = header.matches('\t').count();
    let commas = header.matches(',').count();
    if tabs > commas { b'\t' } else { b',' }
}
