//! Unified parse entrypoints.
//!
//! Most callers should use [`parse_path`] (or [`parse_path_async`]), which turns an ads export
//! file into a [`ParseResult`]:
//!
//! - The format is inferred from the file extension unless [`ParseOptions::format`] is set.
//! - Delimited text is decoded (UTF-8/UTF-16), banner rows are skipped and the delimiter is
//!   detected; spreadsheets are read from their first sheet.
//! - Headers are normalized, the file is classified, and the matching builder runs.
//! - If an [`IngestionObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::processing::creatives::DEFAULT_GAME_TITLES;
use crate::processing::{build_column_map, build_creatives, build_time_series, classify_columns};
use crate::types::{DataKind, ParseResult, ParsedData, RawTable};

use super::csv;
use super::decode::{self, DecodeOptions};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Source label used in observer callbacks for direct text input.
const TEXT_SOURCE: &str = "<text>";

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Spreadsheet workbooks (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Excel => "excel",
        }
    }

    /// Returns `true` for the delimited-text formats.
    pub fn is_delimited(&self) -> bool {
        matches!(self, Self::Csv | Self::Tsv)
    }
}

/// Options controlling parse behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ParseOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Encoding and header-detection thresholds for delimited text.
    pub decode: DecodeOptions,
    /// Replaces the built-in game title list used to derive `game` from campaign names.
    pub game_titles: Option<Vec<String>>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("format", &self.format)
            .field("decode", &self.decode)
            .field("game_titles", &self.game_titles.as_ref().map(Vec::len))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: None,
            decode: DecodeOptions::default(),
            game_titles: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl ParseOptions {
    fn game_titles(&self) -> Vec<&str> {
        match &self.game_titles {
            Some(titles) => titles.iter().map(String::as_str).collect(),
            None => DEFAULT_GAME_TITLES.to_vec(),
        }
    }
}

/// Parse an ads export file.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/record counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Errors
///
/// - [`IngestionError::UnsupportedFormat`] if the extension is not csv/tsv/xlsx/xls
/// - [`IngestionError::EmptyFile`] if no data rows remain after header detection
/// - [`IngestionError::NoValidData`] if every campaign row is filtered out
///
/// # Examples
///
/// ```no_run
/// use ad_export_ingest::ingestion::{parse_path, ParseOptions};
///
/// # fn main() -> Result<(), ad_export_ingest::IngestionError> {
/// let result = parse_path("campaigns.csv", &ParseOptions::default())?;
/// println!("{} records of kind {}", result.data.len(), result.kind());
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (tracing + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use ad_export_ingest::ingestion::{parse_path, IngestionSeverity, ParseOptions, TracingObserver};
///
/// let opts = ParseOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     alert_at_or_above: IngestionSeverity::Error,
///     ..Default::default()
/// };
///
/// // Unsupported extensions are Error severity and trigger `on_alert` at this threshold.
/// let _err = parse_path("report.pdf", &opts).unwrap_err();
/// ```
pub fn parse_path(path: impl AsRef<Path>, options: &ParseOptions) -> IngestionResult<ParseResult> {
    let path = path.as_ref();
    let mut ctx = path_context(path);
    let result = resolve_format(path, options).and_then(|format| {
        ctx.format = Some(format);
        let bytes = std::fs::read(path)?;
        parse_decoded(&bytes, format, options)
    });
    finish(&ctx, options, result)
}

/// Async variant of [`parse_path`]; the file is read through `tokio::fs`.
///
/// Dropping the returned future before it resolves abandons the parse.
pub async fn parse_path_async(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> IngestionResult<ParseResult> {
    let path = path.as_ref();
    let mut ctx = path_context(path);
    let result = match resolve_format(path, options) {
        Ok(format) => {
            ctx.format = Some(format);
            match tokio::fs::read(path).await {
                Ok(bytes) => parse_decoded(&bytes, format, options),
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e),
    };
    finish(&ctx, options, result)
}

/// Parse an upload already held in memory, given its file extension (without the dot).
pub fn parse_bytes(
    bytes: &[u8],
    extension: &str,
    options: &ParseOptions,
) -> IngestionResult<ParseResult> {
    let format = match options.format {
        Some(f) => Ok(f),
        None => IngestionFormat::from_extension(extension).ok_or_else(|| {
            IngestionError::UnsupportedFormat {
                extension: extension.to_ascii_lowercase(),
            }
        }),
    };
    let ctx = IngestionContext {
        source: format!("<bytes>.{extension}"),
        format: format.as_ref().ok().copied(),
    };
    let result = format.and_then(|format| parse_decoded(bytes, format, options));
    finish(&ctx, options, result)
}

/// Parse CSV/TSV text directly (fixtures, pasted exports).
///
/// The delimiter is detected from the header line as for files.
pub fn parse_text(text: &str, options: &ParseOptions) -> IngestionResult<ParseResult> {
    let ctx = IngestionContext {
        source: TEXT_SOURCE.to_string(),
        format: Some(IngestionFormat::Csv),
    };
    let result = csv::read_delimited_text(text, &options.decode)
        .and_then(|table| parse_table_counted(table, options));
    finish(&ctx, options, result)
}

/// Normalize, classify and build records from an already decoded table.
pub fn parse_table(table: RawTable, options: &ParseOptions) -> IngestionResult<ParseResult> {
    parse_table_counted(table, options).map(|(parsed, _)| parsed)
}

/// Like [`parse_table`], also returning the number of raw data rows for observer stats.
fn parse_table_counted(
    table: RawTable,
    options: &ParseOptions,
) -> IngestionResult<(ParseResult, usize)> {
    if table.rows.is_empty() {
        return Err(IngestionError::EmptyFile);
    }

    let map = build_column_map(&table.headers);
    let kind = classify_columns(&map);
    tracing::debug!(
        kind = %kind,
        rows = table.row_count(),
        columns = ?map.canonical_names(),
        "classified export"
    );

    let data = match kind {
        DataKind::Timeseries => ParsedData::TimeSeries(build_time_series(&table.rows, &map)),
        DataKind::Creatives => {
            ParsedData::Creatives(build_creatives(&table.rows, &map, &options.game_titles())?)
        }
    };

    Ok((
        ParseResult {
            data,
            columns: map.canonical_names(),
        },
        table.row_count(),
    ))
}

fn parse_decoded(
    bytes: &[u8],
    format: IngestionFormat,
    options: &ParseOptions,
) -> IngestionResult<(ParseResult, usize)> {
    let table = if format.is_delimited() {
        let text = decode::decode_text(bytes, &options.decode);
        csv::read_delimited_text(&text, &options.decode)?
    } else {
        read_excel(bytes)?
    };
    parse_table_counted(table, options)
}

fn read_excel(bytes: &[u8]) -> IngestionResult<RawTable> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_first_sheet(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(IngestionError::UnsupportedFormat {
            extension: "xlsx (excel feature disabled)".to_string(),
        })
    }
}

fn path_context(path: &Path) -> IngestionContext {
    IngestionContext {
        source: path.display().to_string(),
        format: None,
    }
}

fn resolve_format(path: &Path, options: &ParseOptions) -> IngestionResult<IngestionFormat> {
    if let Some(f) = options.format {
        return Ok(f);
    }
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        extension: ext.to_ascii_lowercase(),
    })
}

fn finish(
    ctx: &IngestionContext,
    options: &ParseOptions,
    result: IngestionResult<(ParseResult, usize)>,
) -> IngestionResult<ParseResult> {
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((parsed, rows)) => obs.on_success(
                ctx,
                IngestionStats {
                    kind: parsed.kind(),
                    rows: *rows,
                    records: parsed.data.len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(ctx, sev, e);
                }
            }
        }
    }

    result.map(|(parsed, _)| parsed)
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::EmptyFile | IngestionError::NoValidData => IngestionSeverity::Warning,
        IngestionError::UnsupportedFormat { .. }
        | IngestionError::Json(_)
        | IngestionError::InvalidDateRange { .. } => IngestionSeverity::Error,
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful to queue uploads in a job system.
#[derive(Clone)]
pub struct ParseRequest {
    /// Path to the uploaded file.
    pub path: PathBuf,
    /// Options controlling the parse.
    pub options: ParseOptions,
}

impl fmt::Debug for ParseRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl ParseRequest {
    /// Execute the request by calling [`parse_path`].
    pub fn run(&self) -> IngestionResult<ParseResult> {
        parse_path(&self.path, &self.options)
    }
}
