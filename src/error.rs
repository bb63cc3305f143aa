use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Only whole-file conditions are errors. Malformed cells and rows degrade to zero, a passthrough
/// string or an omitted field instead of surfacing here.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet decoding error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited-text decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Persisted result could not be serialized or deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is not one of the accepted upload formats.
    #[error("unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// No data rows remained after header detection.
    #[error("file appears to be empty or has no data rows")]
    EmptyFile,

    /// Every row of a campaign export was rejected as a summary, blank or placeholder row.
    #[error("no valid ad data found in file")]
    NoValidData,

    /// A query date range was malformed or inverted.
    #[error("invalid date range: {message}")]
    InvalidDateRange { message: String },
}
