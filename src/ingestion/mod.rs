//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`parse_path`] (from [`unified`]) which:
//!
//! - picks the decoder by file extension (or you can override via [`ParseOptions`])
//! - decodes the export into a [`crate::types::RawTable`] and builds canonical records
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific readers are also available under:
//! - [`decode`] (encoding, header-row and delimiter heuristics)
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
pub mod decode;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use decode::{DecodeOptions, TextEncoding};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver, TracingObserver,
};
pub use unified::{
    parse_bytes, parse_path, parse_path_async, parse_table, parse_text, IngestionFormat, ParseOptions,
    ParseRequest,
};
