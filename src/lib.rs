//! `ad-export-ingest` turns ad-platform spreadsheet exports into canonical records for a
//! marketing dashboard.
//!
//! The primary entrypoint is [`ingestion::parse_path`], which picks the decoder from the file
//! extension (or you can force a format via [`ingestion::ParseOptions`]) and returns a
//! [`types::ParseResult`].
//!
//! ## What you can ingest
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **TSV**: `.tsv`
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`
//!
//! Delimited text may be UTF-8 or UTF-16 (either byte order, with or without a BOM), may carry
//! report banner lines above the header, and may use either comma or tab as its delimiter.
//!
//! **What comes out:**
//!
//! Headers are normalized to a canonical vocabulary ([`types::Column`]) and the file is classified
//! as either:
//!
//! - a daily time series ([`types::TimeSeriesPoint`], sorted by date), or
//! - a per-campaign export ([`types::CreativeRecord`], sorted by spend, highest first).
//!
//! Malformed cells never fail a parse: numbers coerce to `0`, unparseable dates pass through as
//! text. Only whole-file conditions are errors ([`IngestionError`]).
//!
//! ## Quick example: parse an upload
//!
//! ```no_run
//! use ad_export_ingest::ingestion::{parse_path, ParseOptions};
//!
//! # fn main() -> Result<(), ad_export_ingest::IngestionError> {
//! let result = parse_path("Campaign report.csv", &ParseOptions::default())?;
//! if let Some(creatives) = result.creatives() {
//!     for c in creatives {
//!         println!("{} {} spend={} cpa={}", c.id, c.game, c.spend, c.cpa);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing text directly
//!
//! ```rust
//! use ad_export_ingest::ingestion::{parse_text, ParseOptions};
//! use ad_export_ingest::types::DataKind;
//!
//! let csv = "Campaign,Impressions,Clicks,Conversions,Cost,Campaign status\n\
//!            Fortnite - Gameplay Montage,\"10,000\",500,50,$250.00,Enabled\n";
//! let result = parse_text(csv, &ParseOptions::default()).unwrap();
//! assert_eq!(result.kind(), DataKind::Creatives);
//!
//! let c = &result.creatives().unwrap()[0];
//! assert_eq!(c.id, "GAD-001");
//! assert_eq!(c.game, "Fortnite");
//! assert_eq!(c.cpa, 5.0);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified parse entrypoints, decoders and observers
//! - [`processing`]: header normalization, classification, coercion and record builders
//! - [`types`]: raw and canonical record types
//! - [`store`]: persistence of the last parsed upload
//! - [`live`]: interface for querying an ad platform directly, with fallback to local data
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod live;
pub mod processing;
pub mod store;
pub mod types;

pub use error::{IngestionError, IngestionResult};
