//! In-memory transformations from a decoded [`crate::types::RawTable`] to canonical records.
//!
//! The processing layer runs after a file has been decoded into header strings and raw cells:
//!
//! - [`columns`]: header cleanup and the synonym table mapping headers to [`crate::types::Column`]
//! - [`coerce`]: total coercion of cells into numbers, dates and statuses
//! - [`classify`]: time-series vs. creative export detection
//! - [`timeseries`] / [`creatives`]: the two record builders
//! - [`summary`]: headline totals over creatives
//!
//! ## Example: raw rows to creatives
//!
//! ```rust
//! use ad_export_ingest::processing::{build_column_map, build_creatives, classify_columns};
//! use ad_export_ingest::processing::creatives::DEFAULT_GAME_TITLES;
//! use ad_export_ingest::types::{CellValue, DataKind};
//!
//! let headers = vec!["Campaign".to_string(), "Cost".to_string(), "Conv.".to_string()];
//! let map = build_column_map(&headers);
//! assert_eq!(classify_columns(&map), DataKind::Creatives);
//!
//! let rows = vec![vec![
//!     CellValue::Text("Minecraft - Tutorial".to_string()),
//!     CellValue::Text("$80.00".to_string()),
//!     CellValue::Text("16".to_string()),
//! ]];
//! let creatives = build_creatives(&rows, &map, DEFAULT_GAME_TITLES).unwrap();
//! assert_eq!(creatives[0].game, "Minecraft");
//! assert_eq!(creatives[0].cpa, 5.0);
//! ```

pub mod classify;
pub mod coerce;
pub mod columns;
pub mod creatives;
pub mod summary;
pub mod timeseries;

pub use classify::classify_columns;
pub use coerce::{coerce_date, coerce_number, coerce_status};
pub use columns::{build_column_map, normalize_column_name};
pub use creatives::{build_creatives, extract_game};
pub use summary::{summarize, CreativeSummary};
pub use timeseries::build_time_series;
