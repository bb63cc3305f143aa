//! Interface to a live advertising-platform query service.
//!
//! The crate does not talk to any ad platform itself. Implement [`AdsQueryService`] over your
//! API client and use [`with_fallback`] to downgrade failed or empty fetches to local data (for
//! example the last upload restored from [`crate::store::ResultStore`]).

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};
use crate::processing::coerce::round2;
use crate::types::{CreativeRecord, CreativeStatus};

/// Inclusive calendar date range used by live queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> IngestionResult<Self> {
        if from > to {
            return Err(IngestionError::InvalidDateRange {
                message: format!("{from} is after {to}"),
            });
        }
        Ok(Self { from, to })
    }

    /// Parse a range from two `YYYY-MM-DD` strings.
    pub fn parse(from: &str, to: &str) -> IngestionResult<Self> {
        Self::new(parse_day(from)?, parse_day(to)?)
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Returns `true` when `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

fn parse_day(s: &str) -> IngestionResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| IngestionError::InvalidDateRange {
        message: format!("{s:?} is not a YYYY-MM-DD date ({e})"),
    })
}

/// Campaign-level totals for an overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub name: String,
    pub id: String,
    pub status: CreativeStatus,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub spend: f64,
    pub video_views: i64,
}

/// One day of cost-per-acquisition for a single ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaTrendPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub cpa: f64,
    pub spend: f64,
    pub conversions: i64,
}

impl CpaTrendPoint {
    /// Build a point from raw daily spend and conversions; CPA is 0 without conversions.
    pub fn from_totals(date: impl Into<String>, spend: f64, conversions: f64) -> Self {
        let cpa = if conversions > 0.0 { spend / conversions } else { 0.0 };
        Self {
            date: date.into(),
            cpa: round2(cpa),
            spend: round2(spend),
            conversions: conversions.round() as i64,
        }
    }
}

/// Daily CPA points keyed by ad id, each series in ascending date order.
pub type CpaTrends = BTreeMap<String, Vec<CpaTrendPoint>>;

/// Queries a live advertising platform for the same shapes the file pipeline produces.
pub trait AdsQueryService: Send + Sync {
    /// Transport or API error returned by the service.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Per-ad creative performance over `range`, highest spend first.
    fn creatives(&self, range: &DateRange) -> Result<Vec<CreativeRecord>, Self::Error>;

    /// Campaign-level totals over `range`, highest spend first.
    fn campaign_summary(&self, range: &DateRange) -> Result<Vec<CampaignSummary>, Self::Error>;

    /// Daily CPA series for enabled ads over `range`.
    fn cpa_trends(&self, range: &DateRange) -> Result<CpaTrends, Self::Error>;
}

/// Map a platform status string (`ENABLED`, `PAUSED`, `REMOVED`, ...) to a [`CreativeStatus`].
///
/// Anything other than `ENABLED` counts as paused.
pub fn map_platform_status(status: &str) -> CreativeStatus {
    if status.trim().eq_ignore_ascii_case("enabled") {
        CreativeStatus::Running
    } else {
        CreativeStatus::Paused
    }
}

/// Convert a micro-unit cost (1/1,000,000 of the account currency) to currency units.
pub fn micros_to_currency(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Records plus whether they came from the live service.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveData<T> {
    pub records: Vec<T>,
    pub is_live: bool,
}

/// Use a live fetch when it succeeded with at least one record; otherwise fall back.
pub fn with_fallback<T, E>(result: Result<Vec<T>, E>, fallback: Vec<T>) -> LiveData<T>
where
    E: fmt::Display,
{
    match result {
        Ok(records) if !records.is_empty() => LiveData {
            records,
            is_live: true,
        },
        Ok(_) => {
            tracing::debug!(fallback = fallback.len(), "live fetch returned no records; using fallback");
            LiveData {
                records: fallback,
                is_live: false,
            }
        }
        Err(error) => {
            tracing::warn!(%error, fallback = fallback.len(), "live fetch failed; using fallback");
            LiveData {
                records: fallback,
                is_live: false,
            }
        }
    }
}
