//! Core data model types for ingestion.
//!
//! Decoders produce a [`RawTable`] (header strings plus loosely typed [`CellValue`] rows). The
//! processing layer turns that into a [`ParseResult`] holding either [`TimeSeriesPoint`]s or
//! [`CreativeRecord`]s.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A single raw cell as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing/empty cell.
    Blank,
    /// Text cell (delimited text is always text; spreadsheets may carry either).
    Text(String),
    /// Numeric cell (spreadsheets only).
    Number(f64),
}

impl CellValue {
    /// Returns `true` for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Render the cell as display text. Integral numbers print without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
        }
    }
}

/// One data row, aligned with [`RawTable::headers`].
pub type RawRow = Vec<CellValue>;

/// Header row plus data rows, exactly as decoded from a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Original header strings, in file order.
    pub headers: Vec<String>,
    /// Row-major cell storage. Rows are padded or truncated to the header length.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Canonical column vocabulary that export headers are normalized to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Campaign,
    AdGroup,
    AdName,
    Status,
    Impressions,
    Clicks,
    Interactions,
    InteractionRate,
    Conversions,
    Cost,
    Cpa,
    VideoViews,
    Ctr,
    ViewableCtr,
    AvgCpc,
    AvgCpm,
    AvgCpv,
    AvgCost,
    ConvRate,
    ConvValue,
    ConvValuePerCost,
    ViewRate,
    ViewableImpressions,
    Budget,
    BudgetType,
    Account,
    CampaignType,
    Currency,
    CurrencyCode,
    BidStrategy,
    OptimizationScore,
    Date,
    StartDate,
    /// Unrecognized header, kept as its cleaned lowercase form.
    Other(String),
}

impl Column {
    /// Canonical identifier for this column.
    pub fn as_str(&self) -> &str {
        match self {
            Column::Campaign => "campaign",
            Column::AdGroup => "adGroup",
            Column::AdName => "adName",
            Column::Status => "status",
            Column::Impressions => "impressions",
            Column::Clicks => "clicks",
            Column::Interactions => "interactions",
            Column::InteractionRate => "interactionRate",
            Column::Conversions => "conversions",
            Column::Cost => "cost",
            Column::Cpa => "cpa",
            Column::VideoViews => "videoViews",
            Column::Ctr => "ctr",
            Column::ViewableCtr => "viewableCtr",
            Column::AvgCpc => "avgCpc",
            Column::AvgCpm => "avgCpm",
            Column::AvgCpv => "avgCpv",
            Column::AvgCost => "avgCost",
            Column::ConvRate => "convRate",
            Column::ConvValue => "convValue",
            Column::ConvValuePerCost => "convValuePerCost",
            Column::ViewRate => "viewRate",
            Column::ViewableImpressions => "viewableImpressions",
            Column::Budget => "budget",
            Column::BudgetType => "budgetType",
            Column::Account => "account",
            Column::CampaignType => "campaignType",
            Column::Currency => "currency",
            Column::CurrencyCode => "currencyCode",
            Column::BidStrategy => "bidStrategy",
            Column::OptimizationScore => "optimizationScore",
            Column::Date => "date",
            Column::StartDate => "startDate",
            Column::Other(s) => s.as_str(),
        }
    }

    /// Columns that identify a campaign or ad entity.
    pub fn is_entity(&self) -> bool {
        matches!(self, Column::Campaign | Column::AdGroup | Column::AdName)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping of every original header (in file order) to exactly one canonical [`Column`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnKeyMap {
    /// `(original header, canonical column)` pairs.
    pub entries: Vec<(String, Column)>,
}

impl ColumnKeyMap {
    /// Returns `true` if any header normalized to `column`.
    pub fn contains(&self, column: &Column) -> bool {
        self.entries.iter().any(|(_, c)| c == column)
    }

    /// Index of the cell holding `column` in a row.
    ///
    /// When several headers normalize to the same column, the last one wins.
    pub fn index_of(&self, column: &Column) -> Option<usize> {
        self.entries.iter().rposition(|(_, c)| c == column)
    }

    /// Canonical identifiers in header order (duplicates kept).
    pub fn canonical_names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, c)| c.as_str().to_string()).collect()
    }

    /// Iterate canonical columns in header order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.entries.iter().map(|(_, c)| c)
    }
}

/// One point of a daily time-series export.
///
/// Metric fields are `Some` only when the source file had that column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// `YYYY-MM-DD` when the source date parsed, else the trimmed source text.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_views: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa: Option<f64>,
}

/// Delivery status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeStatus {
    Running,
    Paused,
}

/// One campaign/ad entity from a per-campaign export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeRecord {
    /// Synthetic sequential id, `GAD-001`, `GAD-002`, ...
    pub id: String,
    pub creator: String,
    pub game: String,
    pub hook_type: String,
    pub campaign_name: String,
    pub launch_date: String,
    pub impressions: i64,
    pub clicks: i64,
    /// Conversions rounded to the nearest integer.
    pub installs: i64,
    /// Cost rounded to 2 decimals.
    pub spend: f64,
    /// Cost per acquisition rounded to 2 decimals.
    pub cpa: f64,
    pub video_views: i64,
    pub viewable_impressions: i64,
    pub status: CreativeStatus,
    pub budget: f64,
    pub campaign_type: String,
    pub bid_strategy: String,
    pub account: String,
}

/// Which canonical shape a file was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Timeseries,
    Creatives,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Timeseries => "timeseries",
            DataKind::Creatives => "creatives",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed records produced by one parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedData {
    TimeSeries(Vec<TimeSeriesPoint>),
    Creatives(Vec<CreativeRecord>),
}

impl ParsedData {
    pub fn kind(&self) -> DataKind {
        match self {
            ParsedData::TimeSeries(_) => DataKind::Timeseries,
            ParsedData::Creatives(_) => DataKind::Creatives,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedData::TimeSeries(v) => v.len(),
            ParsedData::Creatives(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single artifact crossing the pipeline boundary.
///
/// Serializes as `{"type": "timeseries" | "creatives", "data": [...], "columns": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ParseResultRepr")]
pub struct ParseResult {
    pub data: ParsedData,
    /// Canonical column identifiers in header order.
    pub columns: Vec<String>,
}

impl ParseResult {
    pub fn kind(&self) -> DataKind {
        self.data.kind()
    }

    pub fn time_series(&self) -> Option<&[TimeSeriesPoint]> {
        match &self.data {
            ParsedData::TimeSeries(v) => Some(v),
            ParsedData::Creatives(_) => None,
        }
    }

    pub fn creatives(&self) -> Option<&[CreativeRecord]> {
        match &self.data {
            ParsedData::Creatives(v) => Some(v),
            ParsedData::TimeSeries(_) => None,
        }
    }
}

impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseResult", 3)?;
        state.serialize_field("type", &self.kind())?;
        match &self.data {
            ParsedData::TimeSeries(points) => state.serialize_field("data", points)?,
            ParsedData::Creatives(creatives) => state.serialize_field("data", creatives)?,
        }
        state.serialize_field("columns", &self.columns)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct ParseResultRepr {
    #[serde(rename = "type")]
    kind: DataKind,
    data: serde_json::Value,
    columns: Vec<String>,
}

impl TryFrom<ParseResultRepr> for ParseResult {
    type Error = serde_json::Error;

    fn try_from(r: ParseResultRepr) -> Result<Self, Self::Error> {
        let data = match r.kind {
            DataKind::Timeseries => ParsedData::TimeSeries(serde_json::from_value(r.data)?),
            DataKind::Creatives => ParsedData::Creatives(serde_json::from_value(r.data)?),
        };
        Ok(Self {
            data,
            columns: r.columns,
        })
    }
}
