//! Decide whether a file is a daily time series or a per-campaign export.

use crate::types::{Column, ColumnKeyMap, DataKind};

/// Classify a file from its canonical columns.
///
/// Campaign identity takes precedence: a file with both a date column and a campaign/ad column is
/// a creative export.
pub fn classify_columns(map: &ColumnKeyMap) -> DataKind {
    let has_date = map.contains(&Column::Date);
    let has_entity = map.columns().any(Column::is_entity);

    if has_date && !has_entity {
        DataKind::Timeseries
    } else if has_entity {
        DataKind::Creatives
    } else if has_date {
        DataKind::Timeseries
    } else {
        DataKind::Creatives
    }
}
