//! Time-series builder: one [`TimeSeriesPoint`] per dated row.

use crate::types::{CellValue, Column, ColumnKeyMap, RawRow, TimeSeriesPoint};

use super::coerce::{coerce_date, coerce_number};

/// Build points from raw rows, sorted ascending by date.
///
/// Rows whose date is blank are skipped. A metric is populated only when its column exists in
/// the file, so a file without `Cost` yields points with `cost == None`, not `Some(0.0)`.
/// Same-date rows are kept as separate points.
pub fn build_time_series(rows: &[RawRow], map: &ColumnKeyMap) -> Vec<TimeSeriesPoint> {
    let date_idx = map.index_of(&Column::Date);
    let metric = |row: &RawRow, column: Column| -> Option<f64> {
        map.index_of(&column)
            .map(|idx| coerce_number(row.get(idx).unwrap_or(&CellValue::Blank)))
    };

    let mut points: Vec<TimeSeriesPoint> = Vec::with_capacity(rows.len());
    for row in rows {
        let date = date_idx
            .and_then(|idx| row.get(idx))
            .map(coerce_date)
            .unwrap_or_default();
        if date.is_empty() {
            continue;
        }

        points.push(TimeSeriesPoint {
            date,
            impressions: metric(row, Column::Impressions),
            clicks: metric(row, Column::Clicks),
            conversions: metric(row, Column::Conversions),
            cost: metric(row, Column::Cost),
            video_views: metric(row, Column::VideoViews),
            ctr: metric(row, Column::Ctr),
            cpa: metric(row, Column::Cpa),
        });
    }

    // Stable sort: same-date rows keep file order.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}
