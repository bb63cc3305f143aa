//! Roll-up of a creative list into headline figures.

use serde::{Deserialize, Serialize};

use crate::types::{CreativeRecord, CreativeStatus};

use super::coerce::round2;

/// Headline totals for a set of creatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeSummary {
    /// Spend across running creatives.
    pub total_spend: f64,
    /// Installs across running creatives.
    pub total_installs: i64,
    /// `total_spend / total_installs`, rounded to 2 decimals; `0` without installs.
    pub avg_cpa: f64,
    pub creatives_total: usize,
    pub paused: usize,
}

/// Summarize creatives. Totals only count running records.
pub fn summarize(creatives: &[CreativeRecord]) -> CreativeSummary {
    let running = creatives
        .iter()
        .filter(|c| c.status == CreativeStatus::Running);

    let (total_spend, total_installs) = running.fold((0.0, 0_i64), |(spend, installs), c| {
        (spend + c.spend, installs + c.installs)
    });

    let avg_cpa = if total_installs > 0 {
        round2(total_spend / total_installs as f64)
    } else {
        0.0
    };

    CreativeSummary {
        total_spend,
        total_installs,
        avg_cpa,
        creatives_total: creatives.len(),
        paused: creatives
            .iter()
            .filter(|c| c.status == CreativeStatus::Paused)
            .count(),
    }
}
