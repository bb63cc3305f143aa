//! Creative builder: one [`CreativeRecord`] per campaign/ad row.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CellValue, Column, ColumnKeyMap, CreativeRecord, RawRow};

use super::coerce::{coerce_date, coerce_number, coerce_status, round2};

/// Game titles recognized inside campaign names.
///
/// Order matters: the first title contained in a name segment wins.
pub const DEFAULT_GAME_TITLES: &[&str] = &[
    "Fortnite",
    "Valorant",
    "CS2",
    "CSGO",
    "Minecraft",
    "Roblox",
    "GTA",
    "GTA V",
    "League of Legends",
    "Apex",
    "Call of Duty",
    "Overwatch",
    "Rocket League",
    "PUBG",
    "Destiny",
    "Halo",
    "Rainbow Six",
    "Dota",
    "TFT",
    "Elden Ring",
    "Arma",
    "EA Sports",
    "Brawlhalla",
    "Fall Guys",
    "War Thunder",
    "Escape from Tarkov",
    "Garrys Mod",
    "Helldivers",
    "Dead by Daylight",
    "Lethal Company",
    "Content Warning",
];

const NAME_SEPARATORS: [char; 5] = ['-', '–', '—', '|', ':'];

/// Derive the game a campaign promotes from its name.
///
/// The name is split on `- – — | :`; the first segment containing a known title (case-insensitive)
/// yields that title. Otherwise the first segment is used when there are at least two, else the
/// whole name.
pub fn extract_game(campaign_name: &str, titles: &[&str]) -> String {
    let parts: Vec<&str> = campaign_name
        .split(NAME_SEPARATORS)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    for part in &parts {
        let part_lower = part.to_lowercase();
        if let Some(title) = titles
            .iter()
            .find(|t| part_lower.contains(&t.to_lowercase()))
        {
            return (*title).to_string();
        }
    }

    if parts.len() >= 2 {
        parts[0].to_string()
    } else {
        campaign_name.to_string()
    }
}

/// Format the synthetic record id for the `n`th surviving row (1-based).
pub fn creative_id(n: usize) -> String {
    format!("GAD-{n:03}")
}

/// Column lookups over one raw row.
struct RowView<'a> {
    row: &'a RawRow,
    map: &'a ColumnKeyMap,
}

impl<'a> RowView<'a> {
    fn cell(&self, column: &Column) -> Option<&'a CellValue> {
        self.map.index_of(column).and_then(|idx| self.row.get(idx))
    }

    fn text(&self, column: &Column) -> String {
        self.cell(column)
            .map(|c| c.to_text().trim().to_string())
            .unwrap_or_default()
    }

    fn number(&self, column: &Column) -> f64 {
        self.cell(column).map(coerce_number).unwrap_or(0.0)
    }

    fn non_blank(&self, column: &Column) -> Option<&'a CellValue> {
        self.cell(column).filter(|c| !c.is_blank())
    }
}

/// Build creative records from raw rows, sorted descending by spend.
///
/// Rows with a blank campaign name, a name containing "total" (summary/footer rows), or
/// all-zero impressions, clicks, cost and viewable impressions are dropped. Ids are assigned in
/// encounter order after filtering.
///
/// Returns [`IngestionError::NoValidData`] if no row survives.
pub fn build_creatives(
    rows: &[RawRow],
    map: &ColumnKeyMap,
    game_titles: &[&str],
) -> IngestionResult<Vec<CreativeRecord>> {
    let has_clicks = map.contains(&Column::Clicks);

    let mut creatives: Vec<CreativeRecord> = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let view = RowView { row, map };

        let campaign = view.text(&Column::Campaign);
        if campaign.is_empty() || campaign.to_lowercase().contains("total") {
            tracing::debug!(row = row_idx, campaign = %campaign, "skipping unnamed or summary row");
            continue;
        }

        let impressions = view.number(&Column::Impressions);
        let conversions = view.number(&Column::Conversions);
        let cost = view.number(&Column::Cost);
        let video_views = view.number(&Column::VideoViews);
        let viewable_impressions = view.number(&Column::ViewableImpressions);
        let clicks = if has_clicks {
            view.number(&Column::Clicks)
        } else {
            view.number(&Column::Interactions)
        };

        if impressions == 0.0 && clicks == 0.0 && cost == 0.0 && viewable_impressions == 0.0 {
            tracing::debug!(row = row_idx, campaign = %campaign, "skipping row with no metrics");
            continue;
        }

        let cpa = match view.non_blank(&Column::Cpa) {
            Some(cell) => coerce_number(cell),
            None if conversions > 0.0 => cost / conversions,
            None => 0.0,
        };

        let hook_type = [Column::CampaignType, Column::AdGroup]
            .iter()
            .map(|c| view.text(c))
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "Campaign".to_string());

        let launch_date = view
            .non_blank(&Column::Date)
            .or_else(|| view.non_blank(&Column::StartDate))
            .map(coerce_date)
            .unwrap_or_default();

        creatives.push(CreativeRecord {
            id: creative_id(creatives.len() + 1),
            creator: campaign.clone(),
            game: extract_game(&campaign, game_titles),
            hook_type,
            campaign_name: campaign,
            launch_date,
            impressions: impressions.round() as i64,
            clicks: clicks.round() as i64,
            installs: conversions.round() as i64,
            spend: round2(cost),
            cpa: round2(cpa),
            video_views: video_views.round() as i64,
            viewable_impressions: viewable_impressions.round() as i64,
            status: view
                .cell(&Column::Status)
                .map(coerce_status)
                .unwrap_or_else(|| coerce_status(&CellValue::Blank)),
            budget: view.number(&Column::Budget),
            campaign_type: view.text(&Column::CampaignType),
            bid_strategy: view.text(&Column::BidStrategy),
            account: view.text(&Column::Account),
        });
    }

    if creatives.is_empty() {
        return Err(IngestionError::NoValidData);
    }

    creatives.sort_by(|a, b| b.spend.total_cmp(&a.spend));
    Ok(creatives)
}
