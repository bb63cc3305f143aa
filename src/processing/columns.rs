//! Header normalization onto the canonical [`Column`] vocabulary.

use crate::types::{Column, ColumnKeyMap};

/// Append-only synonym table. Keys are cleaned lowercase header text.
const SYNONYMS: &[(&str, Column)] = &[
    // Campaign / ad identifiers
    ("campaign", Column::Campaign),
    ("campaign name", Column::Campaign),
    ("ad group", Column::AdGroup),
    ("ad group name", Column::AdGroup),
    ("ad", Column::AdName),
    ("ad name", Column::AdName),
    ("ad group ad", Column::AdName),
    ("headline", Column::AdName),
    // Status
    ("status", Column::Status),
    ("campaign status", Column::Status),
    ("ad group status", Column::Status),
    ("ad status", Column::Status),
    // Metrics
    ("impressions", Column::Impressions),
    ("impr.", Column::Impressions),
    ("impr", Column::Impressions),
    ("clicks", Column::Clicks),
    ("interactions", Column::Interactions),
    ("interaction rate", Column::InteractionRate),
    ("conversions", Column::Conversions),
    ("conv.", Column::Conversions),
    ("conv", Column::Conversions),
    ("all conv.", Column::Conversions),
    ("all conversions", Column::Conversions),
    ("conv. (platform comparable)", Column::Conversions),
    ("cost", Column::Cost),
    ("cost / conv.", Column::Cpa),
    ("cost/conv.", Column::Cpa),
    ("cost / conversion", Column::Cpa),
    ("cost / conv. (platform comparable)", Column::Cpa),
    ("avg. cpa", Column::Cpa),
    ("cpa", Column::Cpa),
    ("cost / conv", Column::Cpa),
    ("video views", Column::VideoViews),
    ("views", Column::VideoViews),
    ("ctr", Column::Ctr),
    ("viewable ctr", Column::ViewableCtr),
    ("avg. cpc", Column::AvgCpc),
    ("avg. cpm", Column::AvgCpm),
    ("avg. cpv", Column::AvgCpv),
    ("trueview avg. cpv", Column::AvgCpv),
    ("avg. cost", Column::AvgCost),
    ("conv. rate", Column::ConvRate),
    ("conv. value", Column::ConvValue),
    ("conv. value / cost", Column::ConvValuePerCost),
    ("view rate", Column::ViewRate),
    ("viewable impr.", Column::ViewableImpressions),
    // Budget & account
    ("budget", Column::Budget),
    ("budget type", Column::BudgetType),
    ("account", Column::Account),
    ("campaign type", Column::CampaignType),
    ("type", Column::CampaignType),
    ("currency", Column::Currency),
    ("currency code", Column::CurrencyCode),
    ("bid strategy type", Column::BidStrategy),
    ("optimization score", Column::OptimizationScore),
    // Dates
    ("day", Column::Date),
    ("date", Column::Date),
    ("date range", Column::Date),
    ("start date", Column::StartDate),
];

/// Lowercase, trim, drop zero-width/control characters and collapse whitespace runs.
pub fn clean_header(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| !is_invisible(*c))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{2060}')
        || (c.is_control() && !c.is_whitespace())
}

/// Map a raw header onto its canonical column, falling back to the cleaned text.
pub fn normalize_column_name(raw: &str) -> Column {
    let cleaned = clean_header(raw);
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == cleaned)
        .map(|(_, column)| column.clone())
        .unwrap_or(Column::Other(cleaned))
}

/// Build the header -> canonical column map for one file.
pub fn build_column_map(headers: &[String]) -> ColumnKeyMap {
    ColumnKeyMap {
        entries: headers
            .iter()
            .map(|h| (h.clone(), normalize_column_name(h)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_header_strips_invisible_and_collapses_space() {
        assert_eq!(clean_header("  Cost  /\tConv. "), "cost / conv.");
        assert_eq!(clean_header("\u{FEFF}Campaign"), "campaign");
        assert_eq!(clean_header("Impr\u{200B}."), "impr.");
        assert_eq!(clean_header("Clicks\u{0000}"), "clicks");
    }

    #[test]
    fn synonyms_map_to_canonical_columns() {
        assert_eq!(normalize_column_name("Campaign name"), Column::Campaign);
        assert_eq!(normalize_column_name("Impr."), Column::Impressions);
        assert_eq!(normalize_column_name("Conv."), Column::Conversions);
        assert_eq!(normalize_column_name("Cost / conv."), Column::Cpa);
        assert_eq!(normalize_column_name("Avg. CPA"), Column::Cpa);
        assert_eq!(normalize_column_name("Viewable impr."), Column::ViewableImpressions);
        assert_eq!(normalize_column_name("TrueView avg. CPV"), Column::AvgCpv);
        assert_eq!(normalize_column_name("Bid strategy type"), Column::BidStrategy);
        assert_eq!(normalize_column_name("Day"), Column::Date);
        assert_eq!(normalize_column_name("Start date"), Column::StartDate);
        assert_eq!(normalize_column_name("Type"), Column::CampaignType);
    }

    #[test]
    fn unknown_headers_pass_through_cleaned() {
        assert_eq!(
            normalize_column_name("  Search  Impr. Share "),
            Column::Other("search impr. share".to_string())
        );
    }

    #[test]
    fn every_synonym_is_unique() {
        for (i, (a, _)) in SYNONYMS.iter().enumerate() {
            assert_eq!(clean_header(a), *a, "synonym '{a}' is not in cleaned form");
            assert!(
                SYNONYMS[i + 1..].iter().all(|(b, _)| a != b),
                "duplicate synonym '{a}'"
            );
        }
    }

    #[test]
    fn column_map_preserves_header_order() {
        let headers = vec!["Day".to_string(), "Impr.".to_string(), "Extra".to_string()];
        let map = build_column_map(&headers);
        assert_eq!(map.canonical_names(), vec!["date", "impressions", "extra"]);
        assert_eq!(map.entries[1].0, "Impr.");
    }
}
