use std::path::PathBuf;

use ad_export_ingest::ingestion::{
    parse_bytes, parse_path, parse_path_async, parse_text, IngestionFormat, ParseOptions, ParseRequest,
};
use ad_export_ingest::types::{CreativeStatus, DataKind, ParseResult};
use ad_export_ingest::IngestionError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn utf16(text: &str, little_endian: bool, bom: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if bom {
        out.extend_from_slice(if little_endian { &[0xFF, 0xFE] } else { &[0xFE, 0xFF] });
    }
    for unit in text.encode_utf16() {
        let bytes = if little_endian {
            unit.to_le_bytes()
        } else {
            unit.to_be_bytes()
        };
        out.extend_from_slice(&bytes);
    }
    out
}

#[test]
fn end_to_end_drops_total_row() {
    let csv = "Campaign,Impressions,Clicks,Cost,Conversions\n\
               Fortnite - Gameplay Montage,10000,500,250.00,50\n\
               Total: All campaigns,10000,500,250.00,50\n";
    let result = parse_text(csv, &ParseOptions::default()).unwrap();

    assert_eq!(result.kind(), DataKind::Creatives);
    let creatives = result.creatives().unwrap();
    assert_eq!(creatives.len(), 1);

    let c = &creatives[0];
    assert_eq!(c.id, "GAD-001");
    assert_eq!(c.creator, "Fortnite - Gameplay Montage");
    assert_eq!(c.game, "Fortnite");
    assert_eq!(c.impressions, 10_000);
    assert_eq!(c.clicks, 500);
    assert_eq!(c.installs, 50);
    assert_eq!(c.spend, 250.0);
    assert_eq!(c.cpa, 5.0);
    assert_eq!(c.status, CreativeStatus::Running);
    assert_eq!(c.hook_type, "Campaign");
}

#[test]
fn campaign_export_with_banner_rows() {
    let result = parse_path(fixture("campaigns.csv"), &ParseOptions::default()).unwrap();
    assert_eq!(result.kind(), DataKind::Creatives);
    assert_eq!(
        result.columns,
        vec![
            "campaign",
            "status",
            "campaignType",
            "impressions",
            "interactions",
            "conversions",
            "cost",
            "cpa",
            "budget",
            "bidStrategy",
            "account",
        ]
    );

    let creatives = result.creatives().unwrap();
    let names: Vec<&str> = creatives.iter().map(|c| c.campaign_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Minecraft - Tutorial", "Fortnite - Gameplay Montage", "Valorant | Highlight Reel"]
    );

    // Ids follow file order, output follows spend.
    let ids: Vec<&str> = creatives.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["GAD-003", "GAD-001", "GAD-002"]);

    let minecraft = &creatives[0];
    assert_eq!(minecraft.game, "Minecraft");
    assert_eq!(minecraft.impressions, 20_000);
    assert_eq!(minecraft.clicks, 1_200);
    assert_eq!(minecraft.cpa, 4.5);
    assert_eq!(minecraft.status, CreativeStatus::Running);
    assert_eq!(minecraft.hook_type, "Video");
    assert_eq!(minecraft.budget, 80.0);
    assert_eq!(minecraft.bid_strategy, "Target CPA");
    assert_eq!(minecraft.account, "Medal");

    let fortnite = &creatives[1];
    assert_eq!(fortnite.cpa, 5.0);
    assert_eq!(fortnite.clicks, 600);

    let valorant = &creatives[2];
    assert_eq!(valorant.game, "Valorant");
    assert_eq!(valorant.status, CreativeStatus::Paused);
    assert_eq!(valorant.spend, 150.0);
}

#[test]
fn daily_tsv_with_banner_rows_is_time_series() {
    let result = parse_path(fixture("daily.tsv"), &ParseOptions::default()).unwrap();
    assert_eq!(result.kind(), DataKind::Timeseries);
    assert_eq!(result.columns, vec!["date", "impressions", "clicks", "cost", "conversions"]);

    let points = result.time_series().unwrap();
    let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-01-05", "2026-01-06", "2026-02-02"]);

    assert_eq!(points[0].impressions, Some(1_000.0));
    assert_eq!(points[0].cost, Some(20.0));
    assert_eq!(points[1].clicks, Some(0.0));
    assert_eq!(points[2].conversions, Some(6.0));
    assert_eq!(points[0].ctr, None);
    assert_eq!(points[0].video_views, None);
}

#[test]
fn utf16_and_utf8_yield_identical_results() {
    let text = std::fs::read_to_string(fixture("campaigns.csv")).unwrap();
    let expected = parse_bytes(text.as_bytes(), "csv", &ParseOptions::default()).unwrap();

    for (le, bom) in [(true, true), (true, false), (false, true), (false, false)] {
        let bytes = utf16(&text, le, bom);
        let got = parse_bytes(&bytes, "csv", &ParseOptions::default()).unwrap();
        assert_eq!(got, expected, "little_endian={le} bom={bom}");
        assert_eq!(
            serde_json::to_string(&got).unwrap(),
            serde_json::to_string(&expected).unwrap()
        );
    }

    let tsv = std::fs::read_to_string(fixture("daily.tsv")).unwrap();
    let expected = parse_bytes(tsv.as_bytes(), "tsv", &ParseOptions::default()).unwrap();
    let got = parse_bytes(&utf16(&tsv, true, true), "tsv", &ParseOptions::default()).unwrap();
    assert_eq!(got, expected);
}

#[test]
fn parsing_is_idempotent() {
    let a = parse_path(fixture("campaigns.csv"), &ParseOptions::default()).unwrap();
    let b = parse_path(fixture("campaigns.csv"), &ParseOptions::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn classification_follows_entity_precedence() {
    let opts = ParseOptions::default();

    let daily = parse_text("Date,Impressions\n2026-01-05,10\n", &opts).unwrap();
    assert_eq!(daily.kind(), DataKind::Timeseries);

    let campaigns = parse_text("Campaign,Impressions,Cost\nA,10,1\n", &opts).unwrap();
    assert_eq!(campaigns.kind(), DataKind::Creatives);

    let both = parse_text("Date,Campaign,Impressions\n2026-01-05,A,10\n", &opts).unwrap();
    assert_eq!(both.kind(), DataKind::Creatives);
    assert_eq!(both.creatives().unwrap()[0].launch_date, "2026-01-05");
}

#[test]
fn creatives_sorted_by_spend_descending() {
    let csv = "Campaign,Cost\nLow,10\nHigh,500\nMid,50\n";
    let result = parse_text(csv, &ParseOptions::default()).unwrap();
    let spends: Vec<f64> = result.creatives().unwrap().iter().map(|c| c.spend).collect();
    assert_eq!(spends, vec![500.0, 50.0, 10.0]);
}

#[test]
fn derived_cpa_without_a_cpa_column() {
    let csv = "Campaign,Cost,Conversions\nA,100,20\nB,40,0\n";
    let result = parse_text(csv, &ParseOptions::default()).unwrap();
    let creatives = result.creatives().unwrap();
    assert_eq!(creatives[0].cpa, 5.0);
    assert_eq!(creatives[1].cpa, 0.0);
}

#[test]
fn all_rows_filtered_is_no_valid_data() {
    let err = parse_path(fixture("no_valid_rows.csv"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::NoValidData));
    assert_eq!(err.to_string(), "no valid ad data found in file");
}

#[test]
fn header_only_file_is_empty() {
    let err = parse_path(fixture("header_only.csv"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyFile));

    let err = parse_bytes(b"", "csv", &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyFile));
}

#[test]
fn unsupported_extension_is_named() {
    let err = parse_path(fixture("report.pdf"), &ParseOptions::default()).unwrap_err();
    match err {
        IngestionError::UnsupportedFormat { extension } => assert_eq!(extension, "pdf"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn format_override_ignores_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.txt");
    std::fs::write(&path, "Campaign,Cost\nA,5\n").unwrap();

    let opts = ParseOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let result = parse_path(&path, &opts).unwrap();
    assert_eq!(result.creatives().unwrap()[0].spend, 5.0);

    let request = ParseRequest { path, options: opts };
    assert_eq!(request.run().unwrap(), result);
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_path(fixture("does_not_exist.csv"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)));
}

#[tokio::test]
async fn async_parse_matches_sync_parse() {
    let sync = parse_path(fixture("daily.tsv"), &ParseOptions::default()).unwrap();
    let async_result = parse_path_async(fixture("daily.tsv"), &ParseOptions::default())
        .await
        .unwrap();
    assert_eq!(sync, async_result);
}

#[test]
fn result_json_shape() {
    let result = parse_path(fixture("campaigns.csv"), &ParseOptions::default()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["type"], "creatives");
    assert_eq!(json["columns"][0], "campaign");
    assert_eq!(json["data"][0]["campaignName"], "Minecraft - Tutorial");
    assert_eq!(json["data"][0]["status"], "running");
    assert_eq!(json["data"][0]["hookType"], "Video");

    let back: ParseResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);

    let daily = parse_path(fixture("daily.tsv"), &ParseOptions::default()).unwrap();
    let json = serde_json::to_value(&daily).unwrap();
    assert_eq!(json["type"], "timeseries");
    assert!(json["data"][0].get("ctr").is_none());
    assert_eq!(json["data"][0]["cost"], 20.0);
}

#[test]
fn short_year_dates_sort_chronologically() {
    let csv = "Day,Impressions\n1/5/26,10\n12/30/25,5\n01-06-26,7\n";
    let result = parse_text(csv, &ParseOptions::default()).unwrap();
    let dates: Vec<&str> = result
        .time_series()
        .unwrap()
        .iter()
        .map(|p| p.date.as_str())
        .collect();
    assert_eq!(dates, vec!["2025-12-30", "2026-01-05", "2026-01-06"]);
}

#[test]
fn comma_only_rows_count_as_data() {
    let err = parse_text("Campaign,Cost\n,\n", &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::NoValidData));
}
