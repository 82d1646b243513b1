//! CSV report generation.
//!
//! Two shapes: a sectioned full-campaign report covering the raw record,
//! and a compact key/value metrics export built from a derived snapshot.

use crate::format::{format_percentage, hours_label};
use chrono::{DateTime, NaiveDate, Utc};
use ctv_core::types::{AttributionMode, CampaignRecord, TimeBucket};
use ctv_derivation::snapshot::MetricsSnapshot;
use ctv_derivation::{adjust_confidence, ConfidenceTier};

/// Quote a field only when it needs it; embedded quotes double.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn row<const N: usize>(fields: [&str; N]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Sectioned full-campaign CSV report: summary, overview metrics, nodes,
/// links with raw and mode-adjusted confidence, the time-to-conversion
/// histogram, and the exposed-vs-control comparison.
pub fn full_report_csv(
    record: &CampaignRecord,
    mode: AttributionMode,
    generated: DateTime<Utc>,
) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let exposed = &record.exposed_group;
    let control = &record.control_group;

    rows.push(row(["CTV Attribution Report"]));
    rows.push(row(["Campaign", &record.name]));
    rows.push(row(["Attribution Mode", mode.as_str()]));
    rows.push(row([
        "Generated",
        &generated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ]));
    rows.push(Vec::new());

    rows.push(row(["=== CAMPAIGN OVERVIEW ==="]));
    rows.push(row(["Metric", "Value"]));
    rows.push(row(["CTV Impressions", &exposed.impressions.to_string()]));
    rows.push(row(["Total Conversions", &exposed.conversions.to_string()]));
    rows.push(row([
        "Overall Conversion Rate",
        &format_percentage(exposed.conversion_rate, 3),
    ]));
    rows.push(row(["Attribution Paths", &record.links.len().to_string()]));
    rows.push(Vec::new());

    rows.push(row(["=== ATTRIBUTION NODES ==="]));
    rows.push(row(["Node ID", "Label", "Volume"]));
    for node in &record.nodes {
        rows.push(row([&node.id, &node.label, &node.value.to_string()]));
    }
    rows.push(Vec::new());

    rows.push(row(["=== ATTRIBUTION LINKS ==="]));
    rows.push(row([
        "Source",
        "Target",
        "Volume",
        "Raw Confidence",
        "Adjusted Confidence",
        "Confidence Level",
    ]));
    for link in &record.links {
        let adjusted = adjust_confidence(link.confidence, mode);
        rows.push(row([
            &link.source,
            &link.target,
            &link.value.to_string(),
            &format_percentage(link.confidence, 1),
            &format_percentage(adjusted, 1),
            ConfidenceTier::for_score(adjusted).as_str(),
        ]));
    }
    rows.push(Vec::new());

    rows.push(row(["=== TIME-TO-CONVERSION DISTRIBUTION ==="]));
    rows.push(row(["Time Window", "Count", "Percentage"]));
    for bucket in TimeBucket::ALL {
        let stats = record.bucket(bucket);
        rows.push(row([
            bucket.label(),
            &stats.count.to_string(),
            &format!("{}%", stats.percentage),
        ]));
    }
    rows.push(Vec::new());

    rows.push(row(["=== INCREMENTALITY ANALYSIS ==="]));
    rows.push(row(["Group", "Impressions", "Conversions", "Conversion Rate"]));
    rows.push(row([
        "Exposed",
        &exposed.impressions.to_string(),
        &exposed.conversions.to_string(),
        &format_percentage(exposed.conversion_rate, 3),
    ]));
    rows.push(row([
        "Control",
        &control.impressions.to_string(),
        &control.conversions.to_string(),
        &format_percentage(control.conversion_rate, 3),
    ]));
    rows.push(Vec::new());
    rows.push(row([
        "Relative Lift",
        &format!("+{:.1}%", record.lift.relative),
    ]));
    rows.push(row([
        "Absolute Lift",
        &format!("+{:.4}%", record.lift.absolute * 100.0),
    ]));
    rows.push(row(["P-Value", &record.lift.p_value.to_string()]));
    rows.push(row([
        "Confidence Interval",
        &format!(
            "{} - {}",
            format_percentage(record.lift.confidence_interval[0], 3),
            format_percentage(record.lift.confidence_interval[1], 3),
        ),
    ]));
    rows.push(row([
        "Incremental Conversions",
        &(exposed.conversions as i64 - control.conversions as i64).to_string(),
    ]));
    rows.push(Vec::new());

    rows.push(row(["=== DATA SOURCE ==="]));
    rows.push(row([
        "Note",
        "Synthetic data generated for demonstration purposes. Not real campaign data.",
    ]));
    rows.push(row(["Tool", "CTV Attribution Path Visualizer"]));

    render_rows(&rows)
}

/// Compact key/value metrics CSV from a derived snapshot. Every field is
/// quoted.
pub fn metrics_csv(snap: &MetricsSnapshot) -> String {
    let rows: Vec<Vec<String>> = vec![
        row(["Metric", "Value"]),
        row(["Campaign", &snap.campaign_name]),
        row(["Attribution Mode", snap.mode.as_str()]),
        row(["CTV Impressions", &snap.ctv_impressions.to_string()]),
        row(["Total Conversions", &snap.total_conversions.to_string()]),
        row(["Overall CVR", &format_percentage(snap.overall_conversion_rate, 3)]),
        row(["Attribution Paths", &snap.total_paths.to_string()]),
        row([
            "Device Crossover Rate",
            &format_percentage(snap.crossover_rate, 1),
        ]),
        row([
            "Avg Attribution Confidence",
            &format_percentage(snap.avg_confidence, 1),
        ]),
        row([
            "High-Confidence Paths",
            &snap.high_confidence_paths.to_string(),
        ]),
        row([
            "Cross-Device Conversions",
            &format_percentage(snap.cross_device_conversion_share, 1),
        ]),
        row([
            "CTV Lift vs Control",
            &format!("+{:.1}%", snap.impact.relative_lift_pct),
        ]),
        row(["P-Value", &snap.impact.p_value.to_string()]),
        row([
            "Incremental Conversions",
            &snap.impact.incremental_conversions.to_string(),
        ]),
        row([
            "Confidence Interval",
            &format!("{:.2}% - {:.2}%", snap.impact.ci_low_pct, snap.impact.ci_high_pct),
        ]),
        row([
            "Median Time-to-Conversion",
            &hours_label(snap.timing.median_hours),
        ]),
        row(["75th %ile", &hours_label(snap.timing.p75_hours)]),
        row(["Peak Window", snap.timing.peak.label()]),
        row(["Fastest Bucket", snap.timing.fastest.label()]),
    ];

    rows.iter()
        .map(|r| {
            r.iter()
                .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build an export filename: whitespace in the campaign name collapses to
/// underscores, date-stamped, e.g. `CTV_Metrics_Spring_Sale_2026-08-24.csv`.
pub fn export_filename(prefix: &str, campaign_name: &str, date: NaiveDate, extension: &str) -> String {
    let name = campaign_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{prefix}_{name}_{date}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ctv_catalog::CampaignCatalog;
    use ctv_core::config::DerivationConfig;
    use ctv_derivation::snapshot::snapshot;

    fn ecom() -> CampaignRecord {
        CampaignCatalog::load()
            .unwrap()
            .get("camp-ecom-spring")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_full_report_sections() {
        let generated = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        let csv = full_report_csv(&ecom(), AttributionMode::Household, generated);

        assert!(csv.starts_with("CTV Attribution Report"));
        for section in [
            "=== CAMPAIGN OVERVIEW ===",
            "=== ATTRIBUTION NODES ===",
            "=== ATTRIBUTION LINKS ===",
            "=== TIME-TO-CONVERSION DISTRIBUTION ===",
            "=== INCREMENTALITY ANALYSIS ===",
            "=== DATA SOURCE ===",
        ] {
            assert!(csv.contains(section), "missing section {section}");
        }
        assert!(csv.contains("Attribution Mode,household"));
        assert!(csv.contains("Overall Conversion Rate,0.310%"));
        // Raw 0.95 boosted and clamped to 100% in household mode.
        assert!(csv.contains("ctv,tv_browser,45000,95.0%,100.0%,High"));
        assert!(csv.contains("Incremental Conversions,2325"));
    }

    #[test]
    fn test_full_report_lists_every_bucket() {
        let generated = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        let csv = full_report_csv(&ecom(), AttributionMode::Individual, generated);
        for bucket in TimeBucket::ALL {
            assert!(csv.contains(bucket.label()));
        }
    }

    #[test]
    fn test_metrics_csv_quotes_everything() {
        let record = ecom();
        let snap = snapshot(
            &record,
            AttributionMode::Household,
            70,
            &DerivationConfig::default(),
        );
        let csv = metrics_csv(&snap);

        assert!(csv.starts_with("\"Metric\",\"Value\""));
        assert!(csv.contains("\"CTV Impressions\",\"1500000\""));
        assert!(csv.contains("\"Incremental Conversions\",\"2325\""));
        for line in csv.lines() {
            assert!(line.starts_with('"') && line.ends_with('"'));
        }
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(
            export_filename("CTV_Metrics", "Spring Sale - Home & Garden", date, "csv"),
            "CTV_Metrics_Spring_Sale_-_Home_&_Garden_2026-08-24.csv"
        );
    }
}
