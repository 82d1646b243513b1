//! Generated key-insight copy for reports.

use crate::format::format_large_number;
use ctv_core::types::{AttributionMode, CampaignRecord};
use ctv_derivation::funnel::crossover_rate;
use ctv_derivation::{average_adjusted_confidence, ConfidenceTier};

/// Crossover rates above this read as "strong" matching in the copy.
const STRONG_CROSSOVER: f64 = 0.2;

fn format_p_value(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_string()
    } else {
        format!("{p:.4}")
    }
}

/// Generate the insight sentences shown on the report's insights page.
pub fn generate_insights(record: &CampaignRecord, mode: AttributionMode) -> Vec<String> {
    let crossover = crossover_rate(record);
    let avg_confidence = average_adjusted_confidence(&record.links, mode);
    let incremental =
        record.exposed_group.conversions as i64 - record.control_group.conversions as i64;

    let mut insights = vec![
        format!(
            "Device crossover rate of {:.1}% indicates {} cross-device matching capability.",
            crossover * 100.0,
            if crossover > STRONG_CROSSOVER {
                "strong"
            } else {
                "moderate"
            },
        ),
        format!(
            "Average attribution confidence of {:.1}% ({}) in {} mode.",
            avg_confidence * 100.0,
            ConfidenceTier::for_score(avg_confidence).as_str(),
            mode.as_str(),
        ),
        format!(
            "CTV ads drove a +{:.1}% lift in conversions compared to the control group (p = {}).",
            record.lift.relative,
            format_p_value(record.lift.p_value),
        ),
        format!(
            "An estimated {} incremental conversions are directly attributable to CTV exposure.",
            format_large_number(incremental),
        ),
    ];

    if record.lift.p_value < 0.05 {
        insights.push(
            "The statistical significance (p < 0.05) confirms that the observed lift is not due to random chance."
                .to_string(),
        );
    }

    insights.push(match mode {
        AttributionMode::Household => {
            "Household-level attribution captures multi-user viewing but may overcount individual intent."
                .to_string()
        }
        AttributionMode::Individual => {
            "Individual-level attribution is more conservative but may undercount shared-device scenarios."
                .to_string()
        }
    });

    insights
}
