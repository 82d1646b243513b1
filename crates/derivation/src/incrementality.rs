//! Incrementality framing — turns precomputed exposed/control statistics
//! into display-ready incremental-impact figures. Nothing here performs
//! statistical inference; the lift CI and p-value come straight from the
//! record.

use ctv_core::config::DerivationConfig;
use ctv_core::types::CampaignRecord;
use serde::{Deserialize, Serialize};

/// Lift is considered statistically significant below this p-value.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalImpact {
    /// Exposed minus control conversions; negative for underperforming
    /// campaigns.
    pub incremental_conversions: i64,
    /// Incremental conversions priced at the configured average order value.
    pub incremental_revenue: f64,
    /// Lift CI bounds expressed relative to the control conversion rate,
    /// in percent.
    pub ci_low_pct: f64,
    pub ci_high_pct: f64,
    pub relative_lift_pct: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Frame a campaign's incremental impact.
///
/// The relative CI bounds divide the absolute CI by the control conversion
/// rate; a zero control rate substitutes 1 as the denominator. That
/// fallback understates the percentage instead of erroring and is kept
/// deliberately for parity with the reference behavior.
pub fn compute_incremental_impact(
    record: &CampaignRecord,
    config: &DerivationConfig,
) -> IncrementalImpact {
    let exposed = &record.exposed_group;
    let control = &record.control_group;

    let incremental_conversions = exposed.conversions as i64 - control.conversions as i64;
    let incremental_revenue = incremental_conversions as f64 * config.average_order_value;

    let denominator = if control.conversion_rate == 0.0 {
        1.0
    } else {
        control.conversion_rate
    };
    let [ci_low, ci_high] = record.lift.confidence_interval;

    IncrementalImpact {
        incremental_conversions,
        incremental_revenue,
        ci_low_pct: ci_low / denominator * 100.0,
        ci_high_pct: ci_high / denominator * 100.0,
        relative_lift_pct: record.lift.relative,
        p_value: record.lift.p_value,
        significant: record.lift.p_value < SIGNIFICANCE_LEVEL,
    }
}
