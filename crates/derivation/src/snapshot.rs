//! One-shot metrics snapshot — everything the dashboard panels and the
//! exporters need for a single `(campaign, mode, threshold)` selection.

use crate::confidence::{average_adjusted_confidence, ConfidenceTier};
use crate::funnel::derive_funnel;
use crate::incrementality::{compute_incremental_impact, IncrementalImpact};
use crate::quality::{score_data_quality, QualityScore};
use crate::timing::{summarize_timing, TimingSummary};
use ctv_core::config::DerivationConfig;
use ctv_core::types::{AttributionMode, CampaignRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub campaign_id: String,
    pub campaign_name: String,
    pub mode: AttributionMode,
    pub threshold_percent: u8,
    pub ctv_impressions: u64,
    pub total_conversions: u64,
    pub overall_conversion_rate: f64,
    pub total_paths: usize,
    pub retained_paths: usize,
    pub crossover_rate: f64,
    pub avg_confidence: f64,
    pub avg_confidence_tier: ConfidenceTier,
    pub high_confidence_paths: usize,
    pub cross_device_conversion_share: f64,
    pub quality: QualityScore,
    pub impact: IncrementalImpact,
    pub timing: TimingSummary,
}

/// Derive the full metrics snapshot for one selection.
///
/// Averages and the high-confidence count run over all edges; only
/// `retained_paths` reflects the threshold.
pub fn snapshot(
    record: &CampaignRecord,
    mode: AttributionMode,
    threshold_percent: u8,
    config: &DerivationConfig,
) -> MetricsSnapshot {
    let funnel = derive_funnel(record, mode, threshold_percent);
    let avg_confidence = average_adjusted_confidence(&record.links, mode);
    tracing::debug!(
        campaign = %record.id,
        mode = mode.as_str(),
        threshold_percent,
        retained = funnel.retained_count,
        "derived metrics snapshot"
    );

    MetricsSnapshot {
        campaign_id: record.id.clone(),
        campaign_name: record.name.clone(),
        mode,
        threshold_percent: threshold_percent.min(100),
        ctv_impressions: record.impression_node().map_or(0, |n| n.value),
        total_conversions: record.exposed_group.conversions,
        overall_conversion_rate: record.exposed_group.conversion_rate,
        total_paths: funnel.total_count,
        retained_paths: funnel.retained_count,
        crossover_rate: funnel.crossover_rate,
        avg_confidence,
        avg_confidence_tier: ConfidenceTier::for_score(avg_confidence),
        high_confidence_paths: funnel.high_confidence_count,
        cross_device_conversion_share: funnel.cross_device_conversion_share,
        quality: score_data_quality(record, mode, config),
        impact: compute_incremental_impact(record, config),
        timing: summarize_timing(record),
    }
}
