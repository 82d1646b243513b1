//! Funnel derivation — filters the flow graph by adjusted confidence and
//! computes the display aggregates shown alongside it.

use crate::confidence::{adjust_confidence, ConfidenceTier};
use ctv_core::types::{AttributionMode, CampaignRecord, DeviceChannel, FlowEdge, NodeKind};
use serde::{Deserialize, Serialize};

/// One edge retained by threshold filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetainedEdge {
    pub edge: FlowEdge,
    pub adjusted_confidence: f64,
    pub tier: ConfidenceTier,
}

/// Threshold-filtered view of a campaign funnel plus its aggregates.
/// Edge order matches the record's link order; it is display-relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredFunnel {
    pub edges: Vec<RetainedEdge>,
    pub retained_count: usize,
    pub total_count: usize,
    /// Edges whose adjusted confidence lands in the High tier, counted over
    /// all edges regardless of the threshold.
    pub high_confidence_count: usize,
    pub crossover_rate: f64,
    pub cross_device_conversion_share: f64,
}

/// Filter a campaign's funnel to the edges whose mode-adjusted confidence
/// meets `threshold_percent` (clamped to [0, 100]).
pub fn derive_funnel(
    record: &CampaignRecord,
    mode: AttributionMode,
    threshold_percent: u8,
) -> FilteredFunnel {
    let threshold = threshold_percent.min(100) as f64 / 100.0;

    let mut edges = Vec::new();
    let mut high_confidence_count = 0;
    for link in &record.links {
        let adjusted = adjust_confidence(link.confidence, mode);
        if ConfidenceTier::for_score(adjusted) == ConfidenceTier::High {
            high_confidence_count += 1;
        }
        if adjusted >= threshold {
            edges.push(RetainedEdge {
                edge: link.clone(),
                adjusted_confidence: adjusted,
                tier: ConfidenceTier::for_score(adjusted),
            });
        }
    }

    FilteredFunnel {
        retained_count: edges.len(),
        total_count: record.links.len(),
        high_confidence_count,
        crossover_rate: crossover_rate(record),
        cross_device_conversion_share: cross_device_conversion_share(record),
        edges,
    }
}

/// Fraction of top-of-funnel impressions matched to any identifiable
/// device: outgoing impression-source volume, excluding edges into the
/// unmatched sentinel, over the impression node's value. Zero when the
/// impression node is absent or has no volume.
pub fn crossover_rate(record: &CampaignRecord) -> f64 {
    let Some(impression) = record.impression_node() else {
        return 0.0;
    };
    if impression.value == 0 {
        return 0.0;
    }

    let detected: u64 = record
        .links
        .iter()
        .filter(|l| l.source == impression.id)
        .filter(|l| {
            // Unresolvable targets read as zero-valued entries.
            record
                .node(&l.target)
                .is_some_and(|n| n.channel != Some(DeviceChannel::Unmatched))
        })
        .map(|l| l.value)
        .sum();

    detected as f64 / impression.value as f64
}

/// Share of exposed-group conversions completed on a device other than the
/// TV itself. Zero when the exposed group recorded no conversions.
pub fn cross_device_conversion_share(record: &CampaignRecord) -> f64 {
    let total = record.exposed_group.conversions;
    if total == 0 {
        return 0.0;
    }

    let cross_device: u64 = record
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Conversion && n.channel != Some(DeviceChannel::Tv))
        .map(|n| n.value)
        .sum();

    cross_device as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctv_catalog::CampaignCatalog;

    fn ecom() -> CampaignRecord {
        CampaignCatalog::load()
            .unwrap()
            .get("camp-ecom-spring")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_crossover_rate_excludes_unmatched() {
        // (350000 + 180000 + 45000) / 1500000
        let rate = crossover_rate(&ecom());
        assert!((rate - 575_000.0 / 1_500_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_85_household_scenario() {
        let funnel = derive_funnel(&ecom(), AttributionMode::Household, 85);

        // ctv -> no_detection (raw 0.20, adjusted 0.23) is excluded.
        assert!(!funnel
            .edges
            .iter()
            .any(|e| e.edge.target == "no_detection"));
        // ctv -> tv_browser (raw 0.95, adjusted clamped to 1.0) is retained.
        let tv = funnel
            .edges
            .iter()
            .find(|e| e.edge.target == "tv_browser")
            .unwrap();
        assert_eq!(tv.adjusted_confidence, 1.0);
        assert_eq!(tv.tier, ConfidenceTier::High);
    }

    #[test]
    fn test_retained_count_monotone_in_threshold() {
        let record = ecom();
        for mode in [AttributionMode::Household, AttributionMode::Individual] {
            let mut prev = usize::MAX;
            for threshold in 0..=100u8 {
                let funnel = derive_funnel(&record, mode, threshold);
                assert!(funnel.retained_count <= prev);
                prev = funnel.retained_count;
            }
        }
    }

    #[test]
    fn test_zero_threshold_retains_everything_in_order() {
        let record = ecom();
        let funnel = derive_funnel(&record, AttributionMode::Individual, 0);
        assert_eq!(funnel.retained_count, record.links.len());
        let targets: Vec<_> = funnel.edges.iter().map(|e| e.edge.target.as_str()).collect();
        let original: Vec<_> = record.links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, original);
    }

    #[test]
    fn test_overflowing_threshold_clamps() {
        let funnel = derive_funnel(&ecom(), AttributionMode::Household, 255);
        let at_hundred = derive_funnel(&ecom(), AttributionMode::Household, 100);
        assert_eq!(funnel.retained_count, at_hundred.retained_count);
    }

    #[test]
    fn test_cross_device_conversion_share() {
        // (2850 + 1620) / 4650 — tv_conv excluded.
        let share = cross_device_conversion_share(&ecom());
        assert!((share - 4470.0 / 4650.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_record_guards() {
        let mut record = ecom();
        record.nodes.clear();
        record.links.clear();
        record.exposed_group.conversions = 0;
        assert_eq!(crossover_rate(&record), 0.0);
        assert_eq!(cross_device_conversion_share(&record), 0.0);
        let funnel = derive_funnel(&record, AttributionMode::Household, 50);
        assert_eq!(funnel.total_count, 0);
    }
}
