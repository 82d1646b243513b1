//! Shared data model: campaign records, funnel flow graphs, exposure groups,
//! and the attribution-mode parameter.
//!
//! All entities are immutable once loaded from fixtures. Derivation code
//! receives read-only references and returns freshly allocated results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Funnel stage of a node, assigned when the fixture is built. Derivation
/// code branches on this tag — never on node id strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single top-of-funnel impression source.
    Impression,
    /// A device-crossover segment.
    Crossover,
    /// A site-visit segment.
    Visit,
    /// A conversion-event segment.
    Conversion,
}

/// Device surface a crossover/visit/conversion node belongs to.
/// `Unmatched` marks the sentinel that collects impressions never matched
/// to any device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceChannel {
    Mobile,
    Desktop,
    Tv,
    Unmatched,
}

/// One stage/segment in the funnel. `value` is the absolute volume
/// (people or impressions) at this node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub value: u64,
    pub kind: NodeKind,
    /// Absent for the impression source, which spans all devices.
    #[serde(default)]
    pub channel: Option<DeviceChannel>,
}

/// A directed edge in the funnel graph. `confidence` is the raw
/// match-confidence in [0, 1] before any mode adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub value: u64,
    pub confidence: f64,
}

/// Attribution mode — how conservatively cross-device matches are trusted.
/// A pure parameter: nothing persists it, every derivation receives it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributionMode {
    /// Household-level matching, broader and more permissive.
    #[default]
    Household,
    /// Individual-level matching, stricter and more conservative.
    Individual,
}

impl AttributionMode {
    /// Uniform multiplier applied to every edge's raw confidence.
    pub fn confidence_multiplier(self) -> f64 {
        match self {
            AttributionMode::Household => 1.15,
            AttributionMode::Individual => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributionMode::Household => "household",
            AttributionMode::Individual => "individual",
        }
    }

    /// Parse the wire form used by share links and CLI flags.
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "household" => Some(AttributionMode::Household),
            "individual" => Some(AttributionMode::Individual),
            _ => None,
        }
    }
}

/// Time-to-conversion histogram bucket. The order of [`TimeBucket::ALL`] is
/// the canonical ascending time order; percentile estimation depends on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeBucket {
    #[serde(rename = "< 1 hour")]
    UnderOneHour,
    #[serde(rename = "1-6 hours")]
    OneToSixHours,
    #[serde(rename = "6-24 hours")]
    SixToTwentyFourHours,
    #[serde(rename = "1-3 days")]
    OneToThreeDays,
    #[serde(rename = "3-7 days")]
    ThreeToSevenDays,
    #[serde(rename = "7+ days")]
    SevenPlusDays,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 6] = [
        TimeBucket::UnderOneHour,
        TimeBucket::OneToSixHours,
        TimeBucket::SixToTwentyFourHours,
        TimeBucket::OneToThreeDays,
        TimeBucket::ThreeToSevenDays,
        TimeBucket::SevenPlusDays,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::UnderOneHour => "< 1 hour",
            TimeBucket::OneToSixHours => "1-6 hours",
            TimeBucket::SixToTwentyFourHours => "6-24 hours",
            TimeBucket::OneToThreeDays => "1-3 days",
            TimeBucket::ThreeToSevenDays => "3-7 days",
            TimeBucket::SevenPlusDays => "7+ days",
        }
    }

    /// Midpoint of the bucket's time window in hours. Bucket boundaries are
    /// not tracked; percentile estimation interpolates around these.
    pub fn midpoint_hours(self) -> f64 {
        match self {
            TimeBucket::UnderOneHour => 0.5,
            TimeBucket::OneToSixHours => 3.5,
            TimeBucket::SixToTwentyFourHours => 15.0,
            TimeBucket::OneToThreeDays => 48.0,
            TimeBucket::ThreeToSevenDays => 120.0,
            TimeBucket::SevenPlusDays => 240.0,
        }
    }
}

/// Count and share of conversions falling in one time bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BucketStats {
    pub count: u64,
    pub percentage: f64,
}

/// Summary statistics for an exposed or control population.
/// `conversion_rate` is stored by the fixture and never re-derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupStats {
    pub impressions: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
}

/// Precomputed exposed-vs-control lift statistics. Treated as external
/// truth; nothing in the derivation core recomputes these from raw samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftStats {
    pub absolute: f64,
    pub relative: f64,
    pub p_value: f64,
    /// Absolute CI bounds on the lift: [low, high].
    pub confidence_interval: [f64; 2],
}

/// One campaign's full attribution dataset: funnel graph, time-to-conversion
/// histogram, and exposed/control lift analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub name: String,
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowEdge>,
    pub time_to_conversion: HashMap<TimeBucket, BucketStats>,
    pub exposed_group: GroupStats,
    pub control_group: GroupStats,
    pub lift: LiftStats,
}

impl CampaignRecord {
    /// The top-of-funnel impression source, if the record has one.
    pub fn impression_node(&self) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Impression)
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Histogram entry for a bucket; missing buckets read as zero.
    pub fn bucket(&self, bucket: TimeBucket) -> BucketStats {
        self.time_to_conversion
            .get(&bucket)
            .copied()
            .unwrap_or_default()
    }
}

/// Catalog listing entry for campaign pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub impressions: u64,
    pub conversions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_multipliers() {
        assert!(AttributionMode::Household.confidence_multiplier() > 1.0);
        assert!(AttributionMode::Individual.confidence_multiplier() < 1.0);
    }

    #[test]
    fn test_mode_param_round_trip() {
        for mode in [AttributionMode::Household, AttributionMode::Individual] {
            assert_eq!(AttributionMode::from_param(mode.as_str()), Some(mode));
        }
        assert_eq!(AttributionMode::from_param("both"), None);
    }

    #[test]
    fn test_bucket_order_is_ascending_in_time() {
        let midpoints: Vec<f64> = TimeBucket::ALL.iter().map(|b| b.midpoint_hours()).collect();
        assert!(midpoints.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bucket_labels_deserialize() {
        let bucket: TimeBucket = serde_json::from_str("\"6-24 hours\"").unwrap();
        assert_eq!(bucket, TimeBucket::SixToTwentyFourHours);
    }
}
