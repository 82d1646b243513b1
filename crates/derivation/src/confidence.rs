//! Attribution-mode confidence adjustment and tier classification.

use ctv_core::types::{AttributionMode, FlowEdge};
use serde::{Deserialize, Serialize};

/// Apply the attribution-mode multiplier to a raw match confidence and
/// clamp the result into [0, 1].
///
/// Household mode boosts scores (broader matching), individual mode scales
/// them down (stricter matching). `raw` is clamped into [0, 1] before
/// adjustment, so callers can feed unvalidated scores.
pub fn adjust_confidence(raw: f64, mode: AttributionMode) -> f64 {
    let raw = raw.clamp(0.0, 1.0);
    (raw * mode.confidence_multiplier()).min(1.0)
}

/// Arithmetic mean of the adjusted confidence over a set of edges.
/// Empty input yields 0.
pub fn average_adjusted_confidence(edges: &[FlowEdge], mode: AttributionMode) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let sum: f64 = edges
        .iter()
        .map(|e| adjust_confidence(e.confidence, mode))
        .sum();
    sum / edges.len() as f64
}

/// Display tier for an adjusted confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// High is exclusive above 0.85; Medium covers [0.70, 0.85] inclusive
    /// on both bounds; everything below 0.70 is Low.
    pub fn for_score(score: f64) -> Self {
        if score > 0.85 {
            ConfidenceTier::High
        } else if score >= 0.70 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::Low => "Low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_household_boosts_and_clamps() {
        for raw in [0.0, 0.1, 0.5, 0.82, 0.95, 1.0] {
            let adjusted = adjust_confidence(raw, AttributionMode::Household);
            assert!(adjusted <= 1.0);
            assert!(adjusted >= raw);
        }
        // 0.95 * 1.15 = 1.0925, clamped
        assert_eq!(adjust_confidence(0.95, AttributionMode::Household), 1.0);
        let low = adjust_confidence(0.20, AttributionMode::Household);
        assert!((low - 0.23).abs() < 1e-9);
    }

    #[test]
    fn test_individual_never_increases() {
        for raw in [0.0, 0.1, 0.5, 0.82, 0.95, 1.0] {
            assert!(adjust_confidence(raw, AttributionMode::Individual) <= raw);
        }
    }

    #[test]
    fn test_out_of_range_raw_clamps() {
        assert_eq!(adjust_confidence(1.7, AttributionMode::Individual), 0.85);
        assert_eq!(adjust_confidence(-0.3, AttributionMode::Household), 0.0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ConfidenceTier::for_score(0.851), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::for_score(0.85), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_score(0.70), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_score(0.699), ConfidenceTier::Low);
    }

    #[test]
    fn test_average_adjusted_confidence_empty() {
        assert_eq!(
            average_adjusted_confidence(&[], AttributionMode::Household),
            0.0
        );
    }
}
