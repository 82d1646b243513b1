//! Time-to-conversion distribution estimation.
//!
//! The histogram only carries per-bucket counts and midpoints, no bucket
//! boundaries, so percentiles are estimated by weighted interpolation
//! around midpoints rather than between bucket edges.

use ctv_core::types::{BucketStats, CampaignRecord, TimeBucket};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Estimate the hour mark at which `target_fraction` of conversions have
/// completed.
///
/// Buckets are walked in canonical ascending time order, accumulating each
/// bucket's fraction of `total_conversions`. Inside the first bucket where
/// the cumulative fraction reaches the target, the bucket midpoint is
/// scaled by `0.5 + 0.5 * progress`, deliberately biasing the estimate
/// toward the upper half of the midpoint range. Downstream consumers rely
/// on these exact values; do not swap in edge interpolation.
///
/// If the target is never reached (fractions can sum below 1 from
/// rounding) the last bucket's midpoint is returned.
pub fn estimate_percentile(
    histogram: &HashMap<TimeBucket, BucketStats>,
    total_conversions: u64,
    target_fraction: f64,
) -> f64 {
    let target = target_fraction.clamp(0.0, 1.0);
    let mut cumulative = 0.0;

    for bucket in TimeBucket::ALL {
        let count = histogram.get(&bucket).map_or(0, |b| b.count);
        let fraction = if total_conversions == 0 {
            0.0
        } else {
            count as f64 / total_conversions as f64
        };

        let prev = cumulative;
        cumulative += fraction;

        if cumulative >= target {
            let progress = if cumulative == prev {
                0.0
            } else {
                (target - prev) / (cumulative - prev)
            };
            return bucket.midpoint_hours() * (0.5 + 0.5 * progress);
        }
    }

    TimeBucket::SevenPlusDays.midpoint_hours()
}

/// Record-level percentile estimate, using the exposed group's conversion
/// total as the histogram denominator.
pub fn estimate_timing_percentile(record: &CampaignRecord, target_fraction: f64) -> f64 {
    estimate_percentile(
        &record.time_to_conversion,
        record.exposed_group.conversions,
        target_fraction,
    )
}

/// Bucket holding the most conversions. A plain argmax over raw counts,
/// independent of the percentile machinery; earlier buckets win ties.
pub fn peak_bucket(histogram: &HashMap<TimeBucket, BucketStats>) -> TimeBucket {
    let mut peak = TimeBucket::UnderOneHour;
    let mut peak_count = 0;
    for bucket in TimeBucket::ALL {
        let count = histogram.get(&bucket).map_or(0, |b| b.count);
        if count > peak_count {
            peak_count = count;
            peak = bucket;
        }
    }
    peak
}

/// Earliest bucket with any conversions; `None` for an empty histogram.
pub fn fastest_bucket(histogram: &HashMap<TimeBucket, BucketStats>) -> Option<TimeBucket> {
    TimeBucket::ALL
        .into_iter()
        .find(|b| histogram.get(b).is_some_and(|s| s.count > 0))
}

/// Headline timing metrics for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSummary {
    pub median_hours: f64,
    pub p75_hours: f64,
    pub peak: TimeBucket,
    /// Earliest non-empty bucket; defaults to the first bucket when the
    /// histogram is empty.
    pub fastest: TimeBucket,
}

pub fn summarize_timing(record: &CampaignRecord) -> TimingSummary {
    TimingSummary {
        median_hours: estimate_timing_percentile(record, 0.5),
        p75_hours: estimate_timing_percentile(record, 0.75),
        peak: peak_bucket(&record.time_to_conversion),
        fastest: fastest_bucket(&record.time_to_conversion).unwrap_or(TimeBucket::UnderOneHour),
    }
}
