//! Pure derivation core for the attribution funnel: confidence adjustment,
//! threshold filtering, timing percentiles, data-quality scoring,
//! incrementality framing, and control-group synthesis.
//!
//! Every function here is side-effect free and total for UI-driven
//! parameter ranges; invalid parameters clamp or default instead of
//! failing. Results are freshly allocated per call and safe to cache
//! keyed by `(campaign, mode, threshold)`.

pub mod confidence;
pub mod control;
pub mod funnel;
pub mod incrementality;
pub mod quality;
pub mod snapshot;
pub mod timing;

pub use confidence::{adjust_confidence, average_adjusted_confidence, ConfidenceTier};
pub use control::synthesize_control_funnel;
pub use funnel::{derive_funnel, FilteredFunnel, RetainedEdge};
pub use incrementality::{compute_incremental_impact, IncrementalImpact};
pub use quality::{score_data_quality, QualityGrade, QualityScore};
pub use snapshot::{snapshot, MetricsSnapshot};
pub use timing::{estimate_timing_percentile, summarize_timing, TimingSummary};
