//! Control-group funnel synthesis.

use ctv_core::config::DerivationConfig;
use ctv_core::types::CampaignRecord;

/// Derive a structurally identical control-group funnel from an exposed
/// campaign record.
///
/// Every node and edge volume scales by the control-to-exposed
/// conversion-rate ratio (rounded to nearest), keeping the funnel shape.
/// Every edge confidence is dampened by the configured factor: the control
/// population received no treatment, so cross-device matching carries no
/// ad-exposure signal and is modeled as uniformly less reliable.
pub fn synthesize_control_funnel(
    record: &CampaignRecord,
    config: &DerivationConfig,
) -> CampaignRecord {
    let ratio = if record.exposed_group.conversion_rate == 0.0 {
        0.0
    } else {
        record.control_group.conversion_rate / record.exposed_group.conversion_rate
    };

    let mut control = record.clone();
    for node in &mut control.nodes {
        node.value = (node.value as f64 * ratio).round() as u64;
    }
    for link in &mut control.links {
        link.value = (link.value as f64 * ratio).round() as u64;
        link.confidence *= config.control_confidence_dampening;
    }
    control
}
