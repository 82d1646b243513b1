//! The canonical campaign catalog. Fixtures are the only producer of
//! campaign records; everything downstream receives read-only views.

use ctv_core::types::{CampaignRecord, CampaignSummary, NodeKind};
use ctv_core::{AttributionError, AttributionResult};
use tracing::info;

/// Synthetic CTV attribution data for three campaign archetypes, each
/// modeling the funnel CTV impressions → device crossover → site visits →
/// conversions with an exposed/control lift analysis.
const CAMPAIGN_FIXTURES: &str = include_str!("../fixtures/campaigns.json");

/// Immutable, load-once catalog of campaign records.
pub struct CampaignCatalog {
    campaigns: Vec<CampaignRecord>,
}

impl CampaignCatalog {
    /// Parse and validate the bundled fixtures. A malformed fixture is a
    /// fatal startup error; nothing downstream re-checks well-formedness.
    pub fn load() -> AttributionResult<Self> {
        let campaigns: Vec<CampaignRecord> = serde_json::from_str(CAMPAIGN_FIXTURES)?;
        for record in &campaigns {
            validate_record(record)?;
        }
        info!(campaigns = campaigns.len(), "Campaign catalog loaded");
        Ok(Self { campaigns })
    }

    /// Construct a catalog from records built elsewhere (tests, partial data).
    pub fn from_records(campaigns: Vec<CampaignRecord>) -> AttributionResult<Self> {
        for record in &campaigns {
            validate_record(record)?;
        }
        Ok(Self { campaigns })
    }

    pub fn list(&self) -> Vec<CampaignSummary> {
        self.campaigns
            .iter()
            .map(|c| CampaignSummary {
                id: c.id.clone(),
                name: c.name.clone(),
                impressions: c.exposed_group.impressions,
                conversions: c.exposed_group.conversions,
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> AttributionResult<&CampaignRecord> {
        self.campaigns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AttributionError::UnknownCampaign(id.to_string()))
    }

    /// Positional lookup used by share links and the campaign picker.
    pub fn by_index(&self, index: usize) -> Option<&CampaignRecord> {
        self.campaigns.get(index)
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

fn validate_record(record: &CampaignRecord) -> AttributionResult<()> {
    let impression_nodes = record
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Impression)
        .count();
    if impression_nodes != 1 {
        return Err(AttributionError::Validation(format!(
            "campaign {}: expected one impression node, found {}",
            record.id, impression_nodes
        )));
    }

    let mut seen = std::collections::HashSet::new();
    for node in &record.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(AttributionError::Validation(format!(
                "campaign {}: duplicate node id {}",
                record.id, node.id
            )));
        }
    }

    for link in &record.links {
        if record.node(&link.source).is_none() || record.node(&link.target).is_none() {
            return Err(AttributionError::Validation(format!(
                "campaign {}: link {} -> {} references a missing node",
                record.id, link.source, link.target
            )));
        }
        if !(0.0..=1.0).contains(&link.confidence) {
            return Err(AttributionError::Validation(format!(
                "campaign {}: link {} -> {} has confidence {} outside [0, 1]",
                record.id, link.source, link.target, link.confidence
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctv_core::types::DeviceChannel;

    #[test]
    fn test_load_bundled_fixtures() {
        let catalog = CampaignCatalog::load().unwrap();
        assert_eq!(catalog.len(), 3);

        let summaries = catalog.list();
        assert_eq!(summaries[0].id, "camp-ecom-spring");
        assert_eq!(summaries[0].conversions, 4650);
    }

    #[test]
    fn test_get_by_id_and_index() {
        let catalog = CampaignCatalog::load().unwrap();
        let ecom = catalog.get("camp-ecom-spring").unwrap();
        assert_eq!(ecom.name, "E-commerce Spring Sale");
        assert_eq!(catalog.by_index(1).unwrap().id, "camp-auto-launch");
        assert!(catalog.by_index(99).is_none());
        assert!(catalog.get("camp-missing").is_err());
    }

    #[test]
    fn test_fixture_tags() {
        let catalog = CampaignCatalog::load().unwrap();
        let ecom = catalog.get("camp-ecom-spring").unwrap();

        let ctv = ecom.impression_node().unwrap();
        assert_eq!(ctv.value, 1_500_000);
        assert!(ctv.channel.is_none());

        let sentinel = ecom.node("no_detection").unwrap();
        assert_eq!(sentinel.kind, NodeKind::Crossover);
        assert_eq!(sentinel.channel, Some(DeviceChannel::Unmatched));

        let tv_conv = ecom.node("tv_conv").unwrap();
        assert_eq!(tv_conv.kind, NodeKind::Conversion);
        assert_eq!(tv_conv.channel, Some(DeviceChannel::Tv));
    }

    #[test]
    fn test_validation_rejects_dangling_link() {
        let mut record = CampaignCatalog::load()
            .unwrap()
            .get("camp-cpg-awareness")
            .unwrap()
            .clone();
        record.links[0].target = "nowhere".into();
        assert!(CampaignCatalog::from_records(vec![record]).is_err());
    }

    #[test]
    fn test_outgoing_edges_do_not_exceed_node_value() {
        // Well-formed-by-construction invariant the derivation core assumes.
        let catalog = CampaignCatalog::load().unwrap();
        for summary in catalog.list() {
            let record = catalog.get(&summary.id).unwrap();
            for node in &record.nodes {
                let outgoing: u64 = record
                    .links
                    .iter()
                    .filter(|l| l.source == node.id)
                    .map(|l| l.value)
                    .sum();
                assert!(outgoing <= node.value, "node {} overflows", node.id);
            }
        }
    }
}
