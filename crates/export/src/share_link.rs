//! Shareable dashboard links — dashboard selection state encoded as URL
//! query parameters. Decoding is forgiving: missing, malformed, or
//! out-of-range parameters fall back to the defaults instead of failing.

use ctv_core::types::AttributionMode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Dashboard view the link lands on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Flow,
    Timing,
    Comparison,
}

impl DashboardTab {
    pub fn as_str(self) -> &'static str {
        match self {
            DashboardTab::Flow => "flow",
            DashboardTab::Timing => "timing",
            DashboardTab::Comparison => "comparison",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "flow" => Some(DashboardTab::Flow),
            "timing" => Some(DashboardTab::Timing),
            "comparison" => Some(DashboardTab::Comparison),
            _ => None,
        }
    }
}

/// Selection state carried by a share link.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareState {
    pub campaign_index: usize,
    pub mode: AttributionMode,
    pub tab: DashboardTab,
}

impl ShareState {
    /// Encode the state onto a base URL as `campaign`, `mode`, and `tab`
    /// query parameters.
    pub fn encode(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("campaign", &self.campaign_index.to_string())
            .append_pair("mode", self.mode.as_str())
            .append_pair("tab", self.tab.as_str());
        url
    }

    /// Decode a shared URL. Each parameter falls back independently; a
    /// campaign index at or past `campaign_count` resets to the first
    /// campaign.
    pub fn decode(url: &Url, campaign_count: usize) -> Self {
        let mut state = ShareState::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "campaign" => {
                    if let Ok(index) = value.parse::<usize>() {
                        if index < campaign_count {
                            state.campaign_index = index;
                        }
                    }
                }
                "mode" => {
                    if let Some(mode) = AttributionMode::from_param(&value) {
                        state.mode = mode;
                    }
                }
                "tab" => {
                    if let Some(tab) = DashboardTab::from_param(&value) {
                        state.tab = tab;
                    }
                }
                _ => {}
            }
        }
        state
    }
}
