//! Campaign dataset provider — loads the bundled synthetic campaign
//! fixtures once at startup and exposes them as a read-only catalog.

mod catalog;

pub use catalog::CampaignCatalog;
