//! Core data model, error taxonomy, and configuration shared across the
//! attribution workspace.

pub mod config;
pub mod error;
pub mod types;

pub use error::{AttributionError, AttributionResult};
