use serde::Deserialize;

/// Root application configuration. Loaded from environment variables with
/// the prefix `CTV_ATTRIBUTION__`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub derivation: DerivationConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Named constants for the derivation core. These are domain assumptions
/// baked into the reference dataset's scale, surfaced here instead of being
/// hardcoded at call sites.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivationConfig {
    /// Confidence dampening applied to every edge of a synthesized control
    /// funnel (no ad-exposure signal, so matching is less reliable).
    #[serde(default = "default_control_dampening")]
    pub control_confidence_dampening: f64,
    /// Assumed average order value used for incremental revenue.
    #[serde(default = "default_average_order_value")]
    pub average_order_value: f64,
    /// Impression volume that earns a full sample-size quality score.
    #[serde(default = "default_sample_size_ceiling")]
    pub sample_size_ceiling: f64,
    /// Crossover rate that earns a full crossover quality score.
    #[serde(default = "default_crossover_ceiling")]
    pub crossover_ceiling: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory export jobs write artifacts into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Base URL share links are built against.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
}

fn default_control_dampening() -> f64 {
    0.6
}
fn default_average_order_value() -> f64 {
    74.50
}
fn default_sample_size_ceiling() -> f64 {
    2_000_000.0
}
fn default_crossover_ceiling() -> f64 {
    0.5
}
fn default_output_dir() -> String {
    "./exports".to_string()
}
fn default_link_base_url() -> String {
    "http://localhost:8080/".to_string()
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            control_confidence_dampening: default_control_dampening(),
            average_order_value: default_average_order_value(),
            sample_size_ceiling: default_sample_size_ceiling(),
            crossover_ceiling: default_crossover_ceiling(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            link_base_url: default_link_base_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CTV_ATTRIBUTION")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.derivation.control_confidence_dampening, 0.6);
        assert_eq!(config.derivation.average_order_value, 74.50);
        assert_eq!(config.derivation.sample_size_ceiling, 2_000_000.0);
        assert_eq!(config.derivation.crossover_ceiling, 0.5);
    }
}
