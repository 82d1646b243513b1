use thiserror::Error;

pub type AttributionResult<T> = Result<T, AttributionError>;

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture parse error: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("Fixture validation error: {0}")]
    Validation(String),

    #[error("Unknown campaign: {0}")]
    UnknownCampaign(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
