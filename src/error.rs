//! Error type for the overlay integration layer

use thiserror::Error;

/// Errors raised while wiring or driving an overlay
#[derive(Debug, Error)]
pub enum VizError {
    #[error("failed to lock {0}")]
    Lock(&'static str),

    #[error("missing connection: {0}")]
    MissingConnection(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("not subscribed: {0}")]
    NotSubscribed(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
