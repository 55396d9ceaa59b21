//! Error types for Marga

use thiserror::Error;

/// Marga error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("Invalid route: need at least 2 coordinates, got {points}")]
    InvalidRoute { points: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
