//! Error types for vyuha-nav.
//!
//! The decision core itself never fails (see the navigator module);
//! errors exist only at the I/O seams: configuration files, scenario
//! files, and persistent storage.

use thiserror::Error;

/// Vyuha error type
#[derive(Error, Debug)]
pub enum VyuhaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),
}

impl From<toml::de::Error> for VyuhaError {
    fn from(e: toml::de::Error) -> Self {
        VyuhaError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for VyuhaError {
    fn from(e: serde_yaml::Error) -> Self {
        VyuhaError::Scenario(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VyuhaError>;
