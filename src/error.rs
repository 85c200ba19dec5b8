//! Configuration errors
//!
//! The simulation itself never fails; only loading a show configuration can.

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::ShowConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON is malformed or has the wrong shape
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
