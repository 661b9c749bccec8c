/*
 * Error Module
 *
 * Errors surfaced to the host. The tick itself never fails: numeric
 * degeneracies are resolved in place. What can fail is loading and
 * validating the configuration before the first tick.
 */

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("{name} must be greater than zero, got {value}")]
    NonPositiveSpeed { name: &'static str, value: f32 },

    #[error("min_speed ({min}) exceeds max_speed ({max})")]
    MinSpeedExceedsMax { min: f32, max: f32 },

    #[error("{name} must not be negative, got {value}")]
    NegativeRange { name: &'static str, value: f32 },

    #[error("{name} is not a finite number")]
    NonFinite { name: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid flock settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("invalid run configuration: {0}")]
    InvalidRun(String),
}
