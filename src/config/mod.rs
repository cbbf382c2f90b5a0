// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chains;
pub mod settings;

pub use chains::{ChainConfig, ChainRegistry};
pub use settings::{MonitorSettings, Network, MAX_SCHEDULE_INTERVAL_MINUTES};

use thiserror::Error;

/// Errors raised while loading or validating local configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
