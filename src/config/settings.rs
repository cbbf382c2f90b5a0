// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Monitor settings, read from the `[settings]` table of a TOML file
//!
//! ```toml
//! [settings]
//! lcd_url = "https://lcd.testnet.routerchain.dev"
//! validator_address = "routervaloper1..."
//! schedule_interval_minutes = 5
//! min_balance = "10ROUTE"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::ConfigError;
use crate::audit::{AlertPolicy, OnchainFailurePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Devnet,
    Testnet,
    DevnetAlpha,
    Mainnet,
    #[serde(other)]
    Unknown,
}

impl Network {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "devnet" => Network::Devnet,
            "testnet" => Network::Testnet,
            "devnet-alpha" => Network::DevnetAlpha,
            "mainnet" => Network::Mainnet,
            _ => Network::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::DevnetAlpha => "devnet-alpha",
            Network::Mainnet => "mainnet",
            Network::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One year; longer intervals would overflow timer deadlines
pub const MAX_SCHEDULE_INTERVAL_MINUTES: u64 = 60 * 24 * 365;

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: MonitorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub pager_duty_routing: String,
    pub orchestrator_health_endpoint: String,
    /// Minutes between cycles; zero or negative disables the scheduler
    pub schedule_interval_minutes: i64,
    pub validator_address: String,
    pub orchestrator_address: String,
    pub lcd_url: String,
    pub environment: String,
    pub debug_mode: bool,
    /// e.g. `"10ROUTE"`
    pub min_balance: String,
    pub chain_info_path: PathBuf,
    pub http_port: u16,
    pub max_concurrent_chains: usize,
    pub call_timeout_secs: u64,
    pub validator_cache_ttl_secs: u64,
    pub alert_policy: AlertPolicy,
    pub onchain_failure_policy: OnchainFailurePolicy,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        MonitorSettings {
            pager_duty_routing: String::new(),
            orchestrator_health_endpoint: String::new(),
            schedule_interval_minutes: -1,
            validator_address: String::new(),
            orchestrator_address: String::new(),
            lcd_url: String::new(),
            environment: "testnet".to_string(),
            debug_mode: false,
            min_balance: String::new(),
            chain_info_path: PathBuf::from("artifacts/chainInfos.json"),
            http_port: 5000,
            max_concurrent_chains: 8,
            call_timeout_secs: 10,
            validator_cache_ttl_secs: 300,
            alert_policy: AlertPolicy::default(),
            onchain_failure_policy: OnchainFailurePolicy::default(),
        }
    }
}

impl MonitorSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(file.settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lcd_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "lcd_url",
                reason: "must be set".to_string(),
            });
        }
        Url::parse(self.lcd_url.trim()).map_err(|e| ConfigError::Invalid {
            key: "lcd_url",
            reason: e.to_string(),
        })?;

        if self.validator_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "validator_address",
                reason: "must be set".to_string(),
            });
        }

        if !self.orchestrator_health_endpoint.trim().is_empty() {
            Url::parse(self.orchestrator_health_endpoint.trim()).map_err(|e| {
                ConfigError::Invalid {
                    key: "orchestrator_health_endpoint",
                    reason: e.to_string(),
                }
            })?;
        }

        if self.schedule_interval_minutes > 0 && self.schedule_interval().is_none() {
            return Err(ConfigError::Invalid {
                key: "schedule_interval_minutes",
                reason: format!(
                    "{} minutes exceeds the maximum of {}",
                    self.schedule_interval_minutes, MAX_SCHEDULE_INTERVAL_MINUTES
                ),
            });
        }

        if self.max_concurrent_chains == 0 {
            return Err(ConfigError::Invalid {
                key: "max_concurrent_chains",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.call_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "call_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn network(&self) -> Network {
        Network::parse(&self.environment)
    }

    /// Threshold in whole ROUTE; anything not of the form `<n>ROUTE` is 0
    pub fn min_balance_route(&self) -> f64 {
        self.min_balance
            .trim()
            .strip_suffix("ROUTE")
            .and_then(|n| n.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    /// `None` when the scheduler is disabled or the interval is out of range
    pub fn schedule_interval(&self) -> Option<Duration> {
        u64::try_from(self.schedule_interval_minutes)
            .ok()
            .filter(|m| (1..=MAX_SCHEDULE_INTERVAL_MINUTES).contains(m))
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validator_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.validator_cache_ttl_secs)
    }

    pub fn alerting_enabled(&self) -> bool {
        !self.pager_duty_routing.trim().is_empty()
    }
}
