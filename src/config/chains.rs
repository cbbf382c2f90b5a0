// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static destination-chain table
//!
//! Loaded once from the chain-info JSON artifact, keyed by chain id:
//!
//! ```json
//! { "43113": { "rpc": "https://api.avax-test.network/ext/bc/C/rpc", "name": "Fuji", "buffer": 2 } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use super::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: String,
    pub rpc_endpoint: String,
    pub display_name: String,
    /// Allowed nonce skew before the chain counts as unhealthy
    pub buffer: u64,
}

impl ChainConfig {
    pub fn new(
        chain_id: impl Into<String>,
        rpc_endpoint: impl Into<String>,
        display_name: impl Into<String>,
        buffer: u64,
    ) -> Self {
        ChainConfig {
            chain_id: chain_id.into(),
            rpc_endpoint: rpc_endpoint.into(),
            display_name: display_name.into(),
            buffer,
        }
    }

    pub fn has_rpc(&self) -> bool {
        !self.rpc_endpoint.trim().is_empty()
    }
}

/// Read-only map from chain id to its static configuration
#[derive(Clone, Debug, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainConfig>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chains(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        ChainRegistry {
            chains: chains
                .into_iter()
                .map(|config| (config.chain_id.clone(), config))
                .collect(),
        }
    }

    /// Load the chain table from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let registry = Self::from_json_str(&raw)?;
        debug!(
            "Loaded {} chains from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parse the chain table. Malformed entries are skipped with a warning;
    /// only a document that is not a JSON object is an error.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Parse(format!("chain info: {}", e)))?;

        let entries = document.as_object().ok_or_else(|| {
            ConfigError::Parse("chain info must be a JSON object keyed by chain id".to_string())
        })?;

        let mut chains = BTreeMap::new();
        for (chain_id, entry) in entries {
            match Self::parse_entry(chain_id, entry) {
                Some(config) => {
                    chains.insert(chain_id.clone(), config);
                }
                None => warn!("Skipping malformed chain info entry for chainId -> {}", chain_id),
            }
        }

        Ok(ChainRegistry { chains })
    }

    fn parse_entry(chain_id: &str, entry: &Value) -> Option<ChainConfig> {
        let entry = entry.as_object()?;
        let rpc = match entry.get("rpc") {
            Some(Value::String(rpc)) => rpc.trim().to_string(),
            None | Some(Value::Null) => String::new(),
            Some(_) => return None,
        };
        let name = match entry.get("name") {
            Some(Value::String(name)) => name.clone(),
            None | Some(Value::Null) => chain_id.to_string(),
            Some(_) => return None,
        };
        let buffer = match entry.get("buffer") {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_u64()?,
        };

        Some(ChainConfig::new(chain_id, rpc, name, buffer))
    }

    pub fn get_chain(&self, chain_id: &str) -> Option<&ChainConfig> {
        self.chains.get(chain_id)
    }

    pub fn list_supported_chains(&self) -> Vec<String> {
        self.chains.keys().cloned().collect()
    }

    pub fn is_chain_supported(&self, chain_id: &str) -> bool {
        self.chains.contains_key(chain_id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
