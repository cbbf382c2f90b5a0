// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Merges the dynamic contract registry with the static chain table

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::types::{ContractRegistryEntry, SkipReason, SkippedChain};
use crate::config::{ChainConfig, ChainRegistry};
use crate::contracts::ContractKind;

/// Per-chain address table indexed by [`ContractKind::slot`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    slots: [Option<String>; 2],
}

impl ContractAddresses {
    pub fn get(&self, kind: ContractKind) -> Option<&str> {
        self.slots[kind.slot()].as_deref()
    }

    fn set(&mut self, kind: ContractKind, address: &str) {
        let address = address.trim();
        if !address.is_empty() {
            self.slots[kind.slot()] = Some(address.to_string());
        }
    }
}

/// A chain that will be audited for one contract kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub chain: ChainConfig,
    pub contract_kind: ContractKind,
    pub contract_address: String,
}

/// Effective chain set of one cycle
#[derive(Debug, Clone, Default)]
pub struct ResolvedChains {
    chain_ids: Vec<String>,
    addresses: HashMap<String, ContractAddresses>,
    chains: HashMap<String, ChainConfig>,
}

impl ResolvedChains {
    pub fn resolve(entries: &[ContractRegistryEntry], local: &ChainRegistry) -> Self {
        let mut seen = HashSet::new();
        let mut chain_ids = Vec::new();
        let mut addresses: HashMap<String, ContractAddresses> = HashMap::new();

        for entry in entries {
            if seen.insert(entry.chain_id.clone()) {
                chain_ids.push(entry.chain_id.clone());
            }

            if !entry.enabled {
                continue;
            }
            if let Some(kind) = entry.contract_kind {
                addresses
                    .entry(entry.chain_id.clone())
                    .or_default()
                    .set(kind, &entry.contract_address);
            }
        }

        let chains: HashMap<String, ChainConfig> = chain_ids
            .iter()
            .filter_map(|id| local.get_chain(id).map(|c| (id.clone(), c.clone())))
            .collect();

        for dropped in local
            .list_supported_chains()
            .into_iter()
            .filter(|id| !seen.contains(id))
        {
            debug!("chainId -> {} is not in the contract registry, skipping", dropped);
        }

        ResolvedChains {
            chain_ids,
            addresses,
            chains,
        }
    }

    /// Chain ids of the dynamic registry, first-seen order
    pub fn chain_ids(&self) -> &[String] {
        &self.chain_ids
    }

    /// Registry chains that also exist in the local table, registry order
    pub fn effective_chain_ids(&self) -> Vec<String> {
        self.chain_ids
            .iter()
            .filter(|id| self.chains.contains_key(*id))
            .cloned()
            .collect()
    }

    pub fn chain(&self, chain_id: &str) -> Option<&ChainConfig> {
        self.chains.get(chain_id)
    }

    pub fn addresses(&self, chain_id: &str) -> Option<&ContractAddresses> {
        self.addresses.get(chain_id)
    }

    /// Auditable chains for `kind`, plus the chains excluded and why
    pub fn targets(&self, kind: ContractKind) -> (Vec<AuditTarget>, Vec<SkippedChain>) {
        let mut targets = Vec::new();
        let mut skipped = Vec::new();

        for chain_id in &self.chain_ids {
            let outcome = self.target(chain_id, kind);
            match outcome {
                Ok(target) => targets.push(target),
                Err(reason) => {
                    info!(
                        "no rpc or contract config for chainId -> {} ({:?})",
                        chain_id, reason
                    );
                    skipped.push(SkippedChain {
                        chain_id: chain_id.clone(),
                        contract_kind: kind,
                        reason,
                    });
                }
            }
        }

        (targets, skipped)
    }

    fn target(&self, chain_id: &str, kind: ContractKind) -> Result<AuditTarget, SkipReason> {
        let chain = self
            .chains
            .get(chain_id)
            .ok_or(SkipReason::NotConfiguredLocally)?;
        if !chain.has_rpc() {
            return Err(SkipReason::MissingRpc);
        }
        let addresses = self
            .addresses
            .get(chain_id)
            .ok_or(SkipReason::NoRegistryEntry)?;
        let contract_address = addresses
            .get(kind)
            .ok_or(SkipReason::NoContractAddress)?;

        Ok(AuditTarget {
            chain: chain.clone(),
            contract_kind: kind,
            contract_address: contract_address.to_string(),
        })
    }
}
