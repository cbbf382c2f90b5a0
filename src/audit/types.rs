// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contracts::ContractKind;

/// One slot of the coordinating chain's multichain contract registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRegistryEntry {
    pub chain_id: String,
    /// `None` for registry kinds this monitor does not audit
    pub contract_kind: Option<ContractKind>,
    pub contract_address: String,
    pub enabled: bool,
}

impl ContractRegistryEntry {
    pub fn new(
        chain_id: impl Into<String>,
        contract_kind: ContractKind,
        contract_address: impl Into<String>,
        enabled: bool,
    ) -> Self {
        ContractRegistryEntry {
            chain_id: chain_id.into(),
            contract_kind: Some(contract_kind),
            contract_address: contract_address.into(),
            enabled,
        }
    }
}

/// Nonce skew of one chain in one audit cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "chainId")]
    pub chain_id: String,
    pub chain_name: String,
    pub contract_kind: ContractKind,
    #[serde(rename = "latest_onchain_eventNonce")]
    pub onchain_nonce: u64,
    /// Alert consumers key on this exact spelling
    #[serde(rename = "lastest_val_executed_nonce", alias = "latest_val_executed_nonce")]
    pub last_processed_nonce: u64,
    /// `onchain_nonce - last_processed_nonce`; negative when the validator is ahead
    pub diff_nonces: i64,
    pub buffer: u64,
    pub moniker: String,
    pub jailed: bool,
    pub validator_address: String,
}

impl AuditRecord {
    pub fn is_lagging(&self) -> bool {
        self.diff_nonces > 0
    }

    pub fn exceeds_buffer(&self) -> bool {
        i128::from(self.diff_nonces) > i128::from(self.buffer)
    }
}

/// Signed distance between two counters, saturating at the i64 bounds
pub fn nonce_diff(onchain_nonce: u64, last_processed_nonce: u64) -> i64 {
    let diff = i128::from(onchain_nonce) - i128::from(last_processed_nonce);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// What to do with a chain whose on-chain counter could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnchainFailurePolicy {
    /// Leave the chain out of the records and report it as skipped
    #[default]
    Skip,
    /// Treat the counter as 0 and emit a record anyway
    AssumeZero,
}

/// Which records the alerting layer forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    /// Any confirmed lag (`diff_nonces > 0`)
    #[default]
    AnyLag,
    /// Only lag past the chain's configured buffer
    BeyondBuffer,
}

impl AlertPolicy {
    pub fn should_alert(&self, record: &AuditRecord) -> bool {
        match self {
            AlertPolicy::AnyLag => record.is_lagging(),
            AlertPolicy::BeyondBuffer => record.exceeds_buffer(),
        }
    }

    pub fn filter<'a>(&self, records: &'a [AuditRecord]) -> Vec<&'a AuditRecord> {
        records.iter().filter(|r| self.should_alert(r)).collect()
    }
}

/// Why a chain produced no record this cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    MissingRpc,
    NotConfiguredLocally,
    NoRegistryEntry,
    NoContractAddress,
    ValidatorUnavailable(String),
    OnchainUnreachable(String),
    OnchainCallError(String),
    NoLastProcessedNonce,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChain {
    pub chain_id: String,
    pub contract_kind: ContractKind,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Everything one audit cycle produced
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub cycle_id: Uuid,
    pub contract_kind: ContractKind,
    pub started_at: DateTime<Utc>,
    pub records: Vec<AuditRecord>,
    pub skipped: Vec<SkippedChain>,
}
