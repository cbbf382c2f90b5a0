// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One audit cycle for one contract kind
//!
//! Loads the contract registry, resolves it against the local chain table,
//! then reads both counters of every target chain with bounded parallelism.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::AuditError;
use super::resolver::{AuditTarget, ResolvedChains};
use super::types::{
    nonce_diff, AuditRecord, AuditReport, OnchainFailurePolicy, SkipReason, SkippedChain,
};
use crate::config::ChainRegistry;
use crate::contracts::{ContractKind, NonceRead, RemoteNonceReader};
use crate::lcd::{ChainStateNonceReader, ContractRegistrySource};
use crate::validator::{validate, ValidatorHealth, ValidatorInfo, ValidatorInfoCache};

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AuditorConfig {
    /// Operator address of the audited validator
    pub validator_address: String,
    /// Upper bound on chains audited at once
    pub max_concurrency: usize,
    /// Deadline for each remote call made during a cycle
    pub call_timeout: Duration,
    pub onchain_failure_policy: OnchainFailurePolicy,
}

impl AuditorConfig {
    pub fn new(validator_address: impl Into<String>) -> Self {
        AuditorConfig {
            validator_address: validator_address.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            onchain_failure_policy: OnchainFailurePolicy::default(),
        }
    }
}

pub struct NonceAuditor {
    config: AuditorConfig,
    chains: Arc<ChainRegistry>,
    registry_source: Arc<dyn ContractRegistrySource>,
    remote: Arc<dyn RemoteNonceReader>,
    chain_state: Arc<dyn ChainStateNonceReader>,
    validator_cache: Arc<ValidatorInfoCache>,
}

impl NonceAuditor {
    pub fn new(
        config: AuditorConfig,
        chains: Arc<ChainRegistry>,
        registry_source: Arc<dyn ContractRegistrySource>,
        remote: Arc<dyn RemoteNonceReader>,
        chain_state: Arc<dyn ChainStateNonceReader>,
        validator_cache: Arc<ValidatorInfoCache>,
    ) -> Self {
        NonceAuditor {
            config,
            chains,
            registry_source,
            remote,
            chain_state,
            validator_cache,
        }
    }

    pub fn config(&self) -> &AuditorConfig {
        &self.config
    }

    pub fn validator_cache(&self) -> &Arc<ValidatorInfoCache> {
        &self.validator_cache
    }

    /// Records of every chain that produced both counters, in no particular order
    pub async fn audit(&self, kind: ContractKind) -> Result<Vec<AuditRecord>, AuditError> {
        Ok(self.audit_report(kind).await?.records)
    }

    pub async fn audit_report(&self, kind: ContractKind) -> Result<AuditReport, AuditError> {
        let cycle_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("[{}] Starting {} nonce audit", cycle_id, kind);

        if self.chains.is_empty() {
            error!("[{}] Local chain table is empty", cycle_id);
            return Err(AuditError::EmptyChainTable);
        }

        let entries = match tokio::time::timeout(
            self.config.call_timeout,
            self.registry_source.contract_registry(),
        )
        .await
        {
            Ok(result) => result.map_err(|e| {
                error!("[{}] Failed to load contract registry: {}", cycle_id, e);
                AuditError::from(e)
            })?,
            Err(_) => {
                error!("[{}] Contract registry request timed out", cycle_id);
                return Err(AuditError::RegistryTimeout {
                    timeout_ms: self.config.call_timeout.as_millis() as u64,
                });
            }
        };

        let resolved = ResolvedChains::resolve(&entries, &self.chains);
        if resolved.chain_ids().is_empty() {
            error!("[{}] No supported chains found", cycle_id);
            return Err(AuditError::NoSupportedChains);
        }

        let (targets, mut skipped) = resolved.targets(kind);
        info!(
            "[{}] Processing {} chains: {:?}",
            cycle_id,
            targets.len(),
            targets.iter().map(|t| &t.chain.chain_id).collect::<Vec<_>>()
        );

        let validator = match self.fetch_validator().await {
            Ok(info) => info,
            Err(reason) => {
                warn!(
                    "[{}] Validator info unavailable, skipping {} chains: {}",
                    cycle_id,
                    targets.len(),
                    reason
                );
                skipped.extend(targets.into_iter().map(|target| SkippedChain {
                    chain_id: target.chain.chain_id,
                    contract_kind: kind,
                    reason: SkipReason::ValidatorUnavailable(reason.clone()),
                }));
                return Ok(AuditReport {
                    cycle_id,
                    contract_kind: kind,
                    started_at,
                    records: Vec::new(),
                    skipped,
                });
            }
        };

        let outcomes: Vec<Result<AuditRecord, SkippedChain>> = stream::iter(targets)
            .map(|target| self.audit_chain(target, &validator))
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(skip) => skipped.push(skip),
            }
        }

        info!(
            "[{}] {} audit finished: {} records, {} skipped",
            cycle_id,
            kind,
            records.len(),
            skipped.len()
        );

        Ok(AuditReport {
            cycle_id,
            contract_kind: kind,
            started_at,
            records,
            skipped,
        })
    }

    /// Health of the audited validator, `None` when its info is unavailable
    pub async fn validator_health(&self) -> Option<ValidatorHealth> {
        let info = self.fetch_validator().await.ok();
        validate(info.as_ref())
    }

    async fn fetch_validator(&self) -> Result<ValidatorInfo, String> {
        match tokio::time::timeout(
            self.config.call_timeout,
            self.validator_cache.get(&self.config.validator_address),
        )
        .await
        {
            Ok(Ok(info)) => Ok(info),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("validator lookup timed out".to_string()),
        }
    }

    async fn audit_chain(
        &self,
        target: AuditTarget,
        validator: &ValidatorInfo,
    ) -> Result<AuditRecord, SkippedChain> {
        let call_timeout = self.config.call_timeout;
        let chain_id = target.chain.chain_id.clone();
        let skip = |reason: SkipReason| {
            info!("Skipping chainId -> {}: {:?}", chain_id, reason);
            SkippedChain {
                chain_id: chain_id.clone(),
                contract_kind: target.contract_kind,
                reason,
            }
        };

        let validator_address = if validator.operator_address.is_empty() {
            self.config.validator_address.as_str()
        } else {
            validator.operator_address.as_str()
        };

        let onchain = async {
            tokio::time::timeout(
                call_timeout,
                self.remote.read_nonce(
                    &target.chain.rpc_endpoint,
                    &target.contract_address,
                    target.contract_kind,
                ),
            )
            .await
            .unwrap_or_else(|_| NonceRead::Unreachable("call timed out".to_string()))
        };
        let processed = async {
            tokio::time::timeout(
                call_timeout,
                self.chain_state.last_processed_nonce(
                    &target.chain.chain_id,
                    &target.contract_address,
                    validator_address,
                ),
            )
            .await
            .ok()
            .flatten()
        };
        let (onchain, processed) = tokio::join!(onchain, processed);

        let onchain_nonce = match (onchain, self.config.onchain_failure_policy) {
            (NonceRead::Value(nonce), _) => nonce,
            (failure, OnchainFailurePolicy::AssumeZero) => {
                warn!(
                    "Onchain read failed for chainId -> {}, assuming 0: {:?}",
                    target.chain.chain_id, failure
                );
                0
            }
            (NonceRead::Unreachable(detail), OnchainFailurePolicy::Skip) => {
                return Err(skip(SkipReason::OnchainUnreachable(detail)))
            }
            (NonceRead::CallError(detail), OnchainFailurePolicy::Skip) => {
                return Err(skip(SkipReason::OnchainCallError(detail)))
            }
        };

        let last_processed_nonce = processed.ok_or_else(|| skip(SkipReason::NoLastProcessedNonce))?;

        let record = AuditRecord {
            chain_id: target.chain.chain_id.clone(),
            chain_name: target.chain.display_name.clone(),
            contract_kind: target.contract_kind,
            onchain_nonce,
            last_processed_nonce,
            diff_nonces: nonce_diff(onchain_nonce, last_processed_nonce),
            buffer: target.chain.buffer,
            moniker: validator.moniker.clone(),
            jailed: validator.jailed,
            validator_address: validator_address.to_string(),
        };

        if record.exceeds_buffer() {
            debug!(
                "chainId -> {} {} lagging: onchain {} processed {} buffer {}",
                record.chain_id,
                record.contract_kind,
                onchain_nonce,
                last_processed_nonce,
                record.buffer
            );
        } else {
            debug!(
                "chainId -> {} {} within buffer: diff {}",
                record.chain_id, record.contract_kind, record.diff_nonces
            );
        }

        Ok(record)
    }
}
