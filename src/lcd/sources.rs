// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seams between the audit engine and the coordinating chain

use async_trait::async_trait;

use super::error::LcdError;
use crate::audit::ContractRegistryEntry;
use crate::validator::ValidatorInfo;

/// Dynamic per-chain contract registry, fetched fresh every cycle
#[async_trait]
pub trait ContractRegistrySource: Send + Sync {
    async fn contract_registry(&self) -> Result<Vec<ContractRegistryEntry>, LcdError>;
}

/// Last counter a validator is recorded as having processed
#[async_trait]
pub trait ChainStateNonceReader: Send + Sync {
    /// `None` means no usable data, which is distinct from a zero counter
    async fn last_processed_nonce(
        &self,
        chain_id: &str,
        contract_address: &str,
        validator_address: &str,
    ) -> Option<u64>;
}

/// Staking-module validator descriptors
#[async_trait]
pub trait ValidatorSource: Send + Sync {
    /// `Ok(None)` when the response carries no validator
    async fn fetch_validator(
        &self,
        operator_address: &str,
    ) -> Result<Option<ValidatorInfo>, LcdError>;
}
