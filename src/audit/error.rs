// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::lcd::LcdError;

/// Failures that abort a whole audit cycle. Per-chain problems never end up here.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to load the contract registry: {0}")]
    Registry(#[from] LcdError),

    #[error("Contract registry request timed out after {timeout_ms}ms")]
    RegistryTimeout { timeout_ms: u64 },

    #[error("No supported chains found in the contract registry")]
    NoSupportedChains,

    #[error("Local chain table is empty")]
    EmptyChainTable,
}
