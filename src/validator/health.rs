// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ValidatorInfo;

/// Derived liveness view of a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorHealth {
    pub moniker: String,
    #[serde(rename = "isHealthy")]
    pub is_healthy: bool,
    pub jailed: bool,
    pub validator_address: String,
}

/// Unhealthy when the moniker is empty or the validator is jailed.
/// Absent info yields no health record at all.
pub fn validate(info: Option<&ValidatorInfo>) -> Option<ValidatorHealth> {
    let info = info?;
    let mut is_healthy = true;

    if info.moniker.is_empty() {
        warn!("Moniker is not provided for {}", info.operator_address);
        is_healthy = false;
    }
    if info.jailed {
        warn!("Validator {} is jailed", info.operator_address);
        is_healthy = false;
    }

    Some(ValidatorHealth {
        moniker: info.moniker.clone(),
        is_healthy,
        jailed: info.jailed,
        validator_address: info.operator_address.clone(),
    })
}
