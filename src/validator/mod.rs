// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cache;
pub mod clock;
pub mod health;

pub use cache::{ValidatorCacheError, ValidatorInfoCache, DEFAULT_FRESHNESS_WINDOW};
pub use clock::{Clock, ManualClock, SystemClock};
pub use health::{validate, ValidatorHealth};

use serde::{Deserialize, Serialize};

/// Validator metadata from the coordinating chain's staking module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub operator_address: String,
    pub moniker: String,
    pub jailed: bool,
    /// Bonded tokens in base units, as reported by the chain
    pub tokens: String,
    pub status: String,
}
