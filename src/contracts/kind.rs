// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bridge contract interfaces tracked on every destination chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractKind {
    Gateway,
    Voyager,
}

impl ContractKind {
    pub const ALL: [ContractKind; 2] = [ContractKind::Gateway, ContractKind::Voyager];

    /// Name used by the coordinating chain's contract registry
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::Gateway => "GATEWAY",
            ContractKind::Voyager => "VOYAGER",
        }
    }

    /// Index into a per-chain address table
    pub fn slot(&self) -> usize {
        match self {
            ContractKind::Gateway => 0,
            ContractKind::Voyager => 1,
        }
    }

    /// No-argument view method holding the on-chain counter
    pub fn nonce_method(&self) -> &'static str {
        match self {
            ContractKind::Gateway => "eventNonce",
            ContractKind::Voyager => "depositNonce",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GATEWAY" => Ok(ContractKind::Gateway),
            "VOYAGER" => Ok(ContractKind::Voyager),
            other => Err(format!("unsupported contract type: {}", other)),
        }
    }
}
