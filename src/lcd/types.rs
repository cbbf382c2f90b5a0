// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the coordinating chain's REST responses

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::audit::ContractRegistryEntry;
use crate::validator::ValidatorInfo;

/// `GET /cosmos/staking/v1beta1/validators/{addr}`
#[derive(Debug, Deserialize)]
pub struct ValidatorResponse {
    #[serde(default)]
    pub validator: Option<ValidatorDto>,
}

#[derive(Debug, Deserialize)]
pub struct ValidatorDto {
    #[serde(default)]
    pub operator_address: String,
    #[serde(default)]
    pub jailed: bool,
    #[serde(default)]
    pub tokens: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: DescriptionDto,
}

#[derive(Debug, Default, Deserialize)]
pub struct DescriptionDto {
    #[serde(default)]
    pub moniker: String,
}

impl From<ValidatorDto> for ValidatorInfo {
    fn from(dto: ValidatorDto) -> Self {
        ValidatorInfo {
            operator_address: dto.operator_address,
            moniker: dto.description.moniker,
            jailed: dto.jailed,
            tokens: dto.tokens,
            status: dto.status,
        }
    }
}

/// `GET /router-protocol/router-chain/multichain/contract_config`
#[derive(Debug, Deserialize)]
pub struct ContractConfigResponse {
    #[serde(rename = "contractConfig")]
    pub contract_config: Vec<ContractConfigDto>,
}

#[derive(Debug, Deserialize)]
pub struct ContractConfigDto {
    #[serde(rename = "chainId", deserialize_with = "string_or_number")]
    pub chain_id: String,
    #[serde(rename = "contractType", default)]
    pub contract_type: String,
    #[serde(rename = "contractAddress", default)]
    pub contract_address: String,
    #[serde(default)]
    pub contract_enabled: bool,
}

impl From<ContractConfigDto> for ContractRegistryEntry {
    fn from(dto: ContractConfigDto) -> Self {
        ContractRegistryEntry {
            chain_id: dto.chain_id,
            contract_kind: dto.contract_type.parse().ok(),
            contract_address: dto.contract_address,
            enabled: dto.contract_enabled,
        }
    }
}

/// `GET /router-protocol/router-chain/attestation/last_event_nonce/...`
#[derive(Debug, Deserialize)]
pub struct LastEventNonceResponse {
    #[serde(rename = "eventNonce", default)]
    pub event_nonce: Option<Value>,
}

impl LastEventNonceResponse {
    /// The counter as an integer; absent or non-integer values yield `None`
    pub fn nonce(&self) -> Option<u64> {
        match self.event_nonce.as_ref()? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

/// `GET /cosmos/bank/v1beta1/balances/{addr}`
#[derive(Debug, Deserialize)]
pub struct BalancesResponse {
    #[serde(default)]
    pub balances: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct Coin {
    #[serde(default)]
    pub denom: String,
    #[serde(default)]
    pub amount: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
