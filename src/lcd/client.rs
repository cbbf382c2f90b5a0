// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::LcdError;
use super::sources::{ChainStateNonceReader, ContractRegistrySource, ValidatorSource};
use super::types::{
    BalancesResponse, ContractConfigResponse, LastEventNonceResponse, ValidatorResponse,
};
use crate::audit::ContractRegistryEntry;
use crate::validator::ValidatorInfo;

const STAKING_VALIDATORS_PATH: &str = "/cosmos/staking/v1beta1/validators";
const CONTRACT_CONFIG_PATH: &str = "/router-protocol/router-chain/multichain/contract_config";
const LAST_EVENT_NONCE_PATH: &str = "/router-protocol/router-chain/attestation/last_event_nonce";
const BANK_BALANCES_PATH: &str = "/cosmos/bank/v1beta1/balances";

/// HTTP client for the coordinating chain's LCD endpoint
#[derive(Clone)]
pub struct LcdClient {
    base_url: String,
    http_client: Client,
}

impl LcdClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, LcdError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(LcdError::NotConfigured);
        }

        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LcdError::Request {
                url: base_url.clone(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(LcdClient {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn validator_url(&self, operator_address: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url, STAKING_VALIDATORS_PATH, operator_address
        )
    }

    pub fn contract_config_url(&self) -> String {
        format!("{}{}", self.base_url, CONTRACT_CONFIG_PATH)
    }

    pub fn last_event_nonce_url(
        &self,
        chain_id: &str,
        contract_address: &str,
        validator_address: &str,
    ) -> String {
        format!(
            "{}{}/{}/{}/{}",
            self.base_url, LAST_EVENT_NONCE_PATH, chain_id, contract_address, validator_address
        )
    }

    pub fn balances_url(&self, address: &str) -> String {
        format!(
            "{}{}/{}?pagination.limit=1000",
            self.base_url, BANK_BALANCES_PATH, address
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LcdError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LcdError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LcdError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LcdError::from_reqwest(url, e))?;

        serde_json::from_str(&body).map_err(|e| LcdError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Validator descriptor from the staking module
    pub async fn validator(
        &self,
        operator_address: &str,
    ) -> Result<Option<ValidatorInfo>, LcdError> {
        let url = self.validator_url(operator_address);
        let response: ValidatorResponse = self.get_json(&url).await?;
        Ok(response.validator.map(ValidatorInfo::from))
    }

    /// Full multichain contract registry
    pub async fn contract_config(&self) -> Result<Vec<ContractRegistryEntry>, LcdError> {
        let url = self.contract_config_url();
        let response: ContractConfigResponse = self.get_json(&url).await?;
        Ok(response
            .contract_config
            .into_iter()
            .map(ContractRegistryEntry::from)
            .collect())
    }

    /// Last event nonce the validator attested for a (chain, contract) pair
    pub async fn last_event_nonce(
        &self,
        chain_id: &str,
        contract_address: &str,
        validator_address: &str,
    ) -> Result<Option<u64>, LcdError> {
        let url = self.last_event_nonce_url(chain_id, contract_address, validator_address);
        let response: LastEventNonceResponse = self.get_json(&url).await?;
        Ok(response.nonce())
    }

    /// Amount of the first balance held by `address`, in base units
    pub async fn first_balance(&self, address: &str) -> Result<Option<String>, LcdError> {
        let url = self.balances_url(address);
        let response: BalancesResponse = self.get_json(&url).await?;
        Ok(response.balances.into_iter().next().map(|coin| coin.amount))
    }
}

#[async_trait]
impl ContractRegistrySource for LcdClient {
    async fn contract_registry(&self) -> Result<Vec<ContractRegistryEntry>, LcdError> {
        self.contract_config().await
    }
}

#[async_trait]
impl ChainStateNonceReader for LcdClient {
    async fn last_processed_nonce(
        &self,
        chain_id: &str,
        contract_address: &str,
        validator_address: &str,
    ) -> Option<u64> {
        match self
            .last_event_nonce(chain_id, contract_address, validator_address)
            .await
        {
            Ok(Some(nonce)) => Some(nonce),
            Ok(None) => {
                warn!("last_executed_nonce_data not found for chainId -> {}", chain_id);
                None
            }
            Err(e) => {
                warn!("last_executed_nonce_data unavailable for chainId -> {}: {}", chain_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl ValidatorSource for LcdClient {
    async fn fetch_validator(
        &self,
        operator_address: &str,
    ) -> Result<Option<ValidatorInfo>, LcdError> {
        self.validator(operator_address).await
    }
}
