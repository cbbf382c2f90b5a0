// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-chain counter reads against destination-chain RPCs

use async_trait::async_trait;
use ethers::contract::ContractError;
use ethers::providers::{Http, Provider, RpcError};
use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

use super::kind::ContractKind;
use super::types::{Gateway, Voyager};

/// Outcome of a single on-chain counter read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonceRead {
    Value(u64),
    /// Transport failure or timeout; says nothing about the counter
    Unreachable(String),
    /// The node answered but the call failed (revert, ABI mismatch, bad address)
    CallError(String),
}

impl NonceRead {
    pub fn value(&self) -> Option<u64> {
        match self {
            NonceRead::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, NonceRead::Value(_))
    }
}

/// Reads the authoritative counter of a bridge contract
#[async_trait]
pub trait RemoteNonceReader: Send + Sync {
    /// Never fails: every error is folded into [`NonceRead`]
    async fn read_nonce(
        &self,
        rpc_endpoint: &str,
        contract_address: &str,
        kind: ContractKind,
    ) -> NonceRead;
}

/// Parse an address regardless of its casing
pub fn normalize_address(address: &str) -> Result<Address, String> {
    Address::from_str(&address.trim().to_lowercase())
        .map_err(|e| format!("invalid contract address {}: {}", address, e))
}

/// EIP-55 form of an address, if it parses
pub fn checksum_address(address: &str) -> Option<String> {
    normalize_address(address)
        .ok()
        .map(|addr| ethers::utils::to_checksum(&addr, None))
}

/// [`RemoteNonceReader`] backed by ethers HTTP providers
pub struct EthersNonceReader {
    call_timeout: Duration,
    providers: RwLock<HashMap<String, Arc<Provider<Http>>>>,
}

impl EthersNonceReader {
    pub fn new(call_timeout: Duration) -> Self {
        EthersNonceReader {
            call_timeout,
            providers: RwLock::new(HashMap::new()),
        }
    }

    fn provider_for(&self, rpc_endpoint: &str) -> Result<Arc<Provider<Http>>, String> {
        if let Some(provider) = self
            .providers
            .read()
            .ok()
            .and_then(|providers| providers.get(rpc_endpoint).cloned())
        {
            return Ok(provider);
        }

        let provider = Provider::<Http>::try_from(rpc_endpoint)
            .map_err(|e| format!("invalid rpc endpoint {}: {}", rpc_endpoint, e))?;
        let provider = Arc::new(provider);

        if let Ok(mut providers) = self.providers.write() {
            providers.insert(rpc_endpoint.to_string(), provider.clone());
        }

        Ok(provider)
    }

    async fn call(
        provider: Arc<Provider<Http>>,
        address: Address,
        kind: ContractKind,
    ) -> Result<U256, ContractError<Provider<Http>>> {
        match kind {
            ContractKind::Gateway => {
                let contract = Gateway::new(address, provider);
                contract.event_nonce().call().await
            }
            ContractKind::Voyager => {
                let contract = Voyager::new(address, provider);
                contract.deposit_nonce().call().await
            }
        }
    }

    fn classify(
        result: Result<U256, ContractError<Provider<Http>>>,
    ) -> NonceRead {
        match result {
            Ok(value) if value > U256::from(u64::MAX) => {
                NonceRead::CallError(format!("counter {} does not fit in 64 bits", value))
            }
            Ok(value) => NonceRead::Value(value.as_u64()),
            Err(e) if e.is_revert() => NonceRead::CallError(e.to_string()),
            // The node answered with a JSON-RPC error object
            Err(ContractError::MiddlewareError { e }) if e.as_error_response().is_some() => {
                NonceRead::CallError(e.to_string())
            }
            Err(ContractError::ProviderError { e }) if e.as_error_response().is_some() => {
                NonceRead::CallError(e.to_string())
            }
            Err(ContractError::MiddlewareError { e }) => NonceRead::Unreachable(e.to_string()),
            Err(ContractError::ProviderError { e }) => NonceRead::Unreachable(e.to_string()),
            Err(e) => NonceRead::CallError(e.to_string()),
        }
    }
}

impl Default for EthersNonceReader {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl RemoteNonceReader for EthersNonceReader {
    async fn read_nonce(
        &self,
        rpc_endpoint: &str,
        contract_address: &str,
        kind: ContractKind,
    ) -> NonceRead {
        let rpc_endpoint = rpc_endpoint.trim();

        let address = match normalize_address(contract_address) {
            Ok(address) => address,
            Err(e) => {
                warn!("Error fetching nonce for {}: {}", contract_address, e);
                return NonceRead::CallError(e);
            }
        };

        let provider = match self.provider_for(rpc_endpoint) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Error fetching nonce for {:?}: {}", address, e);
                return NonceRead::Unreachable(e);
            }
        };

        debug!(
            "Calling {}() on {} via {}",
            kind.nonce_method(),
            ethers::utils::to_checksum(&address, None),
            rpc_endpoint
        );

        let outcome = match tokio::time::timeout(
            self.call_timeout,
            Self::call(provider, address, kind),
        )
        .await
        {
            Ok(result) => Self::classify(result),
            Err(_) => NonceRead::Unreachable(format!(
                "{}() timed out after {}ms",
                kind.nonce_method(),
                self.call_timeout.as_millis()
            )),
        };

        if let NonceRead::Unreachable(reason) | NonceRead::CallError(reason) = &outcome {
            warn!(
                "Error fetching nonce for {}: {}",
                ethers::utils::to_checksum(&address, None),
                reason
            );
        }

        outcome
    }
}
