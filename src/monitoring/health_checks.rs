// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/health_checks.rs - Orchestrator liveness

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, warn};

/// One entry of the orchestrator's `healthSpecs` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcHealthSpec {
    #[serde(rename = "chainId", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
    #[serde(rename = "chainRpcHealth", default)]
    pub chain_rpc_health: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RpcHealthSpec {
    pub fn is_healthy(&self) -> bool {
        self.chain_rpc_health == Some(true)
    }
}

#[derive(Debug, Deserialize)]
struct OrchestratorHealthResponse {
    #[serde(rename = "healthSpecs", default)]
    health_specs: Vec<RpcHealthSpec>,
}

pub struct OrchestratorHealthChecker {
    endpoint: String,
    http_client: Client,
}

impl OrchestratorHealthChecker {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        OrchestratorHealthChecker {
            endpoint: endpoint.into().trim().to_string(),
            http_client,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }

    /// RPCs the orchestrator reports as unhealthy.
    /// `None` when no endpoint is configured or the endpoint can't be read.
    pub async fn unhealthy_rpcs(&self) -> Option<Vec<RpcHealthSpec>> {
        if !self.is_configured() {
            warn!("Orchestrator health endpoint is not configured");
            return None;
        }

        debug!("GET {}", self.endpoint);
        let response = match self.http_client.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching orchestrator health: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            error!("Orchestrator health returned status {}", response.status());
            return None;
        }

        match response.json::<OrchestratorHealthResponse>().await {
            Ok(health) => Some(
                health
                    .health_specs
                    .into_iter()
                    .filter(|spec| !spec.is_healthy())
                    .collect(),
            ),
            Err(e) => {
                error!("Error decoding orchestrator health: {}", e);
                None
            }
        }
    }
}
