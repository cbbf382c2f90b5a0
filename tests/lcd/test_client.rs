// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use httpmock::prelude::*;
use orchestrator_monitor::contracts::ContractKind;
use orchestrator_monitor::lcd::{
    ChainStateNonceReader, ContractRegistrySource, LcdClient, LcdError, ValidatorSource,
};
use serde_json::json;
use std::time::Duration;

const VALIDATOR: &str = "routervaloper1abc";

fn client(server: &MockServer) -> LcdClient {
    LcdClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_contract_registry_fetch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/router-protocol/router-chain/multichain/contract_config");
            then.status(200).json_body(json!({
                "contractConfig": [
                    {"chainId": "43113", "contractType": "GATEWAY", "contractAddress": "0xGw", "contract_enabled": true},
                    {"chainId": "43113", "contractType": "VOYAGER", "contractAddress": "0xVy", "contract_enabled": false},
                    {"chainId": "80001", "contractType": "ASSET_FORWARDER", "contractAddress": "0xAf", "contract_enabled": true}
                ]
            }));
        })
        .await;

    let entries = client(&server).contract_registry().await.unwrap();
    mock.assert_async().await;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].contract_kind, Some(ContractKind::Gateway));
    assert_eq!(entries[0].contract_address, "0xGw");
    assert!(!entries[1].enabled);
    assert_eq!(entries[2].contract_kind, None);
}

#[tokio::test]
async fn test_registry_server_error_is_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/router-protocol/router-chain/multichain/contract_config");
            then.status(503);
        })
        .await;

    let result = client(&server).contract_registry().await;
    assert!(matches!(result, Err(LcdError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_registry_malformed_body_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/router-protocol/router-chain/multichain/contract_config");
            then.status(200).body("not json");
        })
        .await;

    let result = client(&server).contract_registry().await;
    assert!(matches!(result, Err(LcdError::Decode { .. })));
}

#[tokio::test]
async fn test_last_processed_nonce() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!(
                "/router-protocol/router-chain/attestation/last_event_nonce/43113/0xGw/{}",
                VALIDATOR
            ));
            then.status(200).json_body(json!({"eventNonce": "115"}));
        })
        .await;

    let lcd = client(&server);
    assert_eq!(
        lcd.last_processed_nonce("43113", "0xGw", VALIDATOR).await,
        Some(115)
    );
    // Unknown chain: the mock server answers 404
    assert_eq!(lcd.last_processed_nonce("1", "0xGw", VALIDATOR).await, None);
}

#[tokio::test]
async fn test_last_processed_nonce_without_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/attestation/last_event_nonce/");
            then.status(200).json_body(json!({}));
        })
        .await;

    assert_eq!(
        client(&server)
            .last_processed_nonce("43113", "0xGw", VALIDATOR)
            .await,
        None
    );
}

#[tokio::test]
async fn test_fetch_validator() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/cosmos/staking/v1beta1/validators/{}", VALIDATOR));
            then.status(200).json_body(json!({
                "validator": {
                    "operator_address": VALIDATOR,
                    "jailed": false,
                    "status": "BOND_STATUS_BONDED",
                    "tokens": "5000",
                    "description": {"moniker": "node1"}
                }
            }));
        })
        .await;

    let info = client(&server)
        .fetch_validator(VALIDATOR)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info.moniker, "node1");
    assert_eq!(info.tokens, "5000");
}

#[tokio::test]
async fn test_first_balance() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/cosmos/bank/v1beta1/balances/{}", VALIDATOR))
                .query_param("pagination.limit", "1000");
            then.status(200).json_body(json!({
                "balances": [{"denom": "route", "amount": "3000000000000000000"}]
            }));
        })
        .await;

    let amount = client(&server).first_balance(VALIDATOR).await.unwrap();
    assert_eq!(amount.as_deref(), Some("3000000000000000000"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_response_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/router-protocol/router-chain/multichain/contract_config");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({"contractConfig": []}));
        })
        .await;

    let lcd = LcdClient::new(&server.base_url(), Duration::from_millis(200)).unwrap();
    let result = lcd.contract_registry().await;
    assert!(matches!(result, Err(LcdError::Timeout { .. })));
}
