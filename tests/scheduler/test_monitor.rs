// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use httpmock::prelude::*;
use orchestrator_monitor::audit::AlertPolicy;
use orchestrator_monitor::config::MonitorSettings;
use orchestrator_monitor::monitoring::OrchestratorHealthChecker;
use orchestrator_monitor::contracts::ContractKind;
use orchestrator_monitor::scheduler::{Monitor, NonceValidation};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{
    chain, gateway, validator_info, voyager, AuditorParts, MockChainState, MockRegistry,
    MockRemote, MockValidatorSource, RecordingAlertSink, VALIDATOR,
};

fn parts() -> AuditorParts {
    let mut parts = AuditorParts::new(
        vec![chain("A", "rpc-a", 10), chain("B", "rpc-b", 0)],
        vec![
            gateway("A", "0xa"),
            gateway("B", "0xb"),
            voyager("A", "0xva"),
        ],
    );
    parts.remote = Arc::new(MockRemote::new().with_value("rpc-a", 120).with_value("rpc-b", 100));
    parts.chain_state = Arc::new(MockChainState::new().with_nonce("A", 115).with_nonce("B", 104));
    parts
}

fn settings(alert_policy: AlertPolicy) -> MonitorSettings {
    MonitorSettings {
        lcd_url: "http://lcd.invalid".to_string(),
        validator_address: VALIDATOR.to_string(),
        alert_policy,
        ..Default::default()
    }
}

fn monitor(
    parts: &AuditorParts,
    settings: MonitorSettings,
    health: OrchestratorHealthChecker,
) -> (Monitor, Arc<RecordingAlertSink>) {
    let sink = Arc::new(RecordingAlertSink::default());
    let monitor = Monitor::new(
        settings,
        Arc::new(parts.build()),
        sink.clone(),
        health,
        None,
    );
    (monitor, sink)
}

fn no_health_endpoint() -> OrchestratorHealthChecker {
    OrchestratorHealthChecker::new("", Duration::from_secs(1))
}

#[tokio::test]
async fn test_cycle_alerts_lagging_gateway_chains() {
    let (monitor, sink) = monitor(&parts(), settings(AlertPolicy::AnyLag), no_health_endpoint());
    let summary = monitor.run_cycle().await.unwrap();

    assert_eq!(summary.reports.len(), 2);
    assert!(summary.errors.is_empty());

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(
        alerts[0].summary,
        "GATEWAY Orchestrator Alert - nonce behind for 1 chains"
    );
    assert_eq!(alerts[0].details[0]["chainId"], "A");
    assert_eq!(alerts[0].details[0]["diff_nonces"], 5);
    assert_eq!(
        alerts[1].summary,
        "VOYAGER Orchestrator Alert - nonce behind for 1 chains"
    );
    assert_eq!(summary.alerts_sent, 2);
}

#[tokio::test]
async fn test_beyond_buffer_policy_suppresses_alert() {
    let (monitor, sink) = monitor(
        &parts(),
        settings(AlertPolicy::BeyondBuffer),
        no_health_endpoint(),
    );
    monitor.run_cycle().await.unwrap();
    assert!(sink.alerts().is_empty());
}

#[tokio::test]
async fn test_unhealthy_rpcs_and_jailed_validator_alert() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({
                "healthSpecs": [
                    {"chainId": "A", "chainRpcHealth": false},
                    {"chainId": "B", "chainRpcHealth": false}
                ]
            }));
        })
        .await;

    let mut parts = parts();
    parts.validator = Arc::new(MockValidatorSource::new(validator_info("node1", true)));
    let (monitor, sink) = monitor(
        &parts,
        settings(AlertPolicy::BeyondBuffer),
        OrchestratorHealthChecker::new(server.url("/health"), Duration::from_secs(5)),
    );

    let summary = monitor.run_cycle().await.unwrap();
    assert_eq!(summary.unhealthy_rpcs.as_ref().map(Vec::len), Some(2));
    assert_eq!(summary.validator_health.as_ref().map(|h| h.is_healthy), Some(false));

    let summaries: Vec<String> = sink.alerts().into_iter().map(|a| a.summary).collect();
    assert!(summaries.contains(&"Orchestrator Health Alert. 2 RPCs are unhealthy.".to_string()));
    assert!(summaries.iter().any(|s| s.starts_with("Validator Health Alert.")));
}

#[tokio::test]
async fn test_check_health_reports_lagging_chains_per_kind() {
    let (monitor, sink) = monitor(&parts(), settings(AlertPolicy::AnyLag), no_health_endpoint());
    let status = monitor.check_health().await;
    let json = serde_json::to_value(&status).unwrap();

    assert!(json["health_check"]["orchestrator_health"].is_null());
    // B is ahead of its on-chain nonce, so only A lags
    let gateway = json["nonce_validation"]["GATEWAY"].as_array().unwrap();
    assert_eq!(gateway.len(), 1);
    assert_eq!(gateway[0]["chainId"], "A");
    assert_eq!(gateway[0]["diff_nonces"], 5);
    assert_eq!(json["nonce_validation"]["VOYAGER"].as_array().unwrap().len(), 1);
    assert!(sink.alerts().is_empty());
}

#[tokio::test]
async fn test_check_health_applies_alert_policy() {
    let (monitor, _) = monitor(&parts(), settings(AlertPolicy::BeyondBuffer), no_health_endpoint());
    let status = monitor.check_health().await;

    // A lags by 5 within a buffer of 10
    let gateway = status.nonce_validation[&ContractKind::Gateway].records().unwrap();
    assert!(gateway.is_empty());
}

#[tokio::test]
async fn test_check_health_reports_audit_failure_as_message() {
    let mut parts = parts();
    parts.registry = Arc::new(MockRegistry::failing());
    let (monitor, sink) = monitor(&parts, settings(AlertPolicy::AnyLag), no_health_endpoint());
    let status = monitor.check_health().await;
    let json = serde_json::to_value(&status).unwrap();

    for kind in ["GATEWAY", "VOYAGER"] {
        let message = json["nonce_validation"][kind].as_str().unwrap();
        assert!(message.starts_with("Failed to get data"), "{}", message);
    }
    assert!(matches!(
        status.nonce_validation[&ContractKind::Gateway],
        NonceValidation::Failed(_)
    ));
    assert!(sink.alerts().is_empty());
}

#[tokio::test]
async fn test_disabled_schedule_returns_immediately() {
    let (monitor, sink) = monitor(&parts(), settings(AlertPolicy::AnyLag), no_health_endpoint());
    Arc::new(monitor)
        .run_until(std::future::pending::<()>())
        .await
        .unwrap();
    assert!(sink.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_runs_cycles_until_shutdown() {
    let mut settings = settings(AlertPolicy::AnyLag);
    settings.schedule_interval_minutes = 1;
    let (monitor, sink) = monitor(&parts(), settings, no_health_endpoint());

    // Ticks at 0s, 60s and 120s fire before shutdown at 150s, two alerts each
    Arc::new(monitor)
        .run_until(tokio::time::sleep(Duration::from_secs(150)))
        .await
        .unwrap();
    assert_eq!(sink.alerts().len(), 6);
}
