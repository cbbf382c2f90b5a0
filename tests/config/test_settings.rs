// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use orchestrator_monitor::audit::{AlertPolicy, OnchainFailurePolicy};
use orchestrator_monitor::config::{
    ConfigError, MonitorSettings, Network, MAX_SCHEDULE_INTERVAL_MINUTES,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

const FULL_SETTINGS: &str = r#"
[settings]
pager_duty_routing = "routing-key"
orchestrator_health_endpoint = "http://localhost:8001/health"
schedule_interval_minutes = 10
validator_address = "routervaloper1abc"
orchestrator_address = "router1orch"
lcd_url = "https://lcd.testnet.example"
environment = "mainnet"
debug_mode = true
min_balance = "25ROUTE"
chain_info_path = "config/chains.json"
http_port = 7000
max_concurrent_chains = 4
call_timeout_secs = 15
validator_cache_ttl_secs = 60
alert_policy = "beyond_buffer"
onchain_failure_policy = "skip"
"#;

fn write_settings(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_settings() {
    let file = write_settings(FULL_SETTINGS);
    let settings = MonitorSettings::load(file.path()).unwrap();

    assert!(settings.validate().is_ok());
    assert!(settings.alerting_enabled());
    assert!(settings.debug_mode);
    assert_eq!(settings.network(), Network::Mainnet);
    assert_eq!(settings.min_balance_route(), 25.0);
    assert_eq!(settings.chain_info_path, PathBuf::from("config/chains.json"));
    assert_eq!(settings.http_port, 7000);
    assert_eq!(settings.max_concurrent_chains, 4);
    assert_eq!(settings.call_timeout(), Duration::from_secs(15));
    assert_eq!(settings.validator_cache_ttl(), Duration::from_secs(60));
    assert_eq!(settings.schedule_interval(), Some(Duration::from_secs(600)));
    assert_eq!(settings.alert_policy, AlertPolicy::BeyondBuffer);
    assert_eq!(settings.onchain_failure_policy, OnchainFailurePolicy::Skip);
}

#[test]
fn test_partial_settings_use_defaults() {
    let file = write_settings(
        "[settings]\nlcd_url = \"https://lcd.example\"\nvalidator_address = \"val\"\n",
    );
    let settings = MonitorSettings::load(file.path()).unwrap();

    assert_eq!(settings.http_port, 5000);
    assert_eq!(settings.environment, "testnet");
    assert_eq!(settings.schedule_interval(), None);
    assert_eq!(settings.min_balance_route(), 0.0);
    assert_eq!(
        settings.chain_info_path,
        PathBuf::from("artifacts/chainInfos.json")
    );
    assert!(!settings.alerting_enabled());
    assert_eq!(settings.alert_policy, AlertPolicy::AnyLag);
}

#[test]
fn test_negative_interval_disables_scheduler() {
    let file = write_settings("[settings]\nschedule_interval_minutes = -5\n");
    let settings = MonitorSettings::load(file.path()).unwrap();
    assert_eq!(settings.schedule_interval(), None);
}

#[test]
fn test_huge_interval_is_rejected_not_wrapped() {
    let file = write_settings(
        "[settings]\nlcd_url = \"https://lcd.example\"\nvalidator_address = \"val\"\nschedule_interval_minutes = 9223372036854775807\n",
    );
    let settings = MonitorSettings::load(file.path()).unwrap();

    assert_eq!(settings.schedule_interval(), None);
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::Invalid {
            key: "schedule_interval_minutes",
            ..
        })
    ));
}

#[test]
fn test_one_year_interval_is_accepted() {
    let settings = MonitorSettings {
        lcd_url: "https://lcd.example".to_string(),
        validator_address: "val".to_string(),
        schedule_interval_minutes: MAX_SCHEDULE_INTERVAL_MINUTES as i64,
        ..Default::default()
    };
    assert!(settings.validate().is_ok());
    assert_eq!(
        settings.schedule_interval(),
        Some(Duration::from_secs(MAX_SCHEDULE_INTERVAL_MINUTES * 60))
    );
}

#[test]
fn test_invalid_lcd_url_rejected() {
    let file = write_settings(
        "[settings]\nlcd_url = \"not a url\"\nvalidator_address = \"val\"\n",
    );
    let settings = MonitorSettings::load(file.path()).unwrap();
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::Invalid { key: "lcd_url", .. })
    ));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let file = write_settings("[settings\nlcd_url = ");
    assert!(matches!(
        MonitorSettings::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_unknown_policy_is_parse_error() {
    let file = write_settings("[settings]\nalert_policy = \"sometimes\"\n");
    assert!(matches!(
        MonitorSettings::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}
