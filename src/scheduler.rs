// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Periodic monitoring cycles and alert dispatch

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::audit::{AuditReport, AuditRecord, AuditorConfig, NonceAuditor};
use crate::config::{ChainRegistry, MonitorSettings};
use crate::contracts::{ContractKind, EthersNonceReader};
use crate::lcd::LcdClient;
use crate::monitoring::{
    alert_sink_for, Alert, AlertSink, BalanceChecker, LowBalance, OrchestratorHealthChecker,
    RpcHealthSpec,
};
use crate::validator::{SystemClock, ValidatorHealth, ValidatorInfoCache};

/// Outcome of one monitoring cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub cycle_id: Uuid,
    pub reports: Vec<AuditReport>,
    pub errors: Vec<String>,
    pub unhealthy_rpcs: Option<Vec<RpcHealthSpec>>,
    pub validator_health: Option<ValidatorHealth>,
    pub low_balances: Vec<LowBalance>,
    pub alerts_sent: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub orchestrator_health: Option<Vec<RpcHealthSpec>>,
}

/// Lagging records of one contract kind, or why the audit produced none
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NonceValidation {
    Lagging(Vec<AuditRecord>),
    Failed(String),
}

impl NonceValidation {
    pub fn records(&self) -> Option<&[AuditRecord]> {
        match self {
            NonceValidation::Lagging(records) => Some(records),
            NonceValidation::Failed(_) => None,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub health_check: HealthCheck,
    pub nonce_validation: BTreeMap<ContractKind, NonceValidation>,
}

pub struct Monitor {
    settings: MonitorSettings,
    auditor: Arc<NonceAuditor>,
    alert_sink: Arc<dyn AlertSink>,
    orchestrator_health: OrchestratorHealthChecker,
    balance_checker: Option<BalanceChecker>,
    cycle_guard: Mutex<()>,
}

impl Monitor {
    pub fn new(
        settings: MonitorSettings,
        auditor: Arc<NonceAuditor>,
        alert_sink: Arc<dyn AlertSink>,
        orchestrator_health: OrchestratorHealthChecker,
        balance_checker: Option<BalanceChecker>,
    ) -> Self {
        Monitor {
            settings,
            auditor,
            alert_sink,
            orchestrator_health,
            balance_checker,
            cycle_guard: Mutex::new(()),
        }
    }

    /// Wire the production readers from validated settings
    pub fn from_settings(settings: MonitorSettings, chains: ChainRegistry) -> Result<Self> {
        settings.validate()?;
        let call_timeout = settings.call_timeout();

        let lcd = Arc::new(
            LcdClient::new(&settings.lcd_url, call_timeout).context("Failed to create LCD client")?,
        );
        let cache = ValidatorInfoCache::with_clock(
            lcd.clone(),
            Arc::new(SystemClock),
            settings.validator_cache_ttl(),
        );

        let auditor = NonceAuditor::new(
            AuditorConfig {
                validator_address: settings.validator_address.clone(),
                max_concurrency: settings.max_concurrent_chains,
                call_timeout,
                onchain_failure_policy: settings.onchain_failure_policy,
            },
            Arc::new(chains),
            lcd.clone(),
            Arc::new(EthersNonceReader::new(call_timeout)),
            lcd.clone(),
            Arc::new(cache),
        );

        let alert_sink = alert_sink_for(&settings.pager_duty_routing, call_timeout)
            .context("Failed to create alert sink")?;
        if !settings.alerting_enabled() {
            warn!("PagerDuty routing key not configured, alerts will only be logged");
        }

        let orchestrator_health =
            OrchestratorHealthChecker::new(settings.orchestrator_health_endpoint.clone(), call_timeout);
        let balance_checker = Some(BalanceChecker::new(
            lcd.as_ref().clone(),
            settings.min_balance_route(),
        ));

        info!(
            "Monitor configured for {} network, validator {}",
            settings.network(),
            settings.validator_address
        );

        Ok(Self::new(
            settings,
            Arc::new(auditor),
            alert_sink,
            orchestrator_health,
            balance_checker,
        ))
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// One full cycle; `None` if another cycle is still running
    pub async fn run_cycle(&self) -> Option<CycleSummary> {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            warn!("Previous monitoring cycle still running, skipping");
            return None;
        };

        let cycle_id = Uuid::new_v4();
        info!("[{}] Monitoring cycle started", cycle_id);

        let mut summary = CycleSummary {
            cycle_id,
            reports: Vec::new(),
            errors: Vec::new(),
            unhealthy_rpcs: None,
            validator_health: None,
            low_balances: Vec::new(),
            alerts_sent: 0,
        };

        for kind in ContractKind::ALL {
            match self.auditor.audit_report(kind).await {
                Ok(report) => {
                    if self.settings.debug_mode {
                        for record in &report.records {
                            info!("[{}] {:?}", cycle_id, record);
                        }
                    }
                    let lagging = self.settings.alert_policy.filter(&report.records);
                    info!("[{}] {} chains lagging for {}", cycle_id, lagging.len(), kind);
                    if !lagging.is_empty() {
                        let alert = Alert::new(
                            format!(
                                "{} Orchestrator Alert - nonce behind for {} chains",
                                kind,
                                lagging.len()
                            ),
                            serde_json::to_value(&lagging).unwrap_or_default(),
                        );
                        self.dispatch(&alert, &mut summary).await;
                    }
                    summary.reports.push(report);
                }
                Err(e) => {
                    error!("[{}] {} audit failed: {}", cycle_id, kind, e);
                    summary.errors.push(format!("{}: {}", kind, e));
                }
            }
        }

        summary.unhealthy_rpcs = self.orchestrator_health.unhealthy_rpcs().await;
        if let Some(unhealthy) = summary.unhealthy_rpcs.clone().filter(|u| !u.is_empty()) {
            let alert = Alert::new(
                format!(
                    "Orchestrator Health Alert. {} RPCs are unhealthy.",
                    unhealthy.len()
                ),
                serde_json::to_value(&unhealthy).unwrap_or_default(),
            );
            self.dispatch(&alert, &mut summary).await;
        }

        summary.validator_health = self.auditor.validator_health().await;
        if let Some(health) = summary.validator_health.clone().filter(|h| !h.is_healthy) {
            let alert = Alert::new(
                format!(
                    "Validator Health Alert. {} is unhealthy.",
                    health.validator_address
                ),
                serde_json::to_value(&health).unwrap_or_default(),
            );
            self.dispatch(&alert, &mut summary).await;
        }

        if let Some(checker) = &self.balance_checker {
            let accounts = [
                ("validator", self.settings.validator_address.as_str()),
                ("orchestrator", self.settings.orchestrator_address.as_str()),
            ];
            summary.low_balances = checker.low_balances(&accounts).await;
            if !summary.low_balances.is_empty() {
                let alert = Alert::new(
                    format!(
                        "Low Balance Alert. {} accounts below {} ROUTE.",
                        summary.low_balances.len(),
                        self.settings.min_balance_route()
                    ),
                    serde_json::to_value(&summary.low_balances).unwrap_or_default(),
                );
                self.dispatch(&alert, &mut summary).await;
            }
        }

        info!(
            "[{}] Monitoring cycle finished, {} alerts sent",
            cycle_id, summary.alerts_sent
        );
        Some(summary)
    }

    /// Computed on demand, sends no alerts. Records are filtered by the alert policy.
    pub async fn check_health(&self) -> HealthStatus {
        let (orchestrator_health, gateway, voyager) = tokio::join!(
            self.orchestrator_health.unhealthy_rpcs(),
            self.auditor.audit(ContractKind::Gateway),
            self.auditor.audit(ContractKind::Voyager),
        );

        let mut nonce_validation = BTreeMap::new();
        for (kind, result) in [
            (ContractKind::Gateway, gateway),
            (ContractKind::Voyager, voyager),
        ] {
            let validation = match result {
                Ok(records) => NonceValidation::Lagging(
                    self.settings
                        .alert_policy
                        .filter(&records)
                        .into_iter()
                        .cloned()
                        .collect(),
                ),
                Err(e) => {
                    error!("{} audit failed during health check: {}", kind, e);
                    NonceValidation::Failed(format!("Failed to get data: {}", e))
                }
            };
            nonce_validation.insert(kind, validation);
        }

        HealthStatus {
            health_check: HealthCheck {
                orchestrator_health,
            },
            nonce_validation,
        }
    }

    /// Run cycles every `schedule_interval_minutes` until `shutdown` resolves
    pub async fn run_until<F>(self: Arc<Self>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Some(period) = self.settings.schedule_interval() else {
            error!(
                "schedule_interval_minutes must be positive (got {}), scheduler disabled",
                self.settings.schedule_interval_minutes
            );
            return Ok(());
        };

        info!("Scheduler running every {:?}", period);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Scheduler stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    async fn dispatch(&self, alert: &Alert, summary: &mut CycleSummary) {
        match self.alert_sink.send_alert(alert).await {
            Ok(()) => summary.alerts_sent += 1,
            Err(e) => {
                error!("Failed to send alert '{}': {}", alert.summary, e);
                summary.errors.push(e.to_string());
            }
        }
    }
}
