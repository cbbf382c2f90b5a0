// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/mod.rs - Alerting and liveness checks

pub mod alerting;
pub mod balance;
pub mod health_checks;

pub use alerting::{alert_sink_for, Alert, AlertError, AlertSink, LogAlertSink, PagerDutyAlerter};
pub use balance::{to_route, BalanceChecker, LowBalance};
pub use health_checks::{OrchestratorHealthChecker, RpcHealthSpec};
