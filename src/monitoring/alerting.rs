// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/alerting.rs - Alert delivery

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

pub const PAGERDUTY_EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";
pub const ALERT_SOURCE: &str = "router-chain-monitor";

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert request failed: {0}")]
    Request(String),

    #[error("Alert rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub summary: String,
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(summary: impl Into<String>, details: Value) -> Self {
        Alert {
            summary: summary.into(),
            details,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// PagerDuty Events API v2 sink
pub struct PagerDutyAlerter {
    routing_key: String,
    endpoint: String,
    http_client: Client,
}

impl PagerDutyAlerter {
    pub fn new(routing_key: impl Into<String>, timeout: Duration) -> Result<Self, AlertError> {
        Self::with_endpoint(routing_key, PAGERDUTY_EVENTS_URL, timeout)
    }

    pub fn with_endpoint(
        routing_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AlertError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::Request(e.to_string()))?;
        Ok(PagerDutyAlerter {
            routing_key: routing_key.into(),
            endpoint: endpoint.into(),
            http_client,
        })
    }

    fn event_body(&self, alert: &Alert) -> Value {
        json!({
            "routing_key": self.routing_key,
            "event_action": "trigger",
            "payload": {
                "summary": alert.summary,
                "source": ALERT_SOURCE,
                "severity": "error",
                "timestamp": alert.timestamp.to_rfc3339(),
                "custom_details": alert.details,
            }
        })
    }
}

#[async_trait]
impl AlertSink for PagerDutyAlerter {
    async fn send_alert(&self, alert: &Alert) -> Result<(), AlertError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&self.event_body(alert))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send PagerDuty alert: {}", e);
                AlertError::Request(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            info!("Alert sent successfully: {}", alert.summary);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("Failed to send alert ({}): {}", status, body);
        Err(AlertError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Used when no routing key is configured
#[derive(Debug, Default)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send_alert(&self, alert: &Alert) -> Result<(), AlertError> {
        warn!(
            "PagerDuty routing key not configured, alert not sent: {} {}",
            alert.summary, alert.details
        );
        Ok(())
    }
}

/// PagerDuty when a routing key is set, otherwise log-only
pub fn alert_sink_for(routing_key: &str, timeout: Duration) -> Result<Arc<dyn AlertSink>, AlertError> {
    let routing_key = routing_key.trim();
    if routing_key.is_empty() {
        Ok(Arc::new(LogAlertSink))
    } else {
        Ok(Arc::new(PagerDutyAlerter::new(routing_key, timeout)?))
    }
}
