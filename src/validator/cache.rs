// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Freshness-bounded validator metadata cache

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::ValidatorInfo;
use crate::lcd::{LcdError, ValidatorSource};

/// How long a fetched descriptor is served without I/O
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ValidatorCacheError {
    #[error("Validator address is not provided")]
    MissingAddress,

    #[error("Validator {0} not found on the coordinating chain")]
    NotFound(String),

    #[error("Failed to fetch validator {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: LcdError,
    },
}

struct CachedValidator {
    info: ValidatorInfo,
    fetched_at: Instant,
}

/// One entry per operator address, refetched once older than the window.
///
/// Concurrent misses on the same address share a single fetch: callers queue
/// on a per-address lock and re-check freshness once they hold it.
pub struct ValidatorInfoCache {
    source: Arc<dyn ValidatorSource>,
    clock: Arc<dyn Clock>,
    freshness_window: Duration,
    entries: RwLock<HashMap<String, CachedValidator>>,
    fetch_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ValidatorInfoCache {
    pub fn new(source: Arc<dyn ValidatorSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), DEFAULT_FRESHNESS_WINDOW)
    }

    pub fn with_clock(
        source: Arc<dyn ValidatorSource>,
        clock: Arc<dyn Clock>,
        freshness_window: Duration,
    ) -> Self {
        ValidatorInfoCache {
            source,
            clock,
            freshness_window,
            entries: RwLock::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    pub async fn get(&self, operator_address: &str) -> Result<ValidatorInfo, ValidatorCacheError> {
        let address = operator_address.trim();
        if address.is_empty() {
            return Err(ValidatorCacheError::MissingAddress);
        }

        if let Some(info) = self.fresh(address) {
            debug!("Validator cache hit for {}", address);
            return Ok(info);
        }

        let fetch_lock = self.fetch_lock(address);
        let _guard = fetch_lock.lock().await;

        // Another caller may have refreshed the entry while we waited
        if let Some(info) = self.fresh(address) {
            return Ok(info);
        }

        debug!("Fetching validator info for {}", address);
        let info = self
            .source
            .fetch_validator(address)
            .await
            .map_err(|source| ValidatorCacheError::Fetch {
                address: address.to_string(),
                source,
            })?
            .ok_or_else(|| ValidatorCacheError::NotFound(address.to_string()))?;

        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                address.to_string(),
                CachedValidator {
                    info: info.clone(),
                    fetched_at: self.clock.now(),
                },
            );
        }

        Ok(info)
    }

    /// When the entry for `operator_address` was last fetched
    pub fn fetched_at(&self, operator_address: &str) -> Option<Instant> {
        self.entries
            .read()
            .ok()?
            .get(operator_address.trim())
            .map(|entry| entry.fetched_at)
    }

    pub fn invalidate(&self, operator_address: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(operator_address.trim());
        }
    }

    fn fresh(&self, address: &str) -> Option<ValidatorInfo> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(address)?;
        let age = self.clock.now().saturating_duration_since(entry.fetched_at);
        if age < self.freshness_window {
            Some(entry.info.clone())
        } else {
            None
        }
    }

    fn fetch_lock(&self, address: &str) -> Arc<tokio::sync::Mutex<()>> {
        match self.fetch_locks.lock() {
            Ok(mut locks) => locks
                .entry(address.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone(),
            // Poisoned: fall back to an uncoalesced fetch
            Err(_) => Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
