// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/balance.rs - Fee-account balance checks

use serde::Serialize;
use tracing::{info, warn};

use crate::lcd::LcdClient;

const ROUTE_DECIMALS: i32 = 18;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowBalance {
    pub role: String,
    pub address: String,
    pub balance: f64,
    pub min_balance: f64,
}

/// Whole ROUTE from a base-unit amount; unparsable amounts are 0
pub fn to_route(amount: &str) -> f64 {
    amount
        .trim()
        .parse::<u128>()
        .map(|base| base as f64 / 10f64.powi(ROUTE_DECIMALS))
        .unwrap_or(0.0)
}

pub struct BalanceChecker {
    lcd: LcdClient,
    min_balance: f64,
}

impl BalanceChecker {
    pub fn new(lcd: LcdClient, min_balance: f64) -> Self {
        BalanceChecker { lcd, min_balance }
    }

    pub async fn balance(&self, address: &str) -> f64 {
        match self.lcd.first_balance(address).await {
            Ok(Some(amount)) => to_route(&amount),
            Ok(None) => 0.0,
            Err(e) => {
                warn!("Error fetching balance for {}: {}", address, e);
                0.0
            }
        }
    }

    /// Accounts below the minimum; blank addresses are ignored
    pub async fn low_balances(&self, accounts: &[(&str, &str)]) -> Vec<LowBalance> {
        let mut low = Vec::new();
        for (role, address) in accounts {
            if address.trim().is_empty() {
                continue;
            }
            let balance = self.balance(address).await;
            info!("{} {} balance: {} ROUTE", role, address, balance);
            if balance < self.min_balance {
                low.push(LowBalance {
                    role: role.to_string(),
                    address: address.to_string(),
                    balance,
                    min_balance: self.min_balance,
                });
            }
        }
        low
    }
}
