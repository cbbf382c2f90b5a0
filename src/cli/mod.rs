// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{ChainRegistry, MonitorSettings};
use crate::scheduler::Monitor;

/// Bridge orchestrator monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "orchestrator-monitor")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Audits validator nonce lag across bridge chains", long_about = None)]
pub struct Cli {
    /// Path to the TOML settings file
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Run a single cycle, print the summary as JSON and exit
    #[arg(long)]
    pub once: bool,

    /// Status server port, overrides `http_port`
    #[arg(long, env = "MONITOR_HTTP_PORT")]
    pub port: Option<u16>,

    /// Overrides `lcd_url`
    #[arg(long, env = "MONITOR_LCD_URL")]
    pub lcd_url: Option<String>,

    /// Overrides `validator_address`
    #[arg(long, env = "MONITOR_VALIDATOR_ADDRESS")]
    pub validator_address: Option<String>,

    /// Overrides `pager_duty_routing`
    #[arg(long, env = "MONITOR_PAGER_DUTY_ROUTING", hide_env_values = true)]
    pub pager_duty_routing: Option<String>,
}

impl Cli {
    /// Settings file merged with command-line and environment overrides
    pub fn load_settings(&self) -> Result<MonitorSettings> {
        let mut settings = MonitorSettings::load(&self.config)
            .with_context(|| format!("Failed to load settings from {}", self.config.display()))?;

        if let Some(port) = self.port {
            settings.http_port = port;
        }
        if let Some(lcd_url) = &self.lcd_url {
            settings.lcd_url = lcd_url.clone();
        }
        if let Some(validator_address) = &self.validator_address {
            settings.validator_address = validator_address.clone();
        }
        if let Some(routing) = &self.pager_duty_routing {
            settings.pager_duty_routing = routing.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Execute the monitor as configured by `cli`
pub async fn execute(cli: Cli) -> Result<()> {
    let settings = cli.load_settings()?;
    let chains = ChainRegistry::load(&settings.chain_info_path).with_context(|| {
        format!(
            "Failed to load chain table from {}",
            settings.chain_info_path.display()
        )
    })?;
    info!("Loaded {} chains", chains.len());

    let http_port = settings.http_port;
    let monitor = Arc::new(Monitor::from_settings(settings, chains)?);

    if cli.once {
        let summary = monitor.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let server = tokio::spawn(crate::api::start_server(
        http_port,
        monitor.clone(),
        shutdown_signal(),
    ));
    monitor.run_until(shutdown_signal()).await?;
    server.await??;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
