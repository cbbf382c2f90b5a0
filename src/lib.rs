// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod lcd;
pub mod monitoring;
pub mod scheduler;
pub mod validator;
pub mod version;

pub use audit::{AuditError, AuditRecord, AuditReport, AuditorConfig, NonceAuditor};
pub use config::{ChainConfig, ChainRegistry, MonitorSettings};
pub use contracts::{ContractKind, EthersNonceReader, NonceRead, RemoteNonceReader};
pub use lcd::LcdClient;
pub use scheduler::Monitor;
pub use validator::{ValidatorInfo, ValidatorInfoCache};
