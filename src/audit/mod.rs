// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Nonce-lag auditing
//!
//! For every destination chain in the coordinating chain's contract registry,
//! compares the bridge contract's on-chain counter with the counter the
//! validator is recorded as having processed, and reports the raw skew.

pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod types;

pub use error::AuditError;
pub use orchestrator::{AuditorConfig, NonceAuditor};
pub use resolver::{AuditTarget, ContractAddresses, ResolvedChains};
pub use types::{
    nonce_diff, AlertPolicy, AuditRecord, AuditReport, ContractRegistryEntry,
    OnchainFailurePolicy, SkipReason, SkippedChain,
};
