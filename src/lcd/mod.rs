// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! REST (LCD) access to the coordinating chain
//!
//! The coordinating chain holds the validator set, the multichain contract
//! registry and the attestation state recording which events every validator
//! has processed.

pub mod client;
pub mod error;
pub mod sources;
pub mod types;

pub use client::LcdClient;
pub use error::LcdError;
pub use sources::{ChainStateNonceReader, ContractRegistrySource, ValidatorSource};
