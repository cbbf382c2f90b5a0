// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod kind;
pub mod nonce_reader;
pub mod types;

pub use kind::ContractKind;
pub use nonce_reader::{
    checksum_address, normalize_address, EthersNonceReader, NonceRead, RemoteNonceReader,
};
