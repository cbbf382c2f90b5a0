// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ethers::prelude::*;

// Read-only slices of the bridge contract ABIs
abigen!(
    Gateway,
    r#"[
        function eventNonce() external view returns (uint256)
    ]"#
);

abigen!(
    Voyager,
    r#"[
        function depositNonce() external view returns (uint256)
    ]"#
);
