// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use orchestrator_monitor::audit::{ContractRegistryEntry, ResolvedChains, SkipReason};
use orchestrator_monitor::config::ChainRegistry;
use orchestrator_monitor::contracts::ContractKind;
use std::collections::HashSet;

use crate::common::{chain, gateway, voyager};

#[test]
fn test_effective_set_is_registry_intersect_local() {
    let local = ChainRegistry::from_chains(vec![chain("A", "rpc-a", 0), chain("C", "rpc-c", 0)]);
    let entries = vec![gateway("A", "0xa"), gateway("B", "0xb")];

    let resolved = ResolvedChains::resolve(&entries, &local);
    let effective: HashSet<String> = resolved.effective_chain_ids().into_iter().collect();
    assert_eq!(effective, HashSet::from(["A".to_string()]));

    let (targets, skipped) = resolved.targets(ContractKind::Gateway);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].chain.chain_id, "A");
    assert_eq!(targets[0].contract_address, "0xa");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].chain_id, "B");
    assert_eq!(skipped[0].reason, SkipReason::NotConfiguredLocally);
}

#[test]
fn test_disabled_kind_excluded_but_other_kind_audited() {
    let local = ChainRegistry::from_chains(vec![chain("A", "rpc-a", 0)]);
    let entries = vec![
        ContractRegistryEntry::new("A", ContractKind::Gateway, "0xgw", false),
        voyager("A", "0xvy"),
    ];
    let resolved = ResolvedChains::resolve(&entries, &local);

    let (gateway_targets, gateway_skipped) = resolved.targets(ContractKind::Gateway);
    assert!(gateway_targets.is_empty());
    assert_eq!(gateway_skipped[0].reason, SkipReason::NoContractAddress);

    let (voyager_targets, _) = resolved.targets(ContractKind::Voyager);
    assert_eq!(voyager_targets.len(), 1);
    assert_eq!(voyager_targets[0].contract_address, "0xvy");
}

#[test]
fn test_local_only_chains_never_targeted() {
    let local = ChainRegistry::from_chains(vec![
        chain("A", "rpc-a", 0),
        chain("Z", "rpc-z", 0),
    ]);
    let resolved = ResolvedChains::resolve(&[gateway("A", "0xa")], &local);
    let (targets, skipped) = resolved.targets(ContractKind::Gateway);

    assert!(targets.iter().all(|t| t.chain.chain_id != "Z"));
    assert!(skipped.iter().all(|s| s.chain_id != "Z"));
}

#[test]
fn test_blank_address_counts_as_missing() {
    let local = ChainRegistry::from_chains(vec![chain("A", "rpc-a", 0)]);
    let resolved = ResolvedChains::resolve(&[gateway("A", "  ")], &local);
    let (targets, skipped) = resolved.targets(ContractKind::Gateway);
    assert!(targets.is_empty());
    assert_eq!(skipped[0].reason, SkipReason::NoContractAddress);
}
