#![allow(dead_code)]

use phylo_consensus::types::{MutationAssignment, TreeSummary};
use phylo_consensus::InMemoryEnsemble;

/// Three trees 0 -> 1 -> 2 with SSMs s0, s1 in population 1 and s2, s3 in 2.
pub fn three_tree_ensemble() -> InMemoryEnsemble {
    let mut ensemble = InMemoryEnsemble::new(4);
    for (tree_id, (phi1, phi2)) in [(0.9, 0.3), (0.8, 0.4), (0.85, 0.35)]
        .into_iter()
        .enumerate()
    {
        ensemble.insert_tree(tree_id, chain_tree(phi1, phi2), chain_assignment());
    }
    ensemble
}

pub fn chain_tree(phi1: f64, phi2: f64) -> TreeSummary {
    TreeSummary::new()
        .with_population(0, &[1.0])
        .with_population(1, &[phi1])
        .with_population(2, &[phi2])
        .with_children(0, &[1])
        .with_children(1, &[2])
}

pub fn chain_assignment() -> MutationAssignment {
    MutationAssignment::new()
        .with_ssms(1, &["s0", "s1"])
        .with_ssms(2, &["s2", "s3"])
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
