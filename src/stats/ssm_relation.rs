use super::ssm_assignment::SsmAssignmentComputer;
use crate::ensemble::EnsembleSource;
use crate::error::{ConsensusError, Result};
use crate::types::{TreeId, TreeStructure, ROOT_POP};
use log::info;
use ndarray::Array2;
use std::collections::BTreeSet;

/// Probability that one SSM's population is a strict ancestor of another's.
pub struct SsmRelationComputer<'a, S: EnsembleSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: EnsembleSource + ?Sized> SsmRelationComputer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Row SSM ancestral to column SSM, averaged over every tree.
    pub fn compute_ancestor_desc(&self) -> Result<Array2<f64>> {
        let num_ssms = self.source.num_ssms();
        let trees = self.source.tree_summary();
        let mut ancestor_desc = Array2::<f64>::zeros((num_ssms, num_ssms));
        let mut num_trees = 0usize;

        for item in SsmAssignmentComputer::new(self.source).compute_ssm_assignments() {
            let (tree_id, ssm_ass) = item?;
            let tree = trees
                .get(&tree_id)
                .ok_or(ConsensusError::MissingTree(tree_id))?;
            let node_ancestry = determine_node_ancestry(tree_id, &tree.structure, ssm_ass.ncols())?;

            let ssm_ancestry = ssm_ass.dot(&node_ancestry);
            // ADM: ancestor-descendant matrix
            let tree_adm = ssm_ancestry.dot(&ssm_ass.t());
            if tree_adm.diag().iter().any(|&d| d != 0.0) {
                return Err(ConsensusError::Invariant(format!(
                    "tree {}: an SSM is marked as its own ancestor",
                    tree_id
                )));
            }
            ancestor_desc += &tree_adm;
            num_trees += 1;
        }

        if num_trees == 0 {
            return Err(ConsensusError::Precondition(
                "ensemble has no mutation assignments".to_string(),
            ));
        }
        ancestor_desc /= num_trees as f64;
        info!("Ancestor-descendant matrix built from {} trees", num_trees);
        Ok(ancestor_desc)
    }
}

/// `ancestry[[p - 1, d - 1]] == 1` when population `d` descends from `p`.
///
/// The root carries no SSMs and is left out.
pub fn determine_node_ancestry(
    tree_id: TreeId,
    structure: &TreeStructure,
    num_pops: usize,
) -> Result<Array2<f64>> {
    let mut node_ancestry = Array2::<f64>::zeros((num_pops, num_pops));
    let in_range = |pop: usize| pop != ROOT_POP && pop <= num_pops;

    for (&ancestor, children) in structure {
        if ancestor == ROOT_POP {
            continue;
        }
        if !in_range(ancestor) {
            return Err(out_of_range(tree_id, ancestor, num_pops));
        }

        let mut visited = BTreeSet::new();
        let mut stack = children.clone();
        while let Some(desc) = stack.pop() {
            if !in_range(desc) {
                return Err(out_of_range(tree_id, desc, num_pops));
            }
            if desc == ancestor || !visited.insert(desc) {
                return Err(ConsensusError::Precondition(format!(
                    "tree {}: structure below population {} is not a tree",
                    tree_id, ancestor
                )));
            }
            node_ancestry[[ancestor - 1, desc - 1]] = 1.0;
            if let Some(grandchildren) = structure.get(&desc) {
                stack.extend(grandchildren.iter().copied());
            }
        }
    }

    Ok(node_ancestry)
}

fn out_of_range(tree_id: TreeId, pop: usize, num_pops: usize) -> ConsensusError {
    ConsensusError::Invariant(format!(
        "tree {}: structure references population {} outside 1..={}",
        tree_id, pop, num_pops
    ))
}
