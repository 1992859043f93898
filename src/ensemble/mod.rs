pub(crate) mod json;

pub use json::JsonResultLoader;

use crate::error::Result;
use crate::types::{MutationAssignment, TreeId, TreeSummaries, TreeSummary};
use std::collections::BTreeMap;

/// Lazy sequence of per-tree mutation assignments.
pub type MutAssignmentIter<'a> = Box<dyn Iterator<Item = Result<(TreeId, MutationAssignment)>> + 'a>;

/// Source of a sampled tree ensemble.
///
/// `mut_assignments` starts a fresh pass on every call, so computers that
/// need several passes simply ask again.
pub trait EnsembleSource {
    fn tree_summary(&self) -> &TreeSummaries;

    /// Total variant count, identical for every tree.
    fn num_ssms(&self) -> usize;

    fn mut_assignments(&self) -> MutAssignmentIter<'_>;

    fn num_trees(&self) -> usize {
        self.tree_summary().len()
    }
}

/// Ensemble held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnsemble {
    trees: TreeSummaries,
    assignments: BTreeMap<TreeId, MutationAssignment>,
    num_ssms: usize,
}

impl InMemoryEnsemble {
    pub fn new(num_ssms: usize) -> Self {
        Self {
            num_ssms,
            ..Self::default()
        }
    }

    pub fn with_tree(
        mut self,
        tree_id: TreeId,
        summary: TreeSummary,
        assignment: MutationAssignment,
    ) -> Self {
        self.insert_tree(tree_id, summary, assignment);
        self
    }

    pub fn insert_tree(
        &mut self,
        tree_id: TreeId,
        summary: TreeSummary,
        assignment: MutationAssignment,
    ) {
        self.trees.insert(tree_id, summary);
        self.assignments.insert(tree_id, assignment);
    }
}

impl EnsembleSource for InMemoryEnsemble {
    fn tree_summary(&self) -> &TreeSummaries {
        &self.trees
    }

    fn num_ssms(&self) -> usize {
        self.num_ssms
    }

    fn mut_assignments(&self) -> MutAssignmentIter<'_> {
        Box::new(
            self.assignments
                .iter()
                .map(|(&tree_id, muts)| Ok((tree_id, muts.clone()))),
        )
    }
}
