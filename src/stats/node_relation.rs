use crate::error::{ConsensusError, Result};
use crate::types::{PopIdx, TreeSummaries};
use log::{info, warn};
use ndarray::Array2;

/// Most frequent parent of every node, over trees with the modal node count.
pub struct NodeRelationComputer<'a> {
    trees: &'a TreeSummaries,
    num_cancer_pops: usize,
}

impl<'a> NodeRelationComputer<'a> {
    pub fn new(trees: &'a TreeSummaries, num_cancer_pops: usize) -> Self {
        Self {
            trees,
            num_cancer_pops,
        }
    }

    /// Entry `c` is the consensus parent of population `c`. The root has
    /// none, so entry 0 is always `None`. Ties go to the lowest parent index.
    pub fn compute_relations(&self) -> Result<Vec<Option<PopIdx>>> {
        let k = self.num_cancer_pops;
        let mut adj_matrix = Array2::<f64>::zeros((k + 1, k + 1));
        let mut trees_examined = 0usize;

        for (&tree_id, tree) in self.trees {
            // Only examine trees with the mode number of nodes.
            if tree.num_cancer_pops() != k {
                continue;
            }
            for (&parent, children) in &tree.structure {
                for &child in children {
                    if parent > k || child > k {
                        return Err(ConsensusError::Invariant(format!(
                            "tree {}: edge {} -> {} outside 0..={}",
                            tree_id, parent, child, k
                        )));
                    }
                    adj_matrix[[parent, child]] += 1.0;
                }
            }
            trees_examined += 1;
        }

        if trees_examined == 0 {
            return Err(ConsensusError::Precondition(format!(
                "no tree has {} cancerous populations",
                k
            )));
        }

        let mut parents = vec![None];
        for child in 1..=k {
            let column = adj_matrix.column(child);
            let mut best = 0;
            for (parent, &tally) in column.iter().enumerate() {
                if tally > column[best] {
                    best = parent;
                }
            }
            let ties = column.iter().filter(|&&t| t == column[best]).count();
            if ties > 1 {
                warn!(
                    "Population {} has {} equally frequent parents; using {}",
                    child, ties, best
                );
            }
            parents.push(Some(best));
        }

        info!("Consensus parents computed from {} trees", trees_examined);
        Ok(parents)
    }
}
