use crate::ensemble::EnsembleSource;
use crate::error::{ConsensusError, Result};
use crate::types::{ssm_index, MutationAssignment, TreeId};
use ndarray::{Array2, Axis};

/// Turns each tree's mutation assignment into a one-hot
/// `num_ssms x num_pops` matrix. Column `p - 1` stands for population `p`.
pub struct SsmAssignmentComputer<'a, S: EnsembleSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: EnsembleSource + ?Sized> SsmAssignmentComputer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Lazily yields one assignment matrix per tree, in source order.
    pub fn compute_ssm_assignments(
        &self,
    ) -> impl Iterator<Item = Result<(TreeId, Array2<f64>)>> + 'a {
        let source = self.source;
        let num_ssms = source.num_ssms();
        source.mut_assignments().map(move |item| {
            let (tree_id, muts) = item?;
            let ssm_ass = assignment_matrix(tree_id, &muts, num_ssms)?;
            Ok((tree_id, ssm_ass))
        })
    }
}

pub(crate) fn assignment_matrix(
    tree_id: TreeId,
    muts: &MutationAssignment,
    num_ssms: usize,
) -> Result<Array2<f64>> {
    let num_pops = muts.num_pops();
    let mut ssm_ass = Array2::<f64>::zeros((num_ssms, num_pops));

    for (pop, pop_muts) in muts.iter() {
        if pop == 0 || pop > num_pops {
            return Err(ConsensusError::Invariant(format!(
                "tree {}: mutations assigned to population {} outside 1..={}",
                tree_id, pop, num_pops
            )));
        }
        for id in &pop_muts.ssms {
            let ssm = ssm_index(tree_id, id, num_ssms)?;
            ssm_ass[[ssm, pop - 1]] = 1.0;
        }
    }

    // Every SSM sits in exactly one population.
    let row_sums = ssm_ass.sum_axis(Axis(1));
    if let Some((ssm, &total)) = row_sums.iter().enumerate().find(|&(_, &t)| t != 1.0) {
        return Err(ConsensusError::Invariant(format!(
            "tree {}: SSM s{} is assigned to {} populations",
            tree_id, ssm, total
        )));
    }

    Ok(ssm_ass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::InMemoryEnsemble;
    use crate::types::TreeSummary;

    fn tree() -> TreeSummary {
        TreeSummary::new()
            .with_population(0, &[1.0])
            .with_population(1, &[0.9])
            .with_population(2, &[0.4])
            .with_children(0, &[1])
            .with_children(1, &[2])
    }

    #[test]
    fn test_one_hot_rows() {
        let muts = MutationAssignment::new()
            .with_ssms(1, &["s0", "s2"])
            .with_ssms(2, &["s1"]);
        let ssm_ass = assignment_matrix(0, &muts, 3).unwrap();
        assert_eq!(ssm_ass.shape(), &[3, 2]);
        assert_eq!(ssm_ass.row(0).to_vec(), vec![1.0, 0.0]);
        assert_eq!(ssm_ass.row(1).to_vec(), vec![0.0, 1.0]);
        assert_eq!(ssm_ass.row(2).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_unassigned_ssm_breaks_partition() {
        let muts = MutationAssignment::new()
            .with_ssms(1, &["s0"])
            .with_ssms(2, &["s1"]);
        let err = assignment_matrix(9, &muts, 3).unwrap_err();
        assert!(matches!(err, ConsensusError::Invariant(ref msg) if msg.contains("s2")));
    }

    #[test]
    fn test_doubly_assigned_ssm_breaks_partition() {
        let muts = MutationAssignment::new()
            .with_ssms(1, &["s0", "s1"])
            .with_ssms(2, &["s1"]);
        assert!(assignment_matrix(0, &muts, 2).is_err());
    }

    #[test]
    fn test_out_of_range_ssm() {
        let muts = MutationAssignment::new().with_ssms(1, &["s0", "s5"]);
        let err = assignment_matrix(2, &muts, 2).unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidSsmId { tree: 2, .. }));
    }

    #[test]
    fn test_iterates_every_tree() {
        let muts = MutationAssignment::new()
            .with_ssms(1, &["s0"])
            .with_ssms(2, &["s1"]);
        let ensemble = InMemoryEnsemble::new(2)
            .with_tree(0, tree(), muts.clone())
            .with_tree(1, tree(), muts);

        let computer = SsmAssignmentComputer::new(&ensemble);
        let ids: Vec<TreeId> = computer
            .compute_ssm_assignments()
            .map(|item| item.map(|(id, _)| id))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(ids, vec![0, 1]);

        // A second pass starts over.
        assert_eq!(computer.compute_ssm_assignments().count(), 2);
    }
}
