use super::ssm_assignment::SsmAssignmentComputer;
use crate::ensemble::EnsembleSource;
use crate::error::{ConsensusError, Result};
use log::info;
use ndarray::Array2;

/// Probability that two SSMs share a population, averaged over every tree.
pub struct CoassignmentComputer<'a, S: EnsembleSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: EnsembleSource + ?Sized> CoassignmentComputer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn compute_coassignments(&self) -> Result<Array2<f64>> {
        let num_ssms = self.source.num_ssms();
        let mut coass = Array2::<f64>::zeros((num_ssms, num_ssms));
        let mut num_trees = 0usize;

        for item in SsmAssignmentComputer::new(self.source).compute_ssm_assignments() {
            let (tree_id, ssm_ass) = item?;
            let ssm_ass_sq = ssm_ass.dot(&ssm_ass.t());
            if ssm_ass_sq.diag().iter().any(|&d| d != 1.0) {
                return Err(ConsensusError::Invariant(format!(
                    "tree {}: co-assignment diagonal is not all ones",
                    tree_id
                )));
            }
            coass += &ssm_ass_sq;
            num_trees += 1;
        }

        if num_trees == 0 {
            return Err(ConsensusError::Precondition(
                "ensemble has no mutation assignments".to_string(),
            ));
        }
        coass /= num_trees as f64;
        info!("Co-assignment matrix built from {} trees", num_trees);
        Ok(coass)
    }
}
