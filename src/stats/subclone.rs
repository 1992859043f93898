use super::int_mode;
use crate::error::{ConsensusError, Result};
use crate::types::{TreeSummaries, CLONAL_POP};
use log::{debug, info, warn};
use serde::Serialize;

/// Ensemble-wide population statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcloneStats {
    /// Modal number of cancerous populations (K).
    pub cancer_pops: usize,
    /// Mean prevalence of the clonal population.
    pub cellularity: f64,
    /// Consensus prevalence per rank, largest first. Length K.
    pub phis: Vec<f64>,
}

pub struct SubcloneStatsComputer<'a> {
    trees: &'a TreeSummaries,
}

impl<'a> SubcloneStatsComputer<'a> {
    pub fn new(trees: &'a TreeSummaries) -> Self {
        Self { trees }
    }

    pub fn calc(&self) -> Result<SubcloneStats> {
        let (cancer_pops, cellularity) = self.calc_global_stats()?;
        let phis = self.calc_pop_stats(cancer_pops)?;
        info!(
            "Consensus: {} cancer populations, cellularity {:.4}",
            cancer_pops, cellularity
        );
        Ok(SubcloneStats {
            cancer_pops,
            cellularity,
            phis,
        })
    }

    fn calc_global_stats(&self) -> Result<(usize, f64)> {
        let mut cancer_pop_counts = Vec::new();
        let mut cellularities = Vec::new();

        for (&tree_id, tree) in self.trees {
            // Trees can lose every cancerous node when small nodes are pruned.
            if tree.is_degenerate() {
                debug!("Tree {} has no cancerous populations, skipping", tree_id);
                continue;
            }

            cancer_pop_counts.push(tree.num_cancer_pops());
            let clonal_idx = tree.clonal_population();
            if clonal_idx != Some(CLONAL_POP) {
                return Err(ConsensusError::Invariant(format!(
                    "tree {}: clonal population has index {:?}, expected {}",
                    tree_id, clonal_idx, CLONAL_POP
                )));
            }
            cellularities.push(tree.populations[&CLONAL_POP].mean_prevalence());
        }

        let (cancer_pops, tied) = int_mode(&cancer_pop_counts).ok_or_else(|| {
            ConsensusError::Precondition(
                "no tree in the ensemble has a cancerous population".to_string(),
            )
        })?;
        if tied {
            warn!(
                "Several population counts are equally frequent; using the smallest ({})",
                cancer_pops
            );
        }

        let cellularity = cellularities.iter().sum::<f64>() / cellularities.len() as f64;
        Ok((cancer_pops, cellularity))
    }

    fn calc_pop_stats(&self, cancer_pops: usize) -> Result<Vec<f64>> {
        let mut phis_sum = vec![0.0; cancer_pops];
        let mut trees_examined = 0usize;

        for tree in self.trees.values() {
            if tree.num_cancer_pops() != cancer_pops {
                continue;
            }
            // Populations are matched across trees by prevalence rank.
            for (sum, phi) in phis_sum.iter_mut().zip(tree.ranked_prevalences()) {
                *sum += phi;
            }
            trees_examined += 1;
        }

        if trees_examined == 0 {
            return Err(ConsensusError::Precondition(format!(
                "no tree has {} cancerous populations",
                cancer_pops
            )));
        }

        Ok(phis_sum
            .into_iter()
            .map(|sum| sum / trees_examined as f64)
            .collect())
    }
}
