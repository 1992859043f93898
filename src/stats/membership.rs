use super::rounding::round_to_int;
use super::subclone::SubcloneStats;
use crate::ensemble::EnsembleSource;
use crate::error::{ConsensusError, Result};
use crate::types::{ssm_index, ROOT_POP};
use log::{debug, info};
use serde::Serialize;

/// Hard cluster labels for every SSM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMembership {
    /// Zero-based cluster label per SSM; cluster `i` matches `phis[i]`.
    pub assignments: Vec<usize>,
    /// SSMs per cluster. Sums to `num_ssms`.
    pub counts: Vec<usize>,
    /// Mean prevalence of the population holding each SSM.
    pub ssm_prevalence: Vec<f64>,
}

pub struct ClusterMembershipComputer<'a, S: EnsembleSource + ?Sized> {
    source: &'a S,
    subclone_stats: &'a SubcloneStats,
}

impl<'a, S: EnsembleSource + ?Sized> ClusterMembershipComputer<'a, S> {
    pub fn new(source: &'a S, subclone_stats: &'a SubcloneStats) -> Self {
        Self {
            source,
            subclone_stats,
        }
    }

    pub fn calc(&self) -> Result<ClusterMembership> {
        let k = self.subclone_stats.cancer_pops;
        let num_ssms = self.source.num_ssms();
        let trees = self.source.tree_summary();

        let mut ssm_cp = vec![0.0; num_ssms];
        let mut pop_ssm_count = vec![0.0; k];
        let mut trees_examined = 0usize;

        for item in self.source.mut_assignments() {
            let (tree_id, muts) = item?;
            let tree = trees
                .get(&tree_id)
                .ok_or(ConsensusError::MissingTree(tree_id))?;
            if tree.num_cancer_pops() != k {
                continue;
            }
            if !tree.populations.keys().copied().eq(ROOT_POP..=k) {
                return Err(ConsensusError::Invariant(format!(
                    "tree {}: populations are not numbered 0..={}",
                    tree_id, k
                )));
            }

            let mut seen = vec![false; num_ssms];
            for (rank, pop_idx) in tree.ranked_populations().into_iter().enumerate() {
                let pop_cp = tree.populations[&pop_idx].mean_prevalence();
                let pop_ssms = muts.ssms(pop_idx);
                for id in pop_ssms {
                    let ssm = ssm_index(tree_id, id, num_ssms)?;
                    if std::mem::replace(&mut seen[ssm], true) {
                        return Err(ConsensusError::Invariant(format!(
                            "tree {}: SSM {} is assigned to more than one population",
                            tree_id, id
                        )));
                    }
                    ssm_cp[ssm] += pop_cp;
                }
                pop_ssm_count[rank] += pop_ssms.len() as f64;
            }
            // Every SSM sits in exactly one population.
            if let Some(ssm) = seen.iter().position(|&s| !s) {
                return Err(ConsensusError::Invariant(format!(
                    "tree {}: SSM s{} is not assigned to any population",
                    tree_id, ssm
                )));
            }
            debug!("Tree {} contributes to cluster membership", tree_id);
            trees_examined += 1;
        }

        if trees_examined == 0 {
            return Err(ConsensusError::Precondition(format!(
                "no tree with {} cancerous populations has mutation assignments",
                k
            )));
        }

        let n = trees_examined as f64;
        for cp in ssm_cp.iter_mut() {
            *cp /= n;
        }
        let mean_counts: Vec<f64> = pop_ssm_count.iter().map(|c| c / n).collect();
        let counts = round_to_int(&mean_counts)?
            .into_iter()
            .map(|c| {
                usize::try_from(c).map_err(|_| {
                    ConsensusError::Invariant(format!("negative cluster size {}", c))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        let assignments = label_by_prevalence(&ssm_cp, &counts)?;
        info!(
            "Assigned {} SSMs to {} clusters over {} trees",
            num_ssms, k, trees_examined
        );

        Ok(ClusterMembership {
            assignments,
            counts,
            ssm_prevalence: ssm_cp,
        })
    }
}

/// Slices the SSMs, ordered by descending prevalence, into consecutive blocks
/// of `counts[i]` SSMs labelled `i`.
fn label_by_prevalence(ssm_cp: &[f64], counts: &[usize]) -> Result<Vec<usize>> {
    let mut ordered_ssms: Vec<usize> = (0..ssm_cp.len()).collect();
    ordered_ssms.sort_by(|&a, &b| ssm_cp[b].total_cmp(&ssm_cp[a]));

    // Everything starts in cluster 0, so only the later blocks need labelling.
    let mut assignments = vec![0usize; ssm_cp.len()];
    let mut start = counts.first().copied().unwrap_or(0);
    for (cluster, &count) in counts.iter().enumerate().skip(1) {
        let end = start + count;
        let block = ordered_ssms.get(start..end).ok_or_else(|| {
            ConsensusError::Invariant(format!(
                "cluster sizes exceed the {} available SSMs",
                ssm_cp.len()
            ))
        })?;
        for &ssm in block {
            assignments[ssm] = cluster;
        }
        start = end;
    }

    for (cluster, &count) in counts.iter().enumerate() {
        let labelled = assignments.iter().filter(|&&c| c == cluster).count();
        if labelled != count {
            return Err(ConsensusError::Invariant(format!(
                "cluster {} has {} SSMs, expected {}",
                cluster, labelled, count
            )));
        }
    }
    Ok(assignments)
}
