use crate::ensemble::EnsembleSource;
use crate::error::Result;
use crate::stats::{
    ClusterMembershipComputer, CoassignmentComputer, NodeRelationComputer, SsmRelationComputer,
    SubcloneStatsComputer,
};
use crate::types::PopIdx;
use ndarray::Array2;

/// Every consensus statistic for one ensemble.
#[derive(Debug, Clone)]
pub struct ConsensusSummary {
    pub num_trees: usize,
    pub num_ssms: usize,
    /// Modal number of cancerous populations (K).
    pub cancer_pops: usize,
    pub cellularity: f64,
    /// Consensus prevalence per cluster, largest first.
    pub phis: Vec<f64>,
    /// SSMs per cluster.
    pub cluster_counts: Vec<usize>,
    /// Zero-based cluster label per SSM.
    pub ssm_clusters: Vec<usize>,
    pub coassignment: Array2<f64>,
    pub ancestor_descendant: Array2<f64>,
    /// Consensus parent per population; entry 0 (the root) is `None`.
    pub node_parents: Vec<Option<PopIdx>>,
}

impl ConsensusSummary {
    pub fn compute<S: EnsembleSource + ?Sized>(source: &S) -> Result<Self> {
        for (&tree_id, tree) in source.tree_summary() {
            tree.validate(tree_id)?;
        }

        let stats = SubcloneStatsComputer::new(source.tree_summary()).calc()?;
        let membership = ClusterMembershipComputer::new(source, &stats).calc()?;
        let coassignment = CoassignmentComputer::new(source).compute_coassignments()?;
        let ancestor_descendant = SsmRelationComputer::new(source).compute_ancestor_desc()?;
        let node_parents =
            NodeRelationComputer::new(source.tree_summary(), stats.cancer_pops)
                .compute_relations()?;

        Ok(Self {
            num_trees: source.num_trees(),
            num_ssms: source.num_ssms(),
            cancer_pops: stats.cancer_pops,
            cellularity: stats.cellularity,
            phis: stats.phis,
            cluster_counts: membership.counts,
            ssm_clusters: membership.assignments,
            coassignment,
            ancestor_descendant,
            node_parents,
        })
    }
}
