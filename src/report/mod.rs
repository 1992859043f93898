//! The seven report files summarising an ensemble.

mod writer;

pub use writer::ReportWriter;

use crate::ensemble::EnsembleSource;
use crate::error::Result;
use crate::stats::{
    ClusterMembershipComputer, CoassignmentComputer, NodeRelationComputer, SsmRelationComputer,
    SubcloneStats, SubcloneStatsComputer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(
    clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum ReportId {
    /// Mean clonal cellularity
    #[value(name = "1A")]
    #[serde(rename = "1A")]
    Cellularity,
    /// Modal number of cancerous populations
    #[value(name = "1B")]
    #[serde(rename = "1B")]
    ClusterCount,
    /// Per-cluster SSM count and prevalence
    #[value(name = "1C")]
    #[serde(rename = "1C")]
    ClusterTable,
    /// Per-SSM cluster label
    #[value(name = "2A")]
    #[serde(rename = "2A")]
    SsmClusters,
    /// SSM co-assignment matrix
    #[value(name = "2B")]
    #[serde(rename = "2B")]
    Coassignment,
    /// Consensus parent of each node
    #[value(name = "3A")]
    #[serde(rename = "3A")]
    NodeParents,
    /// SSM ancestor-descendant matrix
    #[value(name = "3B")]
    #[serde(rename = "3B")]
    AncestorDescendant,
}

impl ReportId {
    pub const ALL: [ReportId; 7] = [
        ReportId::Cellularity,
        ReportId::ClusterCount,
        ReportId::ClusterTable,
        ReportId::SsmClusters,
        ReportId::Coassignment,
        ReportId::NodeParents,
        ReportId::AncestorDescendant,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReportId::Cellularity => "1A",
            ReportId::ClusterCount => "1B",
            ReportId::ClusterTable => "1C",
            ReportId::SsmClusters => "2A",
            ReportId::Coassignment => "2B",
            ReportId::NodeParents => "3A",
            ReportId::AncestorDescendant => "3B",
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, ReportId::Coassignment | ReportId::AncestorDescendant)
    }

    pub fn file_name(&self, compress_matrices: bool) -> String {
        if self.is_matrix() && compress_matrices {
            format!("{}.txt.gz", self.code())
        } else {
            format!("{}.txt", self.code())
        }
    }

    fn needs_subclone_stats(&self) -> bool {
        !matches!(self, ReportId::Coassignment | ReportId::AncestorDescendant)
    }

    fn needs_membership(&self) -> bool {
        matches!(self, ReportId::ClusterTable | ReportId::SsmClusters)
    }
}

/// Computes what `outputs` needs and writes one file per requested report.
///
/// `on_step` is told which component is about to run, for progress display.
/// Returns the written paths in report order.
pub fn write_reports<S, F>(
    source: &S,
    outputs: &BTreeSet<ReportId>,
    writer: &ReportWriter,
    mut on_step: F,
) -> Result<Vec<PathBuf>>
where
    S: EnsembleSource + ?Sized,
    F: FnMut(&str),
{
    for (&tree_id, tree) in source.tree_summary() {
        tree.validate(tree_id)?;
    }

    let mut written = Vec::new();

    let stats: Option<SubcloneStats> = if outputs.iter().any(|o| o.needs_subclone_stats()) {
        on_step("Computing subclone statistics...");
        Some(SubcloneStatsComputer::new(source.tree_summary()).calc()?)
    } else {
        None
    };

    if let Some(stats) = &stats {
        if outputs.contains(&ReportId::Cellularity) {
            written.push(writer.write_cellularity(stats.cellularity)?);
        }
        if outputs.contains(&ReportId::ClusterCount) {
            written.push(writer.write_cluster_count(stats.cancer_pops)?);
        }

        if outputs.iter().any(|o| o.needs_membership()) {
            on_step("Assigning SSMs to clusters...");
            let membership = ClusterMembershipComputer::new(source, stats).calc()?;
            if outputs.contains(&ReportId::ClusterTable) {
                written.push(writer.write_cluster_table(&membership.counts, &stats.phis)?);
            }
            if outputs.contains(&ReportId::SsmClusters) {
                written.push(writer.write_ssm_clusters(&membership.assignments)?);
            }
        }
    }

    if outputs.contains(&ReportId::Coassignment) {
        on_step("Computing SSM co-assignments...");
        let coass = CoassignmentComputer::new(source).compute_coassignments()?;
        written.push(writer.write_matrix(ReportId::Coassignment, &coass)?);
    }

    if let Some(stats) = &stats {
        if outputs.contains(&ReportId::NodeParents) {
            on_step("Computing node relations...");
            let parents = NodeRelationComputer::new(source.tree_summary(), stats.cancer_pops)
                .compute_relations()?;
            written.push(writer.write_node_parents(&parents)?);
        }
    }

    if outputs.contains(&ReportId::AncestorDescendant) {
        on_step("Computing SSM ancestor-descendant relations...");
        let anc_desc = SsmRelationComputer::new(source).compute_ancestor_desc()?;
        written.push(writer.write_matrix(ReportId::AncestorDescendant, &anc_desc)?);
    }

    Ok(written)
}
