use crate::summary::ConsensusSummary;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::de::{Deserializer, Error};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const EXPORT_VERSION: &str = "1.0";

/// JSON rendering of a [`ConsensusSummary`].
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsensusExport {
    pub version: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    pub num_trees: usize,
    pub num_ssms: usize,
    pub cancer_pops: usize,
    pub cellularity: f64,
    pub clusters: Vec<ClusterExport>,
    /// One-based cluster label per SSM, as written to the 2A report.
    pub ssm_clusters: Vec<usize>,
    pub coassignment: Vec<Vec<f64>>,
    pub ancestor_descendant: Vec<Vec<f64>>,
    pub node_parents: Vec<NodeParentExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterExport {
    pub cluster: usize,
    pub num_ssms: usize,
    pub cellular_prevalence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeParentExport {
    pub node: usize,
    pub parent: usize,
}

impl From<&ConsensusSummary> for ConsensusExport {
    fn from(summary: &ConsensusSummary) -> Self {
        let clusters = summary
            .phis
            .iter()
            .zip(&summary.cluster_counts)
            .enumerate()
            .map(|(idx, (&phi, &count))| ClusterExport {
                cluster: idx + 1,
                num_ssms: count,
                cellular_prevalence: phi,
            })
            .collect();

        let node_parents = summary
            .node_parents
            .iter()
            .enumerate()
            .filter_map(|(node, parent)| parent.map(|parent| NodeParentExport { node, parent }))
            .collect();

        Self {
            version: EXPORT_VERSION.to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            num_trees: summary.num_trees,
            num_ssms: summary.num_ssms,
            cancer_pops: summary.cancer_pops,
            cellularity: summary.cellularity,
            clusters,
            ssm_clusters: summary.ssm_clusters.iter().map(|c| c + 1).collect(),
            coassignment: matrix_rows(&summary.coassignment),
            ancestor_descendant: matrix_rows(&summary.ancestor_descendant),
            node_parents,
        }
    }
}

fn matrix_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(D::Error::custom)
}
