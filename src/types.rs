use crate::error::{ConsensusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a sampled tree within the ensemble.
pub type TreeId = usize;

/// Index of a population within one tree. 0 is the non-cancerous root.
pub type PopIdx = usize;

pub const ROOT_POP: PopIdx = 0;
pub const CLONAL_POP: PopIdx = 1;

/// Parent population -> ordered child populations.
pub type TreeStructure = BTreeMap<PopIdx, Vec<PopIdx>>;

/// Every tree of the ensemble keyed by its id.
pub type TreeSummaries = BTreeMap<TreeId, TreeSummary>;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Population {
    /// One value per sample. Only the mean is used downstream.
    pub cellular_prevalence: Vec<f64>,
}

impl Population {
    pub fn new(cellular_prevalence: &[f64]) -> Self {
        Self {
            cellular_prevalence: cellular_prevalence.to_vec(),
        }
    }

    /// NaN when no sample values are present; `TreeSummary::validate` rejects that case.
    pub fn mean_prevalence(&self) -> f64 {
        let n = self.cellular_prevalence.len() as f64;
        self.cellular_prevalence.iter().sum::<f64>() / n
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct TreeSummary {
    pub populations: BTreeMap<PopIdx, Population>,
    #[serde(default)]
    pub structure: TreeStructure,
}

impl TreeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_population(mut self, idx: PopIdx, cellular_prevalence: &[f64]) -> Self {
        self.populations
            .insert(idx, Population::new(cellular_prevalence));
        self
    }

    pub fn with_children(mut self, parent: PopIdx, children: &[PopIdx]) -> Self {
        self.structure.insert(parent, children.to_vec());
        self
    }

    /// Populations other than the non-cancerous root.
    pub fn num_cancer_pops(&self) -> usize {
        self.populations.len().saturating_sub(1)
    }

    /// A tree collapsed to its root carries no cancerous population.
    pub fn is_degenerate(&self) -> bool {
        self.populations.len() <= 1
    }

    /// Lowest non-root population index.
    pub fn clonal_population(&self) -> Option<PopIdx> {
        self.populations.keys().copied().find(|&idx| idx != ROOT_POP)
    }

    /// Non-root populations ordered by descending mean prevalence.
    ///
    /// Population indices are traversal artifacts, so this rank is what lines
    /// populations up across trees. Equal prevalences keep index order.
    pub fn ranked_populations(&self) -> Vec<PopIdx> {
        let mut ranked: Vec<(PopIdx, f64)> = self
            .populations
            .iter()
            .filter(|(&idx, _)| idx != ROOT_POP)
            .map(|(&idx, pop)| (idx, pop.mean_prevalence()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Mean prevalences of the non-root populations, largest first.
    pub fn ranked_prevalences(&self) -> Vec<f64> {
        self.ranked_populations()
            .into_iter()
            .map(|idx| self.populations[&idx].mean_prevalence())
            .collect()
    }

    pub fn validate(&self, tree_id: TreeId) -> Result<()> {
        if !self.populations.contains_key(&ROOT_POP) {
            return Err(ConsensusError::Precondition(format!(
                "tree {}: missing non-cancerous root population",
                tree_id
            )));
        }
        for (idx, pop) in &self.populations {
            if pop.cellular_prevalence.is_empty() {
                return Err(ConsensusError::Precondition(format!(
                    "tree {}: population {} has no cellular prevalence values",
                    tree_id, idx
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PopulationMutations {
    #[serde(default)]
    pub ssms: Vec<String>,
    #[serde(default)]
    pub cnvs: Vec<String>,
}

/// Variants assigned to each cancerous population of one tree.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct MutationAssignment {
    populations: BTreeMap<PopIdx, PopulationMutations>,
}

impl MutationAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ssms(mut self, pop: PopIdx, ssms: &[&str]) -> Self {
        self.populations.entry(pop).or_default().ssms =
            ssms.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn num_pops(&self) -> usize {
        self.populations.len()
    }

    /// SSM identifiers of `pop`; empty when the population holds none.
    pub fn ssms(&self, pop: PopIdx) -> &[String] {
        self.populations
            .get(&pop)
            .map(|muts| muts.ssms.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (PopIdx, &PopulationMutations)> {
        self.populations.iter().map(|(&idx, muts)| (idx, muts))
    }
}

/// Parses a variant id such as `s12` into its zero-based index.
pub fn parse_ssm_id(id: &str) -> Option<usize> {
    let mut chars = id.chars();
    chars.next()?;
    let digits = chars.as_str();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses `id` and checks it addresses one of `num_ssms` variants.
pub(crate) fn ssm_index(tree: TreeId, id: &str, num_ssms: usize) -> Result<usize> {
    match parse_ssm_id(id) {
        Some(idx) if idx < num_ssms => Ok(idx),
        _ => Err(ConsensusError::InvalidSsmId {
            tree,
            id: id.to_string(),
        }),
    }
}
