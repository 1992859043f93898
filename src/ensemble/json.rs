use super::{EnsembleSource, MutAssignmentIter};
use crate::error::{ConsensusError, Result};
use crate::types::{MutationAssignment, TreeId, TreeSummaries};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub const DEFAULT_ASSIGNMENT_EXT: &str = "json";

#[derive(Deserialize)]
struct SummaryFile {
    trees: TreeSummaries,
}

#[derive(Deserialize)]
struct MutationListFile {
    ssms: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct MutAssignmentFile {
    mut_assignments: MutationAssignment,
}

/// Reads an ensemble written as JSON: a tree summary file, a mutation list,
/// and a directory holding one `<tree_id>.json` assignment file per tree.
///
/// Any of the files may be gzip compressed. Tree summary and mutation list are
/// read eagerly; assignment files are read one per iteration step.
pub struct JsonResultLoader {
    trees: TreeSummaries,
    num_ssms: usize,
    assignment_files: Vec<(TreeId, PathBuf)>,
}

impl JsonResultLoader {
    pub fn new(
        tree_summary: impl AsRef<Path>,
        mutation_list: impl AsRef<Path>,
        mutation_assignments: impl AsRef<Path>,
    ) -> Result<Self> {
        Self::with_extension(
            tree_summary,
            mutation_list,
            mutation_assignments,
            DEFAULT_ASSIGNMENT_EXT,
        )
    }

    pub fn with_extension(
        tree_summary: impl AsRef<Path>,
        mutation_list: impl AsRef<Path>,
        mutation_assignments: impl AsRef<Path>,
        extension: &str,
    ) -> Result<Self> {
        let summary: SummaryFile = read_json(tree_summary.as_ref())?;
        for (&tree_id, tree) in &summary.trees {
            tree.validate(tree_id)?;
        }

        let mutations: MutationListFile = read_json(mutation_list.as_ref())?;
        let assignment_files = list_assignment_files(mutation_assignments.as_ref(), extension)?;

        info!(
            "Loaded {} trees, {} SSMs, {} assignment files",
            summary.trees.len(),
            mutations.ssms.len(),
            assignment_files.len()
        );

        Ok(Self {
            trees: summary.trees,
            num_ssms: mutations.ssms.len(),
            assignment_files,
        })
    }
}

impl EnsembleSource for JsonResultLoader {
    fn tree_summary(&self) -> &TreeSummaries {
        &self.trees
    }

    fn num_ssms(&self) -> usize {
        self.num_ssms
    }

    fn mut_assignments(&self) -> MutAssignmentIter<'_> {
        Box::new(self.assignment_files.iter().map(|(tree_id, path)| {
            debug!("Reading mutation assignments for tree {}", tree_id);
            let file: MutAssignmentFile = read_json(path)?;
            Ok((*tree_id, file.mut_assignments))
        }))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = match niffler::get_reader(Box::new(BufReader::new(file))) {
        Ok((reader, _format)) => reader,
        // Too short to carry a compression header, so it can only be plain text.
        Err(niffler::Error::FileTooShort) => Box::new(BufReader::new(File::open(path)?)),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_reader(reader)?)
}

/// Tree id encoded in an assignment file name, e.g. `12.json` or `12.json.gz`.
fn tree_id_from_file_name(name: &str, extension: &str) -> Option<TreeId> {
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let stem = name.strip_suffix(extension)?.strip_suffix('.')?;
    stem.parse().ok()
}

fn list_assignment_files(dir: &Path, extension: &str) -> Result<Vec<(TreeId, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let tree_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| tree_id_from_file_name(name, extension));
        match tree_id {
            Some(tree_id) => files.push((tree_id, path)),
            None => debug!("Skipping {}", path.display()),
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ConsensusError::Precondition(format!(
            "no mutation assignment files found in {}",
            dir.display()
        )));
    }
    if let Some(pair) = files.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(ConsensusError::Precondition(format!(
            "tree {} has two assignment files: {} and {}",
            pair[0].0,
            pair[0].1.display(),
            pair[1].1.display()
        )));
    }
    Ok(files)
}
