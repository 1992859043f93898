mod common;

use common::{assert_close, three_tree_ensemble};
use phylo_consensus::types::{MutationAssignment, TreeSummary};
use phylo_consensus::InMemoryEnsemble;
use phylo_consensus::export::ConsensusExport;
use phylo_consensus::report::{write_reports, ReportId, ReportWriter};
use phylo_consensus::{ConsensusError, ConsensusSummary, EnsembleSource, JsonResultLoader};
use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TREE_SUMMARY: &str = r#"{
  "params": {"samples": ["S1"]},
  "trees": {
    "0": {
      "llh": -1502.3,
      "root": 0,
      "populations": {
        "0": {"cellular_prevalence": [1.0], "num_ssms": 0, "num_cnvs": 0},
        "1": {"cellular_prevalence": [0.9], "num_ssms": 2, "num_cnvs": 0},
        "2": {"cellular_prevalence": [0.3], "num_ssms": 2, "num_cnvs": 0}
      },
      "structure": {"0": [1], "1": [2]}
    },
    "1": {
      "populations": {
        "0": {"cellular_prevalence": [1.0]},
        "1": {"cellular_prevalence": [0.8]},
        "2": {"cellular_prevalence": [0.4]}
      },
      "structure": {"0": [1], "1": [2]}
    },
    "2": {
      "populations": {
        "0": {"cellular_prevalence": [1.0]},
        "1": {"cellular_prevalence": [0.85]},
        "2": {"cellular_prevalence": [0.35]}
      },
      "structure": {"0": [1], "1": [2]}
    }
  }
}"#;

const MUTATION_LIST: &str = r#"{
  "ssms": {
    "s0": {"name": "1_100"},
    "s1": {"name": "1_200"},
    "s2": {"name": "2_300"},
    "s3": {"name": "2_400"}
  },
  "cnvs": {}
}"#;

const MUT_ASSIGNMENT: &str = r#"{
  "mut_assignments": {
    "1": {"ssms": ["s0", "s1"], "cnvs": []},
    "2": {"ssms": ["s2", "s3"], "cnvs": []}
  }
}"#;

fn gzip(path: &Path, content: &str) {
    let file = fs::File::create(path).unwrap();
    let mut out = niffler::get_writer(
        Box::new(file),
        niffler::compression::Format::Gzip,
        niffler::Level::Six,
    )
    .unwrap();
    out.write_all(content.as_bytes()).unwrap();
}

fn read_gz(path: &Path) -> String {
    let file = fs::File::open(path).unwrap();
    let (mut reader, _) = niffler::get_reader(Box::new(file)).unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).unwrap();
    content
}

/// Writes the fixture ensemble; tree 2's assignments are gzipped.
fn write_fixture(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let summary = dir.join("trees.summ.json.gz");
    gzip(&summary, TREE_SUMMARY);
    let mutations = dir.join("muts.json");
    fs::write(&mutations, MUTATION_LIST).unwrap();

    let mutass = dir.join("mutass");
    fs::create_dir(&mutass).unwrap();
    fs::write(mutass.join("0.json"), MUT_ASSIGNMENT).unwrap();
    fs::write(mutass.join("1.json"), MUT_ASSIGNMENT).unwrap();
    gzip(&mutass.join("2.json.gz"), MUT_ASSIGNMENT);
    fs::write(mutass.join("README.txt"), "not an assignment").unwrap();

    (summary, mutations, mutass)
}

#[test]
fn loader_reads_fixture() {
    let tmp = TempDir::new().unwrap();
    let (summary, mutations, mutass) = write_fixture(tmp.path());

    let loader = JsonResultLoader::new(&summary, &mutations, &mutass).unwrap();
    assert_eq!(loader.num_ssms(), 4);
    assert_eq!(loader.num_trees(), 3);

    let tree_ids: Vec<usize> = loader
        .mut_assignments()
        .map(|item| item.map(|(id, _)| id))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tree_ids, vec![0, 1, 2]);

    let from_json = ConsensusSummary::compute(&loader).unwrap();
    let in_memory = ConsensusSummary::compute(&three_tree_ensemble()).unwrap();
    assert_eq!(from_json.ssm_clusters, in_memory.ssm_clusters);
    assert_eq!(from_json.coassignment, in_memory.coassignment);
    assert_eq!(from_json.ancestor_descendant, in_memory.ancestor_descendant);
}

#[test]
fn writes_all_reports() {
    let tmp = TempDir::new().unwrap();
    let out_dir = tmp.path().join("out");
    let writer = ReportWriter::new(&out_dir, true).unwrap();
    let outputs: BTreeSet<ReportId> = ReportId::ALL.into_iter().collect();

    let mut steps = Vec::new();
    let written = write_reports(&three_tree_ensemble(), &outputs, &writer, |step| {
        steps.push(step.to_string())
    })
    .unwrap();
    assert_eq!(written.len(), 7);
    assert_eq!(steps.len(), 5);

    let cellularity: f64 = fs::read_to_string(out_dir.join("1A.txt"))
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert_close(cellularity, 0.85);
    assert_eq!(fs::read_to_string(out_dir.join("1B.txt")).unwrap(), "2\n");

    let table = fs::read_to_string(out_dir.join("1C.txt")).unwrap();
    let rows: Vec<Vec<&str>> = table.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][..2], &["1", "2"]);
    assert_eq!(&rows[1][..2], &["2", "2"]);
    assert_close(rows[1][2].parse().unwrap(), 0.35);

    assert_eq!(fs::read_to_string(out_dir.join("2A.txt")).unwrap(), "1\n1\n2\n2\n");
    assert_eq!(fs::read_to_string(out_dir.join("3A.txt")).unwrap(), "1\t0\n2\t1\n");

    let coass = read_gz(&out_dir.join("2B.txt.gz"));
    assert_eq!(coass.lines().next(), Some("1 1 0 0"));
    let adm = read_gz(&out_dir.join("3B.txt.gz"));
    let adm_rows: Vec<&str> = adm.lines().collect();
    assert_eq!(adm_rows, vec!["0 0 1 1", "0 0 1 1", "0 0 0 0", "0 0 0 0"]);
}

#[test]
fn writes_only_requested_reports() {
    let tmp = TempDir::new().unwrap();
    let writer = ReportWriter::new(tmp.path(), false).unwrap();
    let outputs: BTreeSet<ReportId> = [ReportId::Coassignment].into_iter().collect();

    let written = write_reports(&three_tree_ensemble(), &outputs, &writer, |_| {}).unwrap();
    assert_eq!(written, vec![tmp.path().join("2B.txt")]);
    assert!(!tmp.path().join("1A.txt").exists());

    let coass = fs::read_to_string(tmp.path().join("2B.txt")).unwrap();
    assert_eq!(coass.lines().count(), 4);
}

#[test]
fn export_round_trips_through_json() {
    let summary = ConsensusSummary::compute(&three_tree_ensemble()).unwrap();
    let export = ConsensusExport::from(&summary);
    let json = serde_json::to_string(&export).unwrap();
    let back: ConsensusExport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.cancer_pops, 2);
    assert_eq!(back.ssm_clusters, vec![1, 1, 2, 2]);
    assert_eq!(back.clusters.len(), 2);
    assert_eq!(back.node_parents.len(), 2);
    assert_eq!(back.node_parents[1].parent, 1);
    assert_eq!(back.coassignment.len(), 4);
    assert_eq!(back.created_at, export.created_at);
}

#[test]
fn assignment_for_unknown_tree_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let (summary, mutations, mutass) = write_fixture(tmp.path());
    fs::write(mutass.join("9.json"), MUT_ASSIGNMENT).unwrap();

    let loader = JsonResultLoader::new(&summary, &mutations, &mutass).unwrap();
    let err = ConsensusSummary::compute(&loader).unwrap_err();
    assert!(matches!(err, ConsensusError::MissingTree(9)));
}

#[test]
fn empty_assignment_directory_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let (summary, mutations, _) = write_fixture(tmp.path());
    let empty = tmp.path().join("empty");
    fs::create_dir(&empty).unwrap();

    assert!(matches!(
        JsonResultLoader::new(&summary, &mutations, &empty),
        Err(ConsensusError::Precondition(_))
    ));
}

#[test]
fn cluster_reports_reject_broken_partition() {
    let tree = TreeSummary::new()
        .with_population(0, &[1.0])
        .with_population(1, &[0.9])
        .with_population(2, &[0.3])
        .with_children(0, &[1])
        .with_children(1, &[2]);
    // s0 listed twice, s1 never.
    let ensemble = InMemoryEnsemble::new(2).with_tree(
        0,
        tree,
        MutationAssignment::new().with_ssms(1, &["s0"]).with_ssms(2, &["s0"]),
    );

    let tmp = TempDir::new().unwrap();
    let writer = ReportWriter::new(tmp.path(), false).unwrap();
    let outputs: BTreeSet<ReportId> = [ReportId::ClusterTable, ReportId::SsmClusters]
        .into_iter()
        .collect();

    let err = write_reports(&ensemble, &outputs, &writer, |_| {}).unwrap_err();
    assert!(matches!(err, ConsensusError::Invariant(_)));
    assert!(!tmp.path().join("2A.txt").exists());
}

#[test]
fn reports_reject_population_without_prevalence() {
    let tree = TreeSummary::new()
        .with_population(0, &[1.0])
        .with_population(1, &[])
        .with_children(0, &[1]);
    let ensemble = InMemoryEnsemble::new(1).with_tree(
        0,
        tree,
        MutationAssignment::new().with_ssms(1, &["s0"]),
    );

    let tmp = TempDir::new().unwrap();
    let writer = ReportWriter::new(tmp.path(), false).unwrap();
    let outputs: BTreeSet<ReportId> = [ReportId::Cellularity].into_iter().collect();

    let err = write_reports(&ensemble, &outputs, &writer, |_| {}).unwrap_err();
    assert!(matches!(err, ConsensusError::Precondition(_)));
    assert!(!tmp.path().join("1A.txt").exists());
}

#[test]
fn duplicate_assignment_file_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let (summary, mutations, mutass) = write_fixture(tmp.path());
    gzip(&mutass.join("0.json.gz"), MUT_ASSIGNMENT);

    assert!(matches!(
        JsonResultLoader::new(&summary, &mutations, &mutass),
        Err(ConsensusError::Precondition(ref msg)) if msg.contains("tree 0")
    ));
}
