use super::load_ensemble;
use crate::config::Config;
use crate::export::ConsensusExport;
use crate::summary::ConsensusSummary;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

pub fn run(
    tree_summary: PathBuf,
    mutation_list: PathBuf,
    mutation_assignments: PathBuf,
    output_file: Option<PathBuf>,
    config: Config,
) -> Result<()> {
    let progress = ProgressBarBuilder::new("Loading ensemble...")
        .with_tick(Duration::from_millis(120))
        .build()?;

    let loader = load_ensemble(&tree_summary, &mutation_list, &mutation_assignments, &config)?;

    progress.set_message("Computing consensus summary...");
    let summary =
        ConsensusSummary::compute(&loader).context("Failed to compute consensus summary")?;
    let export = ConsensusExport::from(&summary);

    let mut out: Box<dyn Write> = match &output_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    progress.finish_and_clear();
    serde_json::to_writer_pretty(&mut out, &export)?;
    writeln!(out)?;
    out.flush()?;

    if let Some(path) = output_file {
        eprintln!("Summary written to {}", path.display());
    }
    Ok(())
}
