use super::load_ensemble;
use crate::config::Config;
use crate::report::{write_reports, ReportId, ReportWriter};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

pub fn run(
    tree_summary: PathBuf,
    mutation_list: PathBuf,
    mutation_assignments: PathBuf,
    output_dir: PathBuf,
    outputs: Vec<ReportId>,
    no_compress: bool,
    config: Config,
) -> Result<()> {
    let progress = ProgressBarBuilder::new("Loading ensemble...")
        .with_tick(Duration::from_millis(120))
        .build()?;

    let loader = load_ensemble(&tree_summary, &mutation_list, &mutation_assignments, &config)?;

    let outputs: BTreeSet<ReportId> = if outputs.is_empty() {
        config.outputs.iter().copied().collect()
    } else {
        outputs.into_iter().collect()
    };
    let writer = ReportWriter::new(&output_dir, config.compress_matrices && !no_compress)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let written = write_reports(&loader, &outputs, &writer, |step| {
        progress.set_message(step.to_string())
    })
    .context("Failed to compute consensus reports")?;

    progress.finish_with_message(format!(
        "Wrote {} reports to {}",
        written.len(),
        writer.output_dir().display()
    ));
    Ok(())
}
