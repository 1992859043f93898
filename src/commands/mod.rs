pub mod init_config;
pub mod summarize;
pub mod write_report;

use crate::config::Config;
use crate::ensemble::JsonResultLoader;
use anyhow::{Context, Result};
use std::path::Path;

fn load_ensemble(
    tree_summary: &Path,
    mutation_list: &Path,
    mutation_assignments: &Path,
    config: &Config,
) -> Result<JsonResultLoader> {
    JsonResultLoader::with_extension(
        tree_summary,
        mutation_list,
        mutation_assignments,
        &config.mutation_assignment_ext,
    )
    .with_context(|| {
        format!(
            "Failed to load ensemble from {}, {} and {}",
            tree_summary.display(),
            mutation_list.display(),
            mutation_assignments.display()
        )
    })
}
