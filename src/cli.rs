use crate::report::ReportId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the consensus report files for a sampled tree ensemble
    WriteReport {
        /// JSON tree summaries (optionally gzipped)
        tree_summary: PathBuf,
        /// JSON list of mutations
        mutation_list: PathBuf,
        /// Directory of per-tree mutation assignment files (<tree_id>.json[.gz])
        mutation_assignments: PathBuf,
        /// Directory in which to save the reports
        output_dir: PathBuf,
        /// Reports to write (default: all, or the list in config.toml)
        #[arg(long, value_enum, value_delimiter = ',')]
        outputs: Vec<ReportId>,
        /// Write the 2B and 3B matrices uncompressed
        #[arg(long)]
        no_compress: bool,
    },

    /// Write every consensus statistic as a single JSON document
    Summarize {
        /// JSON tree summaries (optionally gzipped)
        tree_summary: PathBuf,
        /// JSON list of mutations
        mutation_list: PathBuf,
        /// Directory of per-tree mutation assignment files (<tree_id>.json[.gz])
        mutation_assignments: PathBuf,
        /// Output file for the JSON summary (default: stdout)
        #[arg(short = 'o', long = "output")]
        output_file: Option<PathBuf>,
    },

    /// Write a config.toml holding the default settings
    InitConfig,
}
